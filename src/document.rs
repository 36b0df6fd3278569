use crate::background::BackgroundImage;
use crate::element::Item;
use crate::layer::{Layer, LayerKind};

/// Positional address of an item: `layers[layer].items[item]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub layer: usize,
    pub item: usize,
}

impl ItemRef {
    pub fn new(layer: usize, item: usize) -> Self {
        Self { layer, item }
    }
}

/// Owns all persistent annotation state.
///
/// `current_layer` of `None` is the "no layer selected" state; every add
/// operation is a no-op while it holds.
#[derive(Debug, Default, Clone)]
pub struct Document {
    layers: Vec<Layer>,
    background: Option<BackgroundImage>,
    current_layer: Option<usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn current_layer_index(&self) -> Option<usize> {
        self.current_layer
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.current_layer.and_then(|index| self.layers.get(index))
    }

    /// Appends a layer and makes it current.
    pub fn add_layer(&mut self, kind: LayerKind) -> usize {
        self.layers.push(Layer::new(kind));
        let index = self.layers.len() - 1;
        self.current_layer = Some(index);
        log::info!("Added {kind} layer {index}");
        index
    }

    pub fn select_layer(&mut self, index: usize) -> bool {
        if index < self.layers.len() {
            self.current_layer = Some(index);
            true
        } else {
            log::warn!("Cannot select missing layer {index}");
            false
        }
    }

    /// Removes a layer. The current layer keeps pointing at the same layer
    /// when it survives, otherwise at its successor (or predecessor when the
    /// last layer went away).
    pub fn delete_layer(&mut self, index: usize) -> Option<Layer> {
        if index >= self.layers.len() {
            log::warn!("Cannot delete missing layer {index}");
            return None;
        }
        let removed = self.layers.remove(index);

        self.current_layer = match self.current_layer {
            _ if self.layers.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) => Some(current.min(self.layers.len() - 1)),
            None => None,
        };
        log::info!("Deleted layer {index}");
        Some(removed)
    }

    pub fn toggle_layer_visible(&mut self, index: usize) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.visible = !layer.visible;
                true
            }
            None => false,
        }
    }

    pub fn item(&self, item_ref: ItemRef) -> Option<&Item> {
        self.layers.get(item_ref.layer)?.items.get(item_ref.item)
    }

    pub fn item_mut(&mut self, item_ref: ItemRef) -> Option<&mut Item> {
        self.layers
            .get_mut(item_ref.layer)?
            .items
            .get_mut(item_ref.item)
    }

    /// Visible in its own right and inside a visible layer.
    pub fn is_item_shown(&self, item_ref: ItemRef) -> bool {
        self.layers.get(item_ref.layer).is_some_and(|layer| {
            layer.visible && layer.items.get(item_ref.item).is_some_and(|item| item.visible)
        })
    }

    /// Appends to the current layer. `None` when no layer is selected.
    pub fn add_item(&mut self, item: Item) -> Option<ItemRef> {
        let Some(layer_index) = self.current_layer else {
            log::warn!("No layer selected, dropping new {}", item.kind().label());
            return None;
        };
        let layer = self.layers.get_mut(layer_index)?;
        let index = layer.add_item(item);
        Some(ItemRef::new(layer_index, index))
    }

    pub fn delete_item(&mut self, item_ref: ItemRef) -> Option<Item> {
        self.layers
            .get_mut(item_ref.layer)?
            .remove_item(item_ref.item)
    }

    pub fn toggle_item_visible(&mut self, item_ref: ItemRef) -> bool {
        match self.item_mut(item_ref) {
            Some(item) => {
                item.visible = !item.visible;
                true
            }
            None => false,
        }
    }

    /// Replaces the layer list and selects the first layer, if any.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) {
        self.layers = layers;
        self.current_layer = (!self.layers.is_empty()).then_some(0);
    }

    /// Appends a loaded layer and selects the first layer.
    pub fn append_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
        self.current_layer = Some(0);
    }

    /// Removes every layer. The background image stays.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.current_layer = None;
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, image: Option<BackgroundImage>) {
        self.background = image;
    }

    /// Item addresses from topmost to bottommost: reverse layer order, then
    /// reverse item order within each layer.
    pub fn topmost_first(&self) -> impl Iterator<Item = (ItemRef, &Layer, &Item)> + '_ {
        self.layers.iter().enumerate().rev().flat_map(|(layer_index, layer)| {
            layer
                .items
                .iter()
                .enumerate()
                .rev()
                .map(move |(item_index, item)| (ItemRef::new(layer_index, item_index), layer, item))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ShapeStyle, factory};
    use egui::pos2;

    fn circle() -> Item {
        factory::circle(pos2(0.0, 0.0), 1.0, ShapeStyle::default())
    }

    #[test]
    fn test_add_item_without_layer_is_noop() {
        let mut document = Document::new();
        assert_eq!(document.current_layer_index(), None);
        assert_eq!(document.add_item(circle()), None);
        assert!(document.layers().is_empty());
    }

    #[test]
    fn test_add_layer_selects_it() {
        let mut document = Document::new();
        document.add_layer(LayerKind::Polygon);
        let second = document.add_layer(LayerKind::Text);
        assert_eq!(document.current_layer_index(), Some(second));
        assert_eq!(document.add_item(circle()), Some(ItemRef::new(1, 0)));
    }

    #[test]
    fn test_delete_layer_clamps_current() {
        let mut document = Document::new();
        for _ in 0..3 {
            document.add_layer(LayerKind::Polygon);
        }
        // Deleting a layer after the current one leaves it alone
        document.select_layer(0);
        document.delete_layer(2);
        assert_eq!(document.current_layer_index(), Some(0));

        // Deleting a layer before the current one shifts it
        document.add_layer(LayerKind::Polygon);
        document.delete_layer(0);
        assert_eq!(document.current_layer_index(), Some(1));

        // Deleting the current last layer falls back to its predecessor
        document.delete_layer(1);
        assert_eq!(document.current_layer_index(), Some(0));

        document.delete_layer(0);
        assert_eq!(document.current_layer_index(), None);
        assert!(document.delete_layer(0).is_none());
    }

    #[test]
    fn test_topmost_first_order() {
        let mut document = Document::new();
        document.add_layer(LayerKind::Polygon);
        document.add_item(circle());
        document.add_item(circle());
        document.add_layer(LayerKind::Polygon);
        document.add_item(circle());

        let order: Vec<ItemRef> = document.topmost_first().map(|(r, _, _)| r).collect();
        assert_eq!(
            order,
            vec![ItemRef::new(1, 0), ItemRef::new(0, 1), ItemRef::new(0, 0)]
        );
    }

    #[test]
    fn test_visibility() {
        let mut document = Document::new();
        document.add_layer(LayerKind::Polygon);
        let item = document.add_item(circle()).unwrap();
        assert!(document.is_item_shown(item));

        document.toggle_layer_visible(0);
        assert!(!document.is_item_shown(item));
        document.toggle_layer_visible(0);
        document.toggle_item_visible(item);
        assert!(!document.is_item_shown(item));
        assert!(!document.toggle_item_visible(ItemRef::new(4, 4)));
    }
}
