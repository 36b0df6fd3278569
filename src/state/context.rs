//! The editor's single entry point for host events.
//!
//! `EditorContext` owns the [`Document`], the transient [`EditorState`], the
//! tool mode and the edit target. Pointer handlers return a [`Repaint`]
//! request describing what the renderer has to redraw; document commands
//! only mutate, after which the host repaints in full.
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

use egui::Pos2;

use super::editor_state::{EditTarget, EditorState};
use super::persistence;
use crate::background::BackgroundImage;
use crate::config::EditorConfig;
use crate::document::{Document, ItemRef};
use crate::element::{Item, ShapeStyle, StrokeStyle, factory};
use crate::error::{EditorError, EditorResult};
use crate::geometry;
use crate::geometry::hit_testing::{self, DragAnchor};
use crate::layer::{Layer, LayerKind};
use crate::renderer::Repaint;
use crate::surface::{ApproxTextMeasurer, TextMeasurer};
use crate::tools::{DrawStrokeHelper, LiveOptions, NewItem, ToolMode};

/// A finished file read handed back to the editor.
#[derive(Debug, Clone)]
pub enum Completion {
    /// Annotation JSON text
    Annotations(String),
    Background(BackgroundImage),
}

pub struct EditorContext {
    document: Document,
    state: EditorState,
    mode: ToolMode,
    edit_target: Option<EditTarget>,
    config: EditorConfig,
    shape_style: ShapeStyle,
    draw_style: StrokeStyle,
    measurer: Box<dyn TextMeasurer>,
    /// Completions that arrived while a drag held the document
    pending: VecDeque<Completion>,
    notices: Vec<String>,
}

impl fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorContext")
            .field("state", &self.state.name())
            .field("mode", &self.mode)
            .field("edit_target", &self.edit_target)
            .field("layers", &self.document.layers().len())
            .field("current_layer", &self.document.current_layer_index())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorContext {
    /// Empty document, `Idle`, move mode, no edit target.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            document: Document::new(),
            state: EditorState::Idle,
            mode: ToolMode::Move,
            edit_target: None,
            shape_style: config.shape_style,
            draw_style: config.draw_style,
            config,
            measurer: Box::new(ApproxTextMeasurer),
            pending: VecDeque::new(),
            notices: Vec::new(),
        }
    }

    /// Replaces the text measurer used for text item widths.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn edit_target(&self) -> Option<EditTarget> {
        self.edit_target
    }

    /// The polygon currently in vertex-edit mode, if any.
    pub fn vertex_edit_item(&self) -> Option<ItemRef> {
        self.edit_target.and_then(|target| target.vertex_edit_item())
    }

    pub fn shape_style(&self) -> ShapeStyle {
        self.shape_style
    }

    pub fn set_shape_style(&mut self, style: ShapeStyle) {
        self.shape_style = style;
    }

    pub fn draw_style(&self) -> StrokeStyle {
        self.draw_style
    }

    pub fn set_draw_style(&mut self, style: StrokeStyle) {
        self.draw_style = style;
    }

    pub fn pending_completions(&self) -> usize {
        self.pending.len()
    }

    /// Logs a failure and keeps it as a user-visible notice.
    pub fn report(&mut self, err: &EditorError) {
        log::error!("{err}");
        self.notices.push(err.to_string());
    }

    /// User-visible messages collected since the last call.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Switches the tool mode, abandoning whatever capture is in progress.
    pub fn set_mode(&mut self, mode: ToolMode) -> Repaint {
        if self.mode != mode {
            log::debug!("Tool mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.state = self.resting_state();
        self.drain_pending();
        Repaint::Full
    }

    fn resting_state(&self) -> EditorState {
        match self.mode {
            ToolMode::PolygonPoints => EditorState::DrawingPolygonByClick { points: Vec::new() },
            ToolMode::Move | ToolMode::Draw => EditorState::Idle,
        }
    }

    // Pointer events

    pub fn on_pointer_down(&mut self, pos: Pos2) -> Repaint {
        if !self.state.is_idle() {
            return Repaint::None;
        }

        if let Some(vertex_state) = self.vertex_under(pos) {
            log::debug!("Start vertex edit: {vertex_state:?}");
            self.state = vertex_state;
            return Repaint::None;
        }

        match self.mode {
            ToolMode::Draw => {
                if self.document.current_layer().is_none() {
                    log::warn!("No layer selected, not starting a stroke");
                    return Repaint::None;
                }
                log::debug!("Start freehand stroke at {pos:?}");
                self.state = EditorState::DrawingFreehand {
                    stroke: DrawStrokeHelper::new(pos, self.draw_style),
                };
            }
            ToolMode::Move => {
                if let Some(hit) = hit_testing::hit_test(&self.document, pos) {
                    let Some(item) = self.document.item(hit.item) else {
                        return Repaint::None;
                    };
                    log::debug!("Start dragging {} {:?}", item.kind().label(), hit.item);
                    self.state = EditorState::DraggingItem {
                        item: hit.item,
                        kind: item.kind(),
                        anchor: hit.anchor,
                    };
                }
            }
            ToolMode::PolygonPoints => {}
        }
        Repaint::None
    }

    /// Vertex of the shown vertex-edit target under `pos`.
    fn vertex_under(&self, pos: Pos2) -> Option<EditorState> {
        let item = self.vertex_edit_item()?;
        if !self.document.is_item_shown(item) {
            return None;
        }
        let ring = self.document.item(item)?.ring()?;
        let vertex = hit_testing::hit_vertex(ring, pos, self.config.vertex_hit_radius)?;
        Some(EditorState::EditingVertex { item, vertex })
    }

    pub fn on_pointer_move(&mut self, pos: Pos2) -> Repaint {
        let mut stale = false;
        let repaint = match &mut self.state {
            EditorState::EditingVertex { item, vertex } => {
                let moved = self
                    .document
                    .item_mut(*item)
                    .and_then(Item::ring_mut)
                    .is_some_and(|ring| ring.set_vertex(*vertex, pos));
                if moved {
                    Repaint::Full
                } else {
                    stale = true;
                    Repaint::None
                }
            }
            EditorState::DrawingFreehand { stroke } => match stroke.add_point(pos) {
                Some(from) => Repaint::Segment {
                    from,
                    to: pos,
                    stroke: stroke.style().stroke(),
                },
                None => Repaint::None,
            },
            EditorState::DraggingItem { item, anchor, .. } => match self.document.item_mut(*item) {
                Some(target) => {
                    match anchor {
                        DragAnchor::Offset(offset) => target.move_reference_to(pos - *offset),
                        DragAnchor::Snapshot { points, start } => {
                            target.replay_translated(points, pos - *start)
                        }
                    }
                    Repaint::Full
                }
                None => {
                    stale = true;
                    Repaint::None
                }
            },
            EditorState::Idle | EditorState::DrawingPolygonByClick { .. } => Repaint::None,
        };

        if stale {
            log::warn!("Dropping {} on a missing item", self.state.name());
            self.state = EditorState::Idle;
            self.drain_pending();
        }
        repaint
    }

    pub fn on_pointer_up(&mut self, _pos: Pos2) -> Repaint {
        match std::mem::take(&mut self.state) {
            EditorState::EditingVertex { item, .. } => {
                log::debug!("End vertex edit on {item:?}");
            }
            EditorState::DraggingItem { item, .. } => {
                log::debug!("End drag of {item:?}");
            }
            EditorState::DrawingFreehand { stroke } => match stroke.into_item() {
                Some(item) => {
                    if let Some(item_ref) = self.document.add_item(item) {
                        log::debug!("Committed freehand stroke {item_ref:?}");
                    }
                }
                None => log::debug!("Dropped freehand stroke without a segment"),
            },
            other => {
                self.state = other;
                return Repaint::None;
            }
        }
        self.drain_pending();
        Repaint::Full
    }

    /// Adds a vertex to the click polygon being built.
    pub fn on_click(&mut self, pos: Pos2) -> Repaint {
        let EditorState::DrawingPolygonByClick { points } = &mut self.state else {
            return Repaint::None;
        };
        if points.last() == Some(&pos) {
            return Repaint::None;
        }
        points.push(pos);
        Repaint::Full
    }

    /// Closes the click polygon into an item once it has three distinct
    /// vertices. A last click back on the first point does not count.
    pub fn on_double_click(&mut self, _pos: Pos2) -> Repaint {
        let points = match &mut self.state {
            EditorState::DrawingPolygonByClick { points }
                if geometry::distinct_vertices(points.as_slice()).len() >= 3 =>
            {
                std::mem::take(points)
            }
            _ => return Repaint::None,
        };

        let item = factory::polygon_by_click(points, self.shape_style);
        if let Some(item_ref) = self.document.add_item(item) {
            log::debug!("Committed click polygon {item_ref:?}");
        }
        self.mode = ToolMode::Move;
        self.state = EditorState::Idle;
        self.drain_pending();
        Repaint::Full
    }

    /// Deletes the vertex-edit target's vertex under `pos`.
    pub fn on_context_menu(&mut self, pos: Pos2) -> Repaint {
        if self.state.is_busy() {
            return Repaint::None;
        }
        let Some(item_ref) = self.vertex_edit_item() else {
            return Repaint::None;
        };
        let radius = self.config.vertex_hit_radius;
        let Some(ring) = self.document.item_mut(item_ref).and_then(Item::ring_mut) else {
            log::warn!("Vertex edit target {item_ref:?} no longer exists");
            return Repaint::None;
        };
        let Some(vertex) = hit_testing::hit_vertex(ring, pos, radius) else {
            return Repaint::None;
        };

        ring.remove_vertex(vertex);
        if ring.vertex_count() < 3 {
            log::debug!("Leaving vertex edit on {item_ref:?}, too few vertices");
            self.edit_target = Some(EditTarget::Polygon {
                item: item_ref,
                vertex_edit: false,
            });
        }
        Repaint::Full
    }

    // Document commands

    pub fn add_layer(&mut self, kind: LayerKind) -> usize {
        self.document.add_layer(kind)
    }

    pub fn select_layer(&mut self, index: usize) -> bool {
        self.document.select_layer(index)
    }

    /// Places a template item in the current layer.
    pub fn add_item(&mut self, new_item: NewItem) -> Option<ItemRef> {
        let templates = &self.config.templates;
        let item = match new_item {
            NewItem::Circle => factory::circle(
                templates.circle_center,
                templates.circle_radius,
                self.shape_style,
            ),
            NewItem::Square => factory::square(
                templates.square_center,
                templates.square_half_width,
                self.shape_style,
            ),
            NewItem::Triangle => factory::triangle(templates.triangle.to_vec(), self.shape_style),
            NewItem::Text(text) => {
                let font = self.config.text_font.clone();
                let width = self.measurer.measure_text(&text, &font);
                factory::text(
                    text,
                    templates.text_position,
                    font,
                    self.config.text_color,
                    width,
                )
            }
        };
        let kind = item.kind();
        let item_ref = self.document.add_item(item)?;
        log::info!("Added {} {item_ref:?}", kind.label());
        Some(item_ref)
    }

    pub fn delete_layer(&mut self, index: usize) -> Option<Layer> {
        let removed = self.document.delete_layer(index)?;
        self.remap_refs(|item| match item.layer {
            layer if layer == index => None,
            layer if layer > index => Some(ItemRef::new(layer - 1, item.item)),
            _ => Some(item),
        });
        Some(removed)
    }

    pub fn delete_item(&mut self, item_ref: ItemRef) -> Option<Item> {
        let removed = self.document.delete_item(item_ref)?;
        log::info!("Deleted {} {item_ref:?}", removed.kind().label());
        self.remap_refs(|item| {
            if item.layer != item_ref.layer || item.item < item_ref.item {
                Some(item)
            } else if item.item == item_ref.item {
                None
            } else {
                Some(ItemRef::new(item.layer, item.item - 1))
            }
        });
        Some(removed)
    }

    /// Re-points the edit target and any held item after a removal.
    /// References mapped to `None` pointed at the removed item.
    fn remap_refs(&mut self, remap: impl Fn(ItemRef) -> Option<ItemRef>) {
        self.edit_target = self.edit_target.and_then(|mut target| match remap(target.item()) {
            Some(item) => {
                *target.item_mut() = item;
                Some(target)
            }
            None => {
                log::debug!("Edit target {:?} was deleted", target.item());
                None
            }
        });

        let mut released = false;
        if let EditorState::DraggingItem { item, .. } | EditorState::EditingVertex { item, .. } =
            &mut self.state
        {
            match remap(*item) {
                Some(moved) => *item = moved,
                None => released = true,
            }
        }
        if released {
            self.state = EditorState::Idle;
            self.drain_pending();
        }
    }

    pub fn toggle_layer_visible(&mut self, index: usize) -> bool {
        self.document.toggle_layer_visible(index)
    }

    pub fn toggle_item_visible(&mut self, item_ref: ItemRef) -> bool {
        self.document.toggle_item_visible(item_ref)
    }

    /// Binds an item to the live-options panel and returns its current
    /// options. A freehand target switches the tool back to move mode.
    pub fn set_edit_target(&mut self, item_ref: ItemRef) -> Option<LiveOptions> {
        let Some(item) = self.document.item(item_ref) else {
            log::warn!("Cannot edit missing item {item_ref:?}");
            return None;
        };
        let target = EditTarget::for_item(item_ref, item);
        let options = LiveOptions::for_item(item);
        log::debug!("Edit target {target:?}");

        if matches!(target, EditTarget::Freehand(_)) && self.mode != ToolMode::Move {
            self.set_mode(ToolMode::Move);
        }
        self.edit_target = Some(target);
        Some(options)
    }

    /// Ends the live edit, including vertex-edit mode.
    pub fn clear_edit_target(&mut self) {
        if let Some(target) = self.edit_target.take() {
            log::debug!("Cleared edit target {target:?}");
        }
        if matches!(self.state, EditorState::EditingVertex { .. }) {
            self.state = EditorState::Idle;
            self.drain_pending();
        }
    }

    /// Current options of the edit target, if any.
    pub fn live_options(&self) -> Option<LiveOptions> {
        let target = self.edit_target?;
        self.document.item(target.item()).map(LiveOptions::for_item)
    }

    /// Writes panel options into the edit target.
    pub fn apply_live_options(&mut self, options: &LiveOptions) -> bool {
        let Some(target) = self.edit_target else {
            return false;
        };
        let Some(item) = self.document.item_mut(target.item()) else {
            log::warn!("Edit target {:?} no longer exists", target.item());
            return false;
        };
        let applied = options.apply(item, self.measurer.as_ref());
        if !applied {
            log::warn!("Options {options:?} do not fit {}", item.kind().label());
        }
        applied
    }

    /// Removes every layer and ends any edit.
    pub fn clear_canvas(&mut self) {
        self.document.clear();
        self.edit_target = None;
        self.state = self.resting_state();
        log::info!("Cleared canvas");
        self.drain_pending();
    }

    // Persistence

    /// The whole layer list as JSON.
    pub fn serialize(&self) -> EditorResult<String> {
        persistence::serialize_layers(self.document.layers())
    }

    /// One layer as a JSON object.
    pub fn serialize_layer(&self, index: usize) -> EditorResult<String> {
        persistence::serialize_layer(&self.document, index)
    }

    /// Loads annotation text: an array replaces every layer, an object is
    /// appended as one layer. The document is untouched on error.
    pub fn deserialize(&mut self, text: &str) -> EditorResult<usize> {
        let loaded = persistence::parse_layers(text).inspect_err(|err| self.report(err))?;

        if matches!(loaded, persistence::LoadedLayers::Replace(_)) {
            self.edit_target = None;
            if self.state.is_busy() {
                self.state = EditorState::Idle;
            }
        }
        Ok(loaded.apply_to(&mut self.document))
    }

    /// Writes `annotations.json` into `dir`.
    pub fn save_to_file(&mut self, dir: &Path) -> EditorResult<PathBuf> {
        persistence::save_to_dir(&self.document, dir).inspect_err(|err| self.report(err))
    }

    pub fn set_background_image(&mut self, image: BackgroundImage) {
        log::info!("Background image set to {}", image.name());
        self.document.set_background(Some(image));
    }

    pub fn clear_background_image(&mut self) {
        self.document.set_background(None);
    }

    // Completions

    /// Applies a finished file read, or queues it while a drag or vertex
    /// edit holds the document.
    pub fn deliver(&mut self, completion: Completion) -> Repaint {
        if self.state.is_busy() {
            log::debug!("Queueing completion during {}", self.state.name());
            self.pending.push_back(completion);
            return Repaint::None;
        }
        self.apply_completion(completion);
        Repaint::Full
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            // Errors are already logged and turned into notices
            Completion::Annotations(text) => {
                let _ = self.deserialize(&text);
            }
            Completion::Background(image) => self.set_background_image(image),
        }
    }

    fn drain_pending(&mut self) {
        while !self.state.is_busy() {
            let Some(completion) = self.pending.pop_front() else {
                break;
            };
            self.apply_completion(completion);
        }
    }
}
