use serde::{Deserialize, Serialize};
use std::fmt;

use crate::element::Item;

/// Advisory layer category. Any item kind may live in any layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    #[default]
    Polygon,
    Text,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polygon => write!(f, "polygon"),
            Self::Text => write!(f, "text"),
        }
    }
}

fn visible_by_default() -> bool {
    true
}

/// An ordered, independently visibility-toggleable group of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(rename = "type", default)]
    pub kind: LayerKind,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            visible: true,
            items: Vec::new(),
        }
    }

    /// Appends an item and returns its index.
    pub fn add_item(&mut self, item: Item) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}
