//! Transient interaction state.
//!
//! ```text
//!            pointer down (draw mode)         pointer up
//!   Idle ───────────────────────────► DrawingFreehand ────► Idle
//!     │     set_mode(polygonPoints)                 double-click
//!     ├───────────────────────────► DrawingPolygonByClick ──► Idle
//!     │     pointer down on item                  pointer up
//!     ├───────────────────────────► DraggingItem ──────────► Idle
//!     │     pointer down on vertex handle         pointer up
//!     └───────────────────────────► EditingVertex ─────────► Idle
//! ```
//!
//! Each variant carries only the data of its own interaction, so states such
//! as "dragging text while editing a vertex" cannot be represented.
use egui::Pos2;

use crate::document::ItemRef;
use crate::element::{Item, ItemKind, Shape};
use crate::geometry::hit_testing::DragAnchor;
use crate::tools::DrawStrokeHelper;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    /// No active operation
    #[default]
    Idle,
    /// Capturing a freehand stroke while the pointer is held
    DrawingFreehand { stroke: DrawStrokeHelper },
    /// Accumulating click-polygon vertices
    DrawingPolygonByClick { points: Vec<Pos2> },
    /// Dragging an item picked up by the hit-tester
    DraggingItem {
        item: ItemRef,
        kind: ItemKind,
        anchor: DragAnchor,
    },
    /// Dragging one vertex of the vertex-edit target
    EditingVertex { item: ItemRef, vertex: usize },
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::DrawingFreehand { .. } => "DrawingFreehand",
            Self::DrawingPolygonByClick { .. } => "DrawingPolygonByClick",
            Self::DraggingItem { .. } => "DraggingItem",
            Self::EditingVertex { .. } => "EditingVertex",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether an operation that mutates the document is in flight, during
    /// which file completions must wait.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::DraggingItem { .. } | Self::EditingVertex { .. })
    }

    /// The item an in-flight operation holds on to, if any.
    pub fn held_item(&self) -> Option<ItemRef> {
        match self {
            Self::DraggingItem { item, .. } | Self::EditingVertex { item, .. } => Some(*item),
            _ => None,
        }
    }
}

/// The single item bound to the live-options panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Text(ItemRef),
    /// Any closed shape. `vertex_edit` enables vertex drag and delete; it is
    /// dropped once the ring falls below three vertices.
    Polygon { item: ItemRef, vertex_edit: bool },
    Freehand(ItemRef),
}

impl EditTarget {
    /// Target matching the item's kind. Ring shapes start in vertex-edit mode.
    pub fn for_item(item_ref: ItemRef, item: &Item) -> Self {
        match &item.shape {
            Shape::Text(_) => Self::Text(item_ref),
            Shape::Freehand(_) => Self::Freehand(item_ref),
            Shape::Circle(_) => Self::Polygon {
                item: item_ref,
                vertex_edit: false,
            },
            Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
                Self::Polygon {
                    item: item_ref,
                    vertex_edit: poly.vertex_count() >= 3,
                }
            }
        }
    }

    pub fn item(&self) -> ItemRef {
        match self {
            Self::Text(item) | Self::Freehand(item) | Self::Polygon { item, .. } => *item,
        }
    }

    pub fn item_mut(&mut self) -> &mut ItemRef {
        match self {
            Self::Text(item) | Self::Freehand(item) | Self::Polygon { item, .. } => item,
        }
    }

    /// The item in vertex-edit mode, if this target is one.
    pub fn vertex_edit_item(&self) -> Option<ItemRef> {
        match self {
            Self::Polygon {
                item,
                vertex_edit: true,
            } => Some(*item),
            _ => None,
        }
    }
}
