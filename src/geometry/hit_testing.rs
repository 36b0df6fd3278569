use egui::{Pos2, Vec2};

use crate::document::{Document, ItemRef};
use crate::element::{Item, PolygonData, Shape};
use crate::geometry::{point_in_polygon, point_to_segment_distance};

/// Freehand strokes are grabbable within this multiple of their thickness.
pub const FREEHAND_HIT_FACTOR: f32 = 2.0;

/// What a drag needs to remember from the moment the item was grabbed.
#[derive(Debug, Clone, PartialEq)]
pub enum DragAnchor {
    /// Pointer minus the item's reference point (text position or center)
    Offset(Vec2),
    /// Freehand strokes are re-derived from the grabbed points on every move
    Snapshot { points: Vec<Pos2>, start: Pos2 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub item: ItemRef,
    pub anchor: DragAnchor,
}

/// Resolves a pointer position to the topmost visible item under it.
pub fn hit_test(document: &Document, pos: Pos2) -> Option<Hit> {
    document
        .topmost_first()
        .filter(|(_, layer, item)| layer.visible && item.visible)
        .find(|(_, _, item)| item_contains(item, pos))
        .map(|(item_ref, _, item)| Hit {
            item: item_ref,
            anchor: anchor_for(item, pos),
        })
}

/// Whether `pos` lies on the item, by the item kind's own rule.
pub fn item_contains(item: &Item, pos: Pos2) -> bool {
    match &item.shape {
        Shape::Text(text) => {
            pos.x >= text.position.x
                && pos.x <= text.position.x + text.width
                && pos.y >= text.position.y - text.height
                && pos.y <= text.position.y
        }
        Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
            point_in_polygon(pos, &poly.points)
        }
        Shape::Circle(circle) => pos.distance(circle.center) <= circle.radius,
        Shape::Freehand(stroke) => {
            let threshold = stroke.style.thickness * FREEHAND_HIT_FACTOR;
            stroke
                .points
                .windows(2)
                .any(|segment| point_to_segment_distance(pos, segment[0], segment[1]) <= threshold)
        }
    }
}

fn anchor_for(item: &Item, pos: Pos2) -> DragAnchor {
    match (&item.shape, item.reference_point()) {
        (Shape::Freehand(stroke), _) => DragAnchor::Snapshot {
            points: stroke.points.clone(),
            start: pos,
        },
        (_, Some(reference)) => DragAnchor::Offset(pos - reference),
        (_, None) => DragAnchor::Offset(Vec2::ZERO),
    }
}

/// Index of the first distinct vertex within `radius` of `pos`.
pub fn hit_vertex(polygon: &PolygonData, pos: Pos2, radius: f32) -> Option<usize> {
    polygon
        .vertices()
        .iter()
        .position(|vertex| pos.distance(*vertex) <= radius)
}
