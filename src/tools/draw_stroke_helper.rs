use egui::Pos2;

use crate::element::{Item, StrokeStyle, factory};

/// Helper struct for gathering a freehand stroke while the pointer is down
///
/// The style is fixed when the stroke starts so the live preview and the
/// committed item always match.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStrokeHelper {
    points: Vec<Pos2>,
    style: StrokeStyle,
}

impl DrawStrokeHelper {
    /// Start a stroke seeded with the pointer-down position
    pub fn new(start: Pos2, style: StrokeStyle) -> Self {
        Self {
            points: vec![start],
            style,
        }
    }

    /// Add a point, returning the previous end of the stroke
    pub fn add_point(&mut self, point: Pos2) -> Option<Pos2> {
        let previous = self.points.last().copied();
        self.points.push(point);
        previous
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Convert into a freehand item. Strokes that never left their first
    /// point have no segment to draw or hit and are dropped.
    pub fn into_item(self) -> Option<Item> {
        if self.points.len() < 2 {
            return None;
        }
        Some(factory::freehand(self.points, self.style))
    }
}
