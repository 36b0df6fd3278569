use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use uuid::Uuid;

use crate::background::BackgroundImage;
use crate::element::FontSpec;

/// Measures the advance width of a run of text in a given font.
pub trait TextMeasurer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32;
}

/// The drawing operations the renderer needs from a 2D surface.
///
/// Coordinates are surface-local: `(0, 0)` is the top-left corner and
/// `size()` the bottom-right.
pub trait Surface: TextMeasurer {
    fn size(&self) -> Vec2;

    fn clear(&mut self);

    /// Draws `image` stretched over `rect`.
    fn draw_image(&mut self, image: &BackgroundImage, rect: Rect);

    /// Closed polygon. `fill` of `None` strokes the outline only.
    fn draw_polygon(&mut self, points: &[Pos2], fill: Option<Color32>, stroke: Stroke);

    fn draw_circle(&mut self, center: Pos2, radius: f32, fill: Option<Color32>, stroke: Stroke);

    /// Open polyline.
    fn draw_polyline(&mut self, points: &[Pos2], stroke: Stroke);

    /// Draws `text` with its baseline starting at `pos`.
    fn draw_text(&mut self, pos: Pos2, text: &str, font: &FontSpec, color: Color32);
}

/// Width estimate that needs no font tables: a fixed fraction of the font
/// size per character, a little wider when bold.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproxTextMeasurer;

impl TextMeasurer for ApproxTextMeasurer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        let advance = if font.bold { 0.6 } else { 0.55 };
        text.chars().count() as f32 * font.size * advance
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Image {
        id: Uuid,
        rect: Rect,
    },
    Polygon {
        points: Vec<Pos2>,
        fill: Option<Color32>,
        stroke: Stroke,
    },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Option<Color32>,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Pos2>,
        stroke: Stroke,
    },
    Text {
        pos: Pos2,
        text: String,
        font: String,
        color: Color32,
    },
}

/// Surface that records operations instead of drawing them.
///
/// `clear` forgets everything recorded so far, so after a full repaint
/// `ops()` is exactly the current frame.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl TextMeasurer for RecordingSurface {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        ApproxTextMeasurer.measure_text(text, font)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
    }

    fn draw_image(&mut self, image: &BackgroundImage, rect: Rect) {
        self.ops.push(DrawOp::Image {
            id: image.id(),
            rect,
        });
    }

    fn draw_polygon(&mut self, points: &[Pos2], fill: Option<Color32>, stroke: Stroke) {
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            fill,
            stroke,
        });
    }

    fn draw_circle(&mut self, center: Pos2, radius: f32, fill: Option<Color32>, stroke: Stroke) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    fn draw_polyline(&mut self, points: &[Pos2], stroke: Stroke) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn draw_text(&mut self, pos: Pos2, text: &str, font: &FontSpec, color: Color32) {
        self.ops.push(DrawOp::Text {
            pos,
            text: text.to_owned(),
            font: font.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut surface = RecordingSurface::new(vec2(100.0, 100.0));
        surface.draw_polyline(&[pos2(0.0, 0.0), pos2(1.0, 1.0)], Stroke::NONE);
        surface.clear();
        assert_eq!(surface.ops(), &[DrawOp::Clear]);
    }

    #[test]
    fn test_approx_measure_grows_with_text_and_weight() {
        let regular = FontSpec::default();
        let bold = FontSpec::new(true, regular.size, regular.family.clone());
        let short = ApproxTextMeasurer.measure_text("ab", &regular);
        let long = ApproxTextMeasurer.measure_text("abcd", &regular);
        assert_eq!(long, short * 2.0);
        assert!(ApproxTextMeasurer.measure_text("ab", &bold) > short);
        assert_eq!(ApproxTextMeasurer.measure_text("", &regular), 0.0);
    }
}
