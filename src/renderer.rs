use egui::{Color32, Pos2, Rect, Stroke};

use crate::config::EditorConfig;
use crate::element::{Item, Shape};
use crate::state::{EditorContext, EditorState};
use crate::surface::Surface;

/// What an entry point needs redrawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repaint {
    None,
    /// Re-derive the whole frame from the document
    Full,
    /// Only the newest segment of a freehand stroke in progress. Retained
    /// surfaces draw it on top of the last frame; the egui host repaints in
    /// full every frame and never needs it.
    Segment { from: Pos2, to: Pos2, stroke: Stroke },
}

/// Reproduces the document and the live interaction previews onto a surface.
#[derive(Debug, Clone)]
pub struct Renderer {
    handle_radius: f32,
    handle_fill: Color32,
    handle_stroke: Stroke,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Renderer {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            handle_radius: config.vertex_handle_radius,
            handle_fill: config.handle_fill,
            handle_stroke: Stroke::new(1.0, config.handle_stroke),
        }
    }

    /// Executes a repaint request returned by an entry point.
    pub fn apply(&self, repaint: Repaint, surface: &mut dyn Surface, editor: &EditorContext) {
        match repaint {
            Repaint::None => {}
            Repaint::Full => self.repaint(surface, editor),
            Repaint::Segment { from, to, stroke } => surface.draw_polyline(&[from, to], stroke),
        }
    }

    /// Full redraw: background, visible layers and items in order, vertex
    /// handles, then the previews of captures in progress.
    pub fn repaint(&self, surface: &mut dyn Surface, editor: &EditorContext) {
        let document = editor.document();
        surface.clear();

        if let Some(image) = document.background() {
            let bounds = Rect::from_min_size(Pos2::ZERO, surface.size());
            surface.draw_image(image, bounds);
        }

        for layer in document.layers().iter().filter(|layer| layer.visible) {
            for item in layer.items.iter().filter(|item| item.visible) {
                draw_item(surface, item);
            }
        }

        if let Some(item_ref) = editor.vertex_edit_item() {
            let ring = document.item(item_ref).and_then(Item::ring);
            if let (true, Some(ring)) = (document.is_item_shown(item_ref), ring) {
                for vertex in ring.vertices() {
                    surface.draw_circle(
                        *vertex,
                        self.handle_radius,
                        Some(self.handle_fill),
                        self.handle_stroke,
                    );
                }
            }
        }

        match editor.state() {
            EditorState::DrawingFreehand { stroke } if stroke.points().len() >= 2 => {
                surface.draw_polyline(stroke.points(), stroke.style().stroke());
            }
            EditorState::DrawingPolygonByClick { points } if points.len() >= 2 => {
                surface.draw_polyline(points, editor.shape_style().stroke());
            }
            _ => {}
        }
    }
}

fn draw_item(surface: &mut dyn Surface, item: &Item) {
    match &item.shape {
        Shape::Circle(circle) => surface.draw_circle(
            circle.center,
            circle.radius,
            circle.style.fill(),
            circle.style.stroke(),
        ),
        Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
            surface.draw_polygon(poly.vertices(), poly.style.fill(), poly.style.stroke())
        }
        Shape::Freehand(stroke) => {
            if stroke.points.len() >= 2 {
                surface.draw_polyline(&stroke.points, stroke.style.stroke());
            }
        }
        Shape::Text(text) => surface.draw_text(text.position, &text.text, &text.font, text.color),
    }
}
