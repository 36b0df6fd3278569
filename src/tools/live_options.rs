use egui::Color32;

use crate::element::{FontSpec, Item, Shape};
use crate::geometry;
use crate::surface::TextMeasurer;

/// Property-panel values bound to the current edit target.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveOptions {
    Text {
        text: String,
        bold: bool,
        font_size: f32,
        color: Color32,
    },
    Shape {
        /// Regenerates squares and triangles around their center and sets a
        /// circle's radius. `None` leaves the geometry alone.
        size: Option<f32>,
        color: Color32,
        fill_color: Color32,
        thickness: f32,
    },
    Freehand {
        color: Color32,
        thickness: f32,
    },
}

impl LiveOptions {
    /// Snapshot of an item's current editable properties.
    pub fn for_item(item: &Item) -> Self {
        match &item.shape {
            Shape::Text(text) => Self::Text {
                text: text.text.clone(),
                bold: text.font.bold,
                font_size: text.font.size,
                color: text.color,
            },
            Shape::Circle(circle) => Self::Shape {
                size: None,
                color: circle.style.color,
                fill_color: circle.style.fill_color,
                thickness: circle.style.thickness,
            },
            Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
                Self::Shape {
                    size: None,
                    color: poly.style.color,
                    fill_color: poly.style.fill_color,
                    thickness: poly.style.thickness,
                }
            }
            Shape::Freehand(stroke) => Self::Freehand {
                color: stroke.style.color,
                thickness: stroke.style.thickness,
            },
        }
    }

    /// Writes the options into `item`. Returns `false` when the options do
    /// not belong to the item's kind.
    pub fn apply(&self, item: &mut Item, measurer: &dyn TextMeasurer) -> bool {
        match (self, &mut item.shape) {
            (
                Self::Text {
                    text,
                    bold,
                    font_size,
                    color,
                },
                Shape::Text(data),
            ) => {
                let font = FontSpec::new(*bold, *font_size, data.font.family.clone());
                data.width = measurer.measure_text(text, &font);
                data.height = font.size;
                data.text = text.clone();
                data.font = font;
                data.color = *color;
                true
            }
            (
                Self::Shape {
                    size,
                    color,
                    fill_color,
                    thickness,
                },
                shape,
            ) => {
                let style = match shape {
                    Shape::Circle(circle) => {
                        if let Some(size) = size {
                            circle.radius = size.max(0.0);
                        }
                        &mut circle.style
                    }
                    Shape::Square(poly) => {
                        if let Some(size) = size {
                            poly.set_points(geometry::square_ring(poly.center, *size));
                        }
                        &mut poly.style
                    }
                    Shape::Triangle(poly) => {
                        if let Some(size) = size {
                            poly.set_points(geometry::triangle_ring(poly.center, *size));
                        }
                        &mut poly.style
                    }
                    Shape::PolygonByClick(poly) => &mut poly.style,
                    Shape::Text(_) | Shape::Freehand(_) => return false,
                };
                style.color = *color;
                style.fill_color = *fill_color;
                style.thickness = *thickness;
                true
            }
            (Self::Freehand { color, thickness }, Shape::Freehand(stroke)) => {
                stroke.style.color = *color;
                stroke.style.thickness = *thickness;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ShapeStyle, StrokeStyle, factory};
    use crate::surface::ApproxTextMeasurer;
    use egui::pos2;

    #[test]
    fn test_size_regenerates_square_around_center() {
        let mut square = factory::square(pos2(100.0, 100.0), 50.0, ShapeStyle::default());
        square.ring_mut().unwrap().set_vertex(2, pos2(400.0, 400.0));
        let center = square.ring().unwrap().center;

        let options = LiveOptions::Shape {
            size: Some(10.0),
            color: Color32::RED,
            fill_color: Color32::TRANSPARENT,
            thickness: 3.0,
        };
        assert!(options.apply(&mut square, &ApproxTextMeasurer));

        let ring = square.ring().unwrap();
        assert_eq!(ring.points, geometry::square_ring(center, 10.0));
        assert_eq!(ring.style.color, Color32::RED);
        assert_eq!(ring.style.thickness, 3.0);
    }

    #[test]
    fn test_size_leaves_click_polygon_geometry() {
        let vertices = vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(0.0, 10.0)];
        let mut polygon = factory::polygon_by_click(vertices, ShapeStyle::default());
        let before = polygon.ring().unwrap().points.clone();

        let options = LiveOptions::Shape {
            size: Some(80.0),
            color: Color32::BLUE,
            fill_color: Color32::YELLOW,
            thickness: 2.0,
        };
        assert!(options.apply(&mut polygon, &ApproxTextMeasurer));
        let ring = polygon.ring().unwrap();
        assert_eq!(ring.points, before);
        assert_eq!(ring.style.fill(), Some(Color32::YELLOW));
    }

    #[test]
    fn test_size_sets_circle_radius() {
        let mut circle = factory::circle(pos2(0.0, 0.0), 5.0, ShapeStyle::default());
        let mut options = LiveOptions::for_item(&circle);
        if let LiveOptions::Shape { size, .. } = &mut options {
            *size = Some(25.0);
        }
        assert!(options.apply(&mut circle, &ApproxTextMeasurer));
        match &circle.shape {
            Shape::Circle(data) => assert_eq!(data.radius, 25.0),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_text_options_remeasure() {
        let mut text = factory::text(
            "a".to_owned(),
            pos2(0.0, 0.0),
            FontSpec::default(),
            Color32::BLACK,
            1.0,
        );
        let options = LiveOptions::Text {
            text: "wider text".to_owned(),
            bold: true,
            font_size: 20.0,
            color: Color32::RED,
        };
        assert!(options.apply(&mut text, &ApproxTextMeasurer));
        match &text.shape {
            Shape::Text(data) => {
                assert_eq!(data.font.to_string(), "bold 20px Arial");
                assert_eq!(data.height, 20.0);
                let font = FontSpec::new(true, 20.0, "Arial");
                assert_eq!(data.width, ApproxTextMeasurer.measure_text("wider text", &font));
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_options_are_rejected() {
        let mut stroke = factory::freehand(vec![pos2(0.0, 0.0)], StrokeStyle::default());
        let options = LiveOptions::Shape {
            size: None,
            color: Color32::RED,
            fill_color: Color32::RED,
            thickness: 1.0,
        };
        assert!(!options.apply(&mut stroke, &ApproxTextMeasurer));
    }
}
