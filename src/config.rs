use egui::{Color32, Pos2, pos2};
use serde::{Deserialize, Serialize};

use crate::element::style::css_color;
use crate::element::{FontSpec, ShapeStyle, StrokeStyle};

/// Tunables of the editor. Persisted by the host next to the app state, so
/// every field falls back to its default when missing from old storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pointer distance within which a vertex handle is grabbed or deleted
    pub vertex_hit_radius: f32,
    pub vertex_handle_radius: f32,
    #[serde(with = "css_color")]
    pub handle_fill: Color32,
    #[serde(with = "css_color")]
    pub handle_stroke: Color32,
    #[serde(with = "css_color")]
    pub canvas_color: Color32,

    /// Style given to new closed shapes
    pub shape_style: ShapeStyle,
    /// Style given to new freehand strokes
    pub draw_style: StrokeStyle,
    pub text_font: FontSpec,
    #[serde(with = "css_color")]
    pub text_color: Color32,
    /// Initial value of the live-options `size` field
    pub live_size: f32,

    pub templates: ItemTemplates,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            vertex_hit_radius: 5.0,
            vertex_handle_radius: 5.0,
            handle_fill: Color32::WHITE,
            handle_stroke: Color32::BLACK,
            canvas_color: Color32::from_gray(240),
            shape_style: ShapeStyle::default(),
            draw_style: StrokeStyle::default(),
            text_font: FontSpec::default(),
            text_color: Color32::BLACK,
            live_size: 50.0,
            templates: ItemTemplates::default(),
        }
    }
}

/// Geometry of the items created by the "add" buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTemplates {
    pub square_center: Pos2,
    pub square_half_width: f32,
    pub triangle: [Pos2; 3],
    pub circle_center: Pos2,
    pub circle_radius: f32,
    pub text_position: Pos2,
}

impl Default for ItemTemplates {
    fn default() -> Self {
        // Square of side 100 whose top-left corner sits at (200, 200)
        Self {
            square_center: pos2(250.0, 250.0),
            square_half_width: 50.0,
            triangle: [pos2(200.0, 200.0), pos2(300.0, 200.0), pos2(250.0, 100.0)],
            circle_center: pos2(300.0, 300.0),
            circle_radius: 50.0,
            text_position: pos2(200.0, 200.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"vertex_hit_radius": 8.0}"#).unwrap();
        assert_eq!(config.vertex_hit_radius, 8.0);
        assert_eq!(config.vertex_handle_radius, 5.0);
        assert_eq!(config.templates, ItemTemplates::default());
        assert_eq!(config.draw_style.thickness, 2.0);
    }
}
