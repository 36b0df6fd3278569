use egui::{Color32, Pos2, Vec2};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

pub mod style;

pub use style::{FontSpec, ShapeStyle, StrokeStyle};

use crate::geometry;

/// Discriminant of an item, persisted as `subType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Circle,
    Square,
    Triangle,
    Freehand,
    #[serde(rename = "polygonPoints")]
    PolygonByClick,
    Text,
}

impl ItemKind {
    /// Closed shapes that are dragged by their center.
    pub fn is_polygon_family(self) -> bool {
        matches!(
            self,
            Self::Circle | Self::Square | Self::Triangle | Self::PolygonByClick
        )
    }

    /// Shapes stored as an explicit closed vertex ring.
    pub fn has_ring(self) -> bool {
        matches!(self, Self::Square | Self::Triangle | Self::PolygonByClick)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Freehand => "freehand",
            Self::PolygonByClick => "polygon",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleData {
    pub center: Pos2,
    pub radius: f32,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

/// Closed vertex ring (`points[0] == points[last]`) plus its cached center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonData {
    pub points: Vec<Pos2>,
    pub center: Pos2,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl PolygonData {
    /// Builds a ring from open or closed vertices and computes its center.
    pub fn new(vertices: Vec<Pos2>, style: ShapeStyle) -> Self {
        let points = geometry::close_ring(vertices);
        let center = geometry::centroid(&points);
        Self {
            points,
            center,
            style,
        }
    }

    /// The ring's vertices without the closing repeat.
    pub fn vertices(&self) -> &[Pos2] {
        geometry::distinct_vertices(&self.points)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn recompute_center(&mut self) {
        self.center = geometry::centroid(&self.points);
    }

    pub fn set_points(&mut self, vertices: Vec<Pos2>) {
        self.points = geometry::close_ring(vertices);
        self.recompute_center();
    }

    /// Moves one distinct vertex, keeping the ring closed.
    pub fn set_vertex(&mut self, index: usize, position: Pos2) -> bool {
        let count = self.vertex_count();
        if index >= count {
            return false;
        }
        let closed = self.points.len() > count;
        self.points[index] = position;
        if index == 0 && closed {
            let last = self.points.len() - 1;
            self.points[last] = position;
        }
        self.recompute_center();
        true
    }

    /// Removes one distinct vertex and re-closes the ring.
    pub fn remove_vertex(&mut self, index: usize) -> bool {
        let mut vertices = self.vertices().to_vec();
        if index >= vertices.len() {
            return false;
        }
        vertices.remove(index);
        self.set_points(vertices);
        true
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
        self.center += delta;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreehandData {
    pub points: Vec<Pos2>,
    #[serde(flatten)]
    pub style: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub text: String,
    /// Baseline origin; the text box extends upwards from here.
    pub position: Pos2,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(with = "style::css_color", default = "black")]
    pub color: Color32,
    /// Measured advance width
    pub width: f32,
    pub height: f32,
}

fn black() -> Color32 {
    Color32::BLACK
}

/// Kind-specific geometry and style of an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(CircleData),
    Square(PolygonData),
    Triangle(PolygonData),
    Freehand(FreehandData),
    PolygonByClick(PolygonData),
    Text(TextData),
}

/// One drawable unit owned by a layer. Its identity is its index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    pub shape: Shape,
    pub visible: bool,
}

impl Item {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            visible: true,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match &self.shape {
            Shape::Circle(_) => ItemKind::Circle,
            Shape::Square(_) => ItemKind::Square,
            Shape::Triangle(_) => ItemKind::Triangle,
            Shape::Freehand(_) => ItemKind::Freehand,
            Shape::PolygonByClick(_) => ItemKind::PolygonByClick,
            Shape::Text(_) => ItemKind::Text,
        }
    }

    /// Point a drag offset is measured against: `position` for text,
    /// `center` for closed shapes. Freehand strokes have none.
    pub fn reference_point(&self) -> Option<Pos2> {
        match &self.shape {
            Shape::Circle(circle) => Some(circle.center),
            Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
                Some(poly.center)
            }
            Shape::Text(text) => Some(text.position),
            Shape::Freehand(_) => None,
        }
    }

    pub fn ring(&self) -> Option<&PolygonData> {
        match &self.shape {
            Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
                Some(poly)
            }
            _ => None,
        }
    }

    pub fn ring_mut(&mut self) -> Option<&mut PolygonData> {
        match &mut self.shape {
            Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
                Some(poly)
            }
            _ => None,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.shape {
            Shape::Circle(circle) => circle.center += delta,
            Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
                poly.translate(delta)
            }
            Shape::Freehand(stroke) => {
                for point in &mut stroke.points {
                    *point += delta;
                }
            }
            Shape::Text(text) => text.position += delta,
        }
    }

    /// Moves the item so its reference point lands on `target`.
    pub fn move_reference_to(&mut self, target: Pos2) {
        if let Some(reference) = self.reference_point() {
            self.translate(target - reference);
        }
    }

    /// Rebuilds a freehand stroke as `snapshot` shifted by `delta`.
    pub fn replay_translated(&mut self, snapshot: &[Pos2], delta: Vec2) {
        if let Shape::Freehand(stroke) = &mut self.shape {
            stroke.points = snapshot.iter().map(|p| *p + delta).collect();
        }
    }

    /// Restores geometric invariants on data that came from outside.
    fn sanitize(&mut self) {
        match &mut self.shape {
            Shape::Circle(circle) => circle.radius = circle.radius.max(0.0),
            Shape::Square(poly) | Shape::Triangle(poly) | Shape::PolygonByClick(poly) => {
                let vertices = std::mem::take(&mut poly.points);
                poly.set_points(vertices);
            }
            Shape::Freehand(_) | Shape::Text(_) => {}
        }
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut item = serializer.serialize_struct("Item", 3)?;
        item.serialize_field("subType", &self.kind())?;
        match &self.shape {
            Shape::Circle(data) => item.serialize_field("data", data)?,
            Shape::Square(data) | Shape::Triangle(data) | Shape::PolygonByClick(data) => {
                item.serialize_field("data", data)?
            }
            Shape::Freehand(data) => item.serialize_field("data", data)?,
            Shape::Text(data) => item.serialize_field("data", data)?,
        }
        item.serialize_field("visible", &self.visible)?;
        item.end()
    }
}

fn visible_by_default() -> bool {
    true
}

/// Wire form of an item: the payload is decoded once the kind is known.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    sub_type: ItemKind,
    data: serde_json::Value,
    #[serde(default = "visible_by_default")]
    visible: bool,
}

impl TryFrom<RawItem> for Item {
    type Error = serde_json::Error;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        let data = raw.data;
        let shape = match raw.sub_type {
            ItemKind::Circle => Shape::Circle(serde_json::from_value(data)?),
            ItemKind::Square => Shape::Square(serde_json::from_value(data)?),
            ItemKind::Triangle => Shape::Triangle(serde_json::from_value(data)?),
            ItemKind::Freehand => Shape::Freehand(serde_json::from_value(data)?),
            ItemKind::PolygonByClick => Shape::PolygonByClick(serde_json::from_value(data)?),
            ItemKind::Text => Shape::Text(serde_json::from_value(data)?),
        };
        let mut item = Item {
            shape,
            visible: raw.visible,
        };
        item.sanitize();
        Ok(item)
    }
}

/// Factory functions for creating items
pub mod factory {
    use super::*;

    pub fn circle(center: Pos2, radius: f32, style: ShapeStyle) -> Item {
        Item::new(Shape::Circle(CircleData {
            center,
            radius: radius.max(0.0),
            style,
        }))
    }

    pub fn square(center: Pos2, half_width: f32, style: ShapeStyle) -> Item {
        let points = geometry::square_ring(center, half_width);
        Item::new(Shape::Square(PolygonData::new(points, style)))
    }

    /// Triangle from explicit vertices (the `addItem` template is not centered).
    pub fn triangle(vertices: Vec<Pos2>, style: ShapeStyle) -> Item {
        Item::new(Shape::Triangle(PolygonData::new(vertices, style)))
    }

    pub fn polygon_by_click(vertices: Vec<Pos2>, style: ShapeStyle) -> Item {
        Item::new(Shape::PolygonByClick(PolygonData::new(vertices, style)))
    }

    pub fn freehand(points: Vec<Pos2>, style: StrokeStyle) -> Item {
        Item::new(Shape::Freehand(FreehandData { points, style }))
    }

    pub fn text(text: String, position: Pos2, font: FontSpec, color: Color32, width: f32) -> Item {
        let height = font.size;
        Item::new(Shape::Text(TextData {
            text,
            position,
            font,
            color,
            width,
            height,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn triangle() -> PolygonData {
        PolygonData::new(
            vec![pos2(0.0, 0.0), pos2(30.0, 0.0), pos2(0.0, 30.0)],
            ShapeStyle::default(),
        )
    }

    #[test]
    fn test_polygon_is_closed_with_center() {
        let poly = triangle();
        assert_eq!(poly.points.len(), 4);
        assert_eq!(poly.points[0], poly.points[3]);
        assert_eq!(poly.center, pos2(10.0, 10.0));
    }

    #[test]
    fn test_moving_first_vertex_keeps_ring_closed() {
        let mut poly = triangle();
        assert!(poly.set_vertex(0, pos2(-3.0, -3.0)));
        assert_eq!(poly.points[0], pos2(-3.0, -3.0));
        assert_eq!(poly.points[3], pos2(-3.0, -3.0));
        assert_eq!(poly.center, pos2(9.0, 9.0));
        assert!(!poly.set_vertex(3, pos2(0.0, 0.0)));
    }

    #[test]
    fn test_remove_vertex() {
        let mut poly = triangle();
        assert!(poly.remove_vertex(0));
        assert_eq!(poly.vertex_count(), 2);
        assert_eq!(poly.points, vec![pos2(30.0, 0.0), pos2(0.0, 30.0), pos2(30.0, 0.0)]);
        assert_eq!(poly.center, pos2(15.0, 15.0));
        assert!(!poly.remove_vertex(5));
    }

    #[test]
    fn test_move_reference_point() {
        let mut item = factory::square(pos2(50.0, 50.0), 10.0, ShapeStyle::default());
        item.move_reference_to(pos2(60.0, 45.0));
        let ring = item.ring().unwrap();
        assert_eq!(ring.center, pos2(60.0, 45.0));
        assert_eq!(ring.points[0], pos2(50.0, 35.0));

        let mut text = factory::text(
            "hi".to_owned(),
            pos2(1.0, 2.0),
            FontSpec::default(),
            Color32::BLACK,
            12.0,
        );
        text.translate(vec2(1.0, 1.0));
        assert_eq!(text.reference_point(), Some(pos2(2.0, 3.0)));
    }

    #[test]
    fn test_item_wire_format() {
        let item = factory::circle(pos2(300.0, 300.0), 50.0, ShapeStyle::default());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["subType"], "circle");
        assert_eq!(json["visible"], true);
        assert_eq!(json["data"]["radius"], 50.0);
        assert_eq!(json["data"]["fillColor"], "transparent");
        assert_eq!(json["data"]["center"]["x"], 300.0);

        let polygon = factory::polygon_by_click(
            vec![pos2(0.0, 0.0), pos2(1.0, 0.0), pos2(0.0, 1.0)],
            ShapeStyle::default(),
        );
        let json = serde_json::to_value(&polygon).unwrap();
        assert_eq!(json["subType"], "polygonPoints");
    }

    #[test]
    fn test_loading_open_ring_closes_it() {
        let json = r##"{
            "subType": "triangle",
            "data": {
                "points": [{"x": 0, "y": 0}, {"x": 30, "y": 0}, {"x": 0, "y": 30}],
                "center": {"x": 99, "y": 99},
                "color": "#ff0000"
            },
            "visible": false
        }"##;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(!item.visible);
        let ring = item.ring().unwrap();
        assert_eq!(ring.points.len(), 4);
        assert_eq!(ring.center, pos2(10.0, 10.0));
        assert_eq!(ring.style.color, Color32::from_rgb(255, 0, 0));
        assert_eq!(ring.style.thickness, 1.0);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"subType": "hexagon", "data": {}, "visible": true}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }
}
