use annotation_editor::element::{Shape, ShapeStyle, StrokeStyle};
use annotation_editor::state::{ANNOTATIONS_FILE_NAME, LoadedLayers, persistence};
use annotation_editor::{
    EditorContext, EditorError, ItemKind, ItemRef, LayerKind, LiveOptions, NewItem, ToolMode,
};
use egui::{Color32, pos2};

/// A document holding one item of every kind, with non-default styles.
fn populated_editor() -> EditorContext {
    let mut editor = EditorContext::default();
    editor.add_layer(LayerKind::Polygon);
    editor.set_shape_style(ShapeStyle {
        color: Color32::from_rgb(0x12, 0x34, 0x56),
        fill_color: Color32::from_rgb(255, 255, 0),
        thickness: 3.0,
    });
    editor.add_item(NewItem::Circle);
    editor.add_item(NewItem::Square);
    editor.add_item(NewItem::Triangle);

    editor.set_mode(ToolMode::PolygonPoints);
    for point in [pos2(10.0, 10.0), pos2(60.0, 10.0), pos2(35.0, 50.0)] {
        editor.on_click(point);
    }
    editor.on_double_click(pos2(35.0, 50.0));

    editor.set_draw_style(StrokeStyle {
        color: Color32::RED,
        thickness: 4.0,
    });
    editor.set_mode(ToolMode::Draw);
    editor.on_pointer_down(pos2(0.0, 0.0));
    editor.on_pointer_move(pos2(5.0, 5.0));
    editor.on_pointer_move(pos2(10.0, 3.0));
    editor.on_pointer_up(pos2(10.0, 3.0));

    editor.add_layer(LayerKind::Text);
    let text = editor.add_item(NewItem::Text("Label".to_owned())).unwrap();
    editor.set_edit_target(text);
    editor.apply_live_options(&LiveOptions::Text {
        text: "Bold label".to_owned(),
        bold: true,
        font_size: 24.0,
        color: Color32::BLUE,
    });
    editor.clear_edit_target();
    editor.toggle_item_visible(ItemRef::new(0, 1));
    editor.toggle_layer_visible(1);
    editor
}

#[test]
fn test_round_trip_every_kind() {
    let editor = populated_editor();
    let kinds: Vec<ItemKind> = editor
        .document()
        .layers()
        .iter()
        .flat_map(|layer| layer.items.iter().map(|item| item.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ItemKind::Circle,
            ItemKind::Square,
            ItemKind::Triangle,
            ItemKind::PolygonByClick,
            ItemKind::Freehand,
            ItemKind::Text,
        ]
    );

    let json = editor.serialize().unwrap();
    let mut restored = EditorContext::default();
    assert_eq!(restored.deserialize(&json).unwrap(), 2);
    assert_eq!(restored.document().layers(), editor.document().layers());
    assert_eq!(restored.document().current_layer_index(), Some(0));
}

#[test]
fn test_wire_format_field_names() {
    let editor = populated_editor();
    let json: serde_json::Value = serde_json::from_str(&editor.serialize().unwrap()).unwrap();

    let layer = &json[0];
    assert_eq!(layer["type"], "polygon");
    assert_eq!(layer["visible"], true);
    assert_eq!(json[1]["visible"], false);

    let square = &layer["items"][1];
    assert_eq!(square["subType"], "square");
    assert_eq!(square["visible"], false);
    assert_eq!(square["data"]["color"], "#123456");
    assert_eq!(square["data"]["fillColor"], "#ffff00");
    assert_eq!(square["data"]["thickness"], 3.0);
    assert_eq!(square["data"]["points"].as_array().unwrap().len(), 5);

    assert_eq!(layer["items"][3]["subType"], "polygonPoints");
    assert_eq!(layer["items"][4]["data"]["color"], "#ff0000");

    let text = &json[1]["items"][0]["data"];
    assert_eq!(text["font"], "bold 24px Arial");
    assert_eq!(text["text"], "Bold label");
    assert_eq!(text["height"], 24.0);
}

#[test]
fn test_load_array_replaces_and_object_appends() {
    let source = populated_editor();
    let single_layer = source.serialize_layer(1).unwrap();

    let mut editor = EditorContext::default();
    editor.add_layer(LayerKind::Polygon);
    editor.add_item(NewItem::Circle);

    // An object is appended after the existing layer
    editor.deserialize(&single_layer).unwrap();
    assert_eq!(editor.document().layers().len(), 2);
    assert_eq!(editor.document().layers()[0].items.len(), 1);
    assert_eq!(&editor.document().layers()[1], &source.document().layers()[1]);

    // An array replaces everything
    editor.deserialize(&source.serialize().unwrap()).unwrap();
    assert_eq!(editor.document().layers(), source.document().layers());
}

#[test]
fn test_malformed_json_leaves_document_unchanged() {
    let mut editor = populated_editor();
    let before = editor.document().layers().to_vec();

    for bad in ["[{\"type\": ", "\"just a string\"", r#"[{"items": [{"subType": "star"}]}]"#] {
        assert!(editor.deserialize(bad).is_err());
        assert_eq!(editor.document().layers(), before.as_slice());
    }
    assert!(matches!(
        editor.deserialize("{{"),
        Err(EditorError::MalformedJson(_))
    ));
    assert_eq!(editor.take_notices().len(), 4);
}

#[test]
fn test_loading_normalizes_geometry() {
    let json = r##"{
        "type": "polygon",
        "items": [
            {"subType": "circle", "data": {"center": {"x": 1, "y": 2}, "radius": -5}},
            {"subType": "polygonPoints", "data": {
                "points": [{"x": 0, "y": 0}, {"x": 6, "y": 0}, {"x": 0, "y": 6}],
                "center": {"x": 100, "y": 100}
            }}
        ]
    }"##;
    let LoadedLayers::Append(layer) = persistence::parse_layers(json).unwrap() else {
        panic!("expected a single layer");
    };
    assert!(layer.visible);
    match &layer.items[0].shape {
        Shape::Circle(circle) => assert_eq!(circle.radius, 0.0),
        other => panic!("unexpected shape {other:?}"),
    }
    let ring = layer.items[1].ring().unwrap();
    assert_eq!(ring.points.len(), 4);
    assert_eq!(ring.center, pos2(2.0, 2.0));
    assert_eq!(ring.style, ShapeStyle::default());
}

#[test]
fn test_save_to_file() {
    let mut editor = populated_editor();
    let dir = std::env::temp_dir().join(format!("annotations_test_{}", uuid::Uuid::new_v4()));

    let path = editor.save_to_file(&dir).unwrap();
    assert_eq!(path, dir.join(ANNOTATIONS_FILE_NAME));

    let mut restored = EditorContext::default();
    restored
        .deserialize(&std::fs::read_to_string(&path).unwrap())
        .unwrap();
    assert_eq!(restored.document().layers(), editor.document().layers());

    std::fs::remove_dir_all(dir).unwrap();
}
