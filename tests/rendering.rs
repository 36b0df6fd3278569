use annotation_editor::element::ShapeStyle;
use annotation_editor::surface::DrawOp;
use annotation_editor::{
    BackgroundImage, Completion, EditorContext, ItemRef, LayerKind, NewItem, RecordingSurface,
    Renderer, Repaint, ToolMode,
};
use egui::{Color32, ColorImage, Rect, pos2, vec2};

fn render(editor: &EditorContext) -> Vec<DrawOp> {
    let mut surface = RecordingSurface::new(vec2(800.0, 600.0));
    Renderer::default().repaint(&mut surface, editor);
    surface.take_ops()
}

#[test]
fn test_invisible_layers_and_items_are_skipped() {
    let mut editor = EditorContext::default();
    editor.add_layer(LayerKind::Polygon);
    editor.add_item(NewItem::Circle);
    editor.add_item(NewItem::Square);
    editor.add_layer(LayerKind::Text);
    editor.add_item(NewItem::Text("hidden".to_owned()));

    assert_eq!(render(&editor).len(), 4);

    editor.toggle_item_visible(ItemRef::new(0, 0));
    editor.toggle_layer_visible(1);
    let ops = render(&editor);
    assert_eq!(ops.len(), 2);
    assert!(matches!(ops[1], DrawOp::Polygon { .. }));
}

#[test]
fn test_transparent_fill_is_not_painted() {
    let mut editor = EditorContext::default();
    editor.add_layer(LayerKind::Polygon);
    editor.add_item(NewItem::Circle);
    editor.set_shape_style(ShapeStyle {
        fill_color: Color32::from_rgb(0, 200, 0),
        ..ShapeStyle::default()
    });
    editor.add_item(NewItem::Triangle);

    let ops = render(&editor);
    assert!(matches!(ops[1], DrawOp::Circle { fill: None, .. }));
    match &ops[2] {
        DrawOp::Polygon { points, fill, .. } => {
            assert_eq!(*fill, Some(Color32::from_rgb(0, 200, 0)));
            assert_eq!(points.len(), 3);
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn test_vertex_handles_drawn_last() {
    let mut editor = EditorContext::default();
    editor.add_layer(LayerKind::Polygon);
    let square = editor.add_item(NewItem::Square).unwrap();
    editor.add_layer(LayerKind::Polygon);
    editor.add_item(NewItem::Circle);
    editor.set_edit_target(square);

    let ops = render(&editor);
    // clear, square, circle, then one handle per vertex
    assert_eq!(ops.len(), 7);
    assert!(matches!(ops[2], DrawOp::Circle { radius, .. } if radius == 50.0));
    for op in &ops[3..] {
        assert!(matches!(
            op,
            DrawOp::Circle { radius, fill: Some(Color32::WHITE), .. } if *radius == 5.0
        ));
    }

    editor.toggle_item_visible(square);
    assert_eq!(render(&editor).len(), 2);
}

#[test]
fn test_background_stretched_to_surface() {
    let mut editor = EditorContext::default();
    let image = BackgroundImage::new("bg", ColorImage::new([2, 2], Color32::GRAY));
    let id = image.id();
    assert_eq!(editor.deliver(Completion::Background(image)), Repaint::Full);

    let ops = render(&editor);
    assert_eq!(
        ops[1],
        DrawOp::Image {
            id,
            rect: Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0)),
        }
    );
}

#[test]
fn test_freehand_segments_then_full_repaint() {
    let mut editor = EditorContext::default();
    editor.add_layer(LayerKind::Polygon);
    editor.set_mode(ToolMode::Draw);
    let renderer = Renderer::default();
    let mut surface = RecordingSurface::new(vec2(800.0, 600.0));

    renderer.apply(editor.on_pointer_down(pos2(0.0, 0.0)), &mut surface, &editor);
    renderer.apply(editor.on_pointer_move(pos2(10.0, 0.0)), &mut surface, &editor);
    renderer.apply(editor.on_pointer_move(pos2(20.0, 5.0)), &mut surface, &editor);
    let stroke = editor.draw_style().stroke();
    assert_eq!(
        surface.ops(),
        &[
            DrawOp::Polyline {
                points: vec![pos2(0.0, 0.0), pos2(10.0, 0.0)],
                stroke,
            },
            DrawOp::Polyline {
                points: vec![pos2(10.0, 0.0), pos2(20.0, 5.0)],
                stroke,
            },
        ]
    );

    // A full repaint mid-stroke shows the preview
    renderer.repaint(&mut surface, &editor);
    assert_eq!(surface.ops().len(), 2);

    renderer.apply(editor.on_pointer_up(pos2(20.0, 5.0)), &mut surface, &editor);
    assert_eq!(
        surface.ops(),
        &[
            DrawOp::Clear,
            DrawOp::Polyline {
                points: vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(20.0, 5.0)],
                stroke,
            },
        ]
    );
}

#[test]
fn test_text_drawn_at_baseline() {
    let mut editor = EditorContext::default();
    editor.add_layer(LayerKind::Text);
    editor.add_item(NewItem::Text("Hi".to_owned()));
    let ops = render(&editor);
    assert_eq!(
        ops[1],
        DrawOp::Text {
            pos: pos2(200.0, 200.0),
            text: "Hi".to_owned(),
            font: "16px Arial".to_owned(),
            color: Color32::BLACK,
        }
    );
}
