use egui::color_picker::{Alpha, color_edit_button_srgba};
use egui::{Slider, Ui};

use crate::AnnotatorApp;
use crate::layer::LayerKind;
use crate::tools::{LiveOptions, NewItem, ToolMode};

pub fn tools_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Tools");
                mode_buttons(app, ui);
                ui.label(format!("State: {}", app.editor.state().name()));
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("+ Polygon layer").clicked() {
                        app.editor.add_layer(LayerKind::Polygon);
                    }
                    if ui.button("+ Text layer").clicked() {
                        app.editor.add_layer(LayerKind::Text);
                    }
                });
                add_item_buttons(app, ui);
                ui.separator();

                styles(app, ui);
                ui.separator();

                live_options(app, ui);

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        app.save_annotations();
                    }
                    if ui.button("Clear canvas").clicked() {
                        app.editor.clear_canvas();
                    }
                });
                if app.editor.document().background().is_some()
                    && ui.button("Remove background").clicked()
                {
                    app.editor.clear_background_image();
                }
                ui.small("Drop a .json file to load annotations or an image to set the background.");
            });
        });
}

fn mode_buttons(app: &mut AnnotatorApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        for mode in [ToolMode::Move, ToolMode::Draw, ToolMode::PolygonPoints] {
            if ui
                .selectable_label(app.editor.mode() == mode, mode.label())
                .clicked()
            {
                log::info!("Tool selected from UI: {}", mode.label());
                app.editor.set_mode(mode);
            }
        }
    });
}

fn add_item_buttons(app: &mut AnnotatorApp, ui: &mut Ui) {
    let has_layer = app.editor.document().current_layer().is_some();
    ui.add_enabled_ui(has_layer, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Circle").clicked() {
                app.editor.add_item(NewItem::Circle);
            }
            if ui.button("Square").clicked() {
                app.editor.add_item(NewItem::Square);
            }
            if ui.button("Triangle").clicked() {
                app.editor.add_item(NewItem::Triangle);
            }
        });
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut app.new_text);
            if ui.button("Add text").clicked() && !app.new_text.is_empty() {
                app.editor.add_item(NewItem::Text(app.new_text.clone()));
            }
        });
    });
}

fn styles(app: &mut AnnotatorApp, ui: &mut Ui) {
    ui.label("Freehand");
    let mut draw_style = app.editor.draw_style();
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= color_edit_button_srgba(ui, &mut draw_style.color, Alpha::Opaque).changed();
        changed |= ui
            .add(Slider::new(&mut draw_style.thickness, 1.0..=30.0).text("Thickness"))
            .changed();
    });
    if changed {
        app.editor.set_draw_style(draw_style);
    }

    ui.label("Shapes");
    let mut shape_style = app.editor.shape_style();
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= color_edit_button_srgba(ui, &mut shape_style.color, Alpha::Opaque).changed();
        changed |= color_edit_button_srgba(ui, &mut shape_style.fill_color, Alpha::OnlyBlend)
            .on_hover_text("Fill, fully transparent for none")
            .changed();
        changed |= ui
            .add(Slider::new(&mut shape_style.thickness, 1.0..=30.0).text("Thickness"))
            .changed();
    });
    if changed {
        app.editor.set_shape_style(shape_style);
    }
}

fn live_options(app: &mut AnnotatorApp, ui: &mut Ui) {
    let Some(mut options) = app.live.take() else {
        ui.weak("Pick an item in the layers panel to edit it.");
        return;
    };
    ui.heading("Edit item");

    let mut changed = false;
    match &mut options {
        LiveOptions::Text {
            text,
            bold,
            font_size,
            color,
        } => {
            changed |= ui.text_edit_singleline(text).changed();
            changed |= ui.checkbox(bold, "Bold").changed();
            changed |= ui
                .add(Slider::new(font_size, 6.0..=96.0).text("Font size"))
                .changed();
            changed |= color_edit_button_srgba(ui, color, Alpha::Opaque).changed();
        }
        LiveOptions::Shape {
            size,
            color,
            fill_color,
            thickness,
        } => {
            // Size regenerates the geometry, so it only applies when moved
            let resized = ui
                .add(Slider::new(&mut app.live_size, 5.0..=300.0).text("Size"))
                .changed();
            *size = resized.then_some(app.live_size);
            changed |= resized;
            changed |= color_edit_button_srgba(ui, color, Alpha::Opaque).changed();
            changed |= color_edit_button_srgba(ui, fill_color, Alpha::OnlyBlend).changed();
            changed |= ui
                .add(Slider::new(thickness, 1.0..=30.0).text("Thickness"))
                .changed();
        }
        LiveOptions::Freehand { color, thickness } => {
            changed |= color_edit_button_srgba(ui, color, Alpha::Opaque).changed();
            changed |= ui
                .add(Slider::new(thickness, 1.0..=30.0).text("Thickness"))
                .changed();
        }
    }
    if changed {
        app.editor.apply_live_options(&options);
    }
    if let LiveOptions::Shape { size, .. } = &mut options {
        *size = None;
    }

    if app.editor.vertex_edit_item().is_some() {
        ui.small("Drag a handle to move a vertex, right-click it to delete it.");
    }
    if ui.button("Done").clicked() {
        app.editor.clear_edit_target();
        return;
    }
    app.live = Some(options);
}
