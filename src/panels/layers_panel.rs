use crate::AnnotatorApp;
use crate::document::ItemRef;

/// Change requested from the layer list, applied after the list is drawn.
enum LayerAction {
    Select(usize),
    ToggleLayer(usize),
    DeleteLayer(usize),
    ToggleItem(ItemRef),
    DeleteItem(ItemRef),
    Edit(ItemRef),
}

pub fn layers_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::SidePanel::right("layers_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Layers");
            let mut actions = Vec::new();
            let document = app.editor.document();
            let current = document.current_layer_index();
            let edited = app.editor.edit_target().map(|target| target.item());

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (layer_index, layer) in document.layers().iter().enumerate().rev() {
                    ui.horizontal(|ui| {
                        let title = format!("Layer {layer_index} ({})", layer.kind);
                        if ui.selectable_label(current == Some(layer_index), title).clicked() {
                            actions.push(LayerAction::Select(layer_index));
                        }
                        let mut visible = layer.visible;
                        if ui.checkbox(&mut visible, "").changed() {
                            actions.push(LayerAction::ToggleLayer(layer_index));
                        }
                        if ui.small_button("🗑").clicked() {
                            actions.push(LayerAction::DeleteLayer(layer_index));
                        }
                    });

                    ui.indent(("layer_items", layer_index), |ui| {
                        for (item_index, item) in layer.items.iter().enumerate().rev() {
                            let item_ref = ItemRef::new(layer_index, item_index);
                            ui.horizontal(|ui| {
                                let label = format!("{} {item_index}", item.kind().label());
                                if ui.selectable_label(edited == Some(item_ref), label).clicked() {
                                    actions.push(LayerAction::Edit(item_ref));
                                }
                                let mut visible = item.visible;
                                if ui.checkbox(&mut visible, "").changed() {
                                    actions.push(LayerAction::ToggleItem(item_ref));
                                }
                                if ui.small_button("🗑").clicked() {
                                    actions.push(LayerAction::DeleteItem(item_ref));
                                }
                            });
                        }
                    });
                }
            });

            for action in actions {
                apply(app, action);
            }
        });
}

fn apply(app: &mut AnnotatorApp, action: LayerAction) {
    match action {
        LayerAction::Select(index) => {
            app.editor.select_layer(index);
        }
        LayerAction::ToggleLayer(index) => {
            app.editor.toggle_layer_visible(index);
        }
        LayerAction::DeleteLayer(index) => {
            app.editor.delete_layer(index);
        }
        LayerAction::ToggleItem(item_ref) => {
            app.editor.toggle_item_visible(item_ref);
        }
        LayerAction::DeleteItem(item_ref) => {
            app.editor.delete_item(item_ref);
        }
        LayerAction::Edit(item_ref) => {
            app.live = app.editor.set_edit_target(item_ref);
            app.live_size = app.config.live_size;
        }
    }
}
