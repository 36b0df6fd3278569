#![warn(clippy::all, rust_2018_idioms)]

use annotation_editor::AnnotatorApp;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Annotation Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(AnnotatorApp::new(cc)))),
    )
}
