use crate::AnnotatorApp;
use crate::egui_surface::EguiSurface;
use crate::input::{self, PointerFrame};
use crate::renderer::Repaint;

pub fn central_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        let frame = PointerFrame::from_response(&response);
        let mut changed = false;
        for event in app.input.process(frame, canvas_rect) {
            changed |= input::dispatch(&mut app.editor, event) != Repaint::None;
        }

        // egui redraws every frame, so each frame is a full repaint
        let mut surface = EguiSurface::new(
            &painter,
            canvas_rect,
            app.config.canvas_color,
            &mut app.textures,
        );
        app.renderer.repaint(&mut surface, &app.editor);

        if changed {
            ctx.request_repaint();
        }
    });
}
