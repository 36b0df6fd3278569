use std::path::PathBuf;

use crate::config::EditorConfig;
use crate::egui_surface::{BackgroundTextures, EguiTextMeasurer};
use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::panels;
use crate::renderer::Renderer;
use crate::state::EditorContext;
use crate::tools::LiveOptions;

/// We derive Deserialize/Serialize so we can persist the configuration on
/// shutdown. The document itself is only saved explicitly, as JSON.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct AnnotatorApp {
    pub(crate) config: EditorConfig,
    /// Directory `annotations.json` is saved into
    pub(crate) save_dir: PathBuf,

    #[serde(skip)]
    pub(crate) editor: EditorContext,
    #[serde(skip)]
    pub(crate) renderer: Renderer,
    #[serde(skip)]
    pub(crate) input: InputHandler,
    #[serde(skip)]
    pub(crate) files: FileHandler,
    #[serde(skip)]
    pub(crate) textures: BackgroundTextures,
    /// Panel copy of the edit target's options
    #[serde(skip)]
    pub(crate) live: Option<LiveOptions>,
    #[serde(skip)]
    pub(crate) live_size: f32,
    /// Text of the next text item
    #[serde(skip)]
    pub(crate) new_text: String,
    #[serde(skip)]
    pub(crate) notices: Vec<String>,
}

impl Default for AnnotatorApp {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self {
            editor: EditorContext::new(config.clone()),
            renderer: Renderer::new(&config),
            live_size: config.live_size,
            config,
            save_dir: PathBuf::from("."),
            input: InputHandler::new(),
            files: FileHandler::new(),
            textures: BackgroundTextures::new(),
            live: None,
            new_text: "Text".to_owned(),
            notices: Vec::new(),
        }
    }
}

impl AnnotatorApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let stored: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let config = stored.config;
        log::info!("Starting annotation editor, saving into {}", stored.save_dir.display());
        Self {
            editor: EditorContext::new(config.clone())
                .with_measurer(EguiTextMeasurer::new(cc.egui_ctx.clone())),
            renderer: Renderer::new(&config),
            live_size: config.live_size,
            config,
            save_dir: stored.save_dir,
            ..Default::default()
        }
    }

    /// Hands dropped files to the editor as completions.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        for result in self.files.take_dropped(ctx) {
            match result {
                Ok(completion) => {
                    self.editor.deliver(completion);
                }
                Err(err) => self.editor.report(&err),
            }
        }
    }

    pub(crate) fn save_annotations(&mut self) {
        if let Ok(path) = self.editor.save_to_file(&self.save_dir) {
            self.notices.push(format!("Saved {}", path.display()));
        }
    }

    fn show_notices(&mut self, ctx: &egui::Context) {
        self.notices.extend(self.editor.take_notices());
        if self.notices.is_empty() {
            return;
        }
        let mut dismissed = false;
        egui::Window::new("Notices")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -10.0))
            .show(ctx, |ui| {
                for notice in &self.notices {
                    ui.label(notice);
                }
                dismissed = ui.button("Dismiss").clicked();
            });
        if dismissed {
            self.notices.clear();
        }
    }
}

impl eframe::App for AnnotatorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        if self.editor.edit_target().is_none() {
            self.live = None;
        }

        panels::tools_panel(self, ctx);
        panels::layers_panel(self, ctx);
        panels::central_panel(self, ctx);

        self.show_notices(ctx);
        self.files.preview_files_being_dropped(ctx);
    }
}
