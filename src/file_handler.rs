use std::path::Path;

use eframe::egui;

use crate::background::BackgroundImage;
use crate::error::{EditorError, EditorResult};
use crate::state::Completion;

/// How a dropped file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Annotations,
    Image,
    Unsupported,
}

/// Classifies a file by MIME type when the platform provides one, otherwise
/// by extension.
pub fn classify(name: &str, mime: &str) -> FileKind {
    if !mime.is_empty() {
        if mime == "application/json" {
            return FileKind::Annotations;
        }
        if mime.starts_with("image/") {
            return FileKind::Image;
        }
    }
    let extension = Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some("json") => FileKind::Annotations,
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp") => FileKind::Image,
        _ => FileKind::Unsupported,
    }
}

/// Turns the contents of a file into the completion the editor consumes.
pub fn completion_from_bytes(kind: FileKind, name: &str, bytes: &[u8]) -> EditorResult<Completion> {
    match kind {
        FileKind::Annotations => {
            let text = std::str::from_utf8(bytes).map_err(|err| {
                EditorError::InvalidPayload(format!("{name} is not UTF-8 text: {err}"))
            })?;
            Ok(Completion::Annotations(text.to_owned()))
        }
        FileKind::Image => BackgroundImage::decode(name, bytes).map(Completion::Background),
        FileKind::Unsupported => Err(EditorError::InvalidPayload(format!(
            "{name} is neither annotation JSON nor an image"
        ))),
    }
}

/// Reads files dropped on the window.
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Completions for the files dropped this frame, one result per file.
    pub fn take_dropped(&mut self, ctx: &egui::Context) -> Vec<EditorResult<Completion>> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        dropped.iter().map(Self::read_dropped).collect()
    }

    fn read_dropped(file: &egui::DroppedFile) -> EditorResult<Completion> {
        let name = match &file.path {
            Some(path) => path.display().to_string(),
            None if !file.name.is_empty() => file.name.clone(),
            None => "unknown".to_owned(),
        };
        let kind = classify(&name, &file.mime);
        if kind == FileKind::Unsupported {
            log::warn!("Dropped file is not a supported type: {name}");
        }

        if let Some(bytes) = &file.bytes {
            log::info!("Loading {name} from memory ({} bytes)", bytes.len());
            return completion_from_bytes(kind, &name, bytes);
        }
        match &file.path {
            Some(path) => {
                log::info!("Loading {}", path.display());
                let bytes = std::fs::read(path)?;
                completion_from_bytes(kind, &name, &bytes)
            }
            None => Err(EditorError::InvalidPayload(format!(
                "dropped file {name} has no accessible data"
            ))),
        }
    }

    /// Dims the window and lists the files hovering over it.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None => text += "\n(Path not available)",
                }
            }
            text
        });

        let painter =
            ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}
