#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod config;
pub mod document;
pub mod egui_surface;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod input;
pub mod layer;
pub mod panels;
pub mod renderer;
pub mod state;
pub mod surface;
pub mod tools;

pub use app::AnnotatorApp;
pub use background::BackgroundImage;
pub use config::EditorConfig;
pub use document::{Document, ItemRef};
pub use element::{Item, ItemKind, Shape};
pub use error::{EditorError, EditorResult};
pub use input::InputEvent;
pub use layer::{Layer, LayerKind};
pub use renderer::{Renderer, Repaint};
pub use state::{Completion, EditTarget, EditorContext, EditorState};
pub use surface::{RecordingSurface, Surface, TextMeasurer};
pub use tools::{LiveOptions, NewItem, ToolMode};
