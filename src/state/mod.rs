mod context;
mod editor_state;
pub mod persistence;

pub use context::{Completion, EditorContext};
pub use editor_state::{EditTarget, EditorState};
pub use persistence::{ANNOTATIONS_FILE_NAME, LoadedLayers};
