use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::layer::Layer;

/// File name offered when annotations are exported
pub const ANNOTATIONS_FILE_NAME: &str = "annotations.json";

/// A successfully parsed annotation payload.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedLayers {
    /// Top-level array: replaces the whole layer list
    Replace(Vec<Layer>),
    /// Top-level object: appended as one layer
    Append(Layer),
}

impl LoadedLayers {
    /// Applies the payload and returns how many layers it carried.
    pub fn apply_to(self, document: &mut Document) -> usize {
        match self {
            Self::Replace(layers) => {
                let count = layers.len();
                document.replace_layers(layers);
                log::info!("Loaded {count} layers, replacing the document");
                count
            }
            Self::Append(layer) => {
                document.append_layer(layer);
                log::info!("Appended one loaded layer");
                1
            }
        }
    }
}

/// The whole layer list as pretty-printed JSON.
pub fn serialize_layers(layers: &[Layer]) -> EditorResult<String> {
    serde_json::to_string_pretty(layers).map_err(EditorError::Serialize)
}

/// One layer as a JSON object.
pub fn serialize_layer(document: &Document, index: usize) -> EditorResult<String> {
    let layer = document
        .layer(index)
        .ok_or(EditorError::LayerOutOfRange(index))?;
    serde_json::to_string_pretty(layer).map_err(EditorError::Serialize)
}

/// Parses annotation text without touching any document.
pub fn parse_layers(text: &str) -> EditorResult<LoadedLayers> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(EditorError::MalformedJson)?;
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)
            .map(LoadedLayers::Replace)
            .map_err(|err| EditorError::InvalidPayload(err.to_string())),
        serde_json::Value::Object(_) => serde_json::from_value(value)
            .map(LoadedLayers::Append)
            .map_err(|err| EditorError::InvalidPayload(err.to_string())),
        other => Err(EditorError::InvalidPayload(format!(
            "expected a layer or a list of layers, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Writes `annotations.json` into `dir` and returns the written path.
pub fn save_to_dir(document: &Document, dir: &Path) -> EditorResult<PathBuf> {
    let json = serialize_layers(document.layers())?;
    fs::create_dir_all(dir)?;
    let path = dir.join(ANNOTATIONS_FILE_NAME);
    fs::write(&path, json)?;
    log::info!("Saved annotations to {}", path.display());
    Ok(path)
}
