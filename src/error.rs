use thiserror::Error;

/// Errors surfaced to the host by document-level operations.
///
/// Interaction paths (pointer events, stale indices) never produce these;
/// they degrade to logged no-ops instead.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Malformed annotation JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Annotation payload is not a layer or a list of layers: {0}")]
    InvalidPayload(String),

    #[error("Failed to serialize annotations: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write annotations: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Layer index {0} is out of range")]
    LayerOutOfRange(usize),
}

/// Result type for document-level operations
pub type EditorResult<T> = Result<T, EditorError>;
