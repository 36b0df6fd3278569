use serde::{Deserialize, Serialize};

mod draw_stroke_helper;
mod live_options;

pub use draw_stroke_helper::DrawStrokeHelper;
pub use live_options::LiveOptions;

/// Top-level tool mode chosen in the tools panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolMode {
    /// Pointer drags pick up items
    #[default]
    Move,
    /// Pointer drags capture freehand strokes
    Draw,
    /// Clicks accumulate polygon vertices, a double-click closes the ring
    PolygonPoints,
}

impl ToolMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Move => "Move",
            Self::Draw => "Draw",
            Self::PolygonPoints => "Polygon",
        }
    }
}

/// Template items placed by the "add" buttons.
#[derive(Debug, Clone, PartialEq)]
pub enum NewItem {
    Circle,
    Square,
    Triangle,
    Text(String),
}
