use egui::{Pos2, Rect, Response};

use crate::renderer::Repaint;
use crate::state::EditorContext;

/// Canvas input in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp(Pos2),
    Click(Pos2),
    DoubleClick(Pos2),
    ContextMenu(Pos2),
}

impl InputEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            Self::PointerDown(pos)
            | Self::PointerMove(pos)
            | Self::PointerUp(pos)
            | Self::Click(pos)
            | Self::DoubleClick(pos)
            | Self::ContextMenu(pos) => *pos,
        }
    }
}

/// What egui reported about the pointer over the canvas in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    /// Latest pointer position in screen coordinates
    pub pos: Option<Pos2>,
    pub hovered: bool,
    pub primary_pressed: bool,
    pub primary_released: bool,
    pub clicked: bool,
    pub double_clicked: bool,
    pub secondary_clicked: bool,
}

impl PointerFrame {
    /// Reads the frame's pointer state for the canvas widget.
    pub fn from_response(response: &Response) -> Self {
        let (pos, pressed, released) = response.ctx.input(|input| {
            (
                input.pointer.latest_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
            )
        });
        Self {
            pos,
            hovered: response.hovered(),
            primary_pressed: pressed,
            primary_released: released,
            clicked: response.clicked(),
            double_clicked: response.double_clicked(),
            secondary_clicked: response.secondary_clicked(),
        }
    }
}

/// Handles converting raw egui input into editor events
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    /// A press started on the canvas and has not been released yet
    pressed_on_canvas: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns one frame of pointer state into editor events, in the order
    /// the editor expects them: down, move, up, then click gestures.
    ///
    /// Releases are reported even outside the canvas so drags always end.
    pub fn process(&mut self, frame: PointerFrame, canvas: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let Some(screen_pos) = frame.pos else {
            if self.pressed_on_canvas && frame.primary_released {
                if let Some(last) = self.last_pointer_pos {
                    events.push(InputEvent::PointerUp(last));
                }
                self.pressed_on_canvas = false;
            }
            return events;
        };
        let pos = screen_pos - canvas.min.to_vec2();

        if frame.primary_pressed && frame.hovered {
            self.pressed_on_canvas = true;
            events.push(InputEvent::PointerDown(pos));
        }
        if self.last_pointer_pos != Some(pos) {
            events.push(InputEvent::PointerMove(pos));
        }
        if frame.primary_released && self.pressed_on_canvas {
            self.pressed_on_canvas = false;
            events.push(InputEvent::PointerUp(pos));
        }
        if frame.clicked {
            events.push(InputEvent::Click(pos));
        }
        if frame.double_clicked {
            events.push(InputEvent::DoubleClick(pos));
        }
        if frame.secondary_clicked {
            events.push(InputEvent::ContextMenu(pos));
        }

        self.last_pointer_pos = Some(pos);
        events
    }
}

/// Routes an event to the matching editor entry point.
pub fn dispatch(editor: &mut EditorContext, event: InputEvent) -> Repaint {
    match event {
        InputEvent::PointerDown(pos) => editor.on_pointer_down(pos),
        InputEvent::PointerMove(pos) => editor.on_pointer_move(pos),
        InputEvent::PointerUp(pos) => editor.on_pointer_up(pos),
        InputEvent::Click(pos) => editor.on_click(pos),
        InputEvent::DoubleClick(pos) => editor.on_double_click(pos),
        InputEvent::ContextMenu(pos) => editor.on_context_menu(pos),
    }
}
