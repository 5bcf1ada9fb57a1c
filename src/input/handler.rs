use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Processed input events for the application
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Quit the application
    Quit,
    /// Toggle pause
    TogglePause,
    /// Scroll the viewport by a number of terminal rows
    Scroll(i32),
    /// Jump back to the top of the page
    ScrollHome,
    /// Toggle the grid line overlay
    ToggleGrid,
    /// Toggle the smoothed path overlay
    TogglePath,
    /// Toggle region outlines and labels
    ToggleRegions,
    /// Re-run initial placement beside the hero
    Respawn,
    /// Pointer moved to a terminal position
    PointerMove { x: u16, y: u16 },
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// No event
    None,
}

/// Input handler for processing terminal events
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Poll for input events with timeout
    pub fn poll(&mut self, timeout: Duration) -> Option<InputEvent> {
        if event::poll(timeout).ok()? {
            match event::read().ok()? {
                Event::Key(key_event) => Some(self.handle_key(key_event)),
                Event::Mouse(mouse_event) => Some(self.handle_mouse(mouse_event)),
                Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
                _ => None,
            }
        } else {
            None
        }
    }

    /// Handle keyboard input
    fn handle_key(&self, event: KeyEvent) -> InputEvent {
        match event.code {
            // Quit
            KeyCode::Char('q') | KeyCode::Esc => InputEvent::Quit,

            // Ctrl+C to quit
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                InputEvent::Quit
            }

            // Pause
            KeyCode::Char(' ') => InputEvent::TogglePause,

            // Viewport scrolling
            KeyCode::Up => InputEvent::Scroll(-2),
            KeyCode::Down => InputEvent::Scroll(2),
            KeyCode::PageUp => InputEvent::Scroll(-12),
            KeyCode::PageDown => InputEvent::Scroll(12),
            KeyCode::Home => InputEvent::ScrollHome,

            // Display toggles
            KeyCode::Char('g') => InputEvent::ToggleGrid,
            KeyCode::Char('p') => InputEvent::TogglePath,
            KeyCode::Char('r') => InputEvent::ToggleRegions,

            // Put the robot back at its spawn point
            KeyCode::Char('s') => InputEvent::Respawn,

            _ => InputEvent::None,
        }
    }

    /// Handle mouse input. Motion and drag both steer the pointer target;
    /// scroll wheels move the viewport.
    fn handle_mouse(&self, event: MouseEvent) -> InputEvent {
        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                InputEvent::PointerMove {
                    x: event.column,
                    y: event.row,
                }
            }
            MouseEventKind::ScrollUp => InputEvent::Scroll(-2),
            MouseEventKind::ScrollDown => InputEvent::Scroll(2),
            _ => InputEvent::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
