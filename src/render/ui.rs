use std::collections::VecDeque;

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect as ScreenRect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::robot::Robot;

use super::colors::{dim_color, BUBBLE_TEXT_COLOR, STATUS_COLOR};

/// Rolling record of captions the robot has spoken, with wall-clock stamps
pub struct CaptionLog {
    entries: VecDeque<CaptionEntry>,
    max_entries: usize,
}

/// One spoken caption
pub struct CaptionEntry {
    pub at: DateTime<Local>,
    pub text: String,
}

impl CaptionLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    pub fn add(&mut self, text: impl Into<String>) {
        self.entries.push_back(CaptionEntry {
            at: Local::now(),
            text: text.into(),
        });
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Most recent entry first
    pub fn recent(&self) -> impl Iterator<Item = &CaptionEntry> {
        self.entries.iter().rev()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.entries.back().map(|e| e.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders the last few log lines bottom-up
pub struct CaptionLogWidget<'a> {
    log: &'a CaptionLog,
}

impl<'a> CaptionLogWidget<'a> {
    pub fn new(log: &'a CaptionLog) -> Self {
        Self { log }
    }
}

impl Widget for CaptionLogWidget<'_> {
    fn render(self, area: ScreenRect, buf: &mut Buffer) {
        if area.width == 0 {
            return;
        }
        let style = Style::default().fg(dim_color(STATUS_COLOR, 0.8));
        for (row, entry) in self.log.recent().take(area.height as usize).enumerate() {
            let y = area.bottom() - 1 - row as u16;
            let line = format!("[{}] {}", entry.at.format("%H:%M:%S"), entry.text);
            for (i, ch) in line.chars().take(area.width as usize).enumerate() {
                buf[(area.x + i as u16, y)].set_char(ch).set_style(style);
            }
        }
    }
}

/// One-line status bar: pacing, robot state, key hints
pub struct StatusBar<'a> {
    robot: &'a Robot,
    fps: u32,
    paused: bool,
    caption: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(robot: &'a Robot) -> Self {
        Self {
            robot,
            fps: 0,
            paused: false,
            caption: None,
        }
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn caption(mut self, caption: Option<&'a str>) -> Self {
        self.caption = caption;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: ScreenRect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let state = if self.paused {
            "PAUSED"
        } else if self.robot.freeze_timer > 0.0 {
            "warming up"
        } else if self.robot.has_route() {
            "chasing"
        } else {
            "idle"
        };

        let mut line = format!(
            " guidebot │ {:>2} fps │ {} │ spd {:>4.0} │ pos {:>5.0},{:<5.0}",
            self.fps,
            state,
            self.robot.speed(),
            self.robot.position.x,
            self.robot.position.y,
        );
        if let Some(caption) = self.caption {
            line.push_str(" │ \u{201c}");
            line.push_str(caption);
            line.push('\u{201d}');
        }

        let hints = "[space]pause [g]rid [p]ath [r]egions [s]pawn [q]uit ";
        let style = Style::default().fg(STATUS_COLOR);
        let y = area.y;

        for (i, ch) in line.chars().take(area.width as usize).enumerate() {
            buf[(area.x + i as u16, y)].set_char(ch).set_style(style);
        }

        // Right-aligned key hints when the line leaves room
        let used = line.chars().count() as u16;
        let hints_len = hints.chars().count() as u16;
        if used + hints_len + 2 < area.width {
            let start = area.x + area.width - hints_len;
            let hint_style = Style::default()
                .fg(BUBBLE_TEXT_COLOR)
                .add_modifier(Modifier::DIM);
            for (i, ch) in hints.chars().enumerate() {
                buf[(start + i as u16, y)].set_char(ch).set_style(hint_style);
            }
        }
    }
}
