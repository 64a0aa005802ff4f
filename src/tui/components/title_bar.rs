//! # TitleBar Component
//!
//! One-line status bar across the top of the screen.
//!
//! ## Responsibilities
//!
//! - Display the window title on the left
//! - Display the agent host and a status message on the right
//! - Show a "↓ New" indicator when there's unseen content below scroll
//!
//! Purely presentational: every field is a prop, so a `TitleBar` is built
//! fresh each frame from TUI state.
//!
//! When the terminal is too narrow for both sides, the right side wins and
//! the title is truncated by the buffer.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;

pub struct TitleBar {
    /// Application title (e.g. "Agent Chat")
    pub title: String,
    /// Transient status (e.g. "The agent is thinking..."), empty when idle
    pub status_message: String,
    /// Host of the agent endpoint
    pub agent_label: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        title: impl Into<String>,
        status_message: impl Into<String>,
        agent_label: impl Into<String>,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            title: title.into(),
            status_message: status_message.into(),
            agent_label: agent_label.into(),
            has_unseen_content,
        }
    }

    /// Right-hand segments in display order.
    fn right_segments(&self) -> Vec<Span<'_>> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();

        if self.has_unseen_content {
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(" | ", dim));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::styled(
                self.status_message.as_str(),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::styled(" | ", dim));
        }
        spans.push(Span::styled(self.agent_label.as_str(), dim));
        spans.push(Span::raw(" "));
        spans
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let left = format!(" {}", self.title);
        let right = self.right_segments();

        let left_width = left.width();
        let right_width: usize = right.iter().map(|s| s.content.width()).sum();
        let available = area.width as usize;

        let mut spans = Vec::with_capacity(right.len() + 2);
        if left_width + right_width <= available {
            let gap = available - left_width - right_width;
            spans.push(Span::styled(left, Style::default().add_modifier(Modifier::BOLD)));
            spans.push(Span::raw(" ".repeat(gap)));
        }
        spans.extend(right);

        frame.render_widget(Line::from(spans), area);
    }
}
