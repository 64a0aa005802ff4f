//! # Landing Page Component
//!
//! Shown in place of the message list while the conversation is empty.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct LandingPage<'a> {
    pub title: &'a str,
    pub session_id: &'a str,
    pub agent_label: &'a str,
}

impl<'a> LandingPage<'a> {
    pub fn new(title: &'a str, session_id: &'a str, agent_label: &'a str) -> Self {
        Self {
            title,
            session_id,
            agent_label,
        }
    }
}

impl<'a> Component for LandingPage<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);

        let lines = vec![
            Line::from(Span::styled(
                self.title,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), dim)),
            Line::default(),
            Line::from(Span::styled(format!("agent   {}", self.agent_label), dim)),
            Line::from(Span::styled(format!("session {}", self.session_id), dim)),
            Line::default(),
            Line::from(Span::styled(
                "Enter to send · Shift+Enter for a new line · Esc to quit",
                dim,
            )),
        ];

        let [text_area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_landing_shows_title_and_session() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let mut landing = LandingPage::new("Agent Chat", "session-1234", "localhost:9000");

        terminal
            .draw(|f| {
                let area = f.area();
                landing.render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Agent Chat"));
        assert!(text.contains("session-1234"));
        assert!(text.contains("localhost:9000"));
    }
}
