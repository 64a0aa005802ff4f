use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::conversation::{Role, Turn};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Renders a single turn in a rounded box titled with its role and time.
///
/// Transient: built fresh each frame from a borrowed [`Turn`]. The parent
/// `MessageList` uses [`Message::calculate_height`] to lay turns out
/// without rendering them.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub turn: &'a Turn,
}

impl<'a> Message<'a> {
    pub fn new(turn: &'a Turn) -> Self {
        Self { turn }
    }

    /// Height this turn needs at the given width, borders included.
    ///
    /// The wrap options must match ratatui's `Paragraph` wrapping so the
    /// predicted height equals the rendered one.
    pub fn calculate_height(turn: &Turn, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding
            return 1;
        }

        let content = turn.content().trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn title(&self) -> String {
        let time = self.turn.created_at().with_timezone(&Local).format("%H:%M");
        format!(" {} · {} ", self.turn.role().label(), time)
    }
}

/// Text style for a role.
pub(crate) fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = role_style(self.turn.role());
        let border_style = style.add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.turn.content().trim())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        let turn = Turn::assistant("");
        assert_eq!(Message::calculate_height(&turn, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_whitespace_only_treated_as_empty() {
        let turn = Turn::user("   \n\t  ");
        assert_eq!(Message::calculate_height(&turn, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let turn = Turn::user("Hello world");
        assert_eq!(Message::calculate_height(&turn, 0), 1);
        assert_eq!(Message::calculate_height(&turn, HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let turn = Turn::user("Hello");
        assert_eq!(Message::calculate_height(&turn, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        // width 9 → content_width 5: "Hello" | "world"
        let turn = Turn::user("Hello world");
        assert_eq!(Message::calculate_height(&turn, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_counts_line_breaks() {
        let turn = Turn::assistant("Line1\nLine2\nLine3");
        assert_eq!(Message::calculate_height(&turn, 80), 3 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn role_styles_differ() {
        assert_eq!(role_style(Role::User).fg, Some(Color::Green));
        assert_eq!(role_style(Role::Assistant).fg, Some(Color::Blue));
    }

    #[test]
    fn render_shows_role_and_content() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let turn = Turn::assistant("Tome dos aspirinas");

        terminal
            .draw(|f| {
                let area = f.area();
                Component::render(&mut Message::new(&turn), f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("agent"));
        assert!(text.contains("Tome dos aspirinas"));
    }
}
