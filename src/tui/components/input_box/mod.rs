//! # InputBox Component
//!
//! Multi-line prompt editor at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input and editing (backspace, delete, cursor movement, paste)
//! - Emit `Submit` on Enter when the buffer holds non-blank text
//! - Show the placeholder when empty
//! - Refuse submission while a turn is in flight (`disabled` prop); typing
//!   ahead is still allowed
//!
//! ## State Management
//!
//! The buffer, cursor byte offset and internal scroll are component state.
//! `disabled` and `placeholder` are props set by the parent each frame.

mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use text_wrap::{
    CONTENT_OFFSET, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_line_col, inner_width,
    next_char_boundary, next_word_boundary, prev_char_boundary, prev_word_boundary,
    wrap_line_count, wrap_options,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Buffer or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Rejects submission while set; the buffer is kept (Prop)
    pub disabled: bool,
    /// Shown dimmed while the buffer is empty (Prop)
    pub placeholder: String,
    /// Cursor byte offset into `buffer`, always on a char boundary
    pos: usize,
    /// First wrapped line shown when content exceeds the visible lines
    scroll_offset: u16,
    /// Outer width from the last render, used for vertical movement
    last_width: u16,
}

impl InputBox {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            placeholder: placeholder.into(),
            pos: 0,
            scroll_offset: 0,
            last_width: 0,
        }
    }

    /// Cursor byte offset into the buffer.
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Required height for the current buffer, clamped to
    /// [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        wrap_line_count(&self.buffer, width).min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Keep the cursor line inside the visible window.
    fn update_scroll_offset(&mut self, outer_width: u16) {
        let width = inner_width(outer_width);
        let (line, _) = cursor_line_col(&self.buffer, self.pos, width);
        let total = wrap_line_count(&self.buffer, width);
        let max_offset = total.saturating_sub(MAX_VISIBLE_LINES);

        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line + 1 - MAX_VISIBLE_LINES;
        }
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Move the cursor one wrapped line up (`-1`) or down (`1`), keeping the
    /// column where possible. Returns false at the first/last line.
    fn move_vertically(&mut self, direction: i8) -> bool {
        let width = inner_width(self.last_width);
        if width == 0 {
            return false;
        }

        let (line, col) = cursor_line_col(&self.buffer, self.pos, width);
        let target = match direction {
            d if d < 0 && line > 0 => line - 1,
            d if d > 0 && line + 1 < wrap_line_count(&self.buffer, width) => line + 1,
            _ => return false,
        };

        // Closest offset on the target line not past the original column
        let mut best = None;
        let offsets = self
            .buffer
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.buffer.len()));
        for offset in offsets {
            let (l, c) = cursor_line_col(&self.buffer, offset, width);
            if l == target && c <= col {
                best = Some(offset);
            } else if l > target {
                break;
            }
        }

        match best {
            Some(offset) => {
                self.pos = offset;
                true
            }
            None => false,
        }
    }

    /// Lines to draw given the current scroll offset.
    fn visible_text(&self, outer_width: u16) -> String {
        if self.scroll_offset == 0 {
            return self.buffer.clone();
        }

        let width = inner_width(outer_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = (self.scroll_offset as usize).min(lines.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
        lines[start..end].join("\n")
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        self.update_scroll_offset(area.width);

        let (title, border_style) = if self.disabled {
            (" Waiting for reply ", Style::default().add_modifier(Modifier::DIM))
        } else {
            (" Message ", Style::default().fg(Color::Green))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1))
            .title(title);

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder.as_str())
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(self.visible_text(area.width))
                .style(Style::default().fg(Color::Green))
        };
        frame.render_widget(paragraph.block(block), area);

        let (line, col) = cursor_line_col(&self.buffer, self.pos, inner_width(area.width));
        let x = (area.x + CONTENT_OFFSET + col).min(area.right().saturating_sub(2));
        let y = area.y + 1 + line.saturating_sub(self.scroll_offset);
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.pos, *c);
                self.pos += c.len_utf8();
                true
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for newlines inside bracketed paste
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(self.pos, &text);
                self.pos += text.len();
                true
            }
            TuiEvent::Backspace if self.pos > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(prev..self.pos);
                self.pos = prev;
                true
            }
            TuiEvent::Delete if self.pos < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(self.pos..next);
                true
            }
            TuiEvent::CursorLeft if self.pos > 0 => {
                self.pos = prev_char_boundary(&self.buffer, self.pos);
                true
            }
            TuiEvent::CursorRight if self.pos < self.buffer.len() => {
                self.pos = next_char_boundary(&self.buffer, self.pos);
                true
            }
            TuiEvent::WordLeft if self.pos > 0 => {
                self.pos = prev_word_boundary(&self.buffer, self.pos);
                true
            }
            TuiEvent::WordRight if self.pos < self.buffer.len() => {
                self.pos = next_word_boundary(&self.buffer, self.pos);
                true
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
                std::mem::replace(&mut self.pos, line_start) != line_start
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.pos..]
                    .find('\n')
                    .map(|i| self.pos + i)
                    .unwrap_or(self.buffer.len());
                std::mem::replace(&mut self.pos, line_end) != line_end
            }
            // At the first/last line these fall through so the parent can scroll
            TuiEvent::CursorUp => self.move_vertically(-1),
            TuiEvent::CursorDown => self.move_vertically(1),
            TuiEvent::Submit => {
                if self.disabled || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.reset();
                return Some(InputEvent::Submit(text));
            }
            _ => false,
        };

        changed.then_some(InputEvent::ContentChanged)
    }
}
