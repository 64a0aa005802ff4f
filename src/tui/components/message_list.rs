//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the turns to show
//! (props). Because turns are immutable and only ever appended, cached
//! heights stay valid until the width changes.
//!
//! While a request is outstanding a one-line spinner with the "thinking"
//! text is drawn below the last turn.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::Turn;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Rows reserved below the last turn for the thinking indicator.
const INDICATOR_HEIGHT: u16 = 1;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Whether content exists below the viewport (for the "↓ New" indicator)
    pub has_unseen_content: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            has_unseen_content: false,
            viewport_height: 0,
        }
    }

    /// Re-attach to the bottom so the next frame shows the latest turn.
    pub fn scroll_to_latest(&mut self) {
        self.stick_to_bottom = true;
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back down to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.scroll_to_latest(),
            _ => {}
        }
        None
    }
}

/// Cached per-turn heights for one content width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
        }
    }

    /// Bring the cache in line with `turns` at `content_width`.
    /// Only turns not measured yet are measured; a width change re-measures all.
    pub fn sync(&mut self, turns: &[Turn], content_width: u16) {
        if self.content_width != content_width || self.heights.len() > turns.len() {
            self.heights.clear();
            self.content_width = content_width;
        }

        let measured = self.heights.len();
        for turn in &turns[measured..] {
            self.heights.push(Message::calculate_height(turn, content_width));
        }

        if self.prefix_heights.len() != self.heights.len() || measured == 0 {
            self.rebuild_prefix_heights();
        }
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Indices of turns intersecting the viewport, padded by half a screen each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }

    /// Top edge (in canvas rows) of turn `index`.
    fn top_of(&self, index: usize) -> u16 {
        if index == 0 { 0 } else { self.prefix_heights[index - 1] }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub turns: &'a [Turn],
    pub is_busy: bool,
    pub spinner_frame: usize,
    pub thinking_text: &'a str,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        turns: &'a [Turn],
        is_busy: bool,
        spinner_frame: usize,
        thinking_text: &'a str,
    ) -> Self {
        Self {
            state,
            turns,
            is_busy,
            spinner_frame,
            thinking_text,
        }
    }

    fn indicator(&self) -> Paragraph<'static> {
        let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {frame} "), style.fg(Color::Blue)),
            Span::styled(self.thinking_text.to_string(), style),
        ]))
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Measure new turns
        self.state.layout.sync(self.turns, content_width);
        let total_height = self.state.layout.total_height();
        let indicator_height = if self.is_busy { INDICATOR_HEIGHT } else { 0 };
        let canvas_height = total_height.saturating_add(indicator_height);

        // 2. Pin to the bottom, or clamp to prevent overscrolling past content
        self.state.viewport_height = area.height;
        let max_scroll = canvas_height.saturating_sub(area.height);
        if self.state.stick_to_bottom {
            self.state.scroll_state.set_offset(Position { x: 0, y: max_scroll });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible turns into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let top = self.state.layout.top_of(i);
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, top, content_width, height);
            scroll_view.render_widget(Message::new(&self.turns[i]), rect);
        }

        if self.is_busy {
            let rect = Rect::new(0, total_height, content_width, INDICATOR_HEIGHT);
            scroll_view.render_widget(self.indicator(), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // 4. Unseen content indicator
        self.state.has_unseen_content = self.state.scroll_state.offset().y < max_scroll;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn turns(n: usize) -> Vec<Turn> {
        (0..n).map(|i| Turn::user(format!("turn {i}"))).collect()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_sync_measures_only_new_turns() {
        let mut cache = LayoutCache::new();
        let mut all = turns(2);
        cache.sync(&all, 80);
        assert_eq!(cache.heights, vec![3, 3]);
        assert_eq!(cache.prefix_heights, vec![3, 6]);

        all.push(Turn::assistant("a\nb"));
        cache.sync(&all, 80);
        assert_eq!(cache.heights, vec![3, 3, 4]);
        assert_eq!(cache.total_height(), 10);
    }

    #[test]
    fn test_layout_width_change_remeasures() {
        let mut cache = LayoutCache::new();
        let all = vec![Turn::user("Hello world")];
        cache.sync(&all, 80);
        assert_eq!(cache.heights, vec![3]);

        // width 9 → content_width 5: wraps onto two lines
        cache.sync(&all, 9);
        assert_eq!(cache.heights, vec![4]);
        assert_eq!(cache.total_height(), 4);
    }

    #[test]
    fn test_visible_range_covers_viewport() {
        let mut cache = LayoutCache::new();
        cache.sync(&turns(20), 80); // 20 turns × 3 rows
        let range = cache.visible_range(30, 10);
        assert!(range.start <= 10);
        assert!(range.end > 13);
        assert!(range.end <= 20);
    }

    #[test]
    fn test_scroll_up_detaches_and_end_reattaches() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_render_shows_turns_and_indicator() {
        let backend = TestBackend::new(50, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();
        let all = vec![Turn::user("tengo dolor de cabeza")];

        terminal
            .draw(|f| {
                let area = f.area();
                MessageList::new(&mut state, &all, true, 0, "The agent is thinking...")
                    .render(f, area);
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("tengo dolor de cabeza"));
        assert!(text.contains("The agent is thinking..."));
    }

    #[test]
    fn test_render_without_busy_has_no_indicator() {
        let backend = TestBackend::new(50, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();
        let all = vec![Turn::user("q"), Turn::assistant("a")];

        terminal
            .draw(|f| {
                let area = f.area();
                MessageList::new(&mut state, &all, false, 0, "thinking")
                    .render(f, area);
            })
            .unwrap();

        assert!(!screen_text(&terminal).contains("thinking"));
        assert!(!state.has_unseen_content);
    }

    #[test]
    fn test_sticky_bottom_follows_new_turns() {
        let backend = TestBackend::new(40, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();
        let all = turns(10);

        terminal
            .draw(|f| {
                let area = f.area();
                MessageList::new(&mut state, &all, false, 0, "").render(f, area);
            })
            .unwrap();

        assert!(screen_text(&terminal).contains("turn 9"));
        assert!(!state.has_unseen_content);
    }
}
