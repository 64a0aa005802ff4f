use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{LandingPage, MessageList, TitleBar};

pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    // Disable while a turn is in flight; the box title reflects it
    tui.input_box.disabled = tui.busy;
    let input_height = tui.input_box.calculate_height(frame.area().width);

    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    if tui.turns.is_empty() && !tui.busy {
        LandingPage::new(&tui.title, tui.session_id.as_str(), &tui.agent_label)
            .render(frame, main_area);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &tui.turns,
            tui.busy,
            spinner_frame,
            &tui.thinking_text,
        )
        .render(frame, main_area);
    }

    let status = if tui.busy { tui.thinking_text.as_str() } else { "" };
    TitleBar::new(
        tui.title.as_str(),
        status,
        tui.agent_label.as_str(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}
