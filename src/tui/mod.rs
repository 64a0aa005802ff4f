//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! turns key presses into calls on the [`TurnController`].
//!
//! This is the only module that knows about ratatui and crossterm. It
//! never mutates the session: it mirrors the conversation from the
//! [`ChatEvent`]s the session publishes.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (request in flight): draws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on input, resize or a
//!   session event.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::agent::{AgentClient, HttpAgentClient};
use crate::core::config::ResolvedConfig;
use crate::core::controller::{SubmitOutcome, TurnController};
use crate::core::conversation::Turn;
use crate::core::session::{ChatEvent, Session, SessionId};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state, mirrored from session events.
pub(crate) struct TuiState {
    /// Turns as seen through `ChatEvent::TurnAppended`
    pub turns: Vec<Turn>,
    /// Last `ChatEvent::BusyChanged` value
    pub busy: bool,
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    // Static props
    pub session_id: SessionId,
    pub title: String,
    pub thinking_text: String,
    pub agent_label: String,
}

impl TuiState {
    pub fn new(
        session_id: SessionId,
        title: impl Into<String>,
        placeholder: impl Into<String>,
        thinking_text: impl Into<String>,
        agent_label: impl Into<String>,
    ) -> Self {
        Self {
            turns: Vec::new(),
            busy: false,
            message_list: MessageListState::new(),
            input_box: InputBox::new(placeholder),
            session_id,
            title: title.into(),
            thinking_text: thinking_text.into(),
            agent_label: agent_label.into(),
        }
    }

    /// Fold one session event into the mirrored state.
    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::TurnAppended(turn) => {
                self.turns.push(turn);
                self.message_list.scroll_to_latest();
            }
            ChatEvent::BusyChanged(busy) => {
                self.busy = busy;
                self.input_box.disabled = busy;
                // The thinking indicator adds a row; keep it in view
                if busy {
                    self.message_list.scroll_to_latest();
                }
            }
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable Kitty keyboard protocol unconditionally (allows Shift+Enter detection)
        // Detection via supports_keyboard_enhancement() fails in WSL, but the protocol
        // is harmlessly ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Hand a submitted prompt to the controller on a background task.
fn spawn_submit(controller: &TurnController, text: String) {
    let controller = controller.clone();
    tokio::spawn(async move {
        match controller.submit(&text).await {
            SubmitOutcome::Replied => debug!("Turn completed"),
            SubmitOutcome::Failed(e) => info!("Turn failed: {}", e),
            SubmitOutcome::Ignored(reason) => debug!("Submission ignored: {:?}", reason),
        }
    });
}

/// What the event loop must do after one terminal event.
#[derive(Debug, PartialEq)]
enum LoopAction {
    Continue,
    Quit,
    /// Hand this prompt to the controller.
    Submit(String),
}

/// Route one terminal event to the component that owns it.
///
/// A submission marks the view busy at once, so a second Enter later in
/// the same batch is refused by the input box instead of racing the first
/// request. The flag is cleared again by `ChatEvent::BusyChanged(false)`.
fn dispatch_event(tui: &mut TuiState, event: &TuiEvent) -> LoopAction {
    match event {
        TuiEvent::Quit | TuiEvent::ForceQuit => LoopAction::Quit,
        TuiEvent::Resize => LoopAction::Continue,
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(event);
            LoopAction::Continue
        }
        _ => match tui.input_box.handle_event(event) {
            Some(InputEvent::Submit(text)) => {
                tui.busy = true;
                tui.input_box.disabled = true;
                LoopAction::Submit(text)
            }
            Some(InputEvent::ContentChanged) => LoopAction::Continue,
            // Up/Down at the edge of the input scroll the conversation
            None => {
                let fallback = match event {
                    TuiEvent::CursorUp => Some(TuiEvent::ScrollUp),
                    TuiEvent::CursorDown => Some(TuiEvent::ScrollDown),
                    _ => None,
                };
                if let Some(scroll) = fallback {
                    tui.message_list.handle_event(&scroll);
                }
                LoopAction::Continue
            }
        },
    }
}

/// Drain every pending session event. Returns true if anything arrived.
fn drain_session_events(tui: &mut TuiState, events: &Receiver<ChatEvent>) -> bool {
    let mut received = false;
    while let Ok(event) = events.try_recv() {
        debug!("Event loop received: {:?}", event);
        tui.apply(event);
        received = true;
    }
    received
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let agent = Arc::new(HttpAgentClient::new(config.endpoint_url.clone()));
    let session = Arc::new(Session::new());
    let events = session.subscribe();
    info!("Session {} talking to {}", session.id(), agent.endpoint());

    let mut tui = TuiState::new(
        session.id().clone(),
        config.title,
        config.placeholder,
        config.thinking_text,
        agent.label(),
    );
    let controller = TurnController::new(session, agent);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        if tui.busy {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Short when animating (~12fps), long when idle
        let timeout = if tui.busy {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match dispatch_event(&mut tui, &event) {
                LoopAction::Quit => {
                    should_quit = true;
                    break;
                }
                LoopAction::Submit(text) => spawn_submit(&controller, text),
                LoopAction::Continue => {}
            }
        }

        if should_quit {
            info!("Quit requested");
            break;
        }

        if drain_session_events(&mut tui, &events) {
            needs_redraw = true;
        }
    }

    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GatedAgent, ScriptedAgent, test_controller};
    use tokio_test::{assert_pending, assert_ready};

    fn state() -> TuiState {
        TuiState::new(SessionId::from("session-t"), "Agent Chat", "", "thinking", "host")
    }

    #[tokio::test]
    async fn mirrors_a_full_turn_from_session_events() {
        let controller = test_controller(ScriptedAgent::replying("Tome dos aspirinas"));
        let events = controller.session().subscribe();
        let mut tui = state();

        controller.submit("Tengo dolor de cabeza").await;
        assert!(drain_session_events(&mut tui, &events));

        assert!(!tui.busy);
        let contents: Vec<&str> = tui.turns.iter().map(|t| t.content()).collect();
        assert_eq!(contents, ["Tengo dolor de cabeza", "Tome dos aspirinas"]);
        assert_eq!(tui.turns, controller.session().turns());
        assert!(!drain_session_events(&mut tui, &events), "queue drained");
    }

    #[test]
    fn new_turns_repin_the_view_to_the_bottom() {
        let mut tui = state();
        tui.message_list.stick_to_bottom = false;

        tui.apply(ChatEvent::TurnAppended(Turn::user("hola")));
        assert!(tui.message_list.stick_to_bottom);
    }

    fn dispatch_all(tui: &mut TuiState, events: &[TuiEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match dispatch_event(tui, event) {
                LoopAction::Submit(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn second_submit_in_one_batch_is_held_back() {
        let mut tui = state();
        let batch = [
            TuiEvent::InputChar('a'),
            TuiEvent::Submit,
            TuiEvent::InputChar('b'),
            TuiEvent::Submit,
        ];

        assert_eq!(dispatch_all(&mut tui, &batch), vec!["a".to_string()]);
        assert!(tui.busy);
        assert_eq!(tui.input_box.buffer, "b", "unsent text stays in the editor");
    }

    #[tokio::test]
    async fn held_back_prompt_is_sent_after_the_reply() {
        let agent = GatedAgent::new("reply");
        let controller = test_controller(agent.clone());
        let events = controller.session().subscribe();
        let mut tui = state();

        let sent = dispatch_all(
            &mut tui,
            &[
                TuiEvent::InputChar('a'),
                TuiEvent::Submit,
                TuiEvent::InputChar('b'),
                TuiEvent::Submit,
            ],
        );
        assert_eq!(sent, vec!["a".to_string()]);

        let mut first = tokio_test::task::spawn(controller.submit("a"));
        assert_pending!(first.poll());
        agent.release();
        assert_eq!(assert_ready!(first.poll()), SubmitOutcome::Replied);

        drain_session_events(&mut tui, &events);
        assert!(!tui.busy);
        assert!(!tui.input_box.disabled);

        assert_eq!(dispatch_all(&mut tui, &[TuiEvent::Submit]), vec!["b".to_string()]);
        assert!(tui.input_box.buffer.is_empty());
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut tui = state();
        assert_eq!(dispatch_event(&mut tui, &TuiEvent::Quit), LoopAction::Quit);
        assert_eq!(dispatch_event(&mut tui, &TuiEvent::ForceQuit), LoopAction::Quit);
    }

    #[test]
    fn busy_flag_follows_events() {
        let mut tui = state();
        tui.apply(ChatEvent::BusyChanged(true));
        assert!(tui.busy);
        tui.apply(ChatEvent::BusyChanged(false));
        assert!(!tui.busy);
    }
}
