//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from borrowed state:
//! - `TitleBar`: title, agent host, status and the "↓ New" indicator
//! - `LandingPage`: welcome screen while the conversation is empty
//! - `Message`: a single turn
//!
//! ### Stateful Components (Event-Driven)
//!
//! Own local state and emit events:
//! - `InputBox`: multi-line prompt editor
//! - `MessageList`: scrollable conversation view with layout caching
//!
//! Each component file holds its state, event types, rendering and tests.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs     (Top status bar)
//! ├── landing.rs       (Empty-conversation screen)
//! ├── message.rs       (Single turn renderer)
//! ├── message_list.rs  (Scrollable turn container)
//! └── input_box/       (Prompt editor)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub use input_box::{InputBox, InputEvent};
pub mod landing;
pub use landing::LandingPage;
pub mod message;
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
