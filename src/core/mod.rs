//! # Core Application Logic
//!
//! This module contains Parley's session logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (state)      │
//!                    │  • Conversation (turns) │
//!                    │  • TurnController       │
//!                    │                         │
//!                    │  No terminal I/O.       │
//!                    └───────────┬─────────────┘
//!                                │ ChatEvent
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │   Agent    │
//!     │  Adapter   │                          │   Client   │
//!     │ (ratatui)  │                          │ (reqwest)  │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`conversation`]: `Turn`, `Role` and the append-only `Conversation`
//! - [`session`]: `Session`, `SessionId` and `ChatEvent` notifications
//! - [`controller`]: `TurnController::submit`, the request/response cycle
//! - [`config`]: layered configuration resolved once at startup

pub mod config;
pub mod controller;
pub mod conversation;
pub mod session;
