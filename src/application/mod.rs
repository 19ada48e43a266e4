//! Application layer managing session state and user workflows.
//!
//! This module sits between the domain layer and the terminal front-end:
//! the session and its transitions, editable form buffers, and the
//! interactive state the UI renders.

pub mod session;
pub mod editor;
pub mod state;

pub use session::*;
pub use editor::*;
pub use state::*;
