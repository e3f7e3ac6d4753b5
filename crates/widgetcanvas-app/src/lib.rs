//! WidgetCanvas replay shell
//!
//! Drives the canvas core from a scene fixture and a scripted session, and
//! reports what the canvas would show after each step.

mod replay;
mod session;

pub use replay::{Frame, Replay, ReplayError};
pub use session::{SessionError, SessionEvent, load_session, parse_session};
