//! Chat session controller and its inactivity timer.

mod controller;
mod timer;

#[cfg(test)]
mod testing;

pub use controller::{ChatSession, ClearOutcome, SendOutcome};
pub use timer::InactivityTimer;
