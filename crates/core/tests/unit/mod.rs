//! # Component Tests
//!
//! One module per component of the library, plus cross-cutting thread-scoping checks.

/// IEEE-754 category classification.
pub mod classify;


/// Sticky flags: test, clear, raise, save/restore, traps.
pub mod exceptions;

/// `nextafter`, `next_up`, `next_down`.
pub mod next_after;


/// Per-thread isolation of the environment.
pub mod threads;
