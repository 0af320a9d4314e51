//! Everything between a pane command and the editor window: the host trait,
//! per-window zoom state, and the controller that drives the grid engine.

pub mod command;
pub mod controller;
pub mod host;
pub mod retry;
pub mod scratch;
pub mod session;
pub mod state;
