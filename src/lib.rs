//! Grid-based pane layouts for editor windows: split, merge, resize and zoom
//! panes, and keep every open view attached to the pane it belongs to.

pub mod actor;
pub mod common;
pub mod layout_engine;
