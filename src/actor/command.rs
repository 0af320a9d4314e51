use serde::{Deserialize, Serialize};

use super::host::ViewId;
use crate::layout_engine::{Axis, DestroyTarget, Direction, ResizeMode};

fn yes() -> bool { true }

#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaneCommand {
    /// Focus the neighbor in `direction`.
    Travel {
        direction: Direction,
        /// Overrides `create_new_pane_if_necessary`.
        #[serde(default)]
        create_new_if_necessary: Option<bool>,
    },
    /// Move the active view to the neighbor in `direction` and follow it.
    CarryFile {
        direction: Direction,
        #[serde(default)]
        create_new_if_necessary: Option<bool>,
    },
    /// Like `CarryFile`, but a clone goes and the original stays.
    CloneFile {
        direction: Direction,
        #[serde(default)]
        create_new_if_necessary: Option<bool>,
    },
    CreatePane {
        direction: Direction,
        #[serde(default)]
        give_focus: bool,
    },
    CreatePaneWithFile {
        direction: Direction,
    },
    CreatePaneWithClonedFile {
        direction: Direction,
    },
    DestroyPane {
        direction: DestroyTarget,
    },
    /// Bring the neighbor's active view into the active pane.
    PullFileFromPane {
        direction: Direction,
    },
    /// Move the active view to `group` and focus it.
    MoveToGroup {
        group: usize,
    },
    /// Set the lines `mode` selects to `values` in one go.
    Resize {
        orientation: Axis,
        #[serde(default)]
        mode: ResizeMode,
        values: Vec<f64>,
    },
    /// Start an interactive resize; the response prompt holds the current
    /// values as editable text.
    BeginResize {
        orientation: Axis,
        #[serde(default)]
        mode: ResizeMode,
    },
    PreviewResize {
        values: String,
    },
    CommitResize {
        values: String,
    },
    CancelResize,
    /// Swap the active pane with pane `target`.
    Reorder {
        target: usize,
        #[serde(default = "yes")]
        leave_files_at_position: bool,
    },
    Zoom {
        #[serde(default)]
        fraction: Option<f64>,
    },
    Unzoom,
    ToggleZoom {
        #[serde(default)]
        fraction: Option<f64>,
    },
    SaveLayout {
        name: String,
        #[serde(default)]
        overwrite: bool,
    },
    RestoreLayout {
        name: String,
    },
    RemoveLayout {
        name: String,
    },
}

/// Notifications from the host.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum PaneEvent {
    /// `view` is about to close.
    ViewClosing(ViewId),
    /// The user focused `group`.
    GroupActivated(usize),
}

#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    /// The host received a new layout.
    pub layout_changed: bool,
    /// The group focused once the command finished, if focus was touched.
    pub focus_group: Option<usize>,
    /// Saved layouts were added, replaced or removed and need persisting.
    pub layouts_changed: bool,
    /// Text to show in an input prompt.
    pub prompt: Option<String>,
}

impl EventResponse {
    pub fn is_noop(&self) -> bool { *self == EventResponse::default() }
}
