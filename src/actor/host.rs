use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layout_engine::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "view#{}", self.0) }
}

/// The editor window the panes live in.
///
/// Group `g` is the pane described by `layout().cells[g]`. Views are tabs;
/// their order within a group is the tab order.
pub trait PaneHost {
    fn layout(&self) -> Grid;

    /// Replaces the layout. Groups beyond the new cell count are dropped and
    /// their views end up in the last remaining group; focus may move.
    fn set_layout(&mut self, grid: &Grid);

    fn active_group(&self) -> usize;
    fn focus_group(&mut self, group: usize);

    fn views_in_group(&self, group: usize) -> Vec<ViewId>;
    fn active_view(&self) -> Option<ViewId>;
    fn active_view_in_group(&self, group: usize) -> Option<ViewId>;

    /// Group and tab position of `view`.
    fn view_index(&self, view: ViewId) -> Option<(usize, usize)>;
    /// Moves `view` to `index` in `group`, clamped to the end of the tabs.
    fn set_view_index(&mut self, view: ViewId, group: usize, index: usize);

    fn focus_view(&mut self, view: ViewId);
    fn close_view(&mut self, view: ViewId);

    /// Opens a second view on the same buffer in the group of `view`, right
    /// after it, and focuses it.
    fn clone_view(&mut self, view: ViewId) -> Option<ViewId>;

    /// Empty, unnamed and unsaved: the placeholder a fresh pane starts with.
    fn is_transient(&self, view: ViewId) -> bool;

    /// False while a previous layout change is still being applied.
    fn layout_settled(&self) -> bool { true }

    /// One scheduler tick.
    fn wait(&mut self, _interval: Duration) {}
}
