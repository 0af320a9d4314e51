use std::time::Duration;

use super::PaneController;
use crate::actor::host::{PaneHost, ViewId};
use crate::actor::scratch::ScratchHost;
use crate::common::config::Settings;
use crate::layout_engine::{Grid, LayoutStore};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetLayout(Grid),
    FocusGroup(usize),
    CloseView(ViewId),
    Wait(Duration),
}

/// A scratch window that records what the controller asked of it and can
/// pretend to be slow at applying layouts.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub inner: ScratchHost,
    pub calls: Vec<Call>,
    /// How many `layout_settled` checks fail after each `set_layout`.
    pub unsettled_polls: u32,
    /// Mimic editors that jump to the first group on every layout change.
    pub reset_focus_on_layout: bool,
    pending: u32,
}

impl RecordingHost {
    pub fn layouts_applied(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::SetLayout(_))).count()
    }

    pub fn waits(&self) -> usize { self.calls.iter().filter(|c| matches!(c, Call::Wait(_))).count() }
}

impl PaneHost for RecordingHost {
    fn layout(&self) -> Grid { self.inner.layout() }

    fn set_layout(&mut self, grid: &Grid) {
        self.calls.push(Call::SetLayout(grid.clone()));
        self.inner.set_layout(grid);
        self.pending = self.unsettled_polls;
        if self.reset_focus_on_layout {
            self.inner.focus_group(0);
        }
    }

    fn active_group(&self) -> usize { self.inner.active_group() }

    fn focus_group(&mut self, group: usize) {
        self.calls.push(Call::FocusGroup(group));
        self.inner.focus_group(group);
    }

    fn views_in_group(&self, group: usize) -> Vec<ViewId> { self.inner.views_in_group(group) }

    fn active_view(&self) -> Option<ViewId> { self.inner.active_view() }

    fn active_view_in_group(&self, group: usize) -> Option<ViewId> {
        self.inner.active_view_in_group(group)
    }

    fn view_index(&self, view: ViewId) -> Option<(usize, usize)> { self.inner.view_index(view) }

    fn set_view_index(&mut self, view: ViewId, group: usize, index: usize) {
        self.inner.set_view_index(view, group, index);
    }

    fn focus_view(&mut self, view: ViewId) { self.inner.focus_view(view) }

    fn close_view(&mut self, view: ViewId) {
        self.calls.push(Call::CloseView(view));
        self.inner.close_view(view);
    }

    fn clone_view(&mut self, view: ViewId) -> Option<ViewId> { self.inner.clone_view(view) }

    fn is_transient(&self, view: ViewId) -> bool { self.inner.is_transient(view) }

    fn layout_settled(&self) -> bool { self.pending == 0 }

    fn wait(&mut self, interval: Duration) {
        self.calls.push(Call::Wait(interval));
        self.pending = self.pending.saturating_sub(1);
    }
}

pub fn controller_with(settings: Settings) -> PaneController<RecordingHost> {
    PaneController::new(RecordingHost::default(), settings, LayoutStore::default())
}

pub fn controller() -> PaneController<RecordingHost> { controller_with(Settings::default()) }

pub fn assert_lines(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
    }
}
