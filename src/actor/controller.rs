use tracing::{debug, error, info, instrument, warn};

use super::command::{EventResponse, PaneCommand, PaneEvent};
use super::host::{PaneHost, ViewId};
use super::state::WindowState;
use crate::common::config::Settings;
use crate::layout_engine::{
    Axis, DestroyTarget, Direction, Grid, LayoutError, LayoutStore, Merge, ResizeMode,
    ResizeSession, adjustable_lines, best_neighbor_index, destroy, destroy_self, resize, split,
};

#[cfg(test)]
mod testing;

/// Where focus goes after a layout change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FocusPolicy {
    /// Leave focus wherever the host put it.
    Keep,
    /// Re-focus the group that was active before, clamped to the new count.
    Restore,
    Group(usize),
}

/// Drives one window: turns pane commands and host events into grid
/// operations and applies the results to the host.
pub struct PaneController<H: PaneHost> {
    host: H,
    state: WindowState,
    settings: Settings,
    layouts: LayoutStore,
    resize: Option<ResizeSession>,
    last_activated: Option<usize>,
    response: EventResponse,
}

impl<H: PaneHost> PaneController<H> {
    pub fn new(host: H, settings: Settings, layouts: LayoutStore) -> Self {
        PaneController {
            host,
            state: WindowState::default(),
            settings,
            layouts,
            resize: None,
            last_activated: None,
            response: EventResponse::default(),
        }
    }

    pub fn with_state(mut self, state: WindowState) -> Self {
        self.state = state;
        self
    }

    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    pub fn state(&self) -> &WindowState { &self.state }

    pub fn layouts(&self) -> &LayoutStore { &self.layouts }

    pub fn resize_session(&self) -> Option<&ResizeSession> { self.resize.as_ref() }

    pub fn into_parts(self) -> (H, WindowState, LayoutStore) { (self.host, self.state, self.layouts) }

    #[instrument(name = "controller::handle_command", skip(self))]
    pub fn handle_command(&mut self, command: PaneCommand) -> Result<EventResponse, LayoutError> {
        let grid = self.host.layout();
        if grid.validate().is_ok() {
            debug!("Grid:\n{}", grid.draw_tree(Some(self.host.active_group())).trim());
        }
        self.response = EventResponse::default();
        let result = self.dispatch(command);
        self.finish(result)
    }

    #[instrument(name = "controller::handle_event", skip(self))]
    pub fn handle_event(&mut self, event: PaneEvent) -> Result<EventResponse, LayoutError> {
        self.response = EventResponse::default();
        let result = match event {
            PaneEvent::ViewClosing(view) => self.on_view_closing(view),
            PaneEvent::GroupActivated(group) => self.on_group_activated(group),
        };
        self.finish(result)
    }

    fn finish(&mut self, result: Result<(), LayoutError>) -> Result<EventResponse, LayoutError> {
        let response = std::mem::take(&mut self.response);
        match result {
            Ok(()) => {
                if response.is_noop() {
                    debug!("nothing to do");
                }
                Ok(response)
            }
            Err(e) => {
                if e.is_recoverable() {
                    warn!("{e}");
                } else {
                    error!("{e}");
                }
                Err(e)
            }
        }
    }

    fn dispatch(&mut self, command: PaneCommand) -> Result<(), LayoutError> {
        match command {
            PaneCommand::Travel { direction, create_new_if_necessary } => {
                self.travel(direction, create_new_if_necessary)
            }
            PaneCommand::CarryFile { direction, create_new_if_necessary } => {
                self.carry_file(direction, create_new_if_necessary)
            }
            PaneCommand::CloneFile { direction, create_new_if_necessary } => {
                self.clone_file(direction, create_new_if_necessary)
            }
            PaneCommand::CreatePane { direction, give_focus } => {
                self.create_pane(direction, give_focus).map(|_| ())
            }
            PaneCommand::CreatePaneWithFile { direction } => self.create_pane_with_file(direction),
            PaneCommand::CreatePaneWithClonedFile { direction } => {
                self.create_pane_with_cloned_file(direction)
            }
            PaneCommand::DestroyPane { direction } => self.destroy_pane(direction),
            PaneCommand::PullFileFromPane { direction } => self.pull_file(direction),
            PaneCommand::MoveToGroup { group } => self.move_to_group(group),
            PaneCommand::Resize { orientation, mode, values } => {
                self.resize(orientation, mode, &values)
            }
            PaneCommand::BeginResize { orientation, mode } => self.begin_resize(orientation, mode),
            PaneCommand::PreviewResize { values } => self.preview_resize(&values),
            PaneCommand::CommitResize { values } => self.commit_resize(&values),
            PaneCommand::CancelResize => self.cancel_resize(),
            PaneCommand::Reorder { target, leave_files_at_position } => {
                self.reorder(target, leave_files_at_position)
            }
            PaneCommand::Zoom { fraction } => {
                let fraction = fraction.unwrap_or(self.settings.default_zoom_fraction);
                self.zoom(fraction, false)
            }
            PaneCommand::Unzoom => self.unzoom(),
            PaneCommand::ToggleZoom { fraction } => self.toggle_zoom(fraction),
            PaneCommand::SaveLayout { name, overwrite } => self.save_layout(&name, overwrite),
            PaneCommand::RestoreLayout { name } => self.restore_layout(&name),
            PaneCommand::RemoveLayout { name } => self.remove_layout(&name),
        }
    }

    /// The host's grid and active group, checked for consistency.
    fn current(&self) -> Result<(Grid, usize), LayoutError> {
        let grid = self.host.layout();
        grid.validate()?;
        let active = self.host.active_group();
        grid.cell(active)?;
        Ok((grid, active))
    }

    fn neighbor(&self, direction: Direction) -> Result<Option<usize>, LayoutError> {
        let (grid, active) = self.current()?;
        let current = grid.cells[active];
        Ok(best_neighbor_index(&grid.cells, &grid.rows, &grid.cols, &current, direction))
    }

    fn apply_layout(&mut self, grid: &Grid, focus: FocusPolicy) {
        let previous = self.host.active_group();
        self.state.begin_apply();
        self.host.set_layout(grid);
        let group = match focus {
            FocusPolicy::Keep => None,
            FocusPolicy::Restore => Some(previous.min(grid.len().saturating_sub(1))),
            FocusPolicy::Group(group) => Some(group),
        };
        if let Some(group) = group {
            self.host.focus_group(group);
            self.response.focus_group = Some(group);
        }
        self.state.finish_apply();
        self.response.layout_changed = true;
        debug!(panes = grid.len(), ?focus, "applied layout");
    }

    fn focus_group(&mut self, group: usize) {
        self.host.focus_group(group);
        self.response.focus_group = Some(group);
    }

    /// Appends `view` to `group` and focuses it.
    fn move_view_to(&mut self, view: ViewId, group: usize) {
        let end = self.host.views_in_group(group).len();
        self.host.set_view_index(view, group, end);
        self.host.focus_view(view);
        self.response.focus_group = Some(group);
    }

    /// Moves every view of `from` to the end of `to`. If `to` had no selected
    /// view, it selects the one `from` had.
    fn transfer_views(&mut self, from: usize, to: usize) {
        let selected = self.host.active_view_in_group(from);
        let keep_selection = self.host.active_view_in_group(to).is_none();
        for view in self.host.views_in_group(from) {
            let end = self.host.views_in_group(to).len();
            self.host.set_view_index(view, to, end);
        }
        if let (true, Some(view)) = (keep_selection, selected) {
            self.host.focus_view(view);
        }
    }

    fn ensure_unzoomed(&mut self) -> Result<(), LayoutError> {
        if !self.state.is_zoomed() {
            return Ok(());
        }
        self.unzoom()?;
        let attempts = self.settings.retry.poll(&mut self.host, |h| h.layout_settled(), |h, i| h.wait(i))?;
        debug!(attempts, "layout settled after unzoom");
        Ok(())
    }

    fn rezoom_after(&mut self, fraction: Option<f64>, unzoom_setting: bool) -> Result<(), LayoutError> {
        match fraction {
            Some(fraction) if !unzoom_setting => self.zoom(fraction, false),
            _ => Ok(()),
        }
    }

    fn travel(&mut self, direction: Direction, create: Option<bool>) -> Result<(), LayoutError> {
        let create = create.unwrap_or(self.settings.create_new_pane_if_necessary);
        match self.neighbor(direction)? {
            Some(group) => {
                self.focus_group(group);
                Ok(())
            }
            None if create => self.create_pane(direction, true).map(|_| ()),
            None => {
                debug!(?direction, "no pane to travel to");
                Ok(())
            }
        }
    }

    fn carry_file(&mut self, direction: Direction, create: Option<bool>) -> Result<(), LayoutError> {
        let Some(view) = self.host.active_view() else {
            debug!("no active view to carry");
            return Ok(());
        };
        let source = self.host.active_group();
        self.travel(direction, create)?;
        let target = self.host.active_group();
        if target != source {
            self.move_view_to(view, target);
        }
        Ok(())
    }

    fn clone_file(&mut self, direction: Direction, create: Option<bool>) -> Result<(), LayoutError> {
        let create = create.unwrap_or(self.settings.create_new_pane_if_necessary);
        if !create && self.neighbor(direction)?.is_none() {
            debug!(?direction, "no pane to clone into");
            return Ok(());
        }
        let Some(view) = self.host.active_view() else {
            debug!("no active view to clone");
            return Ok(());
        };
        let Some((group, index)) = self.host.view_index(view) else { return Ok(()) };
        let Some(clone) = self.host.clone_view(view) else { return Ok(()) };
        // With the clone in front of the original, focus falls back to the
        // original once the clone leaves.
        self.host.set_view_index(clone, group, index);
        self.host.focus_view(clone);
        self.carry_file(direction, Some(create))
    }

    /// Splits the active pane. Returns the index of the new pane.
    fn create_pane(&mut self, direction: Direction, give_focus: bool) -> Result<Option<usize>, LayoutError> {
        let zoom = self.state.zoom_fraction();
        self.ensure_unzoomed()?;
        let created = self.create_pane_now(direction, give_focus || zoom.is_some())?;
        self.rezoom_after(zoom, self.settings.unzoom_after_creating_pane)?;
        Ok(created)
    }

    fn create_pane_now(&mut self, direction: Direction, give_focus: bool) -> Result<Option<usize>, LayoutError> {
        let (grid, active) = self.current()?;
        let Some(split) = split(&grid, active, direction)? else {
            debug!(active, ?direction, "pane too small to split");
            return Ok(None);
        };
        let focus = if give_focus { FocusPolicy::Group(split.created) } else { FocusPolicy::Restore };
        self.apply_layout(&split.grid, focus);
        info!(group = active, created = split.created, ?direction, "created pane");
        Ok(Some(split.created))
    }

    fn create_pane_with_file(&mut self, direction: Direction) -> Result<(), LayoutError> {
        let view = self.host.active_view();
        let Some(created) = self.create_pane(direction, false)? else { return Ok(()) };
        if let Some(view) = view {
            self.move_view_to(view, created);
        }
        Ok(())
    }

    fn create_pane_with_cloned_file(&mut self, direction: Direction) -> Result<(), LayoutError> {
        let view = self.host.active_view();
        let Some(created) = self.create_pane(direction, false)? else { return Ok(()) };
        let Some(view) = view else { return Ok(()) };
        let Some((group, index)) = self.host.view_index(view) else { return Ok(()) };
        if let Some(clone) = self.host.clone_view(view) {
            self.host.set_view_index(clone, group, index);
            self.move_view_to(clone, created);
        }
        Ok(())
    }

    fn destroy_pane(&mut self, target: DestroyTarget) -> Result<(), LayoutError> {
        let zoom = self.state.zoom_fraction();
        self.ensure_unzoomed()?;
        let (grid, active) = self.current()?;
        let merge = match target.direction() {
            Some(direction) => destroy(&grid, active, direction)?,
            None => destroy_self(&grid, active)?,
        };
        match merge {
            Some(merge) => self.apply_merge(merge),
            None => debug!(active, %target, "no pane to destroy"),
        }
        self.rezoom_after(zoom, self.settings.unzoom_after_closing_pane)
    }

    /// Empties the removed group before the host drops it: placeholders are
    /// closed, other views join the survivor and later groups shift down so
    /// every view stays with its pane.
    fn apply_merge(&mut self, merge: Merge) {
        let Merge { grid, removed, survivor, active } = merge;
        let group_count = self.host.layout().len();

        for view in self.host.views_in_group(removed) {
            if self.host.is_transient(view) {
                self.host.close_view(view);
            }
        }
        self.transfer_views(removed, survivor);
        for group in removed + 1..group_count {
            self.transfer_views(group, group - 1);
        }

        self.apply_layout(&grid, FocusPolicy::Group(active));
        info!(removed, survivor, "destroyed pane");
    }

    fn pull_file(&mut self, direction: Direction) -> Result<(), LayoutError> {
        let Some(neighbor) = self.neighbor(direction)? else {
            debug!(?direction, "no pane to pull from");
            return Ok(());
        };
        let Some(view) = self.host.active_view_in_group(neighbor) else {
            debug!(neighbor, "neighbor has no view");
            return Ok(());
        };
        let active = self.host.active_group();
        let end = self.host.views_in_group(active).len();
        self.host.set_view_index(view, active, end);
        Ok(())
    }

    fn move_to_group(&mut self, group: usize) -> Result<(), LayoutError> {
        let count = self.host.layout().len();
        if group >= count {
            return Err(LayoutError::InvalidGroup { group, count });
        }
        let Some(view) = self.host.active_view() else {
            debug!("no active view to move");
            return Ok(());
        };
        self.move_view_to(view, group);
        Ok(())
    }

    fn resize(&mut self, axis: Axis, mode: ResizeMode, values: &[f64]) -> Result<(), LayoutError> {
        let (grid, active) = self.current()?;
        let indices = adjustable_lines(&grid, active, axis, mode)?;
        let next = resize(&grid, axis, &indices, values)?;
        self.apply_layout(&next, FocusPolicy::Restore);
        Ok(())
    }

    fn begin_resize(&mut self, axis: Axis, mode: ResizeMode) -> Result<(), LayoutError> {
        let (grid, active) = self.current()?;
        let session = ResizeSession::begin(&grid, active, axis, mode)?;
        self.response.prompt = Some(session.current_text());
        self.resize = Some(session);
        Ok(())
    }

    fn session(&self) -> Result<&ResizeSession, LayoutError> {
        self.resize
            .as_ref()
            .ok_or_else(|| LayoutError::InvalidResizeInput("no resize in progress".to_string()))
    }

    fn preview_resize(&mut self, text: &str) -> Result<(), LayoutError> {
        let grid = self.session()?.apply_text(text)?;
        self.apply_layout(&grid, FocusPolicy::Keep);
        Ok(())
    }

    fn commit_resize(&mut self, text: &str) -> Result<(), LayoutError> {
        self.session()?;
        let Some(session) = self.resize.take() else { return Ok(()) };
        match session.apply_text(text) {
            Ok(grid) => {
                self.apply_layout(&grid, FocusPolicy::Restore);
                Ok(())
            }
            Err(e) => {
                self.apply_layout(&session.cancel(), FocusPolicy::Restore);
                Err(e)
            }
        }
    }

    fn cancel_resize(&mut self) -> Result<(), LayoutError> {
        if let Some(session) = self.resize.take() {
            self.apply_layout(&session.cancel(), FocusPolicy::Restore);
        }
        Ok(())
    }

    fn reorder(&mut self, target: usize, leave_files_at_position: bool) -> Result<(), LayoutError> {
        let (grid, active) = self.current()?;
        if target >= grid.len() || target == active {
            debug!(active, target, "nothing to reorder");
            return Ok(());
        }
        let next = grid.swapped(active, target)?;
        if leave_files_at_position {
            let mine = self.host.views_in_group(active);
            let theirs = self.host.views_in_group(target);
            let (my_selection, their_selection) =
                (self.host.active_view_in_group(active), self.host.active_view_in_group(target));
            for (position, view) in mine.into_iter().enumerate() {
                self.host.set_view_index(view, target, position);
            }
            for (position, view) in theirs.into_iter().enumerate() {
                self.host.set_view_index(view, active, position);
            }
            for view in [my_selection, their_selection].into_iter().flatten() {
                self.host.focus_view(view);
            }
        }
        self.host.focus_group(active);
        self.apply_layout(&next, FocusPolicy::Restore);
        Ok(())
    }

    fn zoom(&mut self, fraction: f64, rezoom: bool) -> Result<(), LayoutError> {
        let grid = self.host.layout();
        let active = self.host.active_group();
        match self.state.zoom(&grid, active, fraction, rezoom) {
            Ok(next) => {
                self.apply_layout(&next, FocusPolicy::Restore);
                info!(active, fraction, "zoomed pane");
                Ok(())
            }
            Err(LayoutError::AlreadyZoomed) => {
                self.unzoom()?;
                Err(LayoutError::AlreadyZoomed)
            }
            Err(e) => Err(e),
        }
    }

    fn unzoom(&mut self) -> Result<(), LayoutError> {
        let grid = self.host.layout();
        let next = self.state.unzoom(&grid, self.settings.remember_panes_layout)?;
        self.apply_layout(&next, FocusPolicy::Restore);
        info!("unzoomed");
        Ok(())
    }

    fn toggle_zoom(&mut self, fraction: Option<f64>) -> Result<(), LayoutError> {
        if self.state.is_zoomed() {
            return self.unzoom();
        }
        let panes = self.host.layout().len();
        if panes < 2 {
            warn!(panes, "cannot zoom a window with a single pane");
            return Ok(());
        }
        self.zoom(fraction.unwrap_or(self.settings.default_zoom_fraction), false)
    }

    fn save_layout(&mut self, name: &str, overwrite: bool) -> Result<(), LayoutError> {
        // Zoom is transient; save what the window returns to.
        let grid = match self.state.original() {
            Some(original) => original.clone(),
            None => self.host.layout(),
        };
        grid.validate()?;
        self.layouts.save(name, &grid, overwrite)?;
        self.response.layouts_changed = true;
        info!(name, "saved layout");
        Ok(())
    }

    fn restore_layout(&mut self, name: &str) -> Result<(), LayoutError> {
        let grid = self.layouts.get(name)?.grid();
        grid.validate()?;
        self.state = WindowState::Normal;
        self.resize = None;
        self.apply_layout(&grid, FocusPolicy::Restore);
        info!(name, "restored layout");
        Ok(())
    }

    fn remove_layout(&mut self, name: &str) -> Result<(), LayoutError> {
        self.layouts.remove(name)?;
        self.response.layouts_changed = true;
        info!(name, "removed layout");
        Ok(())
    }

    fn on_view_closing(&mut self, view: ViewId) -> Result<(), LayoutError> {
        if !self.settings.auto_close_empty_panes || self.host.is_transient(view) {
            return Ok(());
        }
        let Some((group, _)) = self.host.view_index(view) else { return Ok(()) };
        if self.host.views_in_group(group).len() > 1 {
            return Ok(());
        }
        debug!(%view, group, "last view closing, closing its pane");
        if group != self.host.active_group() {
            self.focus_group(group);
        }
        self.destroy_pane(DestroyTarget::Current)
    }

    fn on_group_activated(&mut self, group: usize) -> Result<(), LayoutError> {
        if self.state.is_applying_layout() {
            return Ok(());
        }
        let default = self.settings.default_zoom_fraction;
        let Some(fraction) = self.settings.auto_zoom_on_focus.fraction(default) else {
            return Ok(());
        };
        if self.last_activated == Some(group) {
            return Ok(());
        }
        self.last_activated = Some(group);
        if self.host.layout().len() < 2 {
            return Ok(());
        }
        self.host.focus_group(group);
        self.zoom(fraction, true)
    }
}
