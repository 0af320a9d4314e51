use tracing::debug;

use super::grid::EPSILON;
use super::{Direction, Grid, LayoutError};

#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    pub grid: Grid,
    /// Index of the pane that was split. It keeps its views and now covers
    /// the half facing away from `direction`.
    pub group: usize,
    /// Index of the new, empty pane lying in `direction` from `group`.
    pub created: usize,
}

/// Divides pane `group` in two along the axis of `direction` at the midpoint
/// of its span, reusing a boundary line already there or inserting one.
///
/// Returns `Ok(None)` when the span is too small to hold a distinct midpoint.
pub fn split(grid: &Grid, group: usize, direction: Direction) -> Result<Option<Split>, LayoutError> {
    grid.validate()?;
    let old = grid.cell(group)?;
    let axis = direction.axis();
    let (start, end) = old.span(axis);
    let (low, high) = grid.extent(&old, axis);
    let mid = (low + high) / 2.0;
    if !(low < mid && mid < high) {
        debug!(group, ?direction, low, high, "pane too small to split");
        return Ok(None);
    }

    let lines = grid.lines(axis);
    let mut next = grid.clone();
    next.cells.remove(group);
    let (near, far) = match (start + 1..end).find(|&k| (lines[k] - mid).abs() < EPSILON) {
        // A boundary of some other pane already crosses this one at its midpoint.
        Some(line) => (old.with_span(axis, start, line), old.with_span(axis, line, end)),
        None => {
            let at = (start + 1..end).find(|&k| lines[k] > mid).unwrap_or(end);
            next.insert_line(axis, at, mid);
            // The old far edge moved up by one.
            (old.with_span(axis, start, at), old.with_span(axis, at, end + 1))
        }
    };
    let (kept, created) = if direction.toward_start() { (far, near) } else { (near, far) };
    next.cells.insert(group, kept);
    next.cells.push(created);

    let created = next.cells.len() - 1;
    debug!(group, created, ?direction, "split pane");
    Ok(Some(Split { grid: next, group, created }))
}
