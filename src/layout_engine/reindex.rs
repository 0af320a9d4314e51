//! Boundary-line insertion and removal, and the cell re-indexing that keeps
//! every pane pointing at the same coordinates afterwards.

use tracing::error;

use super::{Axis, Cell, Grid, LayoutError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEdit {
    /// A line was inserted at this index; indices at or above it move up.
    InsertAt(usize),
    /// The line at this index was removed; indices above it move down.
    RemoveAt(usize),
}

impl LineEdit {
    pub fn shift(self, index: usize) -> usize {
        match self {
            LineEdit::InsertAt(at) if index >= at => index + 1,
            LineEdit::RemoveAt(at) if index > at => index - 1,
            _ => index,
        }
    }
}

pub fn reindex(cells: &[Cell], axis: Axis, edit: LineEdit) -> Vec<Cell> {
    cells.iter().map(|c| c.map_axis(axis, |i| edit.shift(i))).collect()
}

/// Renumbers every reference on `axis` through `new_index[old]`.
pub fn permute(cells: &[Cell], axis: Axis, new_index: &[usize]) -> Vec<Cell> {
    cells.iter().map(|c| c.map_axis(axis, |i| new_index[i])).collect()
}

pub fn pull_up_after(cells: &[Cell], threshold: usize) -> Vec<Cell> {
    reindex(cells, Axis::Rows, LineEdit::RemoveAt(threshold))
}

pub fn push_down_after(cells: &[Cell], threshold: usize) -> Vec<Cell> {
    reindex(cells, Axis::Rows, LineEdit::InsertAt(threshold))
}

pub fn pull_left_after(cells: &[Cell], threshold: usize) -> Vec<Cell> {
    reindex(cells, Axis::Cols, LineEdit::RemoveAt(threshold))
}

pub fn push_right_after(cells: &[Cell], threshold: usize) -> Vec<Cell> {
    reindex(cells, Axis::Cols, LineEdit::InsertAt(threshold))
}

impl Grid {
    /// Inserts a boundary at index `at` on `axis` and shifts the cells so
    /// they keep covering the same area.
    pub fn insert_line(&mut self, axis: Axis, at: usize, value: f64) {
        self.lines_mut(axis).insert(at, value);
        self.cells = reindex(&self.cells, axis, LineEdit::InsertAt(at));
    }

    /// Removes the boundary at index `at` on `axis`. The line must no longer
    /// be referenced by any cell.
    pub fn remove_line(&mut self, axis: Axis, at: usize) -> Result<f64, LayoutError> {
        if let Some(i) = self.cells.iter().position(|c| c.references(axis, at)) {
            error!(?axis, at, pane = i, "removing a boundary line still in use");
            return Err(LayoutError::InvalidGrid(format!(
                "{axis} line {at} is still referenced by pane {i}"
            )));
        }
        let value = self.lines_mut(axis).remove(at);
        self.cells = reindex(&self.cells, axis, LineEdit::RemoveAt(at));
        Ok(value)
    }
}
