use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::reindex::permute;
use super::{Axis, Grid, LayoutError};

/// Which boundary lines a resize may move, relative to the active pane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ResizeMode {
    /// The line where the active pane starts.
    Before,
    /// The line where the active pane ends.
    After,
    /// Both lines bounding the active pane.
    #[default]
    Nearest,
    /// Lines of every pane that sits beside the active one.
    Relevant,
    /// Every internal line.
    All,
}

/// Internal line indices on `axis` that `mode` makes adjustable, sorted.
/// The outer lines at 0.0 and 1.0 are never included.
pub fn adjustable_lines(
    grid: &Grid,
    active: usize,
    axis: Axis,
    mode: ResizeMode,
) -> Result<Vec<usize>, LayoutError> {
    let current = grid.cell(active)?;
    let (start, end) = current.span(axis);
    let mut lines = BTreeSet::new();
    match mode {
        ResizeMode::Before => {
            lines.insert(start);
        }
        ResizeMode::After => {
            lines.insert(end);
        }
        ResizeMode::Nearest => {
            lines.extend([start, end]);
        }
        ResizeMode::Relevant => {
            let (lo, hi) = current.span(axis.cross());
            for cell in &grid.cells {
                let (cell_lo, cell_hi) = cell.span(axis.cross());
                if lo >= cell_hi || cell_lo >= hi {
                    continue;
                }
                lines.extend([cell.start(axis), cell.end(axis)]);
            }
        }
        ResizeMode::All => lines.extend(0..grid.lines(axis).len()),
    }
    let last = grid.lines(axis).len().saturating_sub(1);
    lines.remove(&0);
    lines.remove(&last);
    Ok(lines.into_iter().collect())
}

/// Moves the lines at `indices` on `axis` to `values`.
///
/// Lines may cross each other: the line array is re-sorted and every cell
/// reference is carried through the resulting permutation. Values outside
/// `0.0..=1.0`, or moves that leave two lines at the same position, reject the
/// whole update.
pub fn resize(
    grid: &Grid,
    axis: Axis,
    indices: &[usize],
    values: &[f64],
) -> Result<Grid, LayoutError> {
    if indices.len() != values.len() {
        return Err(LayoutError::InvalidResizeInput(format!(
            "expected {} values, got {}",
            indices.len(),
            values.len()
        )));
    }
    if let Some(value) = values.iter().find(|v| !(**v >= 0.0 && **v <= 1.0)) {
        warn!(?axis, value, "rejecting resize outside the window");
        return Err(LayoutError::InvalidResizeInput(format!(
            "{value} is outside 0.0..=1.0"
        )));
    }

    let mut lines = grid.lines(axis).to_vec();
    for (&index, &value) in indices.iter().zip(values) {
        let Some(line) = lines.get_mut(index) else {
            return Err(LayoutError::InvalidResizeInput(format!(
                "{axis} has no line {index}"
            )));
        };
        *line = value;
    }

    // Stable, so a moved line keeps its place among lines at the same value.
    let mut order: Vec<usize> = (0..lines.len()).collect();
    order.sort_by(|&a, &b| lines[a].total_cmp(&lines[b]));
    let mut new_index = vec![0; lines.len()];
    for (new, &old) in order.iter().enumerate() {
        new_index[old] = new;
    }

    let mut next = grid.clone();
    *next.lines_mut(axis) = order.iter().map(|&old| lines[old]).collect();
    next.cells = permute(&grid.cells, axis, &new_index);

    if let Some(i) = next.cells.iter().position(|c| {
        let (start, end) = c.span(axis);
        start > end
    }) {
        warn!(?axis, pane = i, "resize would turn a pane inside out");
        return Err(LayoutError::InvalidResizeInput(format!(
            "moving these lines would invert pane {i}"
        )));
    }

    if let Some(i) = next.lines(axis).windows(2).position(|w| !(w[0] < w[1])) {
        warn!(?axis, line = i + 1, "resize would collapse a pane");
        return Err(LayoutError::InvalidResizeInput(format!(
            "moving these lines would put {axis} line {} on line {i}",
            i + 1
        )));
    }

    debug!(?axis, ?indices, ?values, "resized lines");
    Ok(next)
}

/// An interactive resize: the lines picked when it began, and the layout to
/// return to if it is cancelled.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeSession {
    axis: Axis,
    indices: Vec<usize>,
    original: Grid,
}

impl ResizeSession {
    pub fn begin(
        grid: &Grid,
        active: usize,
        axis: Axis,
        mode: ResizeMode,
    ) -> Result<Self, LayoutError> {
        grid.validate()?;
        let indices = adjustable_lines(grid, active, axis, mode)?;
        Ok(ResizeSession { axis, indices, original: grid.clone() })
    }

    pub fn axis(&self) -> Axis { self.axis }

    pub fn indices(&self) -> &[usize] { &self.indices }

    pub fn original(&self) -> &Grid { &self.original }

    /// Current positions of the adjustable lines, as editable text.
    pub fn current_text(&self) -> String {
        let lines = self.original.lines(self.axis);
        self.indices.iter().map(|&i| lines[i].to_string()).collect::<Vec<_>>().join(", ")
    }

    pub fn parse_values(text: &str) -> Result<Vec<f64>, LayoutError> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|e| LayoutError::InvalidResizeInput(format!("'{s}': {e}")))
            })
            .collect()
    }

    pub fn apply(&self, values: &[f64]) -> Result<Grid, LayoutError> {
        resize(&self.original, self.axis, &self.indices, values)
    }

    pub fn apply_text(&self, text: &str) -> Result<Grid, LayoutError> {
        self.apply(&Self::parse_values(text)?)
    }

    pub fn cancel(&self) -> Grid { self.original.clone() }
}
