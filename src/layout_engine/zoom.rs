use super::{Axis, Grid, LayoutError};

pub const DEFAULT_ZOOM_FRACTION: f64 = 0.8;

/// Smallest share of an axis a zoom leaves any single track.
pub const MIN_TRACK: f64 = 0.01;

/// Clamps to `[0, 1]`. NaN falls back to [`DEFAULT_ZOOM_FRACTION`].
pub fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() { DEFAULT_ZOOM_FRACTION } else { fraction.clamp(0.0, 1.0) }
}

/// Same cells, with the active pane's tracks taking `fraction` of each axis
/// and the remaining tracks sharing what is left evenly. Every track keeps at
/// least [`MIN_TRACK`], so no pane collapses even at a fraction of 0 or 1.
pub fn zoomed(grid: &Grid, active: usize, fraction: f64) -> Result<Grid, LayoutError> {
    let current = grid.cell(active)?;
    let fraction = clamp_fraction(fraction);
    let mut next = grid.clone();
    for axis in [Axis::Rows, Axis::Cols] {
        let tracks = grid.lines(axis).len().saturating_sub(1);
        let (start, end) = current.span(axis);
        if start >= end || end > tracks {
            return Err(LayoutError::InvalidGrid(format!(
                "pane {active} {current:?} does not fit {tracks} {axis} tracks"
            )));
        }
        *next.lines_mut(axis) = zoomed_lines(tracks, (start, end), fraction);
    }
    next.validate()?;
    Ok(next)
}

/// Same cells, every track on each axis the same size.
pub fn evened(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    for axis in [Axis::Rows, Axis::Cols] {
        let tracks = grid.lines(axis).len().saturating_sub(1).max(1);
        *next.lines_mut(axis) = even_lines(tracks);
    }
    next
}

fn zoomed_lines(tracks: usize, (start, end): (usize, usize), fraction: f64) -> Vec<f64> {
    let focused = end - start;
    let others = tracks - focused;
    let lower = MIN_TRACK * focused as f64;
    let upper = 1.0 - MIN_TRACK * others as f64;
    if others == 0 || lower > upper {
        return even_lines(tracks);
    }
    let fraction = fraction.clamp(lower, upper);
    let focused_width = fraction / focused as f64;
    let other_width = (1.0 - fraction) / others as f64;
    let mut lines = Vec::with_capacity(tracks + 1);
    let mut position = 0.0;
    lines.push(position);
    for track in 0..tracks {
        position += if (start..end).contains(&track) { focused_width } else { other_width };
        lines.push(position);
    }
    lines[tracks] = 1.0;
    lines
}

fn even_lines(tracks: usize) -> Vec<f64> {
    let mut lines: Vec<f64> = (0..=tracks).map(|i| i as f64 / tracks as f64).collect();
    lines[tracks] = 1.0;
    lines
}
