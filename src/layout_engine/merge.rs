use tracing::debug;

use super::grid::{best_neighbor_index, bordering_indices};
use super::{Direction, Grid, LayoutError};

#[derive(Clone, Debug, PartialEq)]
pub struct Merge {
    pub grid: Grid,
    /// Index (in the input grid) of the pane that was removed.
    pub removed: usize,
    /// Index (in the input grid) of the pane that took over the space.
    pub survivor: usize,
    /// Index of the survivor in the resulting grid.
    pub active: usize,
}

/// Removes the single pane adjacent to `active` in `direction`, giving its
/// space to the panes on the other side of it.
///
/// `Ok(None)` when nothing borders `active` in that direction, or when the
/// panes behind the neighbor cannot take over its space.
pub fn destroy(grid: &Grid, active: usize, direction: Direction) -> Result<Option<Merge>, LayoutError> {
    grid.validate()?;
    let current = grid.cell(active)?;
    match bordering_indices(&grid.cells, &current, direction).as_slice() {
        [] => {
            debug!(active, ?direction, "no pane to merge");
            Ok(None)
        }
        [removed] => absorb(grid, active, *removed, direction),
        candidates => Err(LayoutError::AmbiguousMerge { candidates: candidates.len() }),
    }
}

/// Removes `active` itself by handing its space back to the neighbor it was
/// split from: the neighbor whose shared edge covers the whole pane and which
/// can absorb it without touching any other pane.
pub fn destroy_self(grid: &Grid, active: usize) -> Result<Option<Merge>, LayoutError> {
    grid.validate()?;
    let current = grid.cell(active)?;

    let mut parents = Vec::new();
    for direction in Direction::ALL {
        let Some(neighbor) =
            best_neighbor_index(&grid.cells, &grid.rows, &grid.cols, &current, direction)
        else {
            continue;
        };
        let cross = direction.axis().cross();
        if grid.cells[neighbor].span(cross) != current.span(cross) {
            continue;
        }
        let back = bordering_indices(&grid.cells, &grid.cells[neighbor], direction.opposite());
        if back != [active] {
            continue;
        }
        parents.push((direction, neighbor));
    }

    match parents.as_slice() {
        [] => {
            debug!(active, "no neighbor can absorb the pane");
            Ok(None)
        }
        [(direction, neighbor)] => absorb(grid, *neighbor, active, direction.opposite()),
        _ => Err(LayoutError::AmbiguousMerge { candidates: parents.len() }),
    }
}

/// Removes pane `removed`, which lies in `direction` from `survivor`.
///
/// `Ok(None)` when the panes behind `removed` cannot cover exactly its space.
fn absorb(
    grid: &Grid,
    survivor: usize,
    removed: usize,
    direction: Direction,
) -> Result<Option<Merge>, LayoutError> {
    let axis = direction.axis();
    let doomed = grid.cells[removed];
    let (start, end) = doomed.span(axis);
    // Panes on the far side of the shared line stretch over the doomed pane.
    let shared = if direction.toward_start() { end } else { start };

    let behind = bordering_indices(&grid.cells, &doomed, direction.opposite());
    let mut next = grid.clone();
    for &i in &behind {
        let cell = &mut next.cells[i];
        *cell = if direction.toward_start() {
            cell.with_span(axis, start, cell.end(axis))
        } else {
            cell.with_span(axis, cell.start(axis), end)
        };
    }
    next.cells.remove(removed);
    if let Err(e) = next.validate() {
        debug!(survivor, removed, ?direction, %e, "panes behind cannot absorb the pane");
        return Ok(None);
    }
    // Other panes may still run along the shared line.
    if !next.cells.iter().any(|c| c.references(axis, shared)) {
        next.remove_line(axis, shared)?;
    }

    let active = if removed < survivor { survivor - 1 } else { survivor };
    debug!(survivor, removed, ?direction, "merged pane");
    Ok(Some(Merge { grid: next, removed, survivor, active }))
}
