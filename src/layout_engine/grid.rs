use serde::{Deserialize, Serialize};

use super::{Axis, Direction, LayoutError};

pub(crate) const EPSILON: f64 = 1e-9;

/// A pane rectangle expressed as indices into the grid's `cols` (x) and
/// `rows` (y) arrays. Serialized as `[x0, y0, x1, y1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 4]", into = "[usize; 4]")]
pub struct Cell {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Cell {
    pub const fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self { Cell { x0, y0, x1, y1 } }

    pub fn start(&self, axis: Axis) -> usize {
        match axis {
            Axis::Cols => self.x0,
            Axis::Rows => self.y0,
        }
    }

    pub fn end(&self, axis: Axis) -> usize {
        match axis {
            Axis::Cols => self.x1,
            Axis::Rows => self.y1,
        }
    }

    pub fn span(&self, axis: Axis) -> (usize, usize) { (self.start(axis), self.end(axis)) }

    pub fn with_span(self, axis: Axis, start: usize, end: usize) -> Cell {
        match axis {
            Axis::Cols => Cell { x0: start, x1: end, ..self },
            Axis::Rows => Cell { y0: start, y1: end, ..self },
        }
    }

    /// Applies `f` to both indices on `axis`.
    pub fn map_axis(self, axis: Axis, mut f: impl FnMut(usize) -> usize) -> Cell {
        let (start, end) = self.span(axis);
        self.with_span(axis, f(start), f(end))
    }

    pub fn references(&self, axis: Axis, line: usize) -> bool {
        self.start(axis) == line || self.end(axis) == line
    }

    /// Whether `other` shares this cell's edge facing `direction`.
    pub fn touches(&self, other: &Cell, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.y0 == other.y1,
            Direction::Down => self.y1 == other.y0,
            Direction::Right => self.x1 == other.x0,
            Direction::Left => self.x0 == other.x1,
        }
    }

    fn overlaps(&self, other: &Cell) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

impl From<[usize; 4]> for Cell {
    fn from([x0, y0, x1, y1]: [usize; 4]) -> Self { Cell { x0, y0, x1, y1 } }
}

impl From<Cell> for [usize; 4] {
    fn from(cell: Cell) -> Self { [cell.x0, cell.y0, cell.x1, cell.y1] }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: Vec<f64>,
    pub cols: Vec<f64>,
    pub cells: Vec<Cell>,
}

impl Default for Grid {
    /// One pane covering the whole window.
    fn default() -> Self {
        Grid {
            rows: vec![0.0, 1.0],
            cols: vec![0.0, 1.0],
            cells: vec![Cell::new(0, 0, 1, 1)],
        }
    }
}

impl Grid {
    pub fn new(rows: Vec<f64>, cols: Vec<f64>, cells: Vec<Cell>) -> Self { Grid { rows, cols, cells } }

    pub fn lines(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Rows => &self.rows,
            Axis::Cols => &self.cols,
        }
    }

    pub fn lines_mut(&mut self, axis: Axis) -> &mut Vec<f64> {
        match axis {
            Axis::Rows => &mut self.rows,
            Axis::Cols => &mut self.cols,
        }
    }

    pub fn len(&self) -> usize { self.cells.len() }

    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn cell(&self, group: usize) -> Result<Cell, LayoutError> {
        self.cells.get(group).copied().ok_or(LayoutError::InvalidGroup {
            group,
            count: self.cells.len(),
        })
    }

    /// Start and end coordinates of `cell` on `axis`.
    pub fn extent(&self, cell: &Cell, axis: Axis) -> (f64, f64) {
        let lines = self.lines(axis);
        (lines[cell.start(axis)], lines[cell.end(axis)])
    }

    /// Line indices on `axis` that no cell references.
    pub fn unreferenced_lines(&self, axis: Axis) -> Vec<usize> {
        (0..self.lines(axis).len())
            .filter(|&line| !self.cells.iter().any(|c| c.references(axis, line)))
            .collect()
    }

    /// Checks that the grid is a well-formed partition of the unit square.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for axis in [Axis::Rows, Axis::Cols] {
            let lines = self.lines(axis);
            if lines.len() < 2 {
                return Err(LayoutError::InvalidGrid(format!(
                    "{axis} needs at least 2 lines, got {}",
                    lines.len()
                )));
            }
            if lines[0].abs() > EPSILON || (lines[lines.len() - 1] - 1.0).abs() > EPSILON {
                return Err(LayoutError::InvalidGrid(format!(
                    "{axis} must start at 0.0 and end at 1.0, got {lines:?}"
                )));
            }
            if let Some(i) = lines.windows(2).position(|w| !(w[0] < w[1])) {
                return Err(LayoutError::InvalidGrid(format!(
                    "{axis} are not strictly increasing at index {}: {lines:?}",
                    i + 1
                )));
            }
        }

        if self.cells.is_empty() {
            return Err(LayoutError::InvalidGrid("layout has no panes".to_string()));
        }

        for (i, cell) in self.cells.iter().enumerate() {
            if cell.x1 >= self.cols.len() || cell.y1 >= self.rows.len() {
                return Err(LayoutError::InvalidGrid(format!(
                    "pane {i} {cell:?} indexes past the boundary lines"
                )));
            }
            if cell.x0 >= cell.x1 || cell.y0 >= cell.y1 {
                return Err(LayoutError::InvalidGrid(format!("pane {i} {cell:?} is empty")));
            }
        }

        for (i, a) in self.cells.iter().enumerate() {
            if let Some(j) = self.cells[i + 1..].iter().position(|b| a.overlaps(b)) {
                return Err(LayoutError::InvalidGrid(format!(
                    "panes {i} and {} overlap",
                    i + 1 + j
                )));
            }
        }

        let area: f64 = self
            .cells
            .iter()
            .map(|c| {
                let (x0, x1) = self.extent(c, Axis::Cols);
                let (y0, y1) = self.extent(c, Axis::Rows);
                (x1 - x0) * (y1 - y0)
            })
            .sum();
        if (area - 1.0).abs() > EPSILON {
            return Err(LayoutError::InvalidGrid(format!(
                "panes cover {area} of the window instead of all of it"
            )));
        }

        Ok(())
    }

    /// Swaps the cells of two panes, leaving every other pane in place.
    pub fn swapped(&self, a: usize, b: usize) -> Result<Grid, LayoutError> {
        self.cell(a)?;
        self.cell(b)?;
        let mut grid = self.clone();
        grid.cells.swap(a, b);
        Ok(grid)
    }

    pub fn describe_cell(&self, group: usize) -> String {
        let cell = self.cells[group];
        let (x0, x1) = self.extent(&cell, Axis::Cols);
        let (y0, y1) = self.extent(&cell, Axis::Rows);
        format!(
            "pane {group} [{}, {}, {}, {}] x {x0:.3}..{x1:.3} y {y0:.3}..{y1:.3}",
            cell.x0, cell.y0, cell.x1, cell.y1
        )
    }

    pub fn draw_tree(&self, active: Option<usize>) -> String {
        let leaves = (0..self.cells.len())
            .map(|group| {
                let status = if Some(group) == active { "☒ " } else { "☐ " };
                ascii_tree::Tree::Leaf(vec![format!("{status}{}", self.describe_cell(group))])
            })
            .collect();
        let root = format!("grid rows={:?} cols={:?}", self.rows, self.cols);
        let mut out = String::new();
        ascii_tree::write_tree(&mut out, &ascii_tree::Tree::Node(root, leaves)).unwrap();
        out
    }
}

/// All cells sharing `cell`'s edge in `direction`. Several cells may border
/// one edge; no overlap filtering is done here.
pub fn adjacent(cells: &[Cell], cell: &Cell, direction: Direction) -> Vec<Cell> {
    cells.iter().filter(|other| cell.touches(other, direction)).copied().collect()
}

pub fn adjacent_indices(cells: &[Cell], cell: &Cell, direction: Direction) -> Vec<usize> {
    cells
        .iter()
        .enumerate()
        .filter(|(_, other)| cell.touches(other, direction))
        .map(|(i, _)| i)
        .collect()
}

/// Like [`adjacent_indices`], keeping only cells whose shared edge actually
/// overlaps `cell`'s edge instead of merely lying on the same line.
pub fn bordering_indices(cells: &[Cell], cell: &Cell, direction: Direction) -> Vec<usize> {
    let cross = direction.axis().cross();
    let (lo, hi) = cell.span(cross);
    adjacent_indices(cells, cell, direction)
        .into_iter()
        .filter(|&i| cells[i].start(cross) < hi && lo < cells[i].end(cross))
        .collect()
}

/// Length shared by two 1-D intervals. Negative when they are disjoint.
pub fn overlap((min1, max1): (f64, f64), (min2, max2): (f64, f64)) -> f64 {
    max1.min(max2) - min1.max(min2)
}

/// Index of the adjacent cell in `direction` with the longest shared edge.
/// Ties go to the earliest pane.
pub fn best_neighbor_index(
    cells: &[Cell],
    rows: &[f64],
    cols: &[f64],
    current: &Cell,
    direction: Direction,
) -> Option<usize> {
    let (axis, lines) = match direction.axis() {
        Axis::Cols => (Axis::Rows, rows),
        Axis::Rows => (Axis::Cols, cols),
    };
    let span = |c: &Cell| (lines[c.start(axis)], lines[c.end(axis)]);
    let current_span = span(current);

    let mut best: Option<(usize, f64)> = None;
    for i in adjacent_indices(cells, current, direction) {
        let score = overlap(span(&cells[i]), current_span);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

pub fn best_neighbor(
    cells: &[Cell],
    rows: &[f64],
    cols: &[f64],
    current: &Cell,
    direction: Direction,
) -> Option<Cell> {
    best_neighbor_index(cells, rows, cols, current, direction).map(|i| cells[i])
}
