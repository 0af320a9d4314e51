//! Pure grid geometry: every operation takes a [`Grid`] and returns a new one.

pub mod error;
pub mod graph;
pub mod grid;
pub mod merge;
pub mod reindex;
pub mod resize;
pub mod saved;
pub mod split;
pub mod zoom;

pub use error::LayoutError;
pub use graph::{Axis, DestroyTarget, Direction};
pub use grid::{Cell, Grid, adjacent, best_neighbor, best_neighbor_index};
pub use merge::{Merge, destroy, destroy_self};
pub use resize::{ResizeMode, ResizeSession, adjustable_lines, resize};
pub use saved::{LayoutStore, SavedLayout};
pub use split::{Split, split};
pub use zoom::{DEFAULT_ZOOM_FRACTION, clamp_fraction, evened, zoomed};
