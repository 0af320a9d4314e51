use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout_engine::{Grid, LayoutError, clamp_fraction, evened, zoomed};

/// Per-window zoom bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum WindowState {
    #[default]
    Normal,
    Zoomed {
        /// The layout to go back to on unzoom.
        original: Grid,
        fraction: f64,
    },
    /// A layout change is in flight; wraps the state it started from.
    ApplyingLayout(Box<WindowState>),
}

impl WindowState {
    fn settled(&self) -> &WindowState {
        match self {
            WindowState::ApplyingLayout(inner) => inner.settled(),
            other => other,
        }
    }

    fn settled_mut(&mut self) -> &mut WindowState {
        match self {
            WindowState::ApplyingLayout(inner) => inner.settled_mut(),
            other => other,
        }
    }

    pub fn is_zoomed(&self) -> bool { matches!(self.settled(), WindowState::Zoomed { .. }) }

    pub fn zoom_fraction(&self) -> Option<f64> {
        match self.settled() {
            WindowState::Zoomed { fraction, .. } => Some(*fraction),
            _ => None,
        }
    }

    /// The layout saved when the zoom started.
    pub fn original(&self) -> Option<&Grid> {
        match self.settled() {
            WindowState::Zoomed { original, .. } => Some(original),
            _ => None,
        }
    }

    pub fn is_applying_layout(&self) -> bool { matches!(self, WindowState::ApplyingLayout(_)) }

    pub fn begin_apply(&mut self) {
        if self.is_applying_layout() {
            return;
        }
        let previous = std::mem::take(self);
        *self = WindowState::ApplyingLayout(Box::new(previous));
    }

    pub fn finish_apply(&mut self) {
        if let WindowState::ApplyingLayout(inner) = self {
            let inner = std::mem::take(inner.as_mut());
            *self = inner;
        }
    }

    /// Zooms pane `active` of `current`.
    ///
    /// With `rezoom` an existing zoom is re-targeted and keeps the layout it
    /// originally saved; without it zooming twice is an error.
    pub fn zoom(
        &mut self,
        current: &Grid,
        active: usize,
        fraction: f64,
        rezoom: bool,
    ) -> Result<Grid, LayoutError> {
        let original = match self.settled() {
            WindowState::Zoomed { original, .. } if rezoom => original.clone(),
            WindowState::Zoomed { .. } => return Err(LayoutError::AlreadyZoomed),
            _ => current.clone(),
        };
        let fraction = clamp_fraction(fraction);
        let grid = zoomed(current, active, fraction)?;
        debug!(active, fraction, rezoom, "zoomed");
        *self.settled_mut() = WindowState::Zoomed { original, fraction };
        Ok(grid)
    }

    /// Leaves zoom. With `remember` the saved layout comes back verbatim,
    /// unless panes were added or removed since; otherwise every track of
    /// `current` is evened out.
    pub fn unzoom(&mut self, current: &Grid, remember: bool) -> Result<Grid, LayoutError> {
        let WindowState::Zoomed { original, .. } = std::mem::take(self.settled_mut()) else {
            return Err(LayoutError::NotZoomed);
        };
        if remember && original.len() == current.len() {
            Ok(original)
        } else {
            debug!(remember, "evening out the layout on unzoom");
            Ok(evened(current))
        }
    }
}
