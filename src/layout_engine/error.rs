use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    #[error("Pane {group} does not exist (layout has {count} panes)")]
    InvalidGroup { group: usize, count: usize },
    #[error("Ambiguous merge: {candidates} panes qualify")]
    AmbiguousMerge { candidates: usize },
    #[error("Pane is already zoomed")]
    AlreadyZoomed,
    #[error("Pane is not zoomed")]
    NotZoomed,
    #[error("No saved layout named '{0}'")]
    NoSuchLayout(String),
    #[error("A layout named '{0}' already exists")]
    DuplicateLayoutName(String),
    #[error("Invalid layout name '{0}'")]
    InvalidLayoutName(String),
    #[error("Invalid resize input: {0}")]
    InvalidResizeInput(String),
    #[error("Timed out after {attempts} attempts waiting for the layout to settle")]
    Timeout { attempts: u32 },
}

impl LayoutError {
    /// Conditions caused by the request rather than by a broken layout. The
    /// grid is left untouched and the message can be shown to the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LayoutError::AmbiguousMerge { .. }
                | LayoutError::AlreadyZoomed
                | LayoutError::NotZoomed
                | LayoutError::NoSuchLayout(_)
                | LayoutError::DuplicateLayoutName(_)
                | LayoutError::InvalidLayoutName(_)
                | LayoutError::InvalidResizeInput(_)
        )
    }
}
