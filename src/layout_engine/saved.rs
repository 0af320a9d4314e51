use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Cell, Grid, LayoutError};

/// A named layout kept in the config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SavedLayout {
    pub nickname: String,
    pub rows: Vec<f64>,
    pub cols: Vec<f64>,
    pub cells: Vec<Cell>,
}

impl SavedLayout {
    pub fn new(nickname: impl Into<String>, grid: &Grid) -> Self {
        SavedLayout {
            nickname: nickname.into(),
            rows: grid.rows.clone(),
            cols: grid.cols.clone(),
            cells: grid.cells.clone(),
        }
    }

    pub fn grid(&self) -> Grid { Grid::new(self.rows.clone(), self.cols.clone(), self.cells.clone()) }
}

/// Saved layouts in the order they were first saved, unique by nickname.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutStore {
    layouts: Vec<SavedLayout>,
}

impl LayoutStore {
    pub fn new(layouts: Vec<SavedLayout>) -> Self { LayoutStore { layouts } }

    pub fn iter(&self) -> impl Iterator<Item = &SavedLayout> { self.layouts.iter() }

    pub fn names(&self) -> Vec<&str> { self.layouts.iter().map(|l| l.nickname.as_str()).collect() }

    pub fn len(&self) -> usize { self.layouts.len() }

    pub fn is_empty(&self) -> bool { self.layouts.is_empty() }

    pub fn get(&self, nickname: &str) -> Result<&SavedLayout, LayoutError> {
        self.layouts
            .iter()
            .find(|l| l.nickname == nickname)
            .ok_or_else(|| LayoutError::NoSuchLayout(nickname.to_string()))
    }

    /// Stores `grid` under `nickname`. Replacing an existing entry keeps its
    /// position and requires `overwrite`.
    pub fn save(&mut self, nickname: &str, grid: &Grid, overwrite: bool) -> Result<(), LayoutError> {
        if nickname.trim().is_empty() {
            return Err(LayoutError::InvalidLayoutName(nickname.to_string()));
        }
        let layout = SavedLayout::new(nickname, grid);
        match self.layouts.iter_mut().find(|l| l.nickname == nickname) {
            Some(_) if !overwrite => Err(LayoutError::DuplicateLayoutName(nickname.to_string())),
            Some(existing) => {
                debug!(nickname, "overwriting saved layout");
                *existing = layout;
                Ok(())
            }
            None => {
                debug!(nickname, "saving layout");
                self.layouts.push(layout);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, nickname: &str) -> Result<SavedLayout, LayoutError> {
        let index = self
            .layouts
            .iter()
            .position(|l| l.nickname == nickname)
            .ok_or_else(|| LayoutError::NoSuchLayout(nickname.to_string()))?;
        Ok(self.layouts.remove(index))
    }
}
