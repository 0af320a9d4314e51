use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::host::{PaneHost, ViewId};
use crate::layout_engine::Grid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScratchView {
    pub id: ViewId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub size: usize,
}

/// An in-memory window: a grid, the tabs of each group and which tab each
/// group shows. Backs the command line tool and the controller tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScratchHost {
    grid: Grid,
    groups: Vec<Vec<ScratchView>>,
    focused: Vec<Option<ViewId>>,
    active_group: usize,
    next_id: u64,
}

impl Default for ScratchHost {
    fn default() -> Self {
        ScratchHost {
            grid: Grid::default(),
            groups: vec![vec![]],
            focused: vec![None],
            active_group: 0,
            next_id: 1,
        }
    }
}

impl ScratchHost {
    pub fn new() -> Self { Self::default() }

    pub fn with_layout(grid: &Grid) -> Self {
        let mut host = Self::default();
        host.set_layout(grid);
        host
    }

    fn add_view(&mut self, name: String, file: Option<PathBuf>, size: usize) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        let group = self.active_group;
        self.groups[group].push(ScratchView { id, name, file, size });
        self.focused[group] = Some(id);
        trace!(%id, group, "opened view");
        id
    }

    /// Opens `name` as a file tab in the active group and focuses it.
    pub fn open(&mut self, name: &str) -> ViewId {
        self.add_view(name.to_string(), Some(PathBuf::from(name)), 1)
    }

    /// Opens an empty placeholder view in the active group.
    pub fn open_transient(&mut self) -> ViewId { self.add_view(String::new(), None, 0) }

    pub fn view(&self, id: ViewId) -> Option<&ScratchView> {
        self.groups.iter().flatten().find(|v| v.id == id)
    }

    pub fn group_count(&self) -> usize { self.groups.len() }

    /// Takes `view` out of its group, moving that group's focus to the tab
    /// that slides into its place.
    fn detach(&mut self, view: ViewId) -> Option<ScratchView> {
        let (group, index) = self.view_index(view)?;
        let removed = self.groups[group].remove(index);
        if self.focused[group] == Some(view) {
            let tabs = &self.groups[group];
            let next = tabs.get(index).or_else(|| index.checked_sub(1).and_then(|i| tabs.get(i)));
            self.focused[group] = next.map(|v| v.id);
        }
        Some(removed)
    }

    pub fn draw_tree(&self) -> String {
        let panes = self
            .groups
            .iter()
            .enumerate()
            .map(|(group, tabs)| {
                let marker = if group == self.active_group { "☒ " } else { "☐ " };
                let header = match self.grid.cell(group) {
                    Ok(_) => format!("{marker}{}", self.grid.describe_cell(group)),
                    Err(_) => format!("{marker}pane {group} (not in layout)"),
                };
                let views = tabs
                    .iter()
                    .map(|v| {
                        let marker = if self.focused[group] == Some(v.id) { "* " } else { "  " };
                        let name = if v.name.is_empty() { "untitled" } else { v.name.as_str() };
                        format!("{marker}{} {name}", v.id)
                    })
                    .collect::<Vec<_>>();
                if views.is_empty() {
                    ascii_tree::Tree::Leaf(vec![header])
                } else {
                    ascii_tree::Tree::Node(header, vec![ascii_tree::Tree::Leaf(views)])
                }
            })
            .collect();
        let root = format!("window rows={:?} cols={:?}", self.grid.rows, self.grid.cols);
        let mut out = String::new();
        ascii_tree::write_tree(&mut out, &ascii_tree::Tree::Node(root, panes)).unwrap();
        out
    }
}

impl PaneHost for ScratchHost {
    fn layout(&self) -> Grid { self.grid.clone() }

    fn set_layout(&mut self, grid: &Grid) {
        self.grid = grid.clone();
        let count = grid.len().max(1);
        while self.groups.len() < count {
            self.groups.push(vec![]);
            self.focused.push(None);
        }
        while self.groups.len() > count {
            let overflow = self.groups.pop().unwrap_or_default();
            let overflow_focus = self.focused.pop().flatten();
            let last = self.groups.len() - 1;
            self.groups[last].extend(overflow);
            if self.focused[last].is_none() {
                self.focused[last] = overflow_focus;
            }
        }
        self.active_group = self.active_group.min(count - 1);
    }

    fn active_group(&self) -> usize { self.active_group }

    fn focus_group(&mut self, group: usize) {
        if group < self.groups.len() {
            self.active_group = group;
        }
    }

    fn views_in_group(&self, group: usize) -> Vec<ViewId> {
        self.groups.get(group).map(|tabs| tabs.iter().map(|v| v.id).collect()).unwrap_or_default()
    }

    fn active_view(&self) -> Option<ViewId> { self.active_view_in_group(self.active_group) }

    fn active_view_in_group(&self, group: usize) -> Option<ViewId> {
        self.focused.get(group).copied().flatten()
    }

    fn view_index(&self, view: ViewId) -> Option<(usize, usize)> {
        self.groups.iter().enumerate().find_map(|(group, tabs)| {
            tabs.iter().position(|v| v.id == view).map(|index| (group, index))
        })
    }

    fn set_view_index(&mut self, view: ViewId, group: usize, index: usize) {
        if group >= self.groups.len() {
            return;
        }
        let Some((from, _)) = self.view_index(view) else { return };
        let was_focused = self.focused[from] == Some(view);
        let Some(moved) = self.detach(view) else { return };
        let tabs = &mut self.groups[group];
        tabs.insert(index.min(tabs.len()), moved);
        if (from == group && was_focused) || self.focused[group].is_none() {
            self.focused[group] = Some(view);
        }
    }

    fn focus_view(&mut self, view: ViewId) {
        if let Some((group, _)) = self.view_index(view) {
            self.active_group = group;
            self.focused[group] = Some(view);
        }
    }

    fn close_view(&mut self, view: ViewId) {
        if self.detach(view).is_some() {
            trace!(%view, "closed view");
        }
    }

    fn clone_view(&mut self, view: ViewId) -> Option<ViewId> {
        let (group, index) = self.view_index(view)?;
        let mut clone = self.groups[group][index].clone();
        clone.id = ViewId(self.next_id);
        self.next_id += 1;
        let id = clone.id;
        self.groups[group].insert(index + 1, clone);
        self.active_group = group;
        self.focused[group] = Some(id);
        Some(id)
    }

    fn is_transient(&self, view: ViewId) -> bool {
        self.view(view).is_some_and(|v| v.size == 0 && v.name.is_empty() && v.file.is_none())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::{Direction, split};

    fn two_panes() -> ScratchHost {
        let grid = split(&Grid::default(), 0, Direction::Right).unwrap().unwrap().grid;
        ScratchHost::with_layout(&grid)
    }

    #[test]
    fn open_focuses_the_new_view() {
        let mut host = ScratchHost::new();
        let a = host.open("a.rs");
        let b = host.open("b.rs");
        assert_eq!(host.views_in_group(0), vec![a, b]);
        assert_eq!(host.active_view(), Some(b));
        assert!(!host.is_transient(a));
        let transient = host.open_transient();
        assert!(host.is_transient(transient));
    }

    #[test]
    fn shrinking_the_layout_folds_views_into_the_last_group() {
        let mut host = two_panes();
        let a = host.open("a.rs");
        host.focus_group(1);
        let b = host.open("b.rs");

        host.set_layout(&Grid::default());
        assert_eq!(host.group_count(), 1);
        assert_eq!(host.views_in_group(0), vec![a, b]);
        assert_eq!(host.active_group(), 0);
    }

    #[test]
    fn moving_a_view_refocuses_the_source_group() {
        let mut host = two_panes();
        let a = host.open("a.rs");
        let b = host.open("b.rs");
        let c = host.open("c.rs");
        host.focus_view(b);

        host.set_view_index(b, 1, 0);
        assert_eq!(host.views_in_group(0), vec![a, c]);
        assert_eq!(host.active_view_in_group(0), Some(c));
        assert_eq!(host.views_in_group(1), vec![b]);
        assert_eq!(host.active_view_in_group(1), Some(b));
    }

    #[test]
    fn clone_is_inserted_after_the_original() {
        let mut host = ScratchHost::new();
        let a = host.open("a.rs");
        let b = host.open("b.rs");
        let clone = host.clone_view(a).unwrap();
        assert_eq!(host.views_in_group(0), vec![a, clone, b]);
        assert_eq!(host.active_view(), Some(clone));
        assert_eq!(host.view(clone).unwrap().file, host.view(a).unwrap().file);
    }

    #[test]
    fn reordering_within_a_group_keeps_focus() {
        let mut host = ScratchHost::new();
        let a = host.open("a.rs");
        let b = host.open("b.rs");
        host.set_view_index(b, 0, 0);
        assert_eq!(host.views_in_group(0), vec![b, a]);
        assert_eq!(host.active_view(), Some(b));
    }

    #[test]
    fn closing_the_last_tab_clears_focus() {
        let mut host = ScratchHost::new();
        let a = host.open("a.rs");
        host.close_view(a);
        assert_eq!(host.active_view(), None);
        assert!(host.views_in_group(0).is_empty());
    }

    #[test]
    fn tree_lists_panes_and_tabs() {
        let mut host = two_panes();
        host.open("a.rs");
        let tree = host.draw_tree();
        assert!(tree.contains("☒ pane 0"), "{tree}");
        assert!(tree.contains("☐ pane 1"), "{tree}");
        assert!(tree.contains("* view#1 a.rs"), "{tree}");
    }
}
