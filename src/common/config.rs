use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{Deserialize, Serialize};

use super::collections::HashSet;
use crate::actor::retry::RetryPolicy;
use crate::layout_engine::{DEFAULT_ZOOM_FRACTION, LayoutStore};

pub fn data_dir() -> PathBuf { dirs::home_dir().unwrap_or_default().join(".panefold") }
pub fn state_file() -> PathBuf { data_dir().join("window.ron") }
pub fn config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join("panefold")
        .join("config.toml")
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub saved_layouts: LayoutStore,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Travel/carry/clone into a direction with no pane creates one there.
    #[serde(default = "no")]
    pub create_new_pane_if_necessary: bool,
    /// Close a pane when its last view closes.
    #[serde(default = "no")]
    pub auto_close_empty_panes: bool,
    #[serde(default)]
    pub auto_zoom_on_focus: AutoZoom,
    /// Restore the exact pre-zoom layout on unzoom instead of evening it out.
    #[serde(default = "yes")]
    pub remember_panes_layout: bool,
    #[serde(default = "no")]
    pub unzoom_after_creating_pane: bool,
    #[serde(default = "no")]
    pub unzoom_after_closing_pane: bool,
    #[serde(default = "default_zoom_fraction")]
    pub default_zoom_fraction: f64,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            create_new_pane_if_necessary: false,
            auto_close_empty_panes: false,
            auto_zoom_on_focus: AutoZoom::default(),
            remember_panes_layout: true,
            unzoom_after_creating_pane: false,
            unzoom_after_closing_pane: false,
            default_zoom_fraction: default_zoom_fraction(),
            retry: RetryPolicy::default(),
        }
    }
}

/// `auto_zoom_on_focus = true` zooms with the default fraction, a number
/// zooms with that fraction.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(untagged)]
pub enum AutoZoom {
    Enabled(bool),
    Fraction(f64),
}

impl Default for AutoZoom {
    fn default() -> Self { AutoZoom::Enabled(false) }
}

impl AutoZoom {
    pub fn fraction(self, default: f64) -> Option<f64> {
        match self {
            AutoZoom::Enabled(false) => None,
            AutoZoom::Enabled(true) => Some(default),
            AutoZoom::Fraction(fraction) => Some(fraction),
        }
    }
}

fn yes() -> bool { true }

fn no() -> bool { false }

fn default_zoom_fraction() -> f64 { DEFAULT_ZOOM_FRACTION }

fn fraction_issue(name: &str, value: f64) -> Option<String> {
    (!(0.0..=1.0).contains(&value))
        .then(|| format!("{name} must be between 0.0 and 1.0, got {value}"))
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        issues.extend(fraction_issue("default_zoom_fraction", self.default_zoom_fraction));
        if let AutoZoom::Fraction(fraction) = self.auto_zoom_on_focus {
            issues.extend(fraction_issue("auto_zoom_on_focus", fraction));
        }
        if self.retry.attempts == 0 {
            issues.push("retry.attempts must be at least 1".to_string());
        }

        issues
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    /// Reads `path`, or returns the default config if it does not exist.
    pub fn read_or_default(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::read(path)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<Config>(buf) {
            Ok(config) => Ok(config),
            Err(e) => bail!("{e}"),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.settings.validate();

        let mut seen = HashSet::default();
        for layout in self.saved_layouts.iter() {
            if layout.nickname.trim().is_empty() {
                issues.push("saved layout nickname must not be empty".to_string());
            }
            if !seen.insert(layout.nickname.as_str()) {
                issues.push(format!("saved layout '{}' is defined twice", layout.nickname));
            }
            if let Err(e) = layout.grid().validate() {
                issues.push(format!("saved layout '{}': {e}", layout.nickname));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::{Cell, Grid};

    #[test]
    fn default_file_matches_default_config() {
        let parsed = Config::parse(include_str!("../../panefold.default.toml")).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_empty());
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn auto_zoom_accepts_bool_or_fraction() {
        let config = Config::parse("[settings]\nauto_zoom_on_focus = true\n").unwrap();
        assert_eq!(config.settings.auto_zoom_on_focus.fraction(0.8), Some(0.8));

        let config = Config::parse("[settings]\nauto_zoom_on_focus = 0.6\n").unwrap();
        assert_eq!(config.settings.auto_zoom_on_focus.fraction(0.8), Some(0.6));

        assert_eq!(AutoZoom::default().fraction(0.8), None);
    }

    #[test]
    fn unknown_settings_are_rejected() {
        let err = Config::parse("[settings]\nzoom_everything = true\n").unwrap_err();
        assert!(err.to_string().contains("zoom_everything"), "{err}");
    }

    #[test]
    fn validate_reports_bad_values() {
        let mut config = Config::default();
        config.settings.default_zoom_fraction = 1.5;
        config.settings.retry.attempts = 0;
        config.saved_layouts = LayoutStore::new(vec![
            crate::layout_engine::SavedLayout::new("a", &Grid::default()),
            crate::layout_engine::SavedLayout::new("a", &Grid::default()),
            crate::layout_engine::SavedLayout {
                nickname: "broken".to_string(),
                rows: vec![0.0, 1.0],
                cols: vec![0.0, 1.0],
                cells: vec![Cell::new(0, 0, 2, 1)],
            },
        ]);
        let issues = config.validate();
        assert_eq!(issues.len(), 4, "{issues:#?}");
        assert!(issues[0].contains("default_zoom_fraction"));
        assert!(issues[1].contains("retry.attempts"));
        assert!(issues[2].contains("'a' is defined twice"));
        assert!(issues[3].contains("'broken'"));
    }

    #[test]
    fn saved_layouts_survive_a_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.auto_zoom_on_focus = AutoZoom::Fraction(0.7);
        let side_by_side = Grid::new(vec![0.0, 1.0], vec![0.0, 0.5, 1.0], vec![
            Cell::new(0, 0, 1, 1),
            Cell::new(1, 0, 2, 1),
        ]);
        config.saved_layouts.save("pair", &side_by_side, false).unwrap();
        config.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[[saved_layouts]]"), "{text}");
        assert_eq!(Config::read(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
