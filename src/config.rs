use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::{NumericAttribute, KNOWN_SPECIES};
use crate::selection::{BinCount, SelectionError, PLOTLY_BINS, SEABORN_BINS};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "penguin-dash.toml";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Dashboard settings. Every field has a default, so a config file only
/// needs the keys it changes.
///
/// ```toml
/// title = "Penguins Data - Kate Huntsman"
/// data_path = "penguins.csv"
///
/// [defaults]
/// attribute = "body_mass_g"
/// seaborn_bins = 30
/// species = ["Gentoo"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Dataset file; the built-in sample is used when unset.
    pub data_path: Option<PathBuf>,
    pub window: WindowConfig,
    pub sidebar: SidebarConfig,
    pub defaults: SelectionDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Whether the sidebar starts open.
    pub open: bool,
    pub repo_label: String,
    pub repo_url: String,
}

/// Initial values of the selection inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionDefaults {
    pub attribute: NumericAttribute,
    pub plotly_bins: u32,
    pub seaborn_bins: u32,
    pub species: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Penguins Data - Kate Huntsman".to_string(),
            data_path: None,
            window: WindowConfig::default(),
            sidebar: SidebarConfig::default(),
            defaults: SelectionDefaults::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
        }
    }
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            open: true,
            repo_label: "cintel-02-data".to_string(),
            repo_url: "https://github.com/katehuntsman/cintel-02-data".to_string(),
        }
    }
}

impl Default for SelectionDefaults {
    fn default() -> Self {
        Self {
            attribute: NumericAttribute::BillLength,
            plotly_bins: 1,
            seaborn_bins: 25,
            species: vec!["Adelie".to_string(), "Gentoo".to_string()],
        }
    }
}

impl SelectionDefaults {
    /// Check both bin counts; unknown species only produce a warning since
    /// they simply match nothing.
    pub fn validate(&self) -> Result<(BinCount, BinCount), SelectionError> {
        let plotly = BinCount::new(self.plotly_bins, PLOTLY_BINS)?;
        let seaborn = BinCount::new(self.seaborn_bins, SEABORN_BINS)?;
        for label in &self.species {
            if !KNOWN_SPECIES.contains(&label.as_str()) {
                log::warn!("default species '{label}' is not one of {KNOWN_SPECIES:?}");
            }
        }
        Ok((plotly, seaborn))
    }
}

impl DashboardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(text).context("parsing configuration")?;
        config.defaults.validate()?;
        Ok(config)
    }

    /// Read `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else
    /// use the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    log::debug!("no {DEFAULT_CONFIG_FILE}, using built-in configuration");
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("in config {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply a data path given on the command line or in the environment.
    pub fn with_data_override(mut self, data: Option<PathBuf>) -> Self {
        if data.is_some() {
            self.data_path = data;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.defaults.species, vec!["Adelie", "Gentoo"]);
        assert_eq!(config.defaults.plotly_bins, 1);
        assert_eq!(config.defaults.seaborn_bins, 25);
        assert_eq!(config.title, "Penguins Data - Kate Huntsman");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            title = "Antarctic birds"

            [defaults]
            attribute = "body_mass_g"
            species = []
            "#,
        )
        .unwrap();
        assert_eq!(config.title, "Antarctic birds");
        assert_eq!(config.defaults.attribute, NumericAttribute::BodyMass);
        assert!(config.defaults.species.is_empty());
        assert_eq!(config.defaults.seaborn_bins, 25);
        assert!(config.sidebar.open);
    }

    #[test]
    fn out_of_range_bins_are_rejected() {
        let err = DashboardConfig::from_toml_str("[defaults]\nplotly_bins = 11\n").unwrap_err();
        assert!(format!("{err:#}").contains("between 1 and 10"));
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        assert!(DashboardConfig::from_toml_str("[defaults]\nattribute = \"wingspan\"\n").is_err());
    }

    #[test]
    fn load_reads_explicit_file_and_override_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_path = \"from-file.csv\"").unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("from-file.csv")));

        let config = config.with_data_override(Some(PathBuf::from("cli.parquet")));
        assert_eq!(config.data_path, Some(PathBuf::from("cli.parquet")));

        let config = config.with_data_override(None);
        assert_eq!(config.data_path, Some(PathBuf::from("cli.parquet")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DashboardConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
