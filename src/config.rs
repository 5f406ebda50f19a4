//! Configuration
//! Dashboard settings from an optional TOML file, overridden by CLI flags.

use crate::charts::MapView;
use crate::stats::TendencyBasis;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Where one dataset is downloaded from and the name it is cached under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSource {
    pub url: String,
    pub file_name: String,
}

impl DatasetSource {
    fn new(url: &str, file_name: &str) -> Self {
        Self {
            url: url.to_string(),
            file_name: file_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datasets {
    pub customers: DatasetSource,
    pub sellers: DatasetSource,
    pub payments: DatasetSource,
}

impl Default for Datasets {
    fn default() -> Self {
        Self {
            customers: DatasetSource::new(
                "https://drive.google.com/uc?id=1xMxVMSDbTDCX2M_ds-RSgeGTo6vF9zlR",
                "file_1.csv",
            ),
            sellers: DatasetSource::new(
                "https://drive.google.com/uc?id=1mXtntj-lgnuoiygNtBT5nKH6tA5EZK9q",
                "file_2.csv",
            ),
            payments: DatasetSource::new(
                "https://drive.google.com/uc?id=1_HQlq-6Y_PR6QF-ghhdk1zXLdsUoQOsS",
                "file_3.csv",
            ),
        }
    }
}

const AUTHOR_NAME: &str = "Kevin Robert Siswoyo";
const AUTHOR_EMAIL: &str = "kevin.siswoyo28@gmail.com";

/// Author identification shown under the page title.
/// An empty string hides the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub id: Option<String>,
}

impl Default for AuthorInfo {
    fn default() -> Self {
        Self {
            name: Some(AUTHOR_NAME.to_string()),
            email: Some(AUTHOR_EMAIL.to_string()),
            id: Some("kevinrob28".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub author: AuthorInfo,
    pub footer: Option<String>,
    pub datasets: Datasets,
    pub cache_dir: PathBuf,
    pub output: PathBuf,
    pub reuse_downloads: bool,
    pub top_n: usize,
    pub tendency_basis: TendencyBasis,
    pub map: MapView,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "E-Commerce Public Dataset Analysis".to_string(),
            author: AuthorInfo::default(),
            footer: Some(format!("By {AUTHOR_NAME} - {AUTHOR_EMAIL} - 2024")),
            datasets: Datasets::default(),
            cache_dir: PathBuf::from("."),
            output: PathBuf::from("dashboard.html"),
            reuse_downloads: false,
            top_n: 10,
            tendency_basis: TendencyBasis::default(),
            map: MapView::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "olist-geo-dashboard",
    version,
    about = "Build the e-commerce customer, seller and installment dashboard"
)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Where to write the HTML page.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Directory the datasets are downloaded into.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
    /// Number of cities in each ranked bar chart.
    #[arg(long)]
    pub top_n: Option<usize>,
    /// Denominator used for the installment tendency.
    #[arg(long, value_enum)]
    pub tendency_basis: Option<TendencyBasis>,
    /// Use dataset files already present in the cache directory.
    #[arg(long)]
    pub reuse_downloads: bool,
    /// Open the page with the system viewer when done.
    #[arg(long)]
    pub open: bool,
}

impl Cli {
    /// Load the config file (or defaults) and apply the flag overrides.
    pub fn load_config(&self) -> Result<DashboardConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };
        Ok(self.apply(config))
    }

    pub fn apply(&self, mut config: DashboardConfig) -> DashboardConfig {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = cache_dir.clone();
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(basis) = self.tendency_basis {
            config.tendency_basis = basis;
        }
        if self.reuse_downloads {
            config.reuse_downloads = true;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.top_n, 10);
        assert_eq!(config.datasets.payments.file_name, "file_3.csv");
        assert_eq!(config.tendency_basis, TendencyBasis::CreditCardOnly);
        assert_eq!(config.author.id.as_deref(), Some("kevinrob28"));
        assert_eq!(
            config.footer.as_deref(),
            Some("By Kevin Robert Siswoyo - kevin.siswoyo28@gmail.com - 2024")
        );
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config = DashboardConfig::from_toml_str(
            r#"
            top_n = 5
            tendency_basis = "all_payments"

            [author]
            name = "Ana"

            [datasets.sellers]
            url = "https://example.com/sellers.csv"
            file_name = "sellers.csv"

            [map]
            zoom = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.top_n, 5);
        assert_eq!(config.tendency_basis, TendencyBasis::AllPayments);
        assert_eq!(config.author.name.as_deref(), Some("Ana"));
        assert_eq!(
            config.author.email.as_deref(),
            Some("kevin.siswoyo28@gmail.com")
        );
        assert_eq!(config.datasets.sellers.file_name, "sellers.csv");
        assert_eq!(config.datasets.customers.file_name, "file_1.csv");
        assert_eq!(config.map.zoom, 6);
        assert_eq!(config.map.radius, 10.0);
    }

    #[test]
    fn invalid_toml_is_reported() {
        assert!(matches!(
            DashboardConfig::from_toml_str("top_n = \"many\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn flags_override_the_file() {
        let cli = Cli::try_parse_from([
            "olist-geo-dashboard",
            "--top-n",
            "3",
            "--tendency-basis",
            "all-payments",
            "--output",
            "out/page.html",
            "--reuse-downloads",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.tendency_basis, TendencyBasis::AllPayments);
        assert_eq!(config.output, PathBuf::from("out/page.html"));
        assert!(config.reuse_downloads);
        assert!(!cli.open);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "olist-geo-dashboard",
            "--config",
            dir.path().join("absent.toml").to_str().unwrap(),
        ])
        .unwrap();
        assert!(matches!(cli.load_config(), Err(ConfigError::Io { .. })));
    }
}
