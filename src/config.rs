use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::view::ViewSettings;

pub const DATA_ENV: &str = "LISTINGS_DATA";
pub const BIND_ENV: &str = "LISTINGS_BIND";
pub const CONFIG_ENV: &str = "LISTINGS_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Runtime settings. Every field has a default, so a JSON config file may
/// name any subset of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listing export loaded once at startup.
    pub data_path: PathBuf,
    /// Address the web dashboard listens on.
    pub bind: SocketAddr,
    pub histogram_bins: usize,
    pub top_n: usize,
    /// Step of the price range slider.
    pub price_step: f64,
    /// Label used when formatting prices.
    pub currency: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("jumia_enhanced_with_ratings.csv"),
            bind: SocketAddr::from(([127, 0, 0, 1], 8050)),
            histogram_bins: 30,
            top_n: 10,
            price_step: 1000.0,
            currency: "KSh".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Build the effective configuration.
    ///
    /// Precedence, lowest first: defaults, `LISTINGS_CONFIG` file,
    /// `LISTINGS_DATA` / `LISTINGS_BIND`, then the first positional argument
    /// as the data path.
    pub fn resolve(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match env(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(data) = env(DATA_ENV) {
            config.data_path = PathBuf::from(data);
        }
        if let Some(bind) = env(BIND_ENV) {
            config.bind = bind
                .parse()
                .with_context(|| format!("{BIND_ENV}={bind} is not a socket address"))?;
        }
        if let Some(path) = args.into_iter().next() {
            config.data_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Configuration from the real process arguments and environment.
    pub fn from_process() -> Result<Self> {
        Self::resolve(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if self.top_n == 0 {
            bail!("top_n must be at least 1");
        }
        if !(self.price_step.is_finite() && self.price_step > 0.0) {
            bail!("price_step must be a positive number (got {})", self.price_step);
        }
        Ok(())
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            histogram_bins: self.histogram_bins,
            top_n: self.top_n,
            currency: self.currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = DashboardConfig::resolve(Vec::new(), env_of(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn positional_argument_beats_environment() {
        let config = DashboardConfig::resolve(
            vec!["cli.csv".to_string()],
            env_of(&[(DATA_ENV, "env.csv"), (BIND_ENV, "0.0.0.0:9000")]),
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("cli.csv"));
        assert_eq!(config.bind.port(), 9000);
    }

    #[test]
    fn bad_bind_address_is_an_error() {
        let err = DashboardConfig::resolve(Vec::new(), env_of(&[(BIND_ENV, "nowhere")]));
        assert!(err.is_err());
    }

    #[test]
    fn partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "top_n": 5, "currency": "USD" }}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config = DashboardConfig::resolve(Vec::new(), env_of(&[(CONFIG_ENV, path.as_str())])).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.currency, "USD");
        assert_eq!(config.histogram_bins, 30);
    }

    #[test]
    fn zero_bins_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "histogram_bins": 0 }}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();
        assert!(DashboardConfig::resolve(Vec::new(), env_of(&[(CONFIG_ENV, path.as_str())])).is_err());
    }
}
