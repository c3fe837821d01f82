use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Runtime settings.
///
/// Layered as defaults, then an optional `housing-search.toml`, then
/// `HOUSING_*` environment variables (e.g. `HOUSING_LISTINGS_URL`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// JSON file with listings, used when no `listings_url` is set
    pub listings_path: String,
    /// Search endpoint; takes precedence over `listings_path`
    pub listings_url: Option<String>,
    /// Initial query string
    pub query: String,
    pub debounce_ms: u64,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::load(Config::builder().add_source(File::with_name("housing-search").required(false)))
    }

    fn load(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let settings = builder
            .set_default("listings_path", "scraped_properties.json")?
            .set_default("query", "")?
            .set_default("debounce_ms", 1000)?
            .set_default("log_level", "info")?
            .add_source(
                Environment::with_prefix("HOUSING")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(settings)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_apply() {
        let settings = Settings::load(Config::builder()).unwrap();
        assert_eq!(settings.listings_path, "scraped_properties.json");
        assert_eq!(settings.listings_url, None);
        assert_eq!(settings.debounce(), Duration::from_millis(1000));
    }

    #[test]
    fn file_overrides_defaults() {
        let builder = Config::builder().add_source(File::from_str(
            r#"
                listings_url = "http://localhost:8080/listings"
                query = "location=Solna"
                debounce_ms = 250
            "#,
            FileFormat::Toml,
        ));
        let settings = Settings::load(builder).unwrap();
        assert_eq!(settings.listings_url.as_deref(), Some("http://localhost:8080/listings"));
        assert_eq!(settings.query, "location=Solna");
        assert_eq!(settings.debounce_ms, 250);
    }
}
