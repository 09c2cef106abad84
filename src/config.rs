//! Run configuration, loaded from an optional TOML file.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};
use crate::parser::ParsePolicy;

pub const DEFAULT_CATALOG_URL: &str = "https://api.nb.no/catalog/v1/items";
pub const DEFAULT_PLACENAME_URL: &str = "https://ws.geonorge.no/stedsnavn/v1/sted";

/// Steinkjer municipality, roughly between Vakkerlifjellet and Skjækervatnet.
pub const DEFAULT_COUNTRY_POINT: [f64; 2] = [368304.0, 7098745.0];

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub placenames: PlaceNameConfig,
    pub http: HttpConfig,
    pub parser: ParserConfig,
    pub geodatabase: GeodatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub page_size: usize,
    pub first_page: usize,
    pub media_filter: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            page_size: 100,
            first_page: 0,
            media_filter: "mediatype:bilder".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlaceNameConfig {
    pub base_url: String,
    /// Output coordinate system (`utkoordsys`)
    pub epsg: u32,
    pub fuzzy: bool,
    pub hits_per_page: u32,
}

impl Default for PlaceNameConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLACENAME_URL.to_string(),
            epsg: 25833,
            fuzzy: true,
            hits_per_page: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_attempts: 2,
            retry_delay_ms: 2000,
            user_agent: concat!("bildested/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Parser settings. Unset options fall back to the preset of the chosen export target.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ParserConfig {
    pub policy: Option<ParsePolicy>,
    pub split_on_whitespace: bool,
    pub drop_placeholders: Option<bool>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            policy: None,
            split_on_whitespace: true,
            drop_placeholders: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeodatabaseConfig {
    pub main_table: String,
    pub point_table_prefix: String,
    /// East/north point used for `Nasjon` rows without a resolved point
    pub fallback_country_point: [f64; 2],
}

impl Default for GeodatabaseConfig {
    fn default() -> Self {
        Self {
            main_table: "bilder".to_string(),
            point_table_prefix: "punkt".to_string(),
            fallback_country_point: DEFAULT_COUNTRY_POINT,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        for (name, raw) in [
            ("catalog.base_url", &self.catalog.base_url),
            ("placenames.base_url", &self.placenames.base_url),
        ] {
            Url::parse(raw).map_err(|e| Error::Config(format!("{} '{}': {}", name, raw, e)))?;
        }

        if self.catalog.page_size == 0 {
            return Err(Error::Config("catalog.page_size must be at least 1".into()));
        }
        if self.placenames.hits_per_page == 0 {
            return Err(Error::Config(
                "placenames.hits_per_page must be at least 1".into(),
            ));
        }
        if self.http.max_attempts == 0 {
            return Err(Error::Config("http.max_attempts must be at least 1".into()));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::Config("http.timeout_secs must be at least 1".into()));
        }
        if self.geodatabase.main_table.trim().is_empty() {
            return Err(Error::Config("geodatabase.main_table is empty".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog.page_size, 100);
        assert_eq!(config.placenames.epsg, 25833);
        assert_eq!(config.geodatabase.fallback_country_point, [368304.0, 7098745.0]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[catalog]\npage_size = 25\n\n[parser]\npolicy = \"token_set\"\n\n[http]\ntimeout_secs = 5"
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.catalog.page_size, 25);
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.parser.policy, Some(ParsePolicy::TokenSet));
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.http.max_attempts, 2);
    }

    #[test]
    fn test_rejects_bad_url() {
        let mut config = Config::default();
        config.placenames.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let mut config = Config::default();
        config.catalog.page_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load_from_file("/nonexistent/bildested.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
