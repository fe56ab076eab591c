use std::path::PathBuf;

use serde::Deserialize;

use crate::enrich::ENRICHMENT_CAP;
use crate::error::CatalogResult;

const ENV_PREFIX: &str = "CINE_";

/// Application configuration loaded from `CINE_`-prefixed environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// TMDB API key; poster enrichment is skipped when unset
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with a result's `poster_path`
    #[serde(default = "default_tmdb_image_base")]
    pub tmdb_image_base: String,

    /// Maximum number of records looked up per enrichment pass
    #[serde(default = "default_enrichment_cap")]
    pub enrichment_cap: usize,

    /// SQLite file holding the durable slot (defaults to the user data directory)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory for resized poster thumbnails (defaults to the user cache directory)
    #[serde(default)]
    pub poster_cache_dir: Option<PathBuf>,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base() -> String {
    "https://image.tmdb.org/t/p/w300".to_string()
}

fn default_enrichment_cap() -> usize {
    ENRICHMENT_CAP
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            tmdb_image_base: default_tmdb_image_base(),
            enrichment_cap: default_enrichment_cap(),
            database_path: None,
            poster_cache_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment (and a `.env` file if present)
    pub fn from_env() -> CatalogResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// A variable that fails to parse is logged and dropped, so its field
    /// keeps the default while every valid variable still applies.
    pub fn from_vars<I>(vars: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars
            .into_iter()
            .filter(|(name, _)| name.starts_with(ENV_PREFIX))
            .collect();

        if let Ok(config) = Self::parse(vars.clone()) {
            return Ok(config);
        }

        let valid: Vec<(String, String)> = vars
            .into_iter()
            .filter(|var| match Self::parse([var.clone()]) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(variable = %var.0, error = %e, "Ignoring invalid configuration variable");
                    false
                }
            })
            .collect();

        Self::parse(valid)
    }

    fn parse<I>(vars: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(vars)?)
    }

    /// API key, if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
