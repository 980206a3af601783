//! Runtime settings.
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file,
//! then `WELLNESS_*` environment variables.
//!
//! ```toml
//! api_base_url = "http://localhost/wellness-backend/api"
//! months_back = 6
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::SourceError;
use crate::fetch::HttpWellnessSource;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_wellness_path")]
    pub wellness_path: String,
    #[serde(default = "default_schools_path")]
    pub schools_path: String,
    #[serde(default = "default_months_back")]
    pub months_back: u32,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    "http://localhost/wellness-backend/api".to_string()
}

fn default_wellness_path() -> String {
    "get_wellness.php".to_string()
}

fn default_schools_path() -> String {
    "get_schools.php".to_string()
}

fn default_months_back() -> u32 {
    6
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            wellness_path: default_wellness_path(),
            schools_path: default_schools_path(),
            months_back: default_months_back(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("WELLNESS").try_parsing(true));

        let config = builder.build().context("failed to read wellness settings")?;
        config
            .try_deserialize()
            .context("invalid wellness settings")
    }

    pub fn source(&self) -> Result<HttpWellnessSource, SourceError> {
        let mut builder = HttpWellnessSource::builder()
            .endpoint(&self.api_base_url)
            .wellness_path(&self.wellness_path)
            .schools_path(&self.schools_path);
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use super::*;

    // Tests that load settings read WELLNESS_* from the shared process env.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn file_values_override_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_base_url = \"https://wellness.example.org/api\"").unwrap();
        writeln!(file, "months_back = 12").unwrap();
        file.flush().unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.api_base_url, "https://wellness.example.org/api");
        assert_eq!(settings.months_back, 12);
        assert_eq!(settings.wellness_path, "get_wellness.php");
        assert_eq!(settings.request_timeout_secs, None);
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "months_back = 12").unwrap();
        file.flush().unwrap();

        std::env::set_var("WELLNESS_MONTHS_BACK", "9");
        std::env::set_var("WELLNESS_REQUEST_TIMEOUT_SECS", "30");
        let from_env = Settings::load(None);
        let over_file = Settings::load(Some(file.path()));
        std::env::remove_var("WELLNESS_MONTHS_BACK");
        std::env::remove_var("WELLNESS_REQUEST_TIMEOUT_SECS");

        let from_env = from_env.unwrap();
        assert_eq!(from_env.months_back, 9);
        assert_eq!(from_env.request_timeout_secs, Some(30));
        assert_eq!(from_env.api_base_url, "http://localhost/wellness-backend/api");
        assert_eq!(over_file.unwrap().months_back, 9);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/wellness.toml")));
        assert!(err.is_err());
    }

    #[test]
    fn defaults_match_backend_layout() {
        let settings = Settings::default();
        assert_eq!(settings.months_back, 6);
        assert!(settings.source().is_ok());
    }
}
