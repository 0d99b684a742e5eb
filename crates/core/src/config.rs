//! Application configuration: defaults, optional TOML file, environment.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{import::ImportSchema, report::OVER_UTILIZED_THRESHOLD};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "staffboard";
/// Prefix for environment overrides, e.g. `STAFFBOARD_DELIMITER=;`.
pub const ENV_PREFIX: &str = "STAFFBOARD";

const DEFAULT_CONFIG: &str = r#"# staffboard configuration

# Where snapshots, reports and logs are written. A leading ~ is the home directory.
# data_dir = "~/.local/share/staffboard"

# Column separator for imported sheets. Quoting is not supported.
delimiter = ","

# "lenient" accepts any header; "strict" requires projects, programmers, qa and pm.
schema = "lenient"

# Resources with more assignments than this are reported as over-utilized.
over_utilized_threshold = 3

# Persist the model after every change.
autosave = true
"#;

/// Runtime settings shared by the core and the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root for snapshots, reports and logs.
    pub data_dir: PathBuf,
    /// Column separator for imported sheets; only the first character counts.
    pub delimiter: String,
    /// Header validation mode.
    pub schema: ImportSchema,
    /// Assignment count above which a resource is over-utilized.
    pub over_utilized_threshold: usize,
    /// Persist after every change.
    pub autosave: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            delimiter: ",".to_string(),
            schema: ImportSchema::default(),
            over_utilized_threshold: OVER_UTILIZED_THRESHOLD,
            autosave: true,
        }
    }
}

impl AppConfig {
    /// Load from the default config file location plus environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load using `path` as the (optional) config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("delimiter", defaults.delimiter)?
            .set_default("schema", "lenient")?
            .set_default(
                "over_utilized_threshold",
                defaults.over_utilized_threshold as i64,
            )?
            .set_default("autosave", defaults.autosave)?
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build configuration")?;
        let mut config: Self = settings
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        config.data_dir = expand_home(&config.data_dir);
        Ok(config)
    }

    /// First character of `delimiter`, falling back to a comma.
    pub fn delimiter_char(&self) -> char {
        self.delimiter.chars().next().unwrap_or(',')
    }

    /// Root of the snapshot blob store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    /// Directory exported reports are written to.
    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }

    /// Directory holding `staffboard.log`.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Location of the user config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Resolve a leading `~` against the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

/// Write a commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_loads() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("staffboard").join("config.toml");
        write_default_config(path.clone())?;
        assert!(path.exists());

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.delimiter_char(), ',');
        assert_eq!(config.schema, ImportSchema::Lenient);
        assert_eq!(config.over_utilized_threshold, 3);
        assert!(config.autosave);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "delimiter = \";\"\nschema = \"strict\"\nover_utilized_threshold = 5\ndata_dir = \"/tmp/sb\"\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.delimiter_char(), ';');
        assert_eq!(config.schema, ImportSchema::Strict);
        assert_eq!(config.over_utilized_threshold, 5);
        assert_eq!(config.store_dir(), PathBuf::from("/tmp/sb/state"));
        Ok(())
    }

    #[test]
    fn data_dir_expands_home() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_dir = \"~/.local/share/staffboard\"\n")?;

        let config = AppConfig::load_from(&path)?;
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.data_dir, home.join(".local/share/staffboard"));
        }

        assert_eq!(
            expand_home(Path::new("/srv/staffboard")),
            PathBuf::from("/srv/staffboard")
        );
        assert_eq!(expand_home(Path::new("~user/x")), PathBuf::from("~user/x"));
        Ok(())
    }

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.delimiter, ",");
        Ok(())
    }
}
