//! Locating and loading `javalint.toml`.
//!
//! Candidates are tried in order, first hit wins:
//!
//! 1. `--config <FILE>` (or `$JAVALINT_CONFIG`), used even if missing so the
//!    load step reports the bad path
//! 2. `<project>/javalint.toml`, then `<project>/.javalint.toml`
//! 3. `$JAVALINT_CONFIG_DIR/config.toml`, else `~/.javalint/config.toml`
//! 4. built-in defaults

use anyhow::{Context, Result};
use javalint_core::Config;
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["javalint.toml", ".javalint.toml"];
const GLOBAL_FILE: &str = "config.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the per-user config directory.
    Global(PathBuf),
    /// Nothing found; defaults apply.
    Default,
}

impl ConfigSource {
    /// The config file path, if there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        } else {
            tracing::debug!("Using config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the config source for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    Resolver {
        project_dir,
        global_dir: global_config_dir(),
    }
    .resolve(explicit)
}

/// Resolution inputs, with the global directory injected for tests.
struct Resolver<'a> {
    project_dir: &'a Path,
    global_dir: Option<PathBuf>,
}

impl Resolver<'_> {
    fn resolve(&self, explicit: Option<&Path>) -> ConfigSource {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(path.to_path_buf());
        }

        if let Some(found) = PROJECT_FILES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|candidate| candidate.is_file())
        {
            return ConfigSource::Project(found);
        }

        self.global_dir
            .as_ref()
            .map(|dir| dir.join(GLOBAL_FILE))
            .filter(|candidate| candidate.is_file())
            .map_or(ConfigSource::Default, ConfigSource::Global)
    }
}

/// The per-user config directory: `$JAVALINT_CONFIG_DIR`, else
/// `~/.javalint`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("JAVALINT_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".javalint")))
}
