//! Explorer configuration files.
//!
//! ```toml
//! view = "Position"
//!
//! [toggles]
//! context = false
//! transitive = true
//! ```
//!
//! Omitted toggles keep their defaults. Command-line flags are applied on top
//! with [`ExplorerConfig::apply_overrides`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::visibility::{Toggle, Toggles};

/// Initial toggles and view for an explorer session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Initial view id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Initial toggle state.
    pub toggles: Toggles,
}

impl ExplorerConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] when the document is not valid TOML or
    /// has keys outside the schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(text)?;
        config.view = config.view.filter(|v| !v.trim().is_empty());
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// as [`ExplorerConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), view = ?config.view, "loaded explorer config");
        Ok(config)
    }

    /// Applies `--hide` then `--show` toggle names, and a view override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownToggle`] for an unrecognized name. The
    /// configuration is left unchanged in that case.
    pub fn apply_overrides<S: AsRef<str>>(
        &mut self,
        hide: &[S],
        show: &[S],
        view: Option<&str>,
    ) -> Result<(), ConfigError> {
        let parse = |names: &[S]| -> Result<Vec<Toggle>, ConfigError> {
            names.iter().map(|n| n.as_ref().parse()).collect()
        };
        let hidden = parse(hide)?;
        let shown = parse(show)?;
        for toggle in hidden {
            self.toggles.set(toggle, false);
        }
        for toggle in shown {
            self.toggles.set(toggle, true);
        }
        if let Some(view) = view {
            self.view = Some(view.to_string());
        }
        Ok(())
    }
}
