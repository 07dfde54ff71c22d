//! Window manager configuration.

use crate::error::ConfigError;
use crate::presentation::Modality;
use serde::Deserialize;
use std::path::Path;

/// Where the active window goes when the active window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseFocus {
  /// Fall back to the most recently activated window that is still open.
  #[default]
  MostRecentlyActivated,
  /// Leave no window active until the host reports a new activation.
  Clear,
}

/// Settings for a [`WindowManager`](crate::WindowManager).
///
/// Every field has a default, so an empty document is a valid configuration:
///
/// ```yaml
/// default_modality: modeless
/// close_focus: most_recently_activated
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowManagerConfig {
  /// Modality used by [`WindowManager::show_default`](crate::WindowManager::show_default).
  pub default_modality: Modality,
  pub close_focus: CloseFocus,
}

impl WindowManagerConfig {
  /// Parses a configuration from a YAML document.
  pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
    if source.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
  }

  /// Reads and parses a YAML configuration file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let config = Self::from_yaml_str(&source)?;
    tracing::debug!(path = %path.display(), ?config, "loaded window manager configuration");
    Ok(config)
  }
}
