//! Runtime settings shared by the lifecycle synchronizer and the engines.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable naming a settings file for binaries.
pub const SETTINGS_ENV: &str = "TRELLIS_SETTINGS";

const KNOWN_FIELDS: [&str; 4] = [
    "frame_deferral",
    "tooltip_gap_px",
    "announcement_politeness",
    "placeholder_attribute",
];

/// `aria-live` politeness of the sort announcement region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Politeness {
    /// Announce when the user is idle.
    #[default]
    Polite,
    /// Interrupt the current announcement.
    Assertive,
    /// Do not announce.
    Off,
}

impl Politeness {
    /// `aria-live` attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
            Self::Off => "off",
        }
    }
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Animation frames to wait after the first render before enhancing.
    pub frame_deferral: u32,
    /// Gap between a trigger and its floating panel, in CSS pixels.
    pub tooltip_gap_px: f64,
    /// Politeness of live announcement regions.
    pub announcement_politeness: Politeness,
    /// Attribute marking content placeholders in rendered templates.
    pub placeholder_attribute: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_deferral: 1,
            tooltip_gap_px: 5.0,
            announcement_politeness: Politeness::Polite,
            placeholder_attribute: "data-trellis-placeholder".to_string(),
        }
    }
}

impl Settings {
    /// Decode and validate a settings document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is not an object, names an
    /// unknown field, fails to decode, or holds an out-of-range value.
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        let map = value.as_object().ok_or(ConfigError::NotAnObject)?;
        if let Some(field) = map
            .keys()
            .find(|key| !KNOWN_FIELDS.contains(&key.as_str()))
        {
            return Err(ConfigError::UnknownField {
                field: field.clone(),
            });
        }
        let settings: Self = serde_json::from_value(value.clone())
            .map_err(|source| ConfigError::Parse { source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read a JSON settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// errors of [`Settings::from_value`].
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { source })?;
        let settings = Self::from_value(&value)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.frame_deferral == 0 {
            return Err(invalid("frame_deferral", "must be at least 1"));
        }
        if !self.tooltip_gap_px.is_finite() || self.tooltip_gap_px < 0.0 {
            return Err(invalid(
                "tooltip_gap_px",
                "must be a finite, non-negative number",
            ));
        }
        let attribute = self.placeholder_attribute.as_str();
        if attribute.is_empty()
            || !attribute
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(invalid(
                "placeholder_attribute",
                "must be a non-empty attribute name",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.to_string(),
        message: message.to_string(),
    }
}
