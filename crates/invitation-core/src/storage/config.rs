//! TOML-based configuration.
//!
//! Stores the event details and the tunables of each page effect:
//! - Event title and countdown target (local date-time)
//! - Countdown timing and ended-state appearance
//! - Reveal observation margin and threshold
//! - Scroll progress bar and parallax layers
//!
//! Configuration is stored at `<config dir>/invitation/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::config_dir;
use crate::countdown::{CountdownSettings, TargetInstant};
use crate::effects::{ParallaxSettings, RevealSettings};
use crate::error::{ConfigError, ValidationError};
use crate::page::Selector;

/// The event being counted down to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Local wall-clock time, `YYYY-MM-DDTHH:MM:SS`.
    #[serde(default = "default_target")]
    pub target: String,
}

/// Countdown timing and appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_ended_opacity")]
    pub ended_opacity: f64,
    #[serde(default = "default_marker_class")]
    pub marker_class: String,
}

/// Reveal-on-scroll configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_reveal_selector")]
    pub selector: Selector,
    #[serde(default = "default_visible_class")]
    pub visible_class: String,
    #[serde(default = "default_bottom_margin_pct")]
    pub bottom_margin_pct: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

/// Scroll progress bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_progress_selector")]
    pub progress_selector: Selector,
}

/// Parallax background layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxConfig {
    #[serde(default = "default_parallax_selector")]
    pub selector: Selector,
    #[serde(default = "default_base_speed")]
    pub base_speed: f64,
    #[serde(default = "default_speed_step")]
    pub speed_step: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<config dir>/invitation/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub event: EventConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub parallax: ParallaxConfig,
}

// Default functions
fn default_title() -> String {
    "Gokulnath & Dhiya Dharshini".into()
}
fn default_target() -> String {
    "2026-03-05T00:00:00".into()
}
fn default_tick_interval_ms() -> u64 {
    1_000
}
fn default_animation_ms() -> u64 {
    300
}
fn default_placeholder() -> String {
    "--".into()
}
fn default_ended_opacity() -> f64 {
    0.5
}
fn default_marker_class() -> String {
    "ticking".into()
}
fn default_reveal_selector() -> Selector {
    Selector::class("reveal-text")
}
fn default_visible_class() -> String {
    "visible".into()
}
fn default_bottom_margin_pct() -> f64 {
    10.0
}
fn default_threshold() -> f64 {
    0.1
}
fn default_initial_delay_ms() -> u64 {
    100
}
fn default_progress_selector() -> Selector {
    Selector::class("scroll-line")
}
fn default_parallax_selector() -> Selector {
    Selector::class("watercolor-bg")
}
fn default_base_speed() -> f64 {
    0.02
}
fn default_speed_step() -> f64 {
    0.005
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            target: default_target(),
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            animation_ms: default_animation_ms(),
            placeholder: default_placeholder(),
            ended_opacity: default_ended_opacity(),
            marker_class: default_marker_class(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: default_reveal_selector(),
            visible_class: default_visible_class(),
            bottom_margin_pct: default_bottom_margin_pct(),
            threshold: default_threshold(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            progress_selector: default_progress_selector(),
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            selector: default_parallax_selector(),
            base_speed: default_base_speed(),
            speed_step: default_speed_step(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let not_a_number = || invalid(format!("cannot parse '{value}' as number"));
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(not_a_number)?
                        } else {
                            return Err(not_a_number());
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown());
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "writing default config");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, keeping the existing type.
    /// Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// or validate.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check values that serde alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        // Resolve, not just parse: a wall-clock time inside a DST gap parses
        // but has no instant to count down to.
        self.target().map_err(|e| invalid("event.target", e.to_string()))?;
        if self.countdown.tick_interval_ms == 0 {
            return Err(invalid("countdown.tick_interval_ms", "must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.countdown.ended_opacity) {
            return Err(invalid("countdown.ended_opacity", "must be within 0..=1".into()));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(invalid("reveal.threshold", "must be within 0..=1".into()));
        }
        if !(0.0..100.0).contains(&self.reveal.bottom_margin_pct) {
            return Err(invalid("reveal.bottom_margin_pct", "must be within 0..100".into()));
        }
        Ok(())
    }

    /// The countdown target resolved in the local timezone.
    pub fn target(&self) -> Result<TargetInstant, ValidationError> {
        TargetInstant::parse(&self.event.target)
    }

    pub fn countdown_settings(&self) -> CountdownSettings {
        CountdownSettings {
            tick_interval: Duration::from_millis(self.countdown.tick_interval_ms),
            animation: Duration::from_millis(self.countdown.animation_ms),
            placeholder: self.countdown.placeholder.clone(),
            ended_opacity: self.countdown.ended_opacity,
            marker_class: self.countdown.marker_class.clone(),
        }
    }

    pub fn reveal_settings(&self) -> RevealSettings {
        RevealSettings {
            selector: self.reveal.selector.clone(),
            visible_class: self.reveal.visible_class.clone(),
            bottom_margin_pct: self.reveal.bottom_margin_pct,
            threshold: self.reveal.threshold,
            initial_delay: Duration::from_millis(self.reveal.initial_delay_ms),
        }
    }

    pub fn parallax_settings(&self) -> ParallaxSettings {
        ParallaxSettings {
            selector: self.parallax.selector.clone(),
            base_speed: self.parallax.base_speed,
            speed_step: self.parallax.speed_step,
        }
    }
}
