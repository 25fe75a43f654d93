//! Configuration management for Twinstick GW
//!
//! Handles loading, parsing, and hot-reloading of YAML configuration files.

pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::fs;

use crate::input::gamepad::normalize::NormMode;
use crate::input::gamepad::PadButton;

pub use watcher::ConfigWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mode: TrackerMode,
    #[serde(default = "default_poll_hz")]
    pub poll_hz: u32,
    #[serde(default)]
    pub gamepad: GamepadConfig,
    #[serde(default)]
    pub bindings: BindingsConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default = "default_palm_radius")]
    pub palm_radius: f32,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub sinks: SinksConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: TrackerMode::default(),
            poll_hz: default_poll_hz(),
            gamepad: GamepadConfig::default(),
            bindings: BindingsConfig::default(),
            keys: KeysConfig::default(),
            palm_radius: default_palm_radius(),
            overlay: OverlayConfig::default(),
            sinks: SinksConfig::default(),
        }
    }
}

/// Which surface flow translates tracker sessions into output events
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackerMode {
    #[default]
    Touch,
    Mouse,
    Keys,
}

impl TrackerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerMode::Touch => "touch",
            TrackerMode::Mouse => "mouse",
            TrackerMode::Keys => "keys",
        }
    }
}

impl FromStr for TrackerMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "touch" => Ok(TrackerMode::Touch),
            "mouse" => Ok(TrackerMode::Mouse),
            "keys" => Ok(TrackerMode::Keys),
            other => anyhow::bail!("unknown mode '{}' (expected touch, mouse, or keys)", other),
        }
    }
}

/// Gamepad selection and analog shaping
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct GamepadConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_match: Option<String>,
    #[serde(default)]
    pub analog: AnalogConfig,
}

/// Analog stick configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AnalogConfig {
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
    #[serde(default = "default_gamma")]
    pub gamma: f32,
    #[serde(default)]
    pub norm_mode: NormMode,
    #[serde(default)]
    pub invert: HashMap<String, bool>,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            gamma: default_gamma(),
            norm_mode: NormMode::default(),
            invert: HashMap::new(),
        }
    }
}

/// Per-side activation button bindings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BindingsConfig {
    #[serde(default = "default_left_binding")]
    pub left: SideBinding,
    #[serde(default = "default_right_binding")]
    pub right: SideBinding,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            left: default_left_binding(),
            right: default_right_binding(),
        }
    }
}

/// Button names driving one side's session controls
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SideBinding {
    pub primary: String,
    pub lock: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palm: Option<String>,
}

impl SideBinding {
    /// Parse the bound names into [`PadButton`]s.
    pub fn resolve(&self) -> Result<ResolvedBinding> {
        Ok(ResolvedBinding {
            primary: PadButton::from_str(&self.primary)?,
            lock: PadButton::from_str(&self.lock)?,
            palm: match &self.palm {
                Some(name) => Some(PadButton::from_str(name)?),
                None => None,
            },
        })
    }
}

/// Parsed form of [`SideBinding`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub primary: PadButton,
    pub lock: PadButton,
    pub palm: Option<PadButton>,
}

/// Key-mode symbols, one per direction sector
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeysConfig {
    #[serde(default = "default_key_labels")]
    pub labels: Vec<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            labels: default_key_labels(),
        }
    }
}

/// Overlay rendering configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverlayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_fade_radius")]
    pub fade_radius: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            fade_radius: default_fade_radius(),
        }
    }
}

/// Output sink toggles
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SinksConfig {
    #[serde(default = "default_true")]
    pub console: bool,
}

impl Default for SinksConfig {
    fn default() -> Self {
        Self {
            console: default_true(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path))?;

        // Validate the loaded configuration
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.poll_hz == 0 || self.poll_hz > 1000 {
            anyhow::bail!("poll_hz {} is invalid (must be 1-1000)", self.poll_hz);
        }

        let analog = &self.gamepad.analog;
        if !(0.0..1.0).contains(&analog.deadzone) {
            anyhow::bail!(
                "analog deadzone {} is invalid (must be in [0, 1))",
                analog.deadzone
            );
        }
        if analog.gamma <= 0.0 {
            anyhow::bail!("analog gamma {} is invalid (must be > 0)", analog.gamma);
        }
        for axis in analog.invert.keys() {
            if !matches!(axis.as_str(), "lx" | "ly" | "rx" | "ry") {
                anyhow::bail!(
                    "invert axis '{}' is unknown (expected lx, ly, rx, or ry)",
                    axis
                );
            }
        }

        // Bindings must parse, and no button may serve two roles
        let left = self
            .bindings
            .left
            .resolve()
            .context("Invalid left bindings")?;
        let right = self
            .bindings
            .right
            .resolve()
            .context("Invalid right bindings")?;
        let mut bound: Vec<PadButton> = vec![left.primary, left.lock, right.primary, right.lock];
        bound.extend(left.palm);
        bound.extend(right.palm);
        for (i, a) in bound.iter().enumerate() {
            if bound[i + 1..].contains(a) {
                anyhow::bail!("Button '{}' is bound more than once", a.name());
            }
        }

        if self.keys.labels.len() != 8 {
            anyhow::bail!(
                "keys.labels must have exactly 8 entries (got {})",
                self.keys.labels.len()
            );
        }
        for (idx, label) in self.keys.labels.iter().enumerate() {
            if label.is_empty() {
                anyhow::bail!("keys.labels[{}] cannot be empty", idx);
            }
        }

        if self.palm_radius <= 0.0 || self.palm_radius > 1.0 {
            anyhow::bail!(
                "palm_radius {} is invalid (must be in (0, 1])",
                self.palm_radius
            );
        }
        if self.overlay.fade_radius <= 0.0 || self.overlay.fade_radius > 1.0 {
            anyhow::bail!(
                "overlay fade_radius {} is invalid (must be in (0, 1])",
                self.overlay.fade_radius
            );
        }

        Ok(())
    }
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_poll_hz() -> u32 {
    60
}
fn default_deadzone() -> f32 {
    0.05
}
fn default_gamma() -> f32 {
    1.0
}
fn default_palm_radius() -> f32 {
    0.35
}
fn default_fade_radius() -> f32 {
    0.5
}
fn default_key_labels() -> Vec<String> {
    (1..=8).map(|n| n.to_string()).collect()
}
fn default_left_binding() -> SideBinding {
    SideBinding {
        primary: "lb".to_string(),
        lock: "l3".to_string(),
        palm: None,
    }
}
fn default_right_binding() -> SideBinding {
    SideBinding {
        primary: "rb".to_string(),
        lock: "r3".to_string(),
        palm: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, TrackerMode::Touch);
        assert_eq!(config.poll_hz, 60);
        assert_eq!(config.bindings.left.primary, "lb");
        assert_eq!(config.bindings.right.lock, "r3");
        assert_eq!(config.keys.labels.len(), 8);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.palm_radius, 0.35);
        assert_eq!(config.overlay.fade_radius, 0.5);
        assert!(config.sinks.console);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
mode: keys
poll_hz: 120
gamepad:
  product_match: "pro controller"
  analog:
    deadzone: 0.1
    gamma: 1.5
    norm_mode: radial_clamp
    invert:
      ly: true
bindings:
  left:
    primary: lt
    lock: l3
  right:
    primary: rt
    lock: r3
    palm: b
keys:
  labels: ["a", "b", "c", "d", "e", "f", "g", "h"]
palm_radius: 0.4
overlay:
  enabled: false
  fade_radius: 0.6
sinks:
  console: false
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, TrackerMode::Keys);
        assert_eq!(config.poll_hz, 120);
        assert_eq!(
            config.gamepad.product_match.as_deref(),
            Some("pro controller")
        );
        assert_eq!(config.gamepad.analog.norm_mode, NormMode::RadialClamp);
        assert_eq!(config.gamepad.analog.invert.get("ly"), Some(&true));
        let right = config.bindings.right.resolve().unwrap();
        assert_eq!(right.primary, PadButton::Rt);
        assert_eq!(right.palm, Some(PadButton::B));
        assert!(!config.overlay.enabled);
    }

    #[test]
    fn test_unknown_button_rejected() {
        let yaml = r#"
bindings:
  left:
    primary: turbo
    lock: l3
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid left bindings"));
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let yaml = r#"
bindings:
  left:
    primary: lb
    lock: lb
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bound more than once"));
    }

    #[test]
    fn test_wrong_label_count_rejected() {
        let yaml = r#"
keys:
  labels: ["1", "2", "3"]
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_deadzone_rejected() {
        let yaml = r#"
gamepad:
  analog:
    deadzone: 1.5
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(TrackerMode::from_str("TOUCH").unwrap(), TrackerMode::Touch);
        assert_eq!(TrackerMode::from_str("mouse").unwrap(), TrackerMode::Mouse);
        assert!(TrackerMode::from_str("joystick").is_err());
    }

    #[test]
    fn test_roundtrip_serialization() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(back.validate().is_ok());
        assert_eq!(back.poll_hz, config.poll_hz);
        assert_eq!(back.mode, config.mode);
    }
}
