//! Per-entity interaction configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::color::Rgba;
use crate::error::ConfigError;

/// What happens to the immersive session after the overlay is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReenterPolicy {
    /// Always request an immersive session, even if the overlay was opened
    /// from a flat scene
    #[default]
    Always,
    /// Only re-enter if the overlay was opened from an immersive session
    Previous,
}

/// How an action raised during an immersive session is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImmersiveAction {
    /// Drop the action and stop propagation
    #[default]
    Suppress,
    /// Run the action; the overlay path leaves the session first
    Allow,
}

/// Interaction settings attached to one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionConfig {
    /// URL to navigate to or load in the overlay
    #[serde(default)]
    pub target: String,
    #[serde(default = "default_hover_color")]
    pub hover_color: Rgba,
    /// Open the target in an overlay frame instead of navigating away
    #[serde(default)]
    pub open_in_iframe: bool,
    /// Name of the event that triggers the action
    #[serde(default = "default_event")]
    pub event: String,
    #[serde(default)]
    pub grabbable: bool,
    #[serde(default)]
    pub reenter: ReenterPolicy,
    #[serde(default)]
    pub immersive_action: ImmersiveAction,
}

fn default_hover_color() -> Rgba {
    Rgba::YELLOW
}

fn default_event() -> String {
    "click".to_string()
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            hover_color: default_hover_color(),
            open_in_iframe: false,
            event: default_event(),
            grabbable: false,
            reenter: ReenterPolicy::default(),
            immersive_action: ImmersiveAction::default(),
        }
    }
}

impl InteractionConfig {
    /// Parse an attribute string of the form `key: value; key: value`.
    ///
    /// Keys that are not given keep their defaults. Only the first `:` splits
    /// a pair, so URLs with schemes and ports survive intact.
    pub fn from_attribute(attr: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for pair in attr.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = match pair.split_once(':') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (pair, ""),
            };
            config.set(key, value)?;
        }
        Ok(config)
    }

    /// Set a single property by its attribute name
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "target" => self.target = value.to_string(),
            "hoverColor" => self.hover_color = Rgba::parse(value)?,
            "openInIframe" => self.open_in_iframe = parse_bool(key, value)?,
            "event" => {
                self.event = if value.is_empty() {
                    default_event()
                } else {
                    value.to_string()
                }
            }
            "grabbable" => self.grabbable = parse_bool(key, value)?,
            "reenter" => {
                self.reenter = match value {
                    "always" => ReenterPolicy::Always,
                    "previous" => ReenterPolicy::Previous,
                    _ => return Err(invalid(key, value)),
                }
            }
            "immersiveAction" => {
                self.immersive_action = match value {
                    "suppress" => ImmersiveAction::Suppress,
                    "allow" => ImmersiveAction::Allow,
                    _ => return Err(invalid(key, value)),
                }
            }
            _ => return Err(ConfigError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}

impl FromStr for InteractionConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_attribute(s)
    }
}

// A bare boolean property (`grabbable;`) means true, as in HTML.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "" | "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            property: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        property: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColorError;

    #[test]
    fn test_defaults() {
        let config = InteractionConfig::default();
        assert_eq!(config.target, "");
        assert_eq!(config.hover_color, Rgba::YELLOW);
        assert!(!config.open_in_iframe);
        assert_eq!(config.event, "click");
        assert!(!config.grabbable);
        assert_eq!(config.reenter, ReenterPolicy::Always);
        assert_eq!(config.immersive_action, ImmersiveAction::Suppress);
    }

    #[test]
    fn test_from_attribute() {
        let config: InteractionConfig =
            "target: https://example.com:8443/page; hoverColor: #00ff00; openInIframe: true; grabbable"
                .parse()
                .unwrap();
        assert_eq!(config.target, "https://example.com:8443/page");
        assert_eq!(config.hover_color, Rgba::rgb(0.0, 1.0, 0.0));
        assert!(config.open_in_iframe);
        assert!(config.grabbable);
        assert_eq!(config.event, "click");
    }

    #[test]
    fn test_from_attribute_errors() {
        assert_eq!(
            InteractionConfig::from_attribute("colour: red"),
            Err(ConfigError::UnknownProperty("colour".to_string()))
        );
        assert!(matches!(
            InteractionConfig::from_attribute("openInIframe: yes"),
            Err(ConfigError::InvalidBoolean { .. })
        ));
        assert_eq!(
            InteractionConfig::from_attribute("hoverColor: blurple"),
            Err(ConfigError::Color(ColorError::UnknownName("blurple".to_string())))
        );
        assert!(matches!(
            InteractionConfig::from_attribute("reenter: sometimes"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_deserialize_toml() {
        let config: InteractionConfig = toml::from_str(
            r#"
            target = "https://example.com"
            hoverColor = "orange"
            reenter = "previous"
            immersiveAction = "allow"
            "#,
        )
        .unwrap();
        assert_eq!(config.target, "https://example.com");
        assert_eq!(config.hover_color.to_u8(), [255, 165, 0, 255]);
        assert_eq!(config.reenter, ReenterPolicy::Previous);
        assert_eq!(config.immersive_action, ImmersiveAction::Allow);
        assert_eq!(config.event, "click");
    }
}
