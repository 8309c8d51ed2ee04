use std::{collections::BTreeMap, fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    actions::{Action, ActionError, ActionMap},
    fingers::ThumbDirection,
    gesture::{DEFAULT_PINCH_THRESHOLD_PX, DEFAULT_SWIPE_THRESHOLD_PX, RecognizerConfig},
    types::{Gesture, UnknownGesture},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("queue_depth must be at least 1")]
    EmptyQueue,
    #[error(transparent)]
    Gesture(#[from] UnknownGesture),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Settings for the controller binary. Every field is optional in the file.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub cooldown_secs: f64,
    pub swipe_threshold_px: i32,
    pub pinch_threshold_px: f32,
    pub thumb_direction: ThumbDirection,
    pub queue_depth: usize,
    /// Gesture label to action name; `null` removes the binding.
    pub bindings: BTreeMap<String, Option<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 1.5,
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            pinch_threshold_px: DEFAULT_PINCH_THRESHOLD_PX,
            thumb_direction: ThumbDirection::default(),
            queue_depth: 4,
            bindings: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cooldown_secs > 0.0) || Duration::try_from_secs_f64(self.cooldown_secs).is_err() {
            return Err(ConfigError::NotPositive {
                field: "cooldown_secs",
                value: self.cooldown_secs,
            });
        }
        if self.swipe_threshold_px <= 0 {
            return Err(ConfigError::NotPositive {
                field: "swipe_threshold_px",
                value: f64::from(self.swipe_threshold_px),
            });
        }
        if !(self.pinch_threshold_px > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "pinch_threshold_px",
                value: f64::from(self.pinch_threshold_px),
            });
        }
        if self.queue_depth == 0 {
            return Err(ConfigError::EmptyQueue);
        }
        self.action_map().map(|_| ())
    }

    pub fn recognizer(&self) -> RecognizerConfig {
        RecognizerConfig {
            cooldown: Duration::from_secs_f64(self.cooldown_secs),
            swipe_threshold_px: self.swipe_threshold_px,
            pinch_threshold_px: self.pinch_threshold_px,
        }
    }

    /// Default bindings with the overrides from the file applied on top.
    pub fn action_map(&self) -> Result<ActionMap, ConfigError> {
        let mut map = ActionMap::default();
        for (label, action) in &self.bindings {
            let gesture: Gesture = label.parse()?;
            match action {
                Some(name) => {
                    map.bind(gesture, name.parse::<Action>()?);
                }
                None => {
                    map.unbind(gesture);
                }
            }
        }
        Ok(map)
    }
}
