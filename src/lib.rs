//! Hand-gesture remote control: turns per-frame hand keypoints into
//! debounced playback and volume gestures.

pub mod actions;
pub mod config;
pub mod fingers;
pub mod gesture;
pub mod pipeline;
pub mod types;

pub use actions::{Action, ActionExecutor, ActionMap, SoftwareMixer};
pub use fingers::{FingerStateClassifier, ThumbDirection};
pub use gesture::{GestureRecognizer, RecognizerConfig};
pub use types::{FingerVector, Gesture, GestureEvent, Hand, Keypoint, LandmarkFrame};
