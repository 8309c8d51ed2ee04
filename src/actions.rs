use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::types::Gesture;

const COARSE_STEP: f32 = 0.1;
const FINE_STEP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    PlayPause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    FineVolumeUp,
    FineVolumeDown,
    ToggleMute,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::PlayPause,
        Action::NextTrack,
        Action::PreviousTrack,
        Action::VolumeUp,
        Action::VolumeDown,
        Action::FineVolumeUp,
        Action::FineVolumeDown,
        Action::ToggleMute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::PlayPause => "play_pause",
            Action::NextTrack => "next_track",
            Action::PreviousTrack => "previous_track",
            Action::VolumeUp => "volume_up",
            Action::VolumeDown => "volume_down",
            Action::FineVolumeUp => "fine_volume_up",
            Action::FineVolumeDown => "fine_volume_down",
            Action::ToggleMute => "toggle_mute",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ActionError::UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),
}

/// Which action each gesture drives. Gestures without a binding are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionMap {
    bindings: [Option<Action>; Gesture::ALL.len()],
}

impl ActionMap {
    pub fn empty() -> Self {
        Self {
            bindings: [None; Gesture::ALL.len()],
        }
    }

    pub fn bind(&mut self, gesture: Gesture, action: Action) -> &mut Self {
        self.bindings[gesture as usize] = Some(action);
        self
    }

    pub fn unbind(&mut self, gesture: Gesture) -> &mut Self {
        self.bindings[gesture as usize] = None;
        self
    }

    pub fn action_for(&self, gesture: Gesture) -> Option<Action> {
        self.bindings[gesture as usize]
    }
}

impl Default for ActionMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(Gesture::PalmOpen, Action::PlayPause)
            .bind(Gesture::SwipeRight, Action::NextTrack)
            .bind(Gesture::SwipeLeft, Action::PreviousTrack)
            .bind(Gesture::IndexUp, Action::VolumeUp)
            .bind(Gesture::ThreeFingersUp, Action::VolumeDown)
            .bind(Gesture::PinchVolumeUp, Action::FineVolumeUp)
            .bind(Gesture::PinchVolumeDown, Action::FineVolumeDown)
            .bind(Gesture::PeaceSign, Action::ToggleMute);
        map
    }
}

/// Performs the platform effect for an action.
pub trait ActionExecutor {
    fn execute(&mut self, action: Action) -> Result<(), ActionError>;
}

/// In-process player/mixer state used when no platform backend is wired in.
#[derive(Clone, Debug, PartialEq)]
pub struct SoftwareMixer {
    pub volume: f32,
    pub muted: bool,
    pub playing: bool,
    pub track: i64,
}

impl SoftwareMixer {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            muted: false,
            playing: false,
            track: 0,
        }
    }

    fn step_volume(&mut self, delta: f32) {
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        log::info!("volume: {:.0}%", self.volume * 100.0);
    }
}

impl Default for SoftwareMixer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl ActionExecutor for SoftwareMixer {
    fn execute(&mut self, action: Action) -> Result<(), ActionError> {
        match action {
            Action::PlayPause => {
                self.playing = !self.playing;
                log::info!("{}", if self.playing { "play" } else { "pause" });
            }
            Action::NextTrack => {
                self.track += 1;
                log::info!("next track ({})", self.track);
            }
            Action::PreviousTrack => {
                self.track -= 1;
                log::info!("previous track ({})", self.track);
            }
            Action::VolumeUp => self.step_volume(COARSE_STEP),
            Action::VolumeDown => self.step_volume(-COARSE_STEP),
            Action::FineVolumeUp => self.step_volume(FINE_STEP),
            Action::FineVolumeDown => self.step_volume(-FINE_STEP),
            Action::ToggleMute => {
                self.muted = !self.muted;
                log::info!("{}", if self.muted { "muted" } else { "unmuted" });
            }
        }
        Ok(())
    }
}

/// Looks up the bound action for `gesture` and runs it. Returns the action
/// that ran, or `None` when the gesture is unbound.
pub fn dispatch<E: ActionExecutor + ?Sized>(
    map: &ActionMap,
    executor: &mut E,
    gesture: Gesture,
) -> Result<Option<Action>, ActionError> {
    let Some(action) = map.action_for(gesture) else {
        log::debug!("no action bound to {gesture}");
        return Ok(None);
    };
    executor.execute(action)?;
    Ok(Some(action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_every_gesture() {
        let map = ActionMap::default();
        for g in Gesture::ALL {
            assert!(map.action_for(g).is_some(), "{g} unbound");
        }
        assert_eq!(map.action_for(Gesture::IndexUp), Some(Action::VolumeUp));
        assert_eq!(
            map.action_for(Gesture::ThreeFingersUp),
            Some(Action::VolumeDown)
        );
    }

    #[test]
    fn volume_steps_clamp() {
        let mut mixer = SoftwareMixer::new(0.95);
        mixer.execute(Action::VolumeUp).unwrap();
        assert_eq!(mixer.volume, 1.0);

        let mut mixer = SoftwareMixer::new(0.02);
        mixer.execute(Action::FineVolumeDown).unwrap();
        assert_eq!(mixer.volume, 0.0);

        let mut mixer = SoftwareMixer::new(0.5);
        mixer.execute(Action::FineVolumeUp).unwrap();
        assert!((mixer.volume - 0.55).abs() < 1e-6);
    }

    #[test]
    fn toggles_and_tracks() {
        let mut mixer = SoftwareMixer::default();
        for action in [
            Action::PlayPause,
            Action::ToggleMute,
            Action::NextTrack,
            Action::NextTrack,
            Action::PreviousTrack,
        ] {
            mixer.execute(action).unwrap();
        }
        assert!(mixer.playing);
        assert!(mixer.muted);
        assert_eq!(mixer.track, 1);
    }

    #[test]
    fn dispatch_respects_rebinding() {
        let mut map = ActionMap::default();
        map.bind(Gesture::PeaceSign, Action::PlayPause)
            .unbind(Gesture::PalmOpen);
        let mut mixer = SoftwareMixer::default();

        assert_eq!(
            dispatch(&map, &mut mixer, Gesture::PeaceSign),
            Ok(Some(Action::PlayPause))
        );
        assert_eq!(dispatch(&map, &mut mixer, Gesture::PalmOpen), Ok(None));
        assert!(mixer.playing);
        assert!(!mixer.muted);
    }

    #[test]
    fn action_names_parse() {
        for a in Action::ALL {
            assert_eq!(a.as_str().parse::<Action>(), Ok(a));
        }
        assert_eq!(
            "louder".parse::<Action>(),
            Err(ActionError::UnknownAction("louder".into()))
        );
    }
}
