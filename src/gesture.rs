use std::time::{Duration, Instant};

use crate::types::{Finger, FingerVector, Gesture, Hand, INDEX_TIP, THUMB_TIP};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1_000);
pub const DEFAULT_SWIPE_THRESHOLD_PX: i32 = 150;
pub const DEFAULT_PINCH_THRESHOLD_PX: f32 = 40.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RecognizerConfig {
    /// Minimum time between two triggers of the same gesture.
    pub cooldown: Duration,
    /// Horizontal wrist travel between two frames that counts as a swipe.
    pub swipe_threshold_px: i32,
    /// Thumb-tip to index-tip distance under which the hand is pinching.
    pub pinch_threshold_px: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            pinch_threshold_px: DEFAULT_PINCH_THRESHOLD_PX,
        }
    }
}

/// Third of the frame the wrist is in. Boundaries belong to `Middle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalZone {
    Top,
    Middle,
    Bottom,
}

impl VerticalZone {
    pub fn of(y: i32, frame_height: u32) -> Self {
        let y = f64::from(y);
        let height = f64::from(frame_height);
        if y < height / 3.0 {
            VerticalZone::Top
        } else if y > 2.0 * height / 3.0 {
            VerticalZone::Bottom
        } else {
            VerticalZone::Middle
        }
    }
}

/// Last trigger time per gesture. A gesture that never fired is free.
#[derive(Clone, Debug, Default)]
struct CooldownTable {
    last: [Option<Instant>; Gesture::ALL.len()],
}

impl CooldownTable {
    /// Records `now` whenever it returns true, whether or not the caller
    /// goes on to use the gesture.
    fn try_trigger(&mut self, gesture: Gesture, now: Instant, cooldown: Duration) -> bool {
        let slot = &mut self.last[gesture as usize];
        let ready = match *slot {
            Some(last) => now.saturating_duration_since(last) >= cooldown,
            None => true,
        };
        if ready {
            *slot = Some(now);
        }
        ready
    }
}

pub struct GestureRecognizer {
    config: RecognizerConfig,
    cooldowns: CooldownTable,
    previous_center: Option<(i32, i32)>,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::with_config(RecognizerConfig::default())
    }

    pub fn with_config(config: RecognizerConfig) -> Self {
        Self {
            config,
            cooldowns: CooldownTable::default(),
            previous_center: None,
        }
    }

    /// Feeds one frame and returns the gesture it triggers, if any.
    ///
    /// Without a finger vector (partial keypoints) nothing fires, swipes
    /// included; the wrist still updates the motion reference. Swipes are
    /// checked first and, once a swipe is seen, shape gestures are
    /// skipped for that frame even when the swipe itself is still cooling
    /// down. Shapes are tried in a fixed order and only the first match is
    /// considered.
    pub fn recognize(
        &mut self,
        fingers: Option<FingerVector>,
        hand: Option<&Hand>,
        frame_height: u32,
        now: Instant,
    ) -> Option<Gesture> {
        let Some(center) = hand.and_then(Hand::center) else {
            self.previous_center = None;
            return None;
        };

        let Some(fingers) = fingers else {
            self.previous_center = Some(center);
            return None;
        };

        if let Some(swipe) = self.detect_swipe(center) {
            return self.gate(swipe, now);
        }

        let hand = hand?;
        let candidate = if fingers.count_up() == 5 {
            Some(Gesture::PalmOpen)
        } else if fingers.exactly(&[Finger::Index, Finger::Middle]) {
            Some(Gesture::PeaceSign)
        } else if fingers.exactly(&[Finger::Index]) {
            Some(Gesture::IndexUp)
        } else if fingers.exactly(&[Finger::Index, Finger::Middle, Finger::Ring]) {
            Some(Gesture::ThreeFingersUp)
        } else if self.is_pinching(hand) {
            match VerticalZone::of(center.1, frame_height) {
                VerticalZone::Top => Some(Gesture::PinchVolumeUp),
                VerticalZone::Bottom => Some(Gesture::PinchVolumeDown),
                VerticalZone::Middle => None,
            }
        } else {
            None
        };

        self.gate(candidate?, now)
    }

    fn detect_swipe(&mut self, center: (i32, i32)) -> Option<Gesture> {
        let previous = self.previous_center.replace(center)?;
        let dx = i64::from(center.0) - i64::from(previous.0);
        let threshold = i64::from(self.config.swipe_threshold_px);
        if dx > threshold {
            Some(Gesture::SwipeRight)
        } else if dx < -threshold {
            Some(Gesture::SwipeLeft)
        } else {
            None
        }
    }

    fn is_pinching(&self, hand: &Hand) -> bool {
        let (Some(thumb), Some(index)) = (hand.point(THUMB_TIP), hand.point(INDEX_TIP)) else {
            return false;
        };
        distance(thumb, index) < f64::from(self.config.pinch_threshold_px)
    }

    fn gate(&mut self, gesture: Gesture, now: Instant) -> Option<Gesture> {
        if self
            .cooldowns
            .try_trigger(gesture, now, self.config.cooldown)
        {
            log::debug!("gesture triggered: {gesture}");
            Some(gesture)
        } else {
            log::trace!("gesture {gesture} still cooling down");
            None
        }
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = f64::from(a.0) - f64::from(b.0);
    let dy = f64::from(a.1) - f64::from(b.1);
    (dx * dx + dy * dy).sqrt()
}
