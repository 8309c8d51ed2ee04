use std::{fmt, str::FromStr, time::Instant};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: u8 = 0;
pub const THUMB_TIP: u8 = 4;
pub const INDEX_TIP: u8 = 8;
pub const FINGER_TIPS: [u8; 5] = [4, 8, 12, 16, 20];

/// One tracked hand point in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keypoint {
    pub id: u8,
    pub x: i32,
    pub y: i32,
}

impl Keypoint {
    pub fn new(id: u8, x: i32, y: i32) -> Self {
        Self { id, x, y }
    }
}

/// Keypoints of a single detected hand, addressed by landmark id.
///
/// Ids outside `0..21` are dropped on construction; a later keypoint with the
/// same id replaces an earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hand {
    points: [Option<(i32, i32)>; LANDMARK_COUNT],
}

impl Hand {
    /// Builds a hand from any number of keypoints. Returns `None` when no
    /// usable keypoint is present, which is how the source signals "no hand".
    pub fn from_keypoints<I>(keypoints: I) -> Option<Self>
    where
        I: IntoIterator<Item = Keypoint>,
    {
        let mut hand = Hand::default();
        let mut any = false;
        for kp in keypoints {
            if let Some(slot) = hand.points.get_mut(kp.id as usize) {
                *slot = Some((kp.x, kp.y));
                any = true;
            }
        }
        any.then_some(hand)
    }

    pub fn point(&self, id: u8) -> Option<(i32, i32)> {
        self.points.get(id as usize).copied().flatten()
    }

    /// Wrist position, used as the motion reference.
    pub fn center(&self) -> Option<(i32, i32)> {
        self.point(WRIST)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(self) -> u8 {
        FINGER_TIPS[self as usize]
    }
}

/// Extended/retracted state for thumb through pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerVector(pub [bool; 5]);

impl FingerVector {
    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    pub fn count_up(&self) -> usize {
        self.0.iter().filter(|up| **up).count()
    }

    /// True when exactly the listed fingers are extended.
    pub fn exactly(&self, fingers: &[Finger]) -> bool {
        Finger::ALL
            .iter()
            .all(|f| self.is_up(*f) == fingers.contains(f))
    }
}

impl fmt::Display for FingerVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for up in self.0 {
            f.write_str(if up { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    SwipeLeft,
    SwipeRight,
    PalmOpen,
    PeaceSign,
    IndexUp,
    ThreeFingersUp,
    PinchVolumeUp,
    PinchVolumeDown,
}

impl Gesture {
    pub const ALL: [Gesture; 8] = [
        Gesture::SwipeLeft,
        Gesture::SwipeRight,
        Gesture::PalmOpen,
        Gesture::PeaceSign,
        Gesture::IndexUp,
        Gesture::ThreeFingersUp,
        Gesture::PinchVolumeUp,
        Gesture::PinchVolumeDown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::SwipeLeft => "swipe_left",
            Gesture::SwipeRight => "swipe_right",
            Gesture::PalmOpen => "palm_open",
            Gesture::PeaceSign => "peace_sign",
            Gesture::IndexUp => "index_up",
            Gesture::ThreeFingersUp => "three_fingers_up",
            Gesture::PinchVolumeUp => "pinch_volume_up",
            Gesture::PinchVolumeDown => "pinch_volume_down",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Gesture::SwipeLeft => "Swipe Left",
            Gesture::SwipeRight => "Swipe Right",
            Gesture::PalmOpen => "Palm Open",
            Gesture::PeaceSign => "Peace Sign",
            Gesture::IndexUp => "Index Up",
            Gesture::ThreeFingersUp => "3 Fingers",
            Gesture::PinchVolumeUp => "Pinch Up",
            Gesture::PinchVolumeDown => "Pinch Down",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown gesture label `{0}`")]
pub struct UnknownGesture(pub String);

impl FromStr for Gesture {
    type Err = UnknownGesture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volume_up" => Ok(Gesture::IndexUp),
            "volume_down" => Ok(Gesture::ThreeFingersUp),
            other => Gesture::ALL
                .into_iter()
                .find(|g| g.as_str() == other)
                .ok_or_else(|| UnknownGesture(other.to_string())),
        }
    }
}

/// One frame as delivered by the landmark source.
#[derive(Clone, Debug)]
pub struct LandmarkFrame {
    pub hand: Option<Hand>,
    pub height: u32,
    pub timestamp: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureEvent {
    pub gesture: Gesture,
    pub timestamp: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_lookup_ignores_order_and_bad_ids() {
        let hand = Hand::from_keypoints([
            Keypoint::new(8, 10, 20),
            Keypoint::new(0, 1, 2),
            Keypoint::new(42, 5, 5),
        ])
        .unwrap();

        assert_eq!(hand.center(), Some((1, 2)));
        assert_eq!(hand.point(8), Some((10, 20)));
        assert_eq!(hand.point(4), None);
    }

    #[test]
    fn empty_keypoints_mean_no_hand() {
        assert!(Hand::from_keypoints(Vec::new()).is_none());
        assert!(Hand::from_keypoints([Keypoint::new(30, 0, 0)]).is_none());
    }

    #[test]
    fn finger_vector_exact_match() {
        let v = FingerVector([false, true, true, false, false]);
        assert!(v.exactly(&[Finger::Index, Finger::Middle]));
        assert!(!v.exactly(&[Finger::Index]));
        assert_eq!(v.count_up(), 2);
        assert_eq!(v.to_string(), "01100");
    }

    #[test]
    fn gesture_labels_parse_with_legacy_aliases() {
        for g in Gesture::ALL {
            assert_eq!(g.as_str().parse::<Gesture>(), Ok(g));
        }
        assert_eq!("volume_up".parse::<Gesture>(), Ok(Gesture::IndexUp));
        assert_eq!("volume_down".parse::<Gesture>(), Ok(Gesture::ThreeFingersUp));
        assert!("fist".parse::<Gesture>().is_err());
    }
}
