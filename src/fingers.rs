use serde::Deserialize;

use crate::types::{Finger, FingerVector, Hand};

/// Horizontal test used for the thumb.
///
/// The default matches a mirrored camera image of a right hand. Other
/// handedness/orientation combinations need the opposite comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbDirection {
    #[default]
    TipRightOfJoint,
    TipLeftOfJoint,
}

/// Derives which fingers are extended from a single frame of keypoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct FingerStateClassifier {
    thumb_direction: ThumbDirection,
}

impl FingerStateClassifier {
    pub fn new(thumb_direction: ThumbDirection) -> Self {
        Self { thumb_direction }
    }

    /// Returns `None` when there is no hand or any keypoint the tests need is
    /// missing.
    pub fn fingers_up(&self, hand: Option<&Hand>) -> Option<FingerVector> {
        let hand = hand?;
        let mut states = [false; 5];
        for finger in Finger::ALL {
            states[finger as usize] = match finger {
                Finger::Thumb => classify_thumb(hand, self.thumb_direction)?,
                _ => classify_finger(hand, finger.tip())?,
            };
        }
        Some(FingerVector(states))
    }
}

// Thumb tip against the joint directly below it, compared on x.
fn classify_thumb(hand: &Hand, direction: ThumbDirection) -> Option<bool> {
    let tip = Finger::Thumb.tip();
    let (tip_x, _) = hand.point(tip)?;
    let (joint_x, _) = hand.point(tip - 1)?;
    Some(match direction {
        ThumbDirection::TipRightOfJoint => tip_x > joint_x,
        ThumbDirection::TipLeftOfJoint => tip_x < joint_x,
    })
}

// Fingertip above its middle joint (smaller y) means the finger points up.
fn classify_finger(hand: &Hand, tip: u8) -> Option<bool> {
    let (_, tip_y) = hand.point(tip)?;
    let (_, pip_y) = hand.point(tip - 2)?;
    Some(tip_y < pip_y)
}
