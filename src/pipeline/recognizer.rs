use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::{
    fingers::{FingerStateClassifier, ThumbDirection},
    gesture::{GestureRecognizer, RecognizerConfig},
    types::{GestureEvent, LandmarkFrame},
};

#[derive(Clone, Debug, Default)]
pub struct RecognizerSettings {
    pub recognizer: RecognizerConfig,
    pub thumb_direction: ThumbDirection,
}

fn run_worker_loop(
    settings: RecognizerSettings,
    frame_rx: Receiver<LandmarkFrame>,
    event_tx: Sender<GestureEvent>,
) {
    let classifier = FingerStateClassifier::new(settings.thumb_direction);
    let mut recognizer = GestureRecognizer::with_config(settings.recognizer);

    for frame in frame_rx.iter() {
        let hand = frame.hand.as_ref();
        let fingers = classifier.fingers_up(hand);
        if let Some(fingers) = fingers {
            log::trace!("fingers {fingers}");
        }

        let Some(gesture) = recognizer.recognize(fingers, hand, frame.height, frame.timestamp)
        else {
            continue;
        };

        let event = GestureEvent {
            gesture,
            timestamp: frame.timestamp,
        };
        if event_tx.send(event).is_err() {
            log::warn!("gesture consumer went away; stopping recognizer");
            break;
        }
    }
}

/// Spawns the single recognizer thread. It owns all recognizer state, so
/// frames from any number of producers are handled one at a time in queue
/// order. The thread exits once every frame sender is dropped.
pub fn start_recognizer(
    settings: RecognizerSettings,
    frame_rx: Receiver<LandmarkFrame>,
    event_tx: Sender<GestureEvent>,
) -> thread::JoinHandle<()> {
    log::info!(
        "starting gesture recognizer (cooldown {:?}, swipe {} px, pinch {} px)",
        settings.recognizer.cooldown,
        settings.recognizer.swipe_threshold_px,
        settings.recognizer.pinch_threshold_px,
    );

    thread::spawn(move || run_worker_loop(settings, frame_rx, event_tx))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::{fingers::tests::hand_with, types::Gesture};

    fn frame(fingers: [bool; 5], wrist_x: i32, t0: Instant, ms: u64) -> LandmarkFrame {
        LandmarkFrame {
            hand: Some(hand_with(fingers, (wrist_x, 500))),
            height: 720,
            timestamp: t0 + Duration::from_millis(ms),
        }
    }

    #[test]
    fn worker_emits_debounced_events() {
        let (frame_tx, frame_rx) = crossbeam_channel::bounded(4);
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let settings = RecognizerSettings {
            recognizer: RecognizerConfig {
                cooldown: Duration::from_millis(1_500),
                ..Default::default()
            },
            ..Default::default()
        };
        let handle = start_recognizer(settings, frame_rx, event_tx);

        let t0 = Instant::now();
        let index = [false, true, false, false, false];
        let palm = [true; 5];
        let producer = thread::spawn(move || {
            for i in 0..10 {
                frame_tx.send(frame(index, 400, t0, i * 100)).unwrap();
            }
            frame_tx
                .send(LandmarkFrame {
                    hand: None,
                    height: 720,
                    timestamp: t0 + Duration::from_millis(1_000),
                })
                .unwrap();
            frame_tx.send(frame(palm, 400, t0, 1_100)).unwrap();
            frame_tx.send(frame(palm, 600, t0, 1_200)).unwrap();
        });

        producer.join().unwrap();
        handle.join().unwrap();
        let events: Vec<_> = event_rx.iter().collect();

        let gestures: Vec<_> = events.iter().map(|e| e.gesture).collect();
        assert_eq!(
            gestures,
            vec![Gesture::IndexUp, Gesture::PalmOpen, Gesture::SwipeRight]
        );
        assert_eq!(events[0].timestamp, t0);
        assert_eq!(events[2].timestamp, t0 + Duration::from_millis(1_200));
    }
}
