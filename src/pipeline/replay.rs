//! Recorded landmark streams, one JSON object per line:
//!
//! ```text
//! {"t": 0.033, "height": 720, "landmarks": [[0, 412, 530], [4, 380, 301]]}
//! ```
//!
//! `t` is seconds since the start of the recording and `landmarks` holds
//! `[id, x, y]` triples. An empty `landmarks` array is a frame with no hand.

use std::{
    io::BufRead,
    time::{Duration, Instant},
};

use serde::Deserialize;
use thiserror::Error;

use super::LandmarkSource;
use crate::types::{Hand, Keypoint, LANDMARK_COUNT, LandmarkFrame};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: landmark id {id} is out of range")]
    BadLandmarkId { line: usize, id: u32 },
    #[error("line {line}: invalid timestamp {t}")]
    BadTimestamp { line: usize, t: f64 },
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    t: f64,
    height: u32,
    #[serde(default)]
    landmarks: Vec<(u32, i32, i32)>,
}

/// Reads frames lazily from any buffered reader.
pub struct ReplaySource<R> {
    reader: R,
    base: Instant,
    line: usize,
    buf: String,
}

impl<R: BufRead> ReplaySource<R> {
    /// Frame timestamps are `base + t`.
    pub fn new(reader: R, base: Instant) -> Self {
        Self {
            reader,
            base,
            line: 0,
            buf: String::new(),
        }
    }

    pub fn read_frame(&mut self) -> Result<Option<LandmarkFrame>, ReplayError> {
        loop {
            self.buf.clear();
            self.line += 1;
            let read = self
                .reader
                .read_line(&mut self.buf)
                .map_err(|source| ReplayError::Io {
                    line: self.line,
                    source,
                })?;
            if read == 0 {
                return Ok(None);
            }
            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            return parse_frame(text, self.line, self.base).map(Some);
        }
    }
}

impl<R: BufRead + Send + 'static> LandmarkSource for ReplaySource<R> {
    fn next_frame(&mut self) -> anyhow::Result<Option<LandmarkFrame>> {
        Ok(self.read_frame()?)
    }
}

fn parse_frame(text: &str, line: usize, base: Instant) -> Result<LandmarkFrame, ReplayError> {
    let raw: RawFrame =
        serde_json::from_str(text).map_err(|source| ReplayError::Parse { line, source })?;

    let offset = Duration::try_from_secs_f64(raw.t)
        .map_err(|_| ReplayError::BadTimestamp { line, t: raw.t })?;

    let mut keypoints = Vec::with_capacity(raw.landmarks.len());
    for (id, x, y) in raw.landmarks {
        if id as usize >= LANDMARK_COUNT {
            return Err(ReplayError::BadLandmarkId { line, id });
        }
        keypoints.push(Keypoint::new(id as u8, x, y));
    }

    Ok(LandmarkFrame {
        hand: Hand::from_keypoints(keypoints),
        height: raw.height,
        timestamp: base + offset,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn source(text: &str) -> (ReplaySource<Cursor<String>>, Instant) {
        let base = Instant::now();
        (ReplaySource::new(Cursor::new(text.to_string()), base), base)
    }

    #[test]
    fn reads_frames_and_skips_blank_lines() {
        let (mut replay, base) = source(
            "{\"t\": 0.0, \"height\": 720, \"landmarks\": [[0, 400, 500], [8, 390, 200]]}\n\
             \n\
             {\"t\": 0.25, \"height\": 720, \"landmarks\": []}\n",
        );

        let first = replay.read_frame().unwrap().unwrap();
        let hand = first.hand.unwrap();
        assert_eq!(hand.center(), Some((400, 500)));
        assert_eq!(hand.point(8), Some((390, 200)));
        assert_eq!(first.height, 720);
        assert_eq!(first.timestamp, base);

        let second = replay.read_frame().unwrap().unwrap();
        assert!(second.hand.is_none());
        assert_eq!(second.timestamp, base + Duration::from_millis(250));

        assert!(replay.read_frame().unwrap().is_none());
    }

    #[test]
    fn missing_landmarks_field_is_no_hand() {
        let (mut replay, _) = source("{\"t\": 1, \"height\": 480}");
        assert!(replay.read_frame().unwrap().unwrap().hand.is_none());
    }

    #[test]
    fn reports_line_numbers() {
        let (mut replay, _) = source("{\"t\": 0, \"height\": 1}\n\nnot json\n");
        replay.read_frame().unwrap();
        assert!(matches!(
            replay.read_frame(),
            Err(ReplayError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn rejects_bad_ids_and_times() {
        let (mut replay, _) = source("{\"t\": 0, \"height\": 1, \"landmarks\": [[21, 0, 0]]}");
        assert!(matches!(
            replay.read_frame(),
            Err(ReplayError::BadLandmarkId { line: 1, id: 21 })
        ));

        let (mut replay, _) = source("{\"t\": -0.5, \"height\": 1}");
        assert!(matches!(
            replay.read_frame(),
            Err(ReplayError::BadTimestamp { line: 1, .. })
        ));
    }
}
