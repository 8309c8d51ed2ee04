mod recognizer;
pub mod replay;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::Result;
use crossbeam_channel::{SendTimeoutError, Sender};

use crate::types::LandmarkFrame;

pub use recognizer::{RecognizerSettings, start_recognizer};

const SEND_POLL: Duration = Duration::from_millis(50);

/// Anything that yields landmark frames: a camera plus hand tracker, a
/// recorded replay, a test fixture.
pub trait LandmarkSource: Send + 'static {
    /// `Ok(None)` marks the end of the stream.
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>>;
}

impl<I> LandmarkSource for I
where
    I: Iterator<Item = LandmarkFrame> + Send + 'static,
{
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        Ok(self.next())
    }
}

/// Shared stop signal for the frame loop.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Handle to a running source thread. Dropping it stops the source.
#[derive(Debug)]
pub struct SourceStream {
    token: CancellationToken,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl SourceStream {
    /// Waits for the source to finish on its own and reports how it ended.
    pub fn join(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| anyhow::anyhow!("landmark source thread panicked"))?,
            None => Ok(()),
        }
    }

    pub fn stop(self) -> Result<()> {
        self.token.cancel();
        self.join()
    }
}

impl Drop for SourceStream {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Pumps frames from `source` into `frame_tx` on the calling thread until
/// the stream ends, the receiver goes away, or `token` is cancelled.
/// Returns the number of frames forwarded.
pub fn run_source<S: LandmarkSource>(
    mut source: S,
    frame_tx: &Sender<LandmarkFrame>,
    token: &CancellationToken,
) -> Result<usize> {
    let mut sent = 0;
    while !token.is_cancelled() {
        let Some(mut frame) = source.next_frame()? else {
            log::info!("landmark source finished after {sent} frames");
            break;
        };

        // Block while the recognizer is busy so no frame is dropped; swipe
        // detection compares consecutive frames.
        loop {
            match frame_tx.send_timeout(frame, SEND_POLL) {
                Ok(()) => {
                    sent += 1;
                    break;
                }
                Err(SendTimeoutError::Timeout(back)) => {
                    if token.is_cancelled() {
                        return Ok(sent);
                    }
                    frame = back;
                }
                Err(SendTimeoutError::Disconnected(_)) => {
                    log::warn!("recognizer stopped; dropping landmark source");
                    return Ok(sent);
                }
            }
        }
    }
    Ok(sent)
}

/// Runs `source` on its own thread. The channel closes when it ends.
pub fn start_source<S: LandmarkSource>(
    source: S,
    frame_tx: Sender<LandmarkFrame>,
    token: CancellationToken,
) -> SourceStream {
    let worker_token = token.clone();
    let handle = thread::spawn(move || {
        let result = run_source(source, &frame_tx, &worker_token).map(|_| ());
        if let Err(err) = &result {
            log::warn!("landmark source failed: {err:?}");
        }
        result
    });

    SourceStream {
        token,
        handle: Some(handle),
    }
}
