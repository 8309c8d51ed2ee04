use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result, bail};
use crossbeam_channel::bounded;
use gesture_remote::{
    SoftwareMixer,
    actions::dispatch,
    config::AppConfig,
    pipeline::{self, CancellationToken, LandmarkSource, RecognizerSettings, replay::ReplaySource},
};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(replay_arg) = args.next() else {
        bail!("usage: gesture-remote <replay.jsonl|-> [config.json]");
    };
    let config = match args.next() {
        Some(path) => AppConfig::load(&PathBuf::from(&path))
            .with_context(|| format!("failed to load config {path}"))?,
        None => AppConfig::default(),
    };

    let base = Instant::now();
    if replay_arg == "-" {
        run(ReplaySource::new(BufReader::new(io::stdin()), base), &config, base)
    } else {
        let file = File::open(&replay_arg)
            .with_context(|| format!("failed to open replay {replay_arg}"))?;
        run(ReplaySource::new(BufReader::new(file), base), &config, base)
    }
}

fn run<S: LandmarkSource>(source: S, config: &AppConfig, base: Instant) -> Result<()> {
    let actions = config.action_map()?;
    let (frame_tx, frame_rx) = bounded(config.queue_depth);
    let (event_tx, event_rx) = bounded(config.queue_depth);

    let recognizer = pipeline::start_recognizer(
        RecognizerSettings {
            recognizer: config.recognizer(),
            thumb_direction: config.thumb_direction,
        },
        frame_rx,
        event_tx,
    );
    let stream = pipeline::start_source(source, frame_tx, CancellationToken::new());

    let mut mixer = SoftwareMixer::default();
    for event in event_rx.iter() {
        let at = event.timestamp.saturating_duration_since(base);
        log::info!("{:>8.3}s  {}", at.as_secs_f64(), event.gesture.display_name());
        if let Err(err) = dispatch(&actions, &mut mixer, event.gesture) {
            log::warn!("action for {} failed: {err}", event.gesture);
        }
    }

    stream.join().context("landmark replay failed")?;
    if recognizer.join().is_err() {
        bail!("recognizer thread panicked");
    }

    log::info!(
        "final state: volume {:.0}%, muted {}, playing {}, track {}",
        mixer.volume * 100.0,
        mixer.muted,
        mixer.playing,
        mixer.track
    );
    Ok(())
}
