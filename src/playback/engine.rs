//! Engine running one clip through the whole device to source chain.

use super::{CancelToken, PlaybackConfig, PlaybackHandle};
use crate::backend::{AudioBackend, BufferFormat, SourceState, default_backend};
use crate::resources::{CurrentContext, Device, Source};
use crate::wav::{self, PcmPayload, WavFormat};
use crate::{AudioError, AudioResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

static PLAYBACK_THREADS: AtomicUsize = AtomicUsize::new(0);

/// Step a playback has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackStage {
    /// Nothing done yet.
    Idle,
    /// Parsing the WAV stream.
    Decoding,
    /// Output device opened.
    DeviceOpen,
    /// Context created and current on the playback thread.
    ContextActive,
    /// PCM uploaded into a buffer.
    BufferLoaded,
    /// Source started.
    Playing,
    /// Source finished and every object released.
    Completed,
}

/// What happened during a successful playback.
#[derive(Debug, Clone)]
pub struct PlaybackReport {
    /// Format of the clip.
    pub format: WavFormat,
    /// Device the clip was played on.
    pub device_name: String,
    /// Stages in the order they were reached.
    pub stages: Vec<PlaybackStage>,
    /// Source state observed right after starting it.
    pub state_after_play: SourceState,
    /// Source state that ended the wait.
    pub final_state: SourceState,
    /// Number of state queries while waiting.
    pub polls: u32,
    /// Wall time from decode to teardown.
    pub elapsed: Duration,
}

#[derive(Debug)]
struct StageLog(Vec<PlaybackStage>);

impl StageLog {
    fn new() -> Self {
        Self(vec![PlaybackStage::Idle])
    }

    fn enter(&mut self, stage: PlaybackStage) {
        debug!(?stage, "playback stage");
        self.0.push(stage);
    }
}

struct WaitOutcome {
    state_after_play: SourceState,
    final_state: SourceState,
    polls: u32,
}

fn unavailable(err: AudioError) -> AudioError {
    match err {
        AudioError::DeviceUnavailable(_) => err,
        other => AudioError::DeviceUnavailable(other.to_string()),
    }
}

/// Plays whole WAV clips through an [`AudioBackend`].
///
/// Each playback opens its own device and context, uploads the clip, waits
/// for the source to finish and releases everything again, on success and
/// on every error path. Playbacks started with [`spawn`](Self::spawn) run on
/// their own threads and can overlap.
#[derive(Clone)]
pub struct PlaybackEngine {
    backend: Arc<dyn AudioBackend>,
    config: PlaybackConfig,
}

impl fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PlaybackEngine {
    /// Engine with the default configuration.
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self::with_config(backend, PlaybackConfig::default())
    }

    /// Engine with a custom configuration.
    pub fn with_config(backend: Arc<dyn AudioBackend>, config: PlaybackConfig) -> Self {
        Self { backend, config }
    }

    /// Engine on the crate's [`default_backend`].
    pub fn with_default_backend() -> Self {
        Self::new(default_backend())
    }

    /// Backend in use.
    pub fn backend(&self) -> &Arc<dyn AudioBackend> {
        &self.backend
    }

    /// Active configuration.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Decode `bytes` and play them to the end, blocking the calling thread.
    ///
    /// The calling thread must not have a context current.
    pub fn play_from_memory(&self, bytes: &[u8]) -> AudioResult<PlaybackReport> {
        self.play_from_memory_with(bytes, &CancelToken::new())
    }

    /// [`play_from_memory`](Self::play_from_memory) that stops early when
    /// `cancel` fires, returning [`AudioError::Cancelled`].
    pub fn play_from_memory_with(
        &self,
        bytes: &[u8],
        cancel: &CancelToken,
    ) -> AudioResult<PlaybackReport> {
        let started = Instant::now();
        let mut stages = StageLog::new();
        stages.enter(PlaybackStage::Decoding);
        let (format, payload) = wav::read_wav_from_memory(bytes)?;
        self.run(format, &payload, cancel, stages, started)
    }

    /// Decode a WAV file and play it to the end.
    pub fn play_file(&self, path: impl AsRef<Path>) -> AudioResult<PlaybackReport> {
        let started = Instant::now();
        let mut stages = StageLog::new();
        stages.enter(PlaybackStage::Decoding);
        let (format, payload) = wav::read_wav_file(path)?;
        self.run(format, &payload, &CancelToken::new(), stages, started)
    }

    /// Play an already decoded clip.
    pub fn play_decoded(
        &self,
        format: &WavFormat,
        payload: &PcmPayload,
        cancel: &CancelToken,
    ) -> AudioResult<PlaybackReport> {
        self.run(format.clone(), payload, cancel, StageLog::new(), Instant::now())
    }

    /// Play `bytes` on a new thread.
    ///
    /// The thread has its own context, so any number of spawned playbacks
    /// can share one backend.
    pub fn spawn(&self, bytes: impl Into<Vec<u8>>) -> AudioResult<PlaybackHandle> {
        let bytes = bytes.into();
        let engine = self.clone();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let name = format!("playback-{}", PLAYBACK_THREADS.fetch_add(1, Ordering::Relaxed));

        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn(move || engine.play_from_memory_with(&bytes, &token))
            .map_err(|e| AudioError::hardware("spawn playback", e.to_string()))?;
        Ok(PlaybackHandle::new(name, cancel, thread))
    }

    fn run(
        &self,
        format: WavFormat,
        payload: &PcmPayload,
        cancel: &CancelToken,
        mut stages: StageLog,
        started: Instant,
    ) -> AudioResult<PlaybackReport> {
        let buffer_format = format.buffer_format()?;
        if cancel.is_cancelled() {
            return Err(AudioError::Cancelled);
        }

        let device = Device::open(Arc::clone(&self.backend), self.config.device_name.as_deref())
            .map_err(unavailable)?;
        stages.enter(PlaybackStage::DeviceOpen);
        let context = device.create_context().map_err(unavailable)?;
        let current = context.make_current().map_err(unavailable)?;
        stages.enter(PlaybackStage::ContextActive);

        let outcome = self.play_in_context(
            &current,
            buffer_format,
            &format,
            payload,
            cancel,
            &mut stages,
        );
        drop(current);
        let outcome = outcome?;

        let device_name = device.name().to_string();
        context.destroy()?;
        device.close()?;
        stages.enter(PlaybackStage::Completed);

        let elapsed = started.elapsed();
        info!(
            device = %device_name,
            frames = format.frame_count(payload.len()),
            polls = outcome.polls,
            ?elapsed,
            "playback finished"
        );
        Ok(PlaybackReport {
            format,
            device_name,
            stages: stages.0,
            state_after_play: outcome.state_after_play,
            final_state: outcome.final_state,
            polls: outcome.polls,
            elapsed,
        })
    }

    fn play_in_context(
        &self,
        current: &CurrentContext<'_>,
        buffer_format: BufferFormat,
        format: &WavFormat,
        payload: &PcmPayload,
        cancel: &CancelToken,
        stages: &mut StageLog,
    ) -> AudioResult<WaitOutcome> {
        let mut source = current.create_source()?;
        let buffer = current.create_buffer()?;
        buffer.set_data(buffer_format, payload.as_bytes(), format.sample_rate)?;
        stages.enter(PlaybackStage::BufferLoaded);

        source.set_buffer(&buffer)?;
        source.set_gain(self.config.gain)?;
        source.set_pitch(self.config.pitch)?;
        if let Some(position) = self.config.source_position {
            source.set_position(position)?;
        }
        if let Some(gain) = self.config.listener_gain {
            current.listener().set_gain(gain)?;
        }

        source.play()?;
        let state_after_play = source.state()?;
        stages.enter(PlaybackStage::Playing);

        let (final_state, polls) = self.wait(&source, cancel)?;
        Ok(WaitOutcome {
            state_after_play,
            final_state,
            polls,
        })
    }

    /// Poll until the source leaves the playing state, backing off from
    /// `poll_interval` to `max_poll_interval` and sleeping on `cancel`.
    fn wait(&self, source: &Source<'_>, cancel: &CancelToken) -> AudioResult<(SourceState, u32)> {
        let timeout = self.config.timeout();
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let max_interval = self.config.max_poll_interval();
        let mut interval = self.config.poll_interval();
        let mut polls = 0u32;

        loop {
            let state = source.state()?;
            polls += 1;
            if state != SourceState::Playing {
                return Ok((state, polls));
            }

            let mut sleep = interval;
            if let (Some(deadline), Some(timeout)) = (deadline, timeout) {
                let now = Instant::now();
                if now >= deadline {
                    source.stop()?;
                    return Err(AudioError::TimedOut(timeout));
                }
                sleep = sleep.min(deadline - now);
            }

            if cancel.wait_timeout(sleep) {
                source.stop()?;
                return Err(AudioError::Cancelled);
            }
            interval = interval.saturating_mul(2).min(max_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ClockRenderer, SoftBackend};
    use crate::wav::encode_wav;

    fn clip(seconds: f32, sample_rate: u32, channels: u16) -> Vec<u8> {
        let frames = (seconds * sample_rate as f32) as usize;
        let step = crate::utils::period(440, sample_rate);
        let payload: Vec<u8> = (0..frames)
            .flat_map(|n| {
                let sample = ((n as f64 * step).sin() * 8000.0) as i16;
                std::iter::repeat_n(sample, usize::from(channels))
            })
            .flat_map(i16::to_le_bytes)
            .collect();
        encode_wav(&WavFormat::new_pcm(channels, sample_rate, 16), &payload).unwrap()
    }

    fn engine(time_scale: f64, config: PlaybackConfig) -> (Arc<SoftBackend>, PlaybackEngine) {
        let soft = Arc::new(SoftBackend::new(
            ClockRenderer::new().with_time_scale(time_scale),
        ));
        let engine = PlaybackEngine::with_config(soft.clone(), config);
        (soft, engine)
    }

    #[test]
    fn test_one_second_clip_plays_to_completion() {
        let (soft, engine) = engine(20.0, PlaybackConfig::responsive());
        let report = engine.play_from_memory(&clip(1.0, 8000, 1)).unwrap();

        assert_eq!(report.state_after_play, SourceState::Playing);
        assert_eq!(report.final_state, SourceState::Stopped);
        assert_eq!(report.format.channels, 1);
        assert_eq!(report.device_name, "Clock Output");
        assert_eq!(
            report.stages,
            vec![
                PlaybackStage::Idle,
                PlaybackStage::Decoding,
                PlaybackStage::DeviceOpen,
                PlaybackStage::ContextActive,
                PlaybackStage::BufferLoaded,
                PlaybackStage::Playing,
                PlaybackStage::Completed,
            ]
        );
        assert!(report.polls >= 1);
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_concurrent_playbacks_keep_their_own_state() {
        let (soft, engine) = engine(20.0, PlaybackConfig::responsive());
        let short = engine.spawn(clip(0.5, 8000, 1)).unwrap();
        let long = engine.spawn(clip(1.5, 22050, 2)).unwrap();

        let short = short.join().unwrap();
        let long = long.join().unwrap();
        for report in [&short, &long] {
            assert_eq!(report.state_after_play, SourceState::Playing);
            assert_eq!(report.final_state, SourceState::Stopped);
        }
        assert_eq!(short.format.sample_rate, 8000);
        assert_eq!(long.format.channels, 2);
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_cancel_stops_playback_and_releases_device() {
        let (soft, engine) = engine(1.0, PlaybackConfig::default());
        let handle = engine.spawn(clip(10.0, 8000, 1)).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());
        handle.cancel();

        assert!(matches!(handle.join(), Err(AudioError::Cancelled)));
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_timeout_bounds_the_wait() {
        let config = PlaybackConfig::responsive().with_timeout(Duration::from_millis(30));
        let (soft, engine) = engine(1.0, config);
        let started = Instant::now();
        let result = engine.play_from_memory(&clip(10.0, 8000, 1));

        assert!(matches!(result, Err(AudioError::TimedOut(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_missing_device_is_unavailable() {
        let (soft, engine) = engine(20.0, PlaybackConfig::default().with_device("HDMI"));
        let result = engine.play_from_memory(&clip(0.1, 8000, 1));
        assert!(matches!(result, Err(AudioError::DeviceUnavailable(_))));
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_decode_errors_never_touch_the_backend() {
        let (soft, engine) = engine(20.0, PlaybackConfig::default());
        assert!(matches!(
            engine.play_from_memory(b"definitely not a wav"),
            Err(AudioError::NotAWavFile)
        ));

        let surround = encode_wav(&WavFormat::new_pcm(6, 8000, 16), &[0u8; 24]).unwrap();
        assert!(matches!(
            engine.play_from_memory(&surround),
            Err(AudioError::UnsupportedWavFile(_))
        ));
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_busy_thread_context_is_unavailable_and_device_released() {
        let (soft, engine) = engine(20.0, PlaybackConfig::responsive());
        let device = Device::open_default(soft.clone()).unwrap();
        let context = device.create_context().unwrap();
        let current = context.make_current().unwrap();

        let result = engine.play_from_memory(&clip(0.1, 8000, 1));
        assert!(matches!(result, Err(AudioError::DeviceUnavailable(_))));
        assert_eq!(soft.object_counts().devices, 1);
        assert_eq!(soft.object_counts().contexts, 1);
        drop(current);
    }

    #[test]
    fn test_rejected_upload_releases_everything() {
        let (soft, engine) = engine(20.0, PlaybackConfig::responsive());
        let mut format = WavFormat::mono16(8000);
        format.sample_rate = 0;
        let bytes = encode_wav(&format, &[0u8; 16]).unwrap();

        let result = engine.play_from_memory(&bytes);
        assert!(matches!(result, Err(AudioError::HardwareError { .. })));
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_empty_clip_is_rejected_and_releases_everything() {
        let (soft, engine) = engine(20.0, PlaybackConfig::responsive());
        let empty = encode_wav(&WavFormat::mono16(8000), &[]).unwrap();

        match engine.play_from_memory(&empty) {
            Err(AudioError::HardwareError { operation, .. }) => assert_eq!(operation, "play"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_play_file() {
        let path = std::env::temp_dir().join(format!(
            "spatial_playback_engine_{}.wav",
            std::process::id()
        ));
        std::fs::write(&path, clip(0.25, 8000, 1)).unwrap();

        let (_, engine) = engine(20.0, PlaybackConfig::responsive());
        let report = engine.play_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(report.unwrap().final_state, SourceState::Stopped);
    }

    #[test]
    fn test_configured_gain_is_validated() {
        let (soft, engine) = engine(20.0, PlaybackConfig::responsive().with_gain(-1.0));
        let result = engine.play_from_memory(&clip(0.1, 8000, 1));
        assert!(matches!(result, Err(AudioError::HardwareError { .. })));
        assert!(soft.object_counts().is_empty());
    }
}
