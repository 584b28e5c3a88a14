//! Renderers turn playing voices into output.

use super::soft::Voice;
use crate::{AudioError, AudioResult};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Output stage of the [`SoftBackend`](super::SoftBackend).
///
/// A renderer resolves device names and, once a source starts playing,
/// drives its [`Voice`] until the voice leaves the playing/paused states.
pub trait Renderer: Send + Sync {
    /// Name reported through [`StringParam::Renderer`](super::StringParam::Renderer).
    fn name(&self) -> &str;

    /// Resolve an output device, `None` meaning the default one.
    ///
    /// Returns the resolved device name, or
    /// [`AudioError::DeviceUnavailable`] if no such device exists.
    fn open(&self, name: Option<&str>) -> AudioResult<String>;

    /// Start driving a voice on the named device.
    ///
    /// Must return promptly; rendering happens on a thread owned by the
    /// renderer. The voice is already in the playing state when this is called.
    fn start(&self, device: &str, voice: Arc<Voice>) -> AudioResult<()>;
}

/// Name of the device a [`ClockRenderer`] offers by default.
pub const CLOCK_DEVICE: &str = "Clock Output";

/// Headless renderer that advances voices against the wall clock.
///
/// No audio is produced, but sources go through exactly the state
/// transitions a real device would give them, which makes it the renderer
/// used by tests and on machines without an output device.
#[derive(Debug, Clone)]
pub struct ClockRenderer {
    devices: Vec<String>,
    tick: Duration,
    time_scale: f64,
}

impl Default for ClockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockRenderer {
    /// Create a renderer offering the single device [`CLOCK_DEVICE`].
    pub fn new() -> Self {
        Self {
            devices: vec![CLOCK_DEVICE.to_string()],
            tick: Duration::from_millis(5),
            time_scale: 1.0,
        }
    }

    /// Offer the given device names instead; the first one is the default.
    pub fn with_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices = devices.into_iter().map(Into::into).collect();
        self
    }

    /// Play clips faster (> 1.0) or slower (< 1.0) than real time.
    ///
    /// Non-finite or non-positive scales are ignored.
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        if time_scale.is_finite() && time_scale > 0.0 {
            self.time_scale = time_scale;
        }
        self
    }

    /// Interval between voice updates.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_micros(100));
        self
    }

    fn drive(voice: Arc<Voice>, tick: Duration, time_scale: f64) {
        let mut last = Instant::now();
        loop {
            voice.wait_timeout(tick);
            let now = Instant::now();
            let elapsed = now.duration_since(last).mul_f64(time_scale);
            last = now;
            if !voice.advance(elapsed).is_active() {
                break;
            }
        }
        trace!("clock voice finished");
    }
}

impl Renderer for ClockRenderer {
    fn name(&self) -> &str {
        "clock"
    }

    fn open(&self, name: Option<&str>) -> AudioResult<String> {
        match name {
            None => self
                .devices
                .first()
                .cloned()
                .ok_or_else(|| AudioError::device_unavailable("no output devices")),
            Some(name) => self
                .devices
                .iter()
                .find(|device| device.as_str() == name)
                .cloned()
                .ok_or_else(|| {
                    AudioError::device_unavailable(format!("device '{name}' not found"))
                }),
        }
    }

    fn start(&self, device: &str, voice: Arc<Voice>) -> AudioResult<()> {
        let tick = self.tick;
        let time_scale = self.time_scale;
        debug!(device, frames = voice.frames(), "starting clock voice");
        thread::Builder::new()
            .name("clock-voice".to_string())
            .spawn(move || Self::drive(voice, tick, time_scale))
            .map_err(|err| AudioError::hardware("start voice", err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_default_and_named_devices() {
        let renderer = ClockRenderer::new().with_devices(["Speakers", "Headphones"]);
        assert_eq!(renderer.open(None).unwrap(), "Speakers");
        assert_eq!(renderer.open(Some("Headphones")).unwrap(), "Headphones");
        assert!(renderer.open(Some("HDMI")).unwrap_err().is_device_error());
    }

    #[test]
    fn test_no_devices_is_unavailable() {
        let renderer = ClockRenderer::new().with_devices(Vec::<String>::new());
        assert!(matches!(
            renderer.open(None),
            Err(AudioError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn test_invalid_time_scale_is_ignored() {
        let renderer = ClockRenderer::new().with_time_scale(-2.0).with_time_scale(f64::NAN);
        assert_eq!(renderer.time_scale, 1.0);
    }
}
