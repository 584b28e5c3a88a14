//! Playback configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`PlaybackEngine`](super::PlaybackEngine).
///
/// Durations are stored as milliseconds so the struct reads naturally from
/// config files; the accessor methods return [`Duration`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Output device to open (None = default device)
    pub device_name: Option<String>,

    /// Source gain applied before playing
    pub gain: f32,

    /// Source pitch multiplier
    pub pitch: f32,

    /// Source position; left at the origin when unset
    pub source_position: Option<[f32; 3]>,

    /// Listener gain to apply before playing; left untouched when unset
    pub listener_gain: Option<f32>,

    /// First delay between state polls (milliseconds)
    pub poll_interval_ms: u64,

    /// Ceiling the poll delay backs off to (milliseconds)
    pub max_poll_interval_ms: u64,

    /// Give up waiting after this long (milliseconds, None = wait forever)
    pub timeout_ms: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            gain: 1.0,
            pitch: 1.0,
            source_position: None,
            listener_gain: None,
            poll_interval_ms: 10,
            max_poll_interval_ms: 100,
            timeout_ms: None,
        }
    }
}

impl PlaybackConfig {
    /// Configuration that notices the end of playback quickly.
    pub fn responsive() -> Self {
        Self {
            poll_interval_ms: 1,
            max_poll_interval_ms: 10,
            ..Self::default()
        }
    }

    /// Play on the named device.
    pub fn with_device(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// Set the source gain.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Set the source pitch.
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Place the source.
    pub fn with_source_position(mut self, position: [f32; 3]) -> Self {
        self.source_position = Some(position);
        self
    }

    /// Set the listener gain before playing.
    pub fn with_listener_gain(mut self, gain: f32) -> Self {
        self.listener_gain = Some(gain);
        self
    }

    /// Set the initial poll delay.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the maximum poll delay.
    pub fn with_max_poll_interval(mut self, interval: Duration) -> Self {
        self.max_poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Bound the wait for playback to finish.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// First delay between state polls, at least one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Upper bound of the poll delay; never below [`poll_interval`](Self::poll_interval).
    pub fn max_poll_interval(&self) -> Duration {
        Duration::from_millis(self.max_poll_interval_ms).max(self.poll_interval())
    }

    /// Wait bound, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_responsive() {
        let config = PlaybackConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
        assert_eq!(config.timeout(), None);
        assert_eq!(config.gain, 1.0);

        let responsive = PlaybackConfig::responsive();
        assert_eq!(responsive.poll_interval(), Duration::from_millis(1));
        assert_eq!(responsive.max_poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_builders() {
        let config = PlaybackConfig::default()
            .with_device("Speakers")
            .with_gain(0.5)
            .with_source_position([1.0, 0.0, 0.0])
            .with_timeout(Duration::from_secs(2));
        assert_eq!(config.device_name.as_deref(), Some("Speakers"));
        assert_eq!(config.gain, 0.5);
        assert_eq!(config.source_position, Some([1.0, 0.0, 0.0]));
        assert_eq!(config.timeout(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_intervals_are_sanitized() {
        let config = PlaybackConfig {
            poll_interval_ms: 0,
            max_poll_interval_ms: 0,
            ..PlaybackConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(config.max_poll_interval(), Duration::from_millis(1));
    }
}
