//! Small conversions used when generating or slicing PCM clips.

use std::f64::consts::TAU;
use std::time::Duration;

/// Phase increment in radians per sample of a sine at `frequency` Hz.
///
/// Sample `n` of the tone is `sin(n * period(frequency, sample_rate))`.
/// Returns `0.0` for a zero sample rate.
///
/// ```
/// use spatial_playback::utils::period;
///
/// let step = period(2000, 8000);
/// assert!((step - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
pub fn period(frequency: u32, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    f64::from(frequency) * TAU / f64::from(sample_rate)
}

/// Number of interleaved samples covering `duration` of audio.
///
/// The frame count is rounded to the nearest whole frame before being
/// multiplied by `channels`, so the result always addresses whole frames.
pub fn time_to_data(duration: Duration, sample_rate: u32, channels: u16) -> usize {
    let frames = (f64::from(sample_rate) * duration.as_secs_f64() + 0.5) as usize;
    frames * usize::from(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_period() {
        assert_approx_eq!(period(440, 44100), 440.0 * TAU / 44100.0, 1e-12);
        assert_approx_eq!(period(1, 1), TAU, 1e-12);
        assert_eq!(period(440, 0), 0.0);
    }

    #[test]
    fn test_time_to_data_rounds_to_whole_frames() {
        assert_eq!(time_to_data(Duration::from_secs(1), 8000, 1), 8000);
        assert_eq!(time_to_data(Duration::from_millis(500), 44100, 2), 44100);
        assert_eq!(time_to_data(Duration::from_micros(70), 8000, 2), 2);
        assert_eq!(time_to_data(Duration::ZERO, 8000, 2), 0);
    }
}
