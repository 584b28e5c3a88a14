//! Decoded buffer contents and the per-playback voice shared with renderers.

use crate::backend::{BufferFormat, SourceState};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;

/// Buffer contents converted to normalized interleaved `f32` samples.
#[derive(Debug, Clone)]
pub(crate) struct PcmClip {
    samples: Arc<[f32]>,
    channels: u16,
    frequency: u32,
    bits: u16,
    byte_len: usize,
}

impl PcmClip {
    /// Convert raw PCM bytes; `data` must hold whole frames of `format`.
    pub(crate) fn decode(format: BufferFormat, data: &[u8], frequency: u32) -> Self {
        let samples: Arc<[f32]> = match format.bits() {
            8 => data
                .iter()
                .map(|&byte| (f32::from(byte) - 128.0) / 128.0)
                .collect(),
            _ => data
                .chunks_exact(2)
                .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
                .collect(),
        };

        Self {
            samples,
            channels: format.channels(),
            frequency,
            bits: format.bits(),
            byte_len: data.len(),
        }
    }

    pub(crate) fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    pub(crate) const fn channels(&self) -> u16 {
        self.channels
    }

    pub(crate) const fn frequency(&self) -> u32 {
        self.frequency
    }

    pub(crate) const fn bits(&self) -> u16 {
        self.bits
    }

    pub(crate) const fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Left/right pair for one frame with per-side gains applied.
    fn frame(&self, index: usize, gains: [f32; 2]) -> [f32; 2] {
        match self.channels {
            1 => {
                let sample = self.samples[index];
                [sample * gains[0], sample * gains[1]]
            }
            _ => {
                let base = index * usize::from(self.channels);
                [self.samples[base] * gains[0], self.samples[base + 1] * gains[1]]
            }
        }
    }
}

/// Mix parameters a voice renders with; recomputed when properties change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VoiceMix {
    pub(crate) gains: [f32; 2],
    pub(crate) pitch: f32,
    pub(crate) looping: bool,
}

#[derive(Debug)]
struct Progress {
    state: SourceState,
    cursor: f64,
    mix: VoiceMix,
}

/// One playback of a buffer, shared between a source and its renderer.
///
/// A voice is created when a source starts from the initial or stopped
/// state and stays alive for as long as the source is playing or paused.
/// Renderers either pull frames from it ([`Voice::render`]) or advance it
/// against a clock ([`Voice::advance`]); both mark it stopped at the end of
/// the buffer unless looping is enabled.
#[derive(Debug)]
pub struct Voice {
    clip: PcmClip,
    progress: Mutex<Progress>,
    changed: Condvar,
}

impl Voice {
    pub(crate) fn start(clip: PcmClip, mix: VoiceMix, cursor: f64) -> Arc<Self> {
        Arc::new(Self {
            clip,
            progress: Mutex::new(Progress {
                state: SourceState::Playing,
                cursor,
                mix,
            }),
            changed: Condvar::new(),
        })
    }

    /// Current state of this playback.
    pub fn state(&self) -> SourceState {
        self.progress.lock().state
    }

    /// Number of frames in the underlying buffer.
    pub fn frames(&self) -> usize {
        self.clip.frames()
    }

    /// Sample rate of the underlying buffer.
    pub fn frequency(&self) -> u32 {
        self.clip.frequency()
    }

    /// Channel count of the underlying buffer.
    pub fn channels(&self) -> u16 {
        self.clip.channels()
    }

    /// Playback position in frames.
    pub fn cursor(&self) -> f64 {
        self.progress.lock().cursor
    }

    pub(crate) fn set_state(&self, state: SourceState) {
        let mut progress = self.progress.lock();
        if progress.state != state {
            progress.state = state;
            self.changed.notify_all();
        }
    }

    pub(crate) fn restart(&self) {
        let mut progress = self.progress.lock();
        progress.cursor = 0.0;
        progress.state = SourceState::Playing;
        self.changed.notify_all();
    }

    pub(crate) fn seek(&self, frame: f64) {
        self.progress.lock().cursor = frame.clamp(0.0, self.clip.frames() as f64);
    }

    pub(crate) fn set_mix(&self, mix: VoiceMix) {
        self.progress.lock().mix = mix;
    }

    /// Block for at most `timeout` while the voice is active, waking early on
    /// any state change. Returns the state observed last.
    pub fn wait_timeout(&self, timeout: Duration) -> SourceState {
        let mut progress = self.progress.lock();
        if progress.state.is_active() {
            self.changed.wait_for(&mut progress, timeout);
        }
        progress.state
    }

    /// Block until the voice is neither playing nor paused.
    pub fn wait_while_active(&self) {
        let mut progress = self.progress.lock();
        while progress.state.is_active() {
            self.changed.wait(&mut progress);
        }
    }

    /// Move a playing voice forward by `elapsed` of buffer time (scaled by
    /// pitch). Paused voices do not move.
    pub fn advance(&self, elapsed: Duration) -> SourceState {
        let mut progress = self.progress.lock();
        if progress.state == SourceState::Playing {
            let frames = self.clip.frames() as f64;
            progress.cursor += elapsed.as_secs_f64()
                * f64::from(self.clip.frequency())
                * f64::from(progress.mix.pitch);
            if progress.cursor >= frames {
                if progress.mix.looping && frames > 0.0 {
                    progress.cursor %= frames;
                } else {
                    progress.cursor = frames;
                    progress.state = SourceState::Stopped;
                    self.changed.notify_all();
                }
            }
        }
        progress.state
    }

    /// Fill interleaved output frames of `channels` channels at
    /// `output_rate`, writing silence unless the voice is playing.
    ///
    /// Mono outputs receive the average of left and right; outputs with more
    /// than two channels get silence on the extra channels.
    pub fn render(&self, out: &mut [f32], channels: usize, output_rate: u32) -> SourceState {
        let mut progress = self.progress.lock();
        if progress.state != SourceState::Playing || channels == 0 || output_rate == 0 {
            out.fill(0.0);
            return progress.state;
        }

        let frames = self.clip.frames();
        let step = f64::from(self.clip.frequency()) * f64::from(progress.mix.pitch)
            / f64::from(output_rate);

        for frame in out.chunks_mut(channels) {
            if progress.cursor >= frames as f64 {
                if progress.mix.looping && frames > 0 {
                    progress.cursor %= frames as f64;
                } else {
                    progress.state = SourceState::Stopped;
                    frame.fill(0.0);
                    continue;
                }
            }

            let [left, right] = self.clip.frame(progress.cursor as usize, progress.mix.gains);
            match frame {
                [] => {}
                [mono] => *mono = 0.5 * (left + right),
                [l, r, rest @ ..] => {
                    *l = left;
                    *r = right;
                    rest.fill(0.0);
                }
            }
            progress.cursor += step;
        }

        if progress.state == SourceState::Stopped {
            self.changed.notify_all();
        }
        progress.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    fn mix() -> VoiceMix {
        VoiceMix {
            gains: [1.0, 1.0],
            pitch: 1.0,
            looping: false,
        }
    }

    fn mono16(samples: &[i16]) -> PcmClip {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        PcmClip::decode(BufferFormat::Mono16, &bytes, 8000)
    }

    #[test]
    fn test_decode_16_bit_and_8_bit() {
        let clip = mono16(&[0, 16384, -32768]);
        assert_eq!(clip.frames(), 3);
        assert_eq!(clip.byte_len(), 6);
        assert_approx_eq!(clip.samples[1] as f64, 0.5, 1e-6);
        assert_approx_eq!(clip.samples[2] as f64, -1.0, 1e-6);

        let clip = PcmClip::decode(BufferFormat::Stereo8, &[128, 255, 0, 128], 22050);
        assert_eq!(clip.frames(), 2);
        assert_eq!(clip.channels(), 2);
        assert_eq!(clip.samples[0], 0.0);
        assert_approx_eq!(clip.samples[2] as f64, -1.0, 1e-6);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let voice = Voice::start(mono16(&[0; 8000]), mix(), 0.0);
        assert_eq!(voice.advance(Duration::from_millis(500)), SourceState::Playing);
        assert_approx_eq!(voice.cursor(), 4000.0, 1e-6);
        assert_eq!(voice.advance(Duration::from_millis(600)), SourceState::Stopped);
        assert_approx_eq!(voice.cursor(), 8000.0, 1e-6);
    }

    #[test]
    fn test_advance_wraps_when_looping() {
        let looping = VoiceMix {
            looping: true,
            ..mix()
        };
        let voice = Voice::start(mono16(&[0; 8000]), looping, 0.0);
        assert_eq!(voice.advance(Duration::from_millis(1250)), SourceState::Playing);
        assert_approx_eq!(voice.cursor(), 2000.0, 1e-6);
    }

    #[test]
    fn test_paused_voice_does_not_move() {
        let voice = Voice::start(mono16(&[0; 100]), mix(), 0.0);
        voice.set_state(SourceState::Paused);
        assert_eq!(voice.advance(Duration::from_secs(1)), SourceState::Paused);
        assert_eq!(voice.cursor(), 0.0);
    }

    #[test]
    fn test_render_mono_to_stereo_and_finish() {
        let panned = VoiceMix {
            gains: [1.0, 0.5],
            ..mix()
        };
        let voice = Voice::start(mono16(&[16384, 16384]), panned, 0.0);
        let mut out = [9.0f32; 6];
        let state = voice.render(&mut out, 2, 8000);
        assert_eq!(state, SourceState::Stopped);
        assert_approx_eq!(out[0] as f64, 0.5, 1e-6);
        assert_approx_eq!(out[1] as f64, 0.25, 1e-6);
        assert_eq!(&out[4..], &[0.0, 0.0]);
    }

    #[test]
    fn test_render_silence_when_not_playing() {
        let voice = Voice::start(mono16(&[16384; 4]), mix(), 0.0);
        voice.set_state(SourceState::Paused);
        let mut out = [1.0f32; 4];
        voice.render(&mut out, 1, 8000);
        assert_eq!(out, [0.0; 4]);
    }
}
