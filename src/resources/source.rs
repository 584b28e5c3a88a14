//! Playback source handles with transport controls.

use super::{Buffer, CurrentContext, Properties};
use crate::AudioResult;
use crate::backend::{AudioBackend, Param, SourceId, SourceState, Target};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

/// A playback voice.
///
/// Holds a clone of its attached [`Buffer`], so the buffer outlives every
/// source that plays it. Dropping a source stops it, detaches the buffer and
/// deletes it from the backend.
pub struct Source<'c> {
    backend: Arc<dyn AudioBackend>,
    id: SourceId,
    buffer: Option<Buffer<'c>>,
    released: bool,
    _context: PhantomData<&'c CurrentContext<'c>>,
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("id", &self.id)
            .field("buffer", &self.buffer.as_ref().map(Buffer::id))
            .finish()
    }
}

impl<'c> Source<'c> {
    pub(super) fn new(backend: Arc<dyn AudioBackend>, id: SourceId) -> Self {
        Self {
            backend,
            id,
            buffer: None,
            released: false,
            _context: PhantomData,
        }
    }

    /// Backend identifier.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Attach `buffer`, replacing any previously attached one.
    ///
    /// Only allowed in the initial or stopped state.
    pub fn set_buffer(&mut self, buffer: &Buffer<'c>) -> AudioResult<()> {
        self.backend.attach_buffer(self.id, Some(buffer.id()))?;
        self.buffer = Some(buffer.clone());
        Ok(())
    }

    /// Detach the current buffer, if any.
    pub fn detach_buffer(&mut self) -> AudioResult<()> {
        self.backend.attach_buffer(self.id, None)?;
        self.buffer = None;
        Ok(())
    }

    /// The attached buffer.
    pub fn buffer(&self) -> Option<&Buffer<'c>> {
        self.buffer.as_ref()
    }

    /// Start playback, resume a paused source or restart a playing one.
    pub fn play(&self) -> AudioResult<()> {
        self.backend.play(self.id)
    }

    /// Pause a playing source.
    pub fn pause(&self) -> AudioResult<()> {
        self.backend.pause(self.id)
    }

    /// Stop the source.
    pub fn stop(&self) -> AudioResult<()> {
        self.backend.stop(self.id)
    }

    /// Stop and return to the initial state.
    pub fn rewind(&self) -> AudioResult<()> {
        self.backend.rewind(self.id)
    }

    /// Current playback state. Does not wait for playback.
    pub fn state(&self) -> AudioResult<SourceState> {
        self.backend.source_state(self.id)
    }

    /// Source gain.
    pub fn gain(&self) -> AudioResult<f32> {
        self.get_f(Param::Gain)
    }

    /// Set the source gain; must not be negative.
    pub fn set_gain(&self, gain: f32) -> AudioResult<()> {
        self.set_f(Param::Gain, gain)
    }

    /// Pitch multiplier.
    pub fn pitch(&self) -> AudioResult<f32> {
        self.get_f(Param::Pitch)
    }

    /// Set the pitch multiplier; must be positive.
    pub fn set_pitch(&self, pitch: f32) -> AudioResult<()> {
        self.set_f(Param::Pitch, pitch)
    }

    /// Source position.
    pub fn position(&self) -> AudioResult<[f32; 3]> {
        self.get_3f(Param::Position)
    }

    /// Move the source.
    pub fn set_position(&self, position: [f32; 3]) -> AudioResult<()> {
        self.set_3f(Param::Position, position)
    }

    /// Source velocity.
    pub fn velocity(&self) -> AudioResult<[f32; 3]> {
        self.get_3f(Param::Velocity)
    }

    /// Set the source velocity.
    pub fn set_velocity(&self, velocity: [f32; 3]) -> AudioResult<()> {
        self.set_3f(Param::Velocity, velocity)
    }

    /// Whether the buffer repeats.
    pub fn looping(&self) -> AudioResult<bool> {
        Ok(self.get_i(Param::Looping)? != 0)
    }

    /// Repeat the buffer instead of stopping at its end.
    pub fn set_looping(&self, looping: bool) -> AudioResult<()> {
        self.set_i(Param::Looping, i32::from(looping))
    }

    /// Playback position in seconds.
    pub fn sec_offset(&self) -> AudioResult<f32> {
        self.get_f(Param::SecOffset)
    }

    /// Seek to `seconds` into the buffer.
    pub fn set_sec_offset(&self, seconds: f32) -> AudioResult<()> {
        self.set_f(Param::SecOffset, seconds)
    }

    fn release(&mut self) -> AudioResult<()> {
        if self.released {
            return Ok(());
        }
        self.backend.stop(self.id)?;
        if self.buffer.is_some() {
            self.detach_buffer()?;
        }
        self.backend.destroy_source(self.id)?;
        self.released = true;
        Ok(())
    }

    /// Stop, detach and delete the source, reporting failure.
    pub fn destroy(mut self) -> AudioResult<()> {
        self.release()
    }
}

impl Properties for Source<'_> {
    fn backend(&self) -> &dyn AudioBackend {
        &*self.backend
    }

    fn target(&self) -> Target {
        Target::Source(self.id)
    }
}

impl Drop for Source<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(source = %self.id, %err, "failed to delete source");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioError;
    use crate::backend::{BufferFormat, ClockRenderer, SoftBackend};
    use crate::resources::Device;
    use std::thread;
    use std::time::{Duration, Instant};

    fn tone(frames: usize) -> Vec<u8> {
        (0..frames)
            .flat_map(|i| (((i % 64) as i16 - 32) * 500).to_le_bytes())
            .collect()
    }

    #[test]
    fn test_source_plays_buffer_to_completion() {
        let soft = Arc::new(SoftBackend::new(ClockRenderer::new().with_time_scale(40.0)));
        let device = Device::open_default(soft.clone()).unwrap();
        let context = device.create_context().unwrap();
        {
            let current = context.make_current().unwrap();
            let buffer = current.create_buffer().unwrap();
            buffer.set_data(BufferFormat::Mono16, &tone(4000), 8000).unwrap();
            assert_eq!(buffer.frequency().unwrap(), 8000);
            assert_eq!(buffer.channels().unwrap(), 1);
            assert_eq!(buffer.bits().unwrap(), 16);
            assert_eq!(buffer.size().unwrap(), 8000);

            let mut source = current.create_source().unwrap();
            source.set_buffer(&buffer).unwrap();
            assert_eq!(source.state().unwrap(), SourceState::Initial);
            source.play().unwrap();
            assert_eq!(source.state().unwrap(), SourceState::Playing);

            let deadline = Instant::now() + Duration::from_secs(5);
            while source.state().unwrap() == SourceState::Playing && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(2));
            }
            assert_eq!(source.state().unwrap(), SourceState::Stopped);
        }
        context.destroy().unwrap();
        device.close().unwrap();
        assert!(soft.object_counts().is_empty());
    }

    #[test]
    fn test_buffer_outlives_sources_that_share_it() {
        let soft = Arc::new(SoftBackend::headless());
        let device = Device::open_default(soft.clone()).unwrap();
        let context = device.create_context().unwrap();
        let current = context.make_current().unwrap();

        let buffer = current.create_buffer().unwrap();
        buffer.set_data(BufferFormat::Mono16, &tone(100), 8000).unwrap();
        let mut first = current.create_source().unwrap();
        let mut second = current.create_source().unwrap();
        first.set_buffer(&buffer).unwrap();
        second.set_buffer(&buffer).unwrap();
        let buffer_id = buffer.id();

        let shared = buffer.clone();
        assert!(matches!(shared.destroy(), Err(AudioError::HardwareError { .. })));
        drop(buffer);
        assert_eq!(soft.object_counts().buffers, 1);

        drop(first);
        assert_eq!(soft.object_counts().buffers, 1);
        assert_eq!(second.buffer().map(Buffer::id), Some(buffer_id));
        second.detach_buffer().unwrap();
        assert_eq!(soft.object_counts().buffers, 0);
        assert_eq!(soft.object_counts().sources, 1);
    }

    #[test]
    fn test_set_buffer_replaces_previous_buffer() {
        let soft = Arc::new(SoftBackend::headless());
        let device = Device::open_default(soft.clone()).unwrap();
        let context = device.create_context().unwrap();
        let current = context.make_current().unwrap();

        let first = current.create_buffer().unwrap();
        first.set_data(BufferFormat::Mono16, &tone(100), 8000).unwrap();
        let second = current.create_buffer().unwrap();
        second.set_data(BufferFormat::Mono16, &tone(50), 8000).unwrap();
        let second_id = second.id();

        let mut source = current.create_source().unwrap();
        source.set_buffer(&first).unwrap();
        source.set_buffer(&second).unwrap();
        assert_eq!(source.buffer().map(Buffer::id), Some(second_id));

        first.destroy().unwrap();
        assert_eq!(soft.object_counts().buffers, 1);
        assert!(matches!(second.destroy(), Err(AudioError::HardwareError { .. })));
        assert_eq!(soft.object_counts().buffers, 1);
    }

    #[test]
    fn test_set_data_rejected_while_attached() {
        let device = Device::open_default(Arc::new(SoftBackend::headless())).unwrap();
        let context = device.create_context().unwrap();
        let current = context.make_current().unwrap();
        let buffer = current.create_buffer().unwrap();
        buffer.set_data(BufferFormat::Mono16, &tone(10), 8000).unwrap();
        assert!(buffer.set_data(BufferFormat::Mono16, &[0, 0, 0], 8000).is_err());

        let mut source = current.create_source().unwrap();
        source.set_buffer(&buffer).unwrap();
        assert!(buffer.set_data(BufferFormat::Mono16, &tone(10), 8000).is_err());
        source.detach_buffer().unwrap();
        buffer.set_data(BufferFormat::Stereo16, &tone(10), 8000).unwrap();
    }

    #[test]
    fn test_source_property_wrappers() {
        let device = Device::open_default(Arc::new(SoftBackend::headless())).unwrap();
        let context = device.create_context().unwrap();
        let current = context.make_current().unwrap();
        let source = current.create_source().unwrap();

        source.set_gain(0.25).unwrap();
        assert_eq!(source.gain().unwrap(), 0.25);
        source.set_position([1.0, -2.0, 3.0]).unwrap();
        assert_eq!(source.position().unwrap(), [1.0, -2.0, 3.0]);
        source.set_looping(true).unwrap();
        assert!(source.looping().unwrap());
        assert!(source.set_pitch(0.0).is_err());
        assert!(source.set_f(Param::Frequency, 1.0).is_err());
        assert!(source.set_fv(Param::Velocity, &[1.0]).is_err());
        source.set_3i(Param::Velocity, [1, 2, 3]).unwrap();
        assert_eq!(source.get_3i(Param::Velocity).unwrap(), [1, 2, 3]);
    }
}
