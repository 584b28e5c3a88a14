//! Real-time output through cpal.

use super::renderer::Renderer;
use super::soft::Voice;
use crate::{AudioError, AudioResult};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use tracing::{debug, warn};

use cpal::{
    Device, FromSample, SizedSample, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};

/// Renderer writing voices to an output device of the default cpal host.
///
/// Every playing voice gets its own output stream, built on a dedicated
/// thread that owns the stream until the voice stops.
#[derive(Debug, Clone, Default)]
pub struct CpalRenderer {
    _private: (),
}

impl CpalRenderer {
    /// Create a renderer for the default host.
    pub fn new() -> Self {
        Self::default()
    }

    fn find_device(name: Option<&str>) -> AudioResult<Device> {
        let host = cpal::default_host();
        match name {
            None => host
                .default_output_device()
                .ok_or_else(|| AudioError::device_unavailable("no default output device")),
            Some(name) => host
                .output_devices()
                .map_err(|e| AudioError::device_unavailable(e.to_string()))?
                .find(|device| device.name().is_ok_and(|found| found == name))
                .ok_or_else(|| {
                    AudioError::device_unavailable(format!("device '{name}' not found"))
                }),
        }
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        voice: Arc<Voice>,
    ) -> Result<Stream, cpal::BuildStreamError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = usize::from(config.channels);
        let output_rate = config.sample_rate.0;
        let mut scratch: Vec<f32> = Vec::new();

        device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                voice.render(&mut scratch, channels, output_rate);
                for (out, sample) in data.iter_mut().zip(&scratch) {
                    *out = <T as cpal::Sample>::from_sample(*sample);
                }
            },
            |err| warn!(%err, "output stream error"),
            None,
        )
    }

    fn open_stream(device_name: &str, voice: Arc<Voice>) -> AudioResult<Stream> {
        let device = Self::find_device(Some(device_name))?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::hardware("query output config", e.to_string()))?;
        let config = supported.config();

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, voice),
            cpal::SampleFormat::F64 => Self::build_stream::<f64>(&device, &config, voice),
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, voice),
            cpal::SampleFormat::I32 => Self::build_stream::<i32>(&device, &config, voice),
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, voice),
            other => {
                return Err(AudioError::hardware(
                    "build output stream",
                    format!("unsupported sample format {other:?}"),
                ));
            }
        }
        .map_err(|e| AudioError::hardware("build output stream", e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::hardware("start output stream", e.to_string()))?;
        debug!(
            device = device_name,
            channels = config.channels,
            rate = config.sample_rate.0,
            "output stream running"
        );
        Ok(stream)
    }
}

impl Renderer for CpalRenderer {
    fn name(&self) -> &str {
        "cpal"
    }

    fn open(&self, name: Option<&str>) -> AudioResult<String> {
        let device = Self::find_device(name)?;
        device
            .name()
            .map_err(|e| AudioError::device_unavailable(e.to_string()))
    }

    fn start(&self, device: &str, voice: Arc<Voice>) -> AudioResult<()> {
        let device = device.to_string();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        thread::Builder::new()
            .name("cpal-voice".to_string())
            .spawn(move || {
                // The stream is not Send, so it lives and dies on this thread.
                match Self::open_stream(&device, Arc::clone(&voice)) {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        voice.wait_while_active();
                        drop(stream);
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                    }
                }
            })
            .map_err(|e| AudioError::hardware("start voice", e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| AudioError::hardware("start voice", "output thread exited early"))?
    }
}
