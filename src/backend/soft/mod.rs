//! In-process implementation of the backend object model.
//!
//! [`SoftBackend`] tracks devices, contexts, buffers and sources in a single
//! registry behind a mutex, applies listener/source properties to playing
//! voices, and leaves actual output to a [`Renderer`].

mod props;
mod spatial;
mod voice;

pub use voice::Voice;

use props::{Globals, ListenerProps, SourceProps, check_arity, invalid_param};
use voice::{PcmClip, VoiceMix};

use super::renderer::{ClockRenderer, Renderer};
use super::{
    AudioBackend, BufferFormat, BufferId, ContextId, DeviceId, GlobalParam, Param, SourceId,
    SourceState, StringParam, Target,
};
use crate::{AudioError, AudioResult};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, trace};

/// Number of live objects of each kind, for leak checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectCounts {
    /// Open devices.
    pub devices: usize,
    /// Live contexts.
    pub contexts: usize,
    /// Live buffers.
    pub buffers: usize,
    /// Live sources.
    pub sources: usize,
}

impl ObjectCounts {
    /// True when nothing is allocated.
    pub const fn is_empty(&self) -> bool {
        self.devices == 0 && self.contexts == 0 && self.buffers == 0 && self.sources == 0
    }
}

struct DeviceEntry {
    name: String,
    contexts: BTreeSet<ContextId>,
}

struct ContextEntry {
    device: DeviceId,
    buffers: BTreeSet<BufferId>,
    sources: BTreeSet<SourceId>,
}

struct BufferEntry {
    context: ContextId,
    clip: Option<PcmClip>,
    users: usize,
}

struct SourceEntry {
    context: ContextId,
    buffer: Option<BufferId>,
    props: SourceProps,
    voice: Option<Arc<Voice>>,
    idle_state: SourceState,
    start_offset: f64,
}

impl SourceEntry {
    fn state(&self) -> SourceState {
        self.voice
            .as_ref()
            .map_or(self.idle_state, |voice| voice.state())
    }

    fn stop_voice(&self) {
        if let Some(voice) = &self.voice {
            if voice.state().is_active() {
                voice.set_state(SourceState::Stopped);
            }
        }
    }
}

#[derive(Default)]
struct Registry {
    last_name: u32,
    devices: HashMap<DeviceId, DeviceEntry>,
    contexts: HashMap<ContextId, ContextEntry>,
    current: HashMap<ThreadId, ContextId>,
    buffers: HashMap<BufferId, BufferEntry>,
    sources: HashMap<SourceId, SourceEntry>,
    listener: ListenerProps,
    globals: Globals,
}

fn invalid_name(operation: &'static str, name: impl fmt::Display) -> AudioError {
    AudioError::hardware(operation, format!("{name} is not a valid name"))
}

fn mix_for(
    listener: &ListenerProps,
    globals: &Globals,
    props: &SourceProps,
    channels: u16,
) -> VoiceMix {
    spatial::voice_mix(listener, props, globals.distance_model, channels)
}

impl Registry {
    fn next_name(&mut self) -> u32 {
        self.last_name += 1;
        self.last_name
    }

    fn current(&self, operation: &'static str) -> AudioResult<ContextId> {
        self.current
            .get(&thread::current().id())
            .copied()
            .ok_or_else(|| AudioError::hardware(operation, "no context is current on this thread"))
    }

    fn source(&self, id: SourceId, operation: &'static str) -> AudioResult<&SourceEntry> {
        let context = self.current(operation)?;
        self.sources
            .get(&id)
            .filter(|entry| entry.context == context)
            .ok_or_else(|| invalid_name(operation, id))
    }

    fn source_mut(
        &mut self,
        id: SourceId,
        operation: &'static str,
    ) -> AudioResult<&mut SourceEntry> {
        let context = self.current(operation)?;
        self.sources
            .get_mut(&id)
            .filter(|entry| entry.context == context)
            .ok_or_else(|| invalid_name(operation, id))
    }

    fn buffer(&self, id: BufferId, operation: &'static str) -> AudioResult<&BufferEntry> {
        let context = self.current(operation)?;
        self.buffers
            .get(&id)
            .filter(|entry| entry.context == context)
            .ok_or_else(|| invalid_name(operation, id))
    }

    fn buffer_mut(
        &mut self,
        id: BufferId,
        operation: &'static str,
    ) -> AudioResult<&mut BufferEntry> {
        let context = self.current(operation)?;
        self.buffers
            .get_mut(&id)
            .filter(|entry| entry.context == context)
            .ok_or_else(|| invalid_name(operation, id))
    }

    /// Sample rate of whatever a source would play, if known.
    fn source_frequency(&self, entry: &SourceEntry) -> Option<u32> {
        if let Some(voice) = &entry.voice {
            return Some(voice.frequency());
        }
        entry
            .buffer
            .and_then(|buffer| self.buffers.get(&buffer))
            .and_then(|buffer| buffer.clip.as_ref())
            .map(PcmClip::frequency)
    }

    fn refresh_voice(&self, entry: &SourceEntry) {
        if let Some(voice) = &entry.voice {
            voice.set_mix(mix_for(
                &self.listener,
                &self.globals,
                &entry.props,
                voice.channels(),
            ));
        }
    }

    fn refresh_all_voices(&self) {
        for entry in self.sources.values() {
            self.refresh_voice(entry);
        }
    }

    fn counts(&self) -> ObjectCounts {
        ObjectCounts {
            devices: self.devices.len(),
            contexts: self.contexts.len(),
            buffers: self.buffers.len(),
            sources: self.sources.len(),
        }
    }
}

/// Backend keeping the whole object model in process.
///
/// Objects created on one thread are only visible to calls made while the
/// same context is current, mirroring how native contexts scope their
/// object names. The listener and the globals are shared by every context.
pub struct SoftBackend {
    renderer: Box<dyn Renderer>,
    registry: Mutex<Registry>,
}

impl fmt::Debug for SoftBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftBackend")
            .field("renderer", &self.renderer.name())
            .field("objects", &self.object_counts())
            .finish()
    }
}

impl SoftBackend {
    /// Create a backend rendering through `renderer`.
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self {
            renderer: Box::new(renderer),
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Create a backend with a real-time [`ClockRenderer`].
    pub fn headless() -> Self {
        Self::new(ClockRenderer::new())
    }

    /// Number of live objects of each kind.
    pub fn object_counts(&self) -> ObjectCounts {
        self.registry.lock().counts()
    }

    fn set_source_offset(
        registry: &mut Registry,
        source: SourceId,
        param: Param,
        value: f64,
    ) -> AudioResult<()> {
        const OPERATION: &str = "set offset";
        let entry = registry.source(source, OPERATION)?;
        if !(value.is_finite() && value >= 0.0) {
            return Err(AudioError::hardware(OPERATION, format!("invalid offset {value}")));
        }
        let frames = match param {
            Param::SecOffset => {
                let frequency = registry
                    .source_frequency(entry)
                    .ok_or_else(|| AudioError::hardware(OPERATION, "source has no buffer data"))?;
                value * f64::from(frequency)
            }
            _ => value,
        };

        let entry = registry.source_mut(source, OPERATION)?;
        match &entry.voice {
            Some(voice) if voice.state().is_active() => voice.seek(frames),
            _ => entry.start_offset = frames,
        }
        Ok(())
    }

    /// Seconds for [`Param::SecOffset`], whole frames for [`Param::SampleOffset`].
    fn source_offset(registry: &Registry, source: SourceId, param: Param) -> AudioResult<f64> {
        const OPERATION: &str = "get offset";
        let entry = registry.source(source, OPERATION)?;
        let frames = match &entry.voice {
            Some(voice) if voice.state().is_active() => voice.cursor(),
            _ => entry.start_offset,
        };
        Ok(match param {
            Param::SecOffset => match registry.source_frequency(entry) {
                Some(frequency) if frequency > 0 => frames / f64::from(frequency),
                _ => 0.0,
            },
            _ => frames.floor(),
        })
    }

    fn buffer_property(registry: &Registry, buffer: BufferId, param: Param) -> AudioResult<u64> {
        let entry = registry.buffer(buffer, "get buffer property")?;
        let clip = entry.clip.as_ref();
        Ok(match param {
            Param::Frequency => u64::from(clip.map_or(0, PcmClip::frequency)),
            Param::Bits => u64::from(clip.map_or(16, PcmClip::bits)),
            Param::Channels => u64::from(clip.map_or(1, PcmClip::channels)),
            Param::Size => clip.map_or(0, PcmClip::byte_len) as u64,
            _ => return Err(invalid_param("buffer", param)),
        })
    }

    fn reject_buffer_write(registry: &Registry, buffer: BufferId, param: Param) -> AudioError {
        const OPERATION: &str = "set buffer property";
        if let Err(err) = registry.buffer(buffer, OPERATION) {
            return err;
        }
        match param {
            Param::Frequency | Param::Bits | Param::Channels | Param::Size => {
                AudioError::hardware(OPERATION, format!("{param:?} is read only"))
            }
            _ => invalid_param("buffer", param),
        }
    }
}

impl Drop for SoftBackend {
    fn drop(&mut self) {
        for entry in self.registry.get_mut().sources.values() {
            entry.stop_voice();
        }
    }
}

impl AudioBackend for SoftBackend {
    fn open_device(&self, name: Option<&str>) -> AudioResult<DeviceId> {
        let resolved = self.renderer.open(name)?;
        let mut registry = self.registry.lock();
        let id = DeviceId::from_raw(registry.next_name());
        debug!(device = %id, name = %resolved, "opened device");
        registry.devices.insert(
            id,
            DeviceEntry {
                name: resolved,
                contexts: BTreeSet::new(),
            },
        );
        Ok(id)
    }

    fn close_device(&self, device: DeviceId) -> AudioResult<()> {
        let mut registry = self.registry.lock();
        let entry = registry
            .devices
            .get(&device)
            .ok_or_else(|| invalid_name("close device", device))?;
        if !entry.contexts.is_empty() {
            return Err(AudioError::hardware(
                "close device",
                format!("{device} still owns {} context(s)", entry.contexts.len()),
            ));
        }
        registry.devices.remove(&device);
        debug!(device = %device, "closed device");
        Ok(())
    }

    fn device_name(&self, device: DeviceId) -> AudioResult<String> {
        self.registry
            .lock()
            .devices
            .get(&device)
            .map(|entry| entry.name.clone())
            .ok_or_else(|| invalid_name("device name", device))
    }

    fn create_context(&self, device: DeviceId) -> AudioResult<ContextId> {
        let mut registry = self.registry.lock();
        if !registry.devices.contains_key(&device) {
            return Err(invalid_name("create context", device));
        }
        let id = ContextId::from_raw(registry.next_name());
        registry.contexts.insert(
            id,
            ContextEntry {
                device,
                buffers: BTreeSet::new(),
                sources: BTreeSet::new(),
            },
        );
        if let Some(entry) = registry.devices.get_mut(&device) {
            entry.contexts.insert(id);
        }
        debug!(context = %id, device = %device, "created context");
        Ok(id)
    }

    fn destroy_context(&self, context: ContextId) -> AudioResult<()> {
        const OPERATION: &str = "destroy context";
        let mut registry = self.registry.lock();
        let entry = registry
            .contexts
            .get(&context)
            .ok_or_else(|| invalid_name(OPERATION, context))?;
        if registry.current.values().any(|&current| current == context) {
            return Err(AudioError::hardware(OPERATION, format!("{context} is still current")));
        }
        if !entry.sources.is_empty() || !entry.buffers.is_empty() {
            return Err(AudioError::hardware(
                OPERATION,
                format!(
                    "{context} still owns {} source(s) and {} buffer(s)",
                    entry.sources.len(),
                    entry.buffers.len()
                ),
            ));
        }
        let device = entry.device;
        registry.contexts.remove(&context);
        if let Some(device) = registry.devices.get_mut(&device) {
            device.contexts.remove(&context);
        }
        debug!(context = %context, "destroyed context");
        Ok(())
    }

    fn make_context_current(&self, context: Option<ContextId>) -> AudioResult<()> {
        let mut registry = self.registry.lock();
        let thread = thread::current().id();
        match context {
            Some(context) => {
                if !registry.contexts.contains_key(&context) {
                    return Err(invalid_name("make context current", context));
                }
                registry.current.insert(thread, context);
                trace!(context = %context, ?thread, "context made current");
            }
            None => {
                registry.current.remove(&thread);
            }
        }
        Ok(())
    }

    fn current_context(&self) -> Option<ContextId> {
        self.registry
            .lock()
            .current
            .get(&thread::current().id())
            .copied()
    }

    fn create_buffer(&self) -> AudioResult<BufferId> {
        let mut registry = self.registry.lock();
        let context = registry.current("create buffer")?;
        let id = BufferId::from_raw(registry.next_name());
        registry.buffers.insert(
            id,
            BufferEntry {
                context,
                clip: None,
                users: 0,
            },
        );
        if let Some(entry) = registry.contexts.get_mut(&context) {
            entry.buffers.insert(id);
        }
        trace!(buffer = %id, "created buffer");
        Ok(id)
    }

    fn destroy_buffer(&self, buffer: BufferId) -> AudioResult<()> {
        const OPERATION: &str = "delete buffer";
        let mut registry = self.registry.lock();
        let entry = registry.buffer(buffer, OPERATION)?;
        if entry.users > 0 {
            return Err(AudioError::hardware(
                OPERATION,
                format!("{buffer} is attached to {} source(s)", entry.users),
            ));
        }
        let context = entry.context;
        registry.buffers.remove(&buffer);
        if let Some(entry) = registry.contexts.get_mut(&context) {
            entry.buffers.remove(&buffer);
        }
        trace!(buffer = %buffer, "deleted buffer");
        Ok(())
    }

    fn buffer_data(
        &self,
        buffer: BufferId,
        format: BufferFormat,
        data: &[u8],
        frequency: u32,
    ) -> AudioResult<()> {
        const OPERATION: &str = "buffer data";
        let mut registry = self.registry.lock();
        let entry = registry.buffer_mut(buffer, OPERATION)?;
        if entry.users > 0 {
            return Err(AudioError::hardware(OPERATION, format!("{buffer} is in use")));
        }
        if frequency == 0 {
            return Err(AudioError::hardware(OPERATION, "frequency must be positive"));
        }
        if data.len() % format.frame_size() != 0 {
            return Err(AudioError::hardware(
                OPERATION,
                format!(
                    "{} bytes is not a whole number of {format:?} frames",
                    data.len()
                ),
            ));
        }
        entry.clip = Some(PcmClip::decode(format, data, frequency));
        trace!(buffer = %buffer, ?format, bytes = data.len(), frequency, "uploaded buffer data");
        Ok(())
    }

    fn create_source(&self) -> AudioResult<SourceId> {
        let mut registry = self.registry.lock();
        let context = registry.current("create source")?;
        let id = SourceId::from_raw(registry.next_name());
        registry.sources.insert(
            id,
            SourceEntry {
                context,
                buffer: None,
                props: SourceProps::default(),
                voice: None,
                idle_state: SourceState::Initial,
                start_offset: 0.0,
            },
        );
        if let Some(entry) = registry.contexts.get_mut(&context) {
            entry.sources.insert(id);
        }
        trace!(source = %id, "created source");
        Ok(id)
    }

    fn destroy_source(&self, source: SourceId) -> AudioResult<()> {
        let mut registry = self.registry.lock();
        let context = registry.source(source, "delete source")?.context;
        let Some(entry) = registry.sources.remove(&source) else {
            return Err(invalid_name("delete source", source));
        };
        entry.stop_voice();
        if let Some(buffer) = entry.buffer.and_then(|id| registry.buffers.get_mut(&id)) {
            buffer.users = buffer.users.saturating_sub(1);
        }
        if let Some(entry) = registry.contexts.get_mut(&context) {
            entry.sources.remove(&source);
        }
        trace!(source = %source, "deleted source");
        Ok(())
    }

    fn attach_buffer(&self, source: SourceId, buffer: Option<BufferId>) -> AudioResult<()> {
        const OPERATION: &str = "attach buffer";
        let mut registry = self.registry.lock();
        let entry = registry.source(source, OPERATION)?;
        let state = entry.state();
        if !state.accepts_buffer() {
            return Err(AudioError::hardware(
                OPERATION,
                format!("{source} is {state}"),
            ));
        }
        let previous = entry.buffer;
        if let Some(buffer) = buffer {
            registry.buffer(buffer, OPERATION)?;
        }

        if let Some(previous) = previous.and_then(|id| registry.buffers.get_mut(&id)) {
            previous.users = previous.users.saturating_sub(1);
        }
        if let Some(next) = buffer.and_then(|id| registry.buffers.get_mut(&id)) {
            next.users += 1;
        }
        registry.source_mut(source, OPERATION)?.buffer = buffer;
        trace!(source = %source, ?buffer, "attached buffer");
        Ok(())
    }

    fn play(&self, source: SourceId) -> AudioResult<()> {
        const OPERATION: &str = "play";
        let (device, voice) = {
            let mut registry = self.registry.lock();
            let entry = registry.source(source, OPERATION)?;
            match (entry.state(), &entry.voice) {
                (SourceState::Playing, Some(voice)) => {
                    voice.restart();
                    return Ok(());
                }
                (SourceState::Paused, Some(voice)) => {
                    voice.set_state(SourceState::Playing);
                    return Ok(());
                }
                _ => {}
            }

            let clip = entry
                .buffer
                .and_then(|id| registry.buffers.get(&id))
                .ok_or_else(|| AudioError::hardware(OPERATION, format!("{source} has no buffer")))?
                .clip
                .clone()
                .ok_or_else(|| AudioError::hardware(OPERATION, "buffer holds no data"))?;
            if clip.frames() == 0 {
                return Err(AudioError::hardware(OPERATION, "buffer holds no samples"));
            }
            let device = registry
                .contexts
                .get(&entry.context)
                .and_then(|context| registry.devices.get(&context.device))
                .map(|device| device.name.clone())
                .ok_or_else(|| AudioError::hardware(OPERATION, "context lost its device"))?;

            let mix = mix_for(
                &registry.listener,
                &registry.globals,
                &entry.props,
                clip.channels(),
            );
            let voice = Voice::start(clip, mix, entry.start_offset);
            let entry = registry.source_mut(source, OPERATION)?;
            entry.start_offset = 0.0;
            entry.voice = Some(Arc::clone(&voice));
            (device, voice)
        };

        trace!(source = %source, device = %device, "starting voice");
        if let Err(err) = self.renderer.start(&device, Arc::clone(&voice)) {
            voice.set_state(SourceState::Stopped);
            return Err(err);
        }
        Ok(())
    }

    fn pause(&self, source: SourceId) -> AudioResult<()> {
        let registry = self.registry.lock();
        let entry = registry.source(source, "pause")?;
        if let (SourceState::Playing, Some(voice)) = (entry.state(), &entry.voice) {
            voice.set_state(SourceState::Paused);
        }
        Ok(())
    }

    fn stop(&self, source: SourceId) -> AudioResult<()> {
        let mut registry = self.registry.lock();
        let entry = registry.source_mut(source, "stop")?;
        entry.stop_voice();
        if entry.voice.is_none() {
            entry.idle_state = SourceState::Stopped;
        }
        entry.start_offset = 0.0;
        Ok(())
    }

    fn rewind(&self, source: SourceId) -> AudioResult<()> {
        let mut registry = self.registry.lock();
        let entry = registry.source_mut(source, "rewind")?;
        entry.stop_voice();
        entry.voice = None;
        entry.idle_state = SourceState::Initial;
        entry.start_offset = 0.0;
        Ok(())
    }

    fn source_state(&self, source: SourceId) -> AudioResult<SourceState> {
        Ok(self.registry.lock().source(source, "source state")?.state())
    }

    fn set_floats(&self, target: Target, param: Param, values: &[f32]) -> AudioResult<()> {
        let mut registry = self.registry.lock();
        match target {
            Target::Listener => {
                registry.listener.set(param, values)?;
                registry.refresh_all_voices();
            }
            Target::Source(source) => match param {
                Param::SecOffset | Param::SampleOffset => {
                    check_arity(param, values.len())?;
                    Self::set_source_offset(&mut registry, source, param, f64::from(values[0]))?;
                }
                _ => {
                    registry
                        .source_mut(source, "set source property")?
                        .props
                        .set(param, values)?;
                    registry.refresh_voice(registry.source(source, "set source property")?);
                }
            },
            Target::Buffer(buffer) => {
                return Err(Self::reject_buffer_write(&registry, buffer, param));
            }
        }
        Ok(())
    }

    fn get_floats(&self, target: Target, param: Param, out: &mut [f32]) -> AudioResult<()> {
        let registry = self.registry.lock();
        match target {
            Target::Listener => registry.listener.get(param, out),
            Target::Source(source) => match param {
                Param::SecOffset | Param::SampleOffset => {
                    check_arity(param, out.len())?;
                    out[0] = Self::source_offset(&registry, source, param)? as f32;
                    Ok(())
                }
                _ => registry
                    .source(source, "get source property")?
                    .props
                    .get(param, out),
            },
            Target::Buffer(buffer) => {
                check_arity(param, out.len())?;
                out[0] = Self::buffer_property(&registry, buffer, param)? as f32;
                Ok(())
            }
        }
    }

    fn set_ints(&self, target: Target, param: Param, values: &[i32]) -> AudioResult<()> {
        check_arity(param, values.len())?;
        match (target, param) {
            (Target::Source(source), Param::SecOffset | Param::SampleOffset) => {
                let mut registry = self.registry.lock();
                Self::set_source_offset(&mut registry, source, param, f64::from(values[0]))
            }
            (Target::Source(source), Param::Looping | Param::SourceRelative) => {
                let mut registry = self.registry.lock();
                registry
                    .source_mut(source, "set source property")?
                    .props
                    .set_flag(param, values[0])?;
                registry.refresh_voice(registry.source(source, "set source property")?);
                Ok(())
            }
            (Target::Buffer(buffer), _) => {
                Err(Self::reject_buffer_write(&self.registry.lock(), buffer, param))
            }
            _ => {
                let mut scratch = [0.0f32; 6];
                let floats = &mut scratch[..values.len()];
                for (slot, &value) in floats.iter_mut().zip(values) {
                    *slot = value as f32;
                }
                self.set_floats(target, param, floats)
            }
        }
    }

    fn get_ints(&self, target: Target, param: Param, out: &mut [i32]) -> AudioResult<()> {
        check_arity(param, out.len())?;
        match (target, param) {
            (Target::Source(source), Param::SecOffset | Param::SampleOffset) => {
                let registry = self.registry.lock();
                out[0] = Self::source_offset(&registry, source, param)?.floor() as i32;
            }
            (Target::Source(source), Param::Looping | Param::SourceRelative) => {
                let registry = self.registry.lock();
                out[0] = registry
                    .source(source, "get source property")?
                    .props
                    .flag(param)?;
            }
            (Target::Buffer(buffer), _) => {
                let value = Self::buffer_property(&self.registry.lock(), buffer, param)?;
                out[0] = i32::try_from(value).map_err(|_| {
                    AudioError::hardware(
                        "get buffer property",
                        format!("{param:?} value {value} does not fit an integer"),
                    )
                })?;
            }
            _ => {
                let mut scratch = [0.0f32; 6];
                let floats = &mut scratch[..out.len()];
                self.get_floats(target, param, floats)?;
                for (slot, value) in out.iter_mut().zip(floats.iter()) {
                    *slot = value.round() as i32;
                }
            }
        }
        Ok(())
    }

    fn global_float(&self, param: GlobalParam) -> AudioResult<f32> {
        Ok(self.registry.lock().globals.get(param))
    }

    fn set_global_float(&self, param: GlobalParam, value: f32) -> AudioResult<()> {
        let mut registry = self.registry.lock();
        registry.globals.set(param, value)?;
        registry.refresh_all_voices();
        Ok(())
    }

    fn global_int(&self, param: GlobalParam) -> AudioResult<i32> {
        Ok(self.registry.lock().globals.get(param).round() as i32)
    }

    fn set_global_int(&self, param: GlobalParam, value: i32) -> AudioResult<()> {
        self.set_global_float(param, value as f32)
    }

    fn string(&self, param: StringParam) -> AudioResult<String> {
        Ok(match param {
            StringParam::Vendor => env!("CARGO_PKG_NAME").to_string(),
            StringParam::Version => env!("CARGO_PKG_VERSION").to_string(),
            StringParam::Renderer => self.renderer.name().to_string(),
            StringParam::Extensions => String::new(),
        })
    }
}
