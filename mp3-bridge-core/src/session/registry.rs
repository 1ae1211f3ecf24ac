use crate::diagnostics;
use crate::models::config::EncoderConfig;
use crate::models::error::BridgeError;
use crate::models::tags::TagMetadata;
use crate::session::encoder_session::EncoderSession;
use crate::traits::codec_engine::EngineFactory;

/// Append-only table of sessions addressable by stable integer handles.
///
/// A handle is the session's index in the slot list. Handles are
/// monotonically increasing and never recycled; closing a session leaves
/// its slot in place with the engine released, so a stale handle hits the
/// session-level closed guard instead of aliasing a newer session.
///
/// The registry is an explicit object rather than process-global state so
/// tests construct independent registries per case. It is not internally
/// synchronized; concurrent embedders serialize access externally.
pub struct SessionRegistry<F: EngineFactory> {
    factory: F,
    slots: Vec<EncoderSession<F::Engine>>,
}

impl<F: EngineFactory> SessionRegistry<F> {
    pub const fn new(factory: F) -> Self {
        Self {
            factory,
            slots: Vec::new(),
        }
    }

    /// Create a session and return its handle.
    ///
    /// Never fails: a configuration the engine rejects still registers a
    /// session, and its encode calls observe the engine's error codes.
    pub fn create(&mut self, config: EncoderConfig, tags: TagMetadata) -> usize {
        let session = EncoderSession::open(&self.factory, config, &tags);
        self.slots.push(session);
        let handle = self.slots.len() - 1;
        if diagnostics::logging_enabled() {
            let config = self.slots[handle].config();
            log::debug!(
                "session {handle} created: {} Hz in, {} ch, {} Hz out, {} kbps, q{}",
                config.input_sample_rate,
                config.channels,
                config.output_sample_rate,
                config.bitrate_kbps,
                config.quality
            );
        }
        handle
    }

    pub fn get(&self, handle: usize) -> Result<&EncoderSession<F::Engine>, BridgeError> {
        self.slots.get(handle).ok_or(BridgeError::OutOfRange(handle))
    }

    pub fn get_mut(
        &mut self,
        handle: usize,
    ) -> Result<&mut EncoderSession<F::Engine>, BridgeError> {
        self.slots
            .get_mut(handle)
            .ok_or(BridgeError::OutOfRange(handle))
    }

    /// Close the session behind `handle`, releasing its engine. The slot
    /// stays; a second close is a guarded error.
    pub fn close(&mut self, handle: usize) -> Result<(), BridgeError> {
        self.get_mut(handle)?.close()
    }

    /// Number of slots ever created, closed ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of sessions currently holding a live engine.
    pub fn open_sessions(&self) -> usize {
        self.slots.iter().filter(|s| s.is_open()).count()
    }
}
