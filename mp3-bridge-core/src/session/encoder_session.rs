use crate::diagnostics;
use crate::models::config::EncoderConfig;
use crate::models::error::BridgeError;
use crate::models::state::SessionState;
use crate::models::tags::TagMetadata;
use crate::traits::codec_engine::{CodecEngine, EngineFactory};

/// One configured, running encoder instance.
///
/// The engine is present exactly while the session is open; `close`
/// releases it, and every later operation fails with a guarded
/// [`BridgeError`] instead of touching released state.
pub struct EncoderSession<E: CodecEngine> {
    engine: Option<E>,
    config: EncoderConfig,
    state: SessionState,
}

impl<E: CodecEngine> EncoderSession<E> {
    /// Open a session: build the engine from `config` and `tags`, enter
    /// `Configured`.
    ///
    /// Never fails. A configuration that fails validation is logged (when
    /// the diagnostics toggle is on) and still produces a session; its
    /// engine answers with the not-initialized code on first use.
    pub fn open<F>(factory: &F, config: EncoderConfig, tags: &TagMetadata) -> Self
    where
        F: EngineFactory<Engine = E>,
    {
        if let Err(reason) = config.validate() {
            if diagnostics::logging_enabled() {
                log::warn!("encoder config rejected ({reason}); session registered anyway");
            }
        }
        let engine = factory.open(&config, tags);
        Self {
            engine: Some(engine),
            config,
            state: SessionState::Configured,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode one chunk of dual-channel PCM.
    ///
    /// The per-call sample count is the shorter of the two buffers'
    /// declared lengths. Returns bytes written into `mp3_out` (0 while the
    /// engine is still buffering) or the engine's negative error code,
    /// unmodified.
    pub fn encode(
        &mut self,
        left: &[i16],
        right: &[i16],
        mp3_out: &mut [u8],
    ) -> Result<i32, BridgeError> {
        let engine = self.engine.as_mut().ok_or(BridgeError::SessionClosed)?;
        self.state = SessionState::Encoding;
        let samples = left.len().min(right.len());
        Ok(engine.encode(&left[..samples], &right[..samples], mp3_out))
    }

    /// Encode one chunk of interleaved PCM.
    ///
    /// The frame count is derived from the buffer's declared length and the
    /// session's channel count; a trailing partial frame is ignored.
    pub fn encode_interleaved(
        &mut self,
        pcm: &[i16],
        mp3_out: &mut [u8],
    ) -> Result<i32, BridgeError> {
        let engine = self.engine.as_mut().ok_or(BridgeError::SessionClosed)?;
        self.state = SessionState::Encoding;
        let channels = usize::from(self.config.channels.max(1));
        let frames = pcm.len() / channels;
        Ok(engine.encode_interleaved(&pcm[..frames * channels], mp3_out))
    }

    /// Drain trailing encoder state. Meaningful once at end of stream;
    /// calling mid-stream is legal but yields a premature partial frame.
    pub fn flush(&mut self, mp3_out: &mut [u8]) -> Result<i32, BridgeError> {
        let engine = self.engine.as_mut().ok_or(BridgeError::SessionClosed)?;
        Ok(engine.flush(mp3_out))
    }

    /// Release the engine and enter `Closed`. A second close is a guarded
    /// error, never a crash.
    pub fn close(&mut self) -> Result<(), BridgeError> {
        if self.engine.take().is_none() {
            return Err(BridgeError::SessionClosed);
        }
        self.state = SessionState::Closed;
        if diagnostics::logging_enabled() {
            log::debug!("encoder session closed");
        }
        Ok(())
    }
}
