use crate::diagnostics;
use crate::models::config::EncoderConfig;
use crate::models::error::BridgeError;
use crate::models::tags::TagMetadata;
use crate::session::encoder_session::EncoderSession;
use crate::traits::codec_engine::EngineFactory;

/// Single implicit-slot variant of the bridge.
///
/// Degenerate registry with one addressable session and no handle.
/// Re-initializing force-closes and discards the previous engine before
/// rebuilding, so repeated init is a supported path rather than a leak.
pub struct SingleSession<F: EngineFactory> {
    factory: F,
    current: Option<EncoderSession<F::Engine>>,
}

impl<F: EngineFactory> SingleSession<F> {
    pub const fn new(factory: F) -> Self {
        Self {
            factory,
            current: None,
        }
    }

    /// Initialize, or re-initialize, the implicit session.
    ///
    /// Any previous engine, open or already closed, is discarded first;
    /// subsequent encodes reflect only the new configuration.
    pub fn init(&mut self, config: EncoderConfig, tags: TagMetadata) {
        if let Some(mut previous) = self.current.take() {
            let _ = previous.close();
        }
        self.current = Some(EncoderSession::open(&self.factory, config, &tags));
        if diagnostics::logging_enabled() {
            log::debug!("single session initialized");
        }
    }

    /// Whether an open session is currently available.
    pub fn is_initialized(&self) -> bool {
        self.current.as_ref().is_some_and(EncoderSession::is_open)
    }

    /// Configuration of the current session, if one was initialized.
    pub fn config(&self) -> Option<&EncoderConfig> {
        self.current.as_ref().map(EncoderSession::config)
    }

    pub fn encode(
        &mut self,
        left: &[i16],
        right: &[i16],
        mp3_out: &mut [u8],
    ) -> Result<i32, BridgeError> {
        self.session_mut()?.encode(left, right, mp3_out)
    }

    pub fn encode_interleaved(
        &mut self,
        pcm: &[i16],
        mp3_out: &mut [u8],
    ) -> Result<i32, BridgeError> {
        self.session_mut()?.encode_interleaved(pcm, mp3_out)
    }

    pub fn flush(&mut self, mp3_out: &mut [u8]) -> Result<i32, BridgeError> {
        self.session_mut()?.flush(mp3_out)
    }

    /// Close the implicit session. Closing before init, or twice, is a
    /// guarded error.
    pub fn close(&mut self) -> Result<(), BridgeError> {
        self.session_mut()?.close()
    }

    fn session_mut(&mut self) -> Result<&mut EncoderSession<F::Engine>, BridgeError> {
        self.current.as_mut().ok_or(BridgeError::SessionClosed)
    }
}
