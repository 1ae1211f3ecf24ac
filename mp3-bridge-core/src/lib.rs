//! # mp3-bridge-core
//!
//! Engine-agnostic core of the MP3 encoder bridge.
//!
//! Exposes a streaming MP3 encoding session (create, feed PCM chunks,
//! drain compressed output, flush, close) over a codec engine hidden
//! behind the `CodecEngine` trait. Backends (LAME) implement the engine
//! contract and plug into the generic session types.
//!
//! ## Architecture
//!
//! ```text
//! mp3-bridge-core (this crate)
//! ├── traits/        ← CodecEngine, EngineFactory (the fixed engine contract)
//! ├── models/        ← EncoderConfig, TagMetadata, SessionState, BridgeError
//! ├── session/       ← EncoderSession, SessionRegistry, SingleSession
//! └── diagnostics    ← process-wide lifecycle-logging toggle
//! ```

pub mod diagnostics;
pub mod models;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::EncoderConfig;
pub use models::error::BridgeError;
pub use models::state::SessionState;
pub use models::tags::TagMetadata;
pub use session::encoder_session::EncoderSession;
pub use session::registry::SessionRegistry;
pub use session::single::SingleSession;
pub use traits::codec_engine::{
    worst_case_buffer_len, CodecEngine, EngineFactory, ENGINE_BUFFER_TOO_SMALL,
    ENGINE_MALLOC_FAILED, ENGINE_NOT_INITIALIZED, ENGINE_PSYCHO_ACOUSTIC,
};
