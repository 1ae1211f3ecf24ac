//! # mp3-bridge-lame
//!
//! LAME backend and C-ABI surface for the MP3 encoder bridge.
//!
//! Provides:
//! - `LameEngine` / `LameFactory` — the `CodecEngine` contract implemented
//!   over libmp3lame, compiled from source by `mp3lame-sys`
//! - `ffi` — `extern "C"` exports for managed-runtime embedders, in the
//!   handle-based and single-implicit-session variants
//!
//! ## Usage
//! ```ignore
//! use mp3_bridge_core::{EncoderConfig, SessionRegistry, TagMetadata};
//! use mp3_bridge_lame::LameFactory;
//!
//! let mut registry = SessionRegistry::new(LameFactory);
//! let handle = registry.create(EncoderConfig::default(), TagMetadata::default());
//! ```

pub mod engine;
pub mod ffi;

pub use engine::{LameEngine, LameFactory};
