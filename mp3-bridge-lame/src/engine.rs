//! LAME-backed codec engine.
//!
//! Implements the `CodecEngine` contract over libmp3lame (compiled from
//! source by `mp3lame-sys`). The engine owns its `lame_global_flags`
//! allocation; dropping the engine releases it exactly once. LAME's
//! `c_int` return values are forwarded to callers unmodified.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

use mp3lame_sys as lame;

use mp3_bridge_core::models::config::EncoderConfig;
use mp3_bridge_core::models::tags::TagMetadata;
use mp3_bridge_core::traits::codec_engine::{
    CodecEngine, EngineFactory, ENGINE_BUFFER_TOO_SMALL, ENGINE_MALLOC_FAILED,
    ENGINE_NOT_INITIALIZED,
};

/// One stateful LAME encoder instance.
///
/// Construction never fails: a configuration LAME cannot take, or a failed
/// allocation, is remembered and answered with the matching engine code on
/// every subsequent call, instead of touching unconfigured or released
/// state.
pub struct LameEngine {
    gfp: *mut lame::lame_global_flags,
    channels: u16,
    failure: Option<i32>,
}

// SAFETY: the LAME instance is only touched through &mut self and carries
// no affinity to the creating thread.
unsafe impl Send for LameEngine {}

impl LameEngine {
    /// Allocate and configure a LAME instance: parameter setters, tag
    /// application, then `lame_init_params` to finalize.
    pub fn open(config: &EncoderConfig, tags: &TagMetadata) -> Self {
        // Degenerate parameters (zero rates, channel counts LAME refuses to
        // store) never reach the C engine.
        if config.validate().is_err() {
            return Self {
                gfp: ptr::null_mut(),
                channels: config.channels,
                failure: Some(ENGINE_NOT_INITIALIZED),
            };
        }

        let gfp = unsafe { lame::lame_init() };
        if gfp.is_null() {
            log::error!("lame_init failed to allocate an encoder instance");
            return Self {
                gfp,
                channels: config.channels,
                failure: Some(ENGINE_MALLOC_FAILED),
            };
        }

        unsafe {
            lame::lame_set_in_samplerate(gfp, config.input_sample_rate as c_int);
            lame::lame_set_num_channels(gfp, c_int::from(config.channels));
            lame::lame_set_out_samplerate(gfp, config.output_sample_rate as c_int);
            lame::lame_set_brate(gfp, config.bitrate_kbps as c_int);
            lame::lame_set_quality(gfp, config.quality as c_int);
        }

        apply_tags(gfp, tags);

        let failure = if unsafe { lame::lame_init_params(gfp) } < 0 {
            log::error!(
                "lame_init_params rejected the configuration ({} Hz in, {} ch, {} kbps)",
                config.input_sample_rate,
                config.channels,
                config.bitrate_kbps
            );
            Some(ENGINE_NOT_INITIALIZED)
        } else {
            None
        };

        Self {
            gfp,
            channels: config.channels,
            failure,
        }
    }

    fn gate(&self) -> Result<*mut lame::lame_global_flags, i32> {
        match self.failure {
            Some(code) => Err(code),
            None => Ok(self.gfp),
        }
    }
}

impl CodecEngine for LameEngine {
    fn encode(&mut self, left: &[i16], right: &[i16], mp3_out: &mut [u8]) -> i32 {
        let gfp = match self.gate() {
            Ok(gfp) => gfp,
            Err(code) => return code,
        };
        // LAME skips its output bounds check when handed a zero capacity.
        if mp3_out.is_empty() {
            return ENGINE_BUFFER_TOO_SMALL;
        }
        let samples = left.len().min(right.len());
        unsafe {
            lame::lame_encode_buffer(
                gfp,
                left.as_ptr(),
                right.as_ptr(),
                samples as c_int,
                mp3_out.as_mut_ptr(),
                mp3_out.len() as c_int,
            )
        }
    }

    fn encode_interleaved(&mut self, pcm: &[i16], mp3_out: &mut [u8]) -> i32 {
        let gfp = match self.gate() {
            Ok(gfp) => gfp,
            Err(code) => return code,
        };
        if mp3_out.is_empty() {
            return ENGINE_BUFFER_TOO_SMALL;
        }
        if self.channels == 1 {
            // LAME's interleaved entry point is stereo-only; mono reads the
            // same buffer through the dual-channel call.
            return unsafe {
                lame::lame_encode_buffer(
                    gfp,
                    pcm.as_ptr(),
                    pcm.as_ptr(),
                    pcm.len() as c_int,
                    mp3_out.as_mut_ptr(),
                    mp3_out.len() as c_int,
                )
            };
        }
        let frames = pcm.len() / 2;
        unsafe {
            lame::lame_encode_buffer_interleaved(
                gfp,
                pcm.as_ptr() as *mut i16,
                frames as c_int,
                mp3_out.as_mut_ptr(),
                mp3_out.len() as c_int,
            )
        }
    }

    fn flush(&mut self, mp3_out: &mut [u8]) -> i32 {
        let gfp = match self.gate() {
            Ok(gfp) => gfp,
            Err(code) => return code,
        };
        if mp3_out.is_empty() {
            return ENGINE_BUFFER_TOO_SMALL;
        }
        unsafe { lame::lame_encode_flush(gfp, mp3_out.as_mut_ptr(), mp3_out.len() as c_int) }
    }
}

impl Drop for LameEngine {
    fn drop(&mut self) {
        if !self.gfp.is_null() {
            unsafe { lame::lame_close(self.gfp) };
            self.gfp = ptr::null_mut();
        }
    }
}

/// Apply the optional ID3 fields before parameter finalization.
///
/// Each text value is marshaled through a `CString` scoped to this call;
/// LAME copies the content, so no caller text is retained.
fn apply_tags(gfp: *mut lame::lame_global_flags, tags: &TagMetadata) {
    if tags.is_empty() {
        return;
    }
    unsafe { lame::id3tag_init(gfp) };
    set_tag(tags.title.as_deref(), |text| unsafe {
        lame::id3tag_set_title(gfp, text);
    });
    set_tag(tags.artist.as_deref(), |text| unsafe {
        lame::id3tag_set_artist(gfp, text);
    });
    set_tag(tags.album.as_deref(), |text| unsafe {
        lame::id3tag_set_album(gfp, text);
    });
    set_tag(tags.year.as_deref(), |text| unsafe {
        lame::id3tag_set_year(gfp, text);
    });
    set_tag(tags.comment.as_deref(), |text| unsafe {
        lame::id3tag_set_comment(gfp, text);
    });
}

fn set_tag<A: FnMut(*const c_char)>(value: Option<&str>, mut apply: A) {
    let Some(text) = value else { return };
    // A field with an interior NUL cannot cross the C boundary; it is
    // dropped rather than truncated.
    if let Ok(c_text) = CString::new(text) {
        apply(c_text.as_ptr());
    }
}

/// Factory producing [`LameEngine`] instances for the generic session types.
#[derive(Debug, Clone, Copy, Default)]
pub struct LameFactory;

impl EngineFactory for LameFactory {
    type Engine = LameEngine;

    fn open(&self, config: &EncoderConfig, tags: &TagMetadata) -> LameEngine {
        LameEngine::open(config, tags)
    }
}
