//! C-ABI surface of the MP3 encoder bridge.
//!
//! Managed-runtime embedders reach the bridge through these exports, in two
//! variants: handle-based (`mp3bridge_*`, any number of concurrent
//! sessions) and single-implicit-session (`mp3bridge_simple_*`).
//!
//! Marshaling contract, per call:
//! - every slice is derived from the caller's declared element counts,
//!   never from buffer content;
//! - borrows end before the function returns; no caller pointer is
//!   retained;
//! - engine return codes pass through unmodified; bridge-level failures use
//!   the `BRIDGE_*` codes, outside the engine's error range.
//!
//! # Safety
//!
//! All functions taking raw pointers are `unsafe` by nature of the C FFI.
//! Callers must pass pointers that are null or valid for the declared
//! element counts, and must serialize calls per session (the process-wide
//! tables themselves are lock-protected).

use std::ffi::CStr;
use std::os::raw::c_char;
use std::slice;

use parking_lot::Mutex;

use mp3_bridge_core::diagnostics;
use mp3_bridge_core::models::config::EncoderConfig;
use mp3_bridge_core::models::error::BridgeError;
use mp3_bridge_core::models::tags::TagMetadata;
use mp3_bridge_core::session::registry::SessionRegistry;
use mp3_bridge_core::session::single::SingleSession;

use crate::engine::LameFactory;

/// Success.
pub const BRIDGE_OK: i32 = 0;
/// The handle does not address any registry slot.
pub const BRIDGE_BAD_HANDLE: i32 = -100;
/// The session behind the handle (or the implicit session) is closed.
pub const BRIDGE_SESSION_CLOSED: i32 = -101;
/// Null pointer, negative count, or a count exceeding a declared size.
pub const BRIDGE_INVALID_ARGUMENT: i32 = -102;

static REGISTRY: Mutex<SessionRegistry<LameFactory>> =
    Mutex::new(SessionRegistry::new(LameFactory));
static SINGLE: Mutex<SingleSession<LameFactory>> = Mutex::new(SingleSession::new(LameFactory));

fn bridge_code(err: BridgeError) -> i32 {
    match err {
        BridgeError::OutOfRange(_) => BRIDGE_BAD_HANDLE,
        BridgeError::SessionClosed => BRIDGE_SESSION_CLOSED,
    }
}

/// Borrow `samples` PCM samples from a caller buffer declared to hold
/// `declared_len` elements.
unsafe fn pcm_slice<'a>(ptr: *const i16, declared_len: usize, samples: usize) -> Option<&'a [i16]> {
    if ptr.is_null() || samples > declared_len {
        return None;
    }
    Some(unsafe { slice::from_raw_parts(ptr, samples) })
}

/// Borrow the caller's output buffer at its full declared capacity.
unsafe fn out_slice<'a>(ptr: *mut u8, declared_len: usize) -> Option<&'a mut [u8]> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { slice::from_raw_parts_mut(ptr, declared_len) })
}

/// Copy an optional C string into owned tag text. The caller's pointer is
/// not retained past the call.
unsafe fn tag_text(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn config_from_raw(
    in_samplerate: i32,
    out_channel: i32,
    out_samplerate: i32,
    out_bitrate: i32,
    quality: i32,
) -> EncoderConfig {
    // Out-of-domain values become parameters validation rejects; the
    // session still registers and answers the not-initialized code.
    EncoderConfig {
        input_sample_rate: in_samplerate.max(0) as u32,
        channels: out_channel.clamp(0, i32::from(u16::MAX)) as u16,
        output_sample_rate: out_samplerate.max(0) as u32,
        bitrate_kbps: out_bitrate.max(0) as u32,
        quality: quality.max(0) as u32,
    }
}

unsafe fn tags_from_raw(
    title: *const c_char,
    artist: *const c_char,
    album: *const c_char,
    year: *const c_char,
    comment: *const c_char,
) -> TagMetadata {
    TagMetadata {
        title: unsafe { tag_text(title) },
        artist: unsafe { tag_text(artist) },
        album: unsafe { tag_text(album) },
        year: unsafe { tag_text(year) },
        comment: unsafe { tag_text(comment) },
    }
}

// ─────────────────────── handle-based variant ───────────────────────

/// Create an encoder session and return its handle (≥ 0).
///
/// Creation never fails; a configuration the engine rejects yields a
/// session whose encode calls return the engine's error codes.
///
/// # Safety
///
/// Tag pointers must be null or valid null-terminated strings. Their
/// content is copied during this call and not retained.
#[no_mangle]
pub unsafe extern "C" fn mp3bridge_init(
    in_samplerate: i32,
    out_channel: i32,
    out_samplerate: i32,
    out_bitrate: i32,
    quality: i32,
    title: *const c_char,
    artist: *const c_char,
    album: *const c_char,
    year: *const c_char,
    comment: *const c_char,
) -> i32 {
    let config = config_from_raw(in_samplerate, out_channel, out_samplerate, out_bitrate, quality);
    let tags = unsafe { tags_from_raw(title, artist, album, year, comment) };
    REGISTRY.lock().create(config, tags) as i32
}

/// Encode a chunk of dual-channel PCM into `mp3buf`.
///
/// Returns bytes written (0 while the encoder buffers) or a negative code:
/// the engine's own, or a `BRIDGE_*` code for bridge-level misuse.
///
/// # Safety
///
/// `left`/`right` must be valid for `left_len`/`right_len` 16-bit samples,
/// `mp3buf` for `mp3buf_len` bytes, for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn mp3bridge_encode(
    handle: i32,
    left: *const i16,
    left_len: usize,
    right: *const i16,
    right_len: usize,
    samples: i32,
    mp3buf: *mut u8,
    mp3buf_len: usize,
) -> i32 {
    if handle < 0 {
        return BRIDGE_BAD_HANDLE;
    }
    if samples < 0 {
        return BRIDGE_INVALID_ARGUMENT;
    }
    let samples = samples as usize;
    let left = match unsafe { pcm_slice(left, left_len, samples) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };
    let right = match unsafe { pcm_slice(right, right_len, samples) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };
    let out = match unsafe { out_slice(mp3buf, mp3buf_len) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };

    match REGISTRY.lock().get_mut(handle as usize) {
        Ok(session) => session.encode(left, right, out).unwrap_or_else(bridge_code),
        Err(err) => bridge_code(err),
    }
}

/// Encode a chunk of interleaved PCM into `mp3buf`. `samples` counts
/// samples per channel, not elements in `pcm`.
///
/// # Safety
///
/// `pcm` must be valid for `pcm_len` 16-bit samples and `mp3buf` for
/// `mp3buf_len` bytes, for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn mp3bridge_encode_interleaved(
    handle: i32,
    pcm: *const i16,
    pcm_len: usize,
    samples: i32,
    mp3buf: *mut u8,
    mp3buf_len: usize,
) -> i32 {
    if handle < 0 {
        return BRIDGE_BAD_HANDLE;
    }
    if samples < 0 {
        return BRIDGE_INVALID_ARGUMENT;
    }
    let out = match unsafe { out_slice(mp3buf, mp3buf_len) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };

    let mut registry = REGISTRY.lock();
    let session = match registry.get_mut(handle as usize) {
        Ok(session) => session,
        Err(err) => return bridge_code(err),
    };
    let channels = usize::from(session.config().channels.max(1));
    let pcm = match unsafe { pcm_slice(pcm, pcm_len, samples as usize * channels) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };
    session.encode_interleaved(pcm, out).unwrap_or_else(bridge_code)
}

/// Drain the encoder's remaining state into `mp3buf`.
///
/// # Safety
///
/// `mp3buf` must be valid for `mp3buf_len` bytes for the duration of the
/// call.
#[no_mangle]
pub unsafe extern "C" fn mp3bridge_flush(handle: i32, mp3buf: *mut u8, mp3buf_len: usize) -> i32 {
    if handle < 0 {
        return BRIDGE_BAD_HANDLE;
    }
    let out = match unsafe { out_slice(mp3buf, mp3buf_len) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };

    match REGISTRY.lock().get_mut(handle as usize) {
        Ok(session) => session.flush(out).unwrap_or_else(bridge_code),
        Err(err) => bridge_code(err),
    }
}

/// Close the session behind `handle`, releasing its engine. The handle is
/// never reused; a second close reports `BRIDGE_SESSION_CLOSED`.
#[no_mangle]
pub extern "C" fn mp3bridge_close(handle: i32) -> i32 {
    if handle < 0 {
        return BRIDGE_BAD_HANDLE;
    }
    match REGISTRY.lock().close(handle as usize) {
        Ok(()) => BRIDGE_OK,
        Err(err) => bridge_code(err),
    }
}

/// Toggle lifecycle logging, process-wide, for both variants.
#[no_mangle]
pub extern "C" fn mp3bridge_set_logging(enabled: bool) {
    diagnostics::set_logging(enabled);
}

// ──────────────────── single implicit-session variant ────────────────────

/// Initialize (or re-initialize) the implicit session. A previous engine is
/// force-closed and discarded first.
///
/// # Safety
///
/// Tag pointers must be null or valid null-terminated strings. Their
/// content is copied during this call and not retained.
#[no_mangle]
pub unsafe extern "C" fn mp3bridge_simple_init(
    in_samplerate: i32,
    out_channel: i32,
    out_samplerate: i32,
    out_bitrate: i32,
    quality: i32,
    title: *const c_char,
    artist: *const c_char,
    album: *const c_char,
    year: *const c_char,
    comment: *const c_char,
) -> i32 {
    let config = config_from_raw(in_samplerate, out_channel, out_samplerate, out_bitrate, quality);
    let tags = unsafe { tags_from_raw(title, artist, album, year, comment) };
    SINGLE.lock().init(config, tags);
    BRIDGE_OK
}

/// Dual-channel encode against the implicit session.
///
/// # Safety
///
/// Same buffer requirements as [`mp3bridge_encode`].
#[no_mangle]
pub unsafe extern "C" fn mp3bridge_simple_encode(
    left: *const i16,
    left_len: usize,
    right: *const i16,
    right_len: usize,
    samples: i32,
    mp3buf: *mut u8,
    mp3buf_len: usize,
) -> i32 {
    if samples < 0 {
        return BRIDGE_INVALID_ARGUMENT;
    }
    let samples = samples as usize;
    let left = match unsafe { pcm_slice(left, left_len, samples) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };
    let right = match unsafe { pcm_slice(right, right_len, samples) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };
    let out = match unsafe { out_slice(mp3buf, mp3buf_len) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };

    SINGLE.lock().encode(left, right, out).unwrap_or_else(bridge_code)
}

/// Interleaved encode against the implicit session. `samples` counts
/// samples per channel.
///
/// # Safety
///
/// Same buffer requirements as [`mp3bridge_encode_interleaved`].
#[no_mangle]
pub unsafe extern "C" fn mp3bridge_simple_encode_interleaved(
    pcm: *const i16,
    pcm_len: usize,
    samples: i32,
    mp3buf: *mut u8,
    mp3buf_len: usize,
) -> i32 {
    if samples < 0 {
        return BRIDGE_INVALID_ARGUMENT;
    }
    let out = match unsafe { out_slice(mp3buf, mp3buf_len) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };

    let mut single = SINGLE.lock();
    let channels = match single.config() {
        Some(config) => usize::from(config.channels.max(1)),
        None => return BRIDGE_SESSION_CLOSED,
    };
    let pcm = match unsafe { pcm_slice(pcm, pcm_len, samples as usize * channels) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };
    single.encode_interleaved(pcm, out).unwrap_or_else(bridge_code)
}

/// Flush the implicit session.
///
/// # Safety
///
/// `mp3buf` must be valid for `mp3buf_len` bytes for the duration of the
/// call.
#[no_mangle]
pub unsafe extern "C" fn mp3bridge_simple_flush(mp3buf: *mut u8, mp3buf_len: usize) -> i32 {
    let out = match unsafe { out_slice(mp3buf, mp3buf_len) } {
        Some(buffer) => buffer,
        None => return BRIDGE_INVALID_ARGUMENT,
    };
    SINGLE.lock().flush(out).unwrap_or_else(bridge_code)
}

/// Close the implicit session. Closing before init, or twice, reports
/// `BRIDGE_SESSION_CLOSED`.
#[no_mangle]
pub extern "C" fn mp3bridge_simple_close() -> i32 {
    match SINGLE.lock().close() {
        Ok(()) => BRIDGE_OK,
        Err(err) => bridge_code(err),
    }
}
