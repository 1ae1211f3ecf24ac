use crate::models::config::EncoderConfig;
use crate::models::tags::TagMetadata;

/// Output buffer too small for the bytes the engine needed to write.
pub const ENGINE_BUFFER_TOO_SMALL: i32 = -1;
/// The engine could not allocate internal buffers.
pub const ENGINE_MALLOC_FAILED: i32 = -2;
/// Encoder parameters were never finalized (rejected configuration).
pub const ENGINE_NOT_INITIALIZED: i32 = -3;
/// Psychoacoustic analysis failed.
pub const ENGINE_PSYCHO_ACOUSTIC: i32 = -4;

/// Worst-case encoded output size for `samples` PCM samples per channel.
///
/// `7200 + 1.25 * samples` bytes; an output buffer of this size is always
/// large enough for a single encode or flush call.
pub fn worst_case_buffer_len(samples: usize) -> usize {
    7200 + samples * 5 / 4
}

/// Fixed function contract of the codec engine.
///
/// An engine is one stateful encoder instance, constructed by an
/// [`EngineFactory`] from a configuration and optional tag metadata. It owns
/// all internal lookahead and bit-reservoir state, so callers must present
/// chunks in true temporal order. Close is [`Drop`].
///
/// Every operation returns the number of bytes written into `mp3_out`,
/// which may be zero (the encoder is still buffering), or a negative
/// engine-defined error code. The bridge forwards these codes to the caller
/// unmodified; the stock codes are the `ENGINE_*` constants above.
pub trait CodecEngine: Send {
    /// Encode one chunk of dual-channel PCM. `left` and `right` carry the
    /// same number of samples; mono engines read only `left`.
    fn encode(&mut self, left: &[i16], right: &[i16], mp3_out: &mut [u8]) -> i32;

    /// Encode one chunk of interleaved PCM (`L R L R …`, or plain mono).
    fn encode_interleaved(&mut self, pcm: &[i16], mp3_out: &mut [u8]) -> i32;

    /// Drain the encoder's internal lookahead at end of stream.
    ///
    /// Legal mid-stream, but produces a premature partial frame and the
    /// engine may behave inconsistently afterwards.
    fn flush(&mut self, mp3_out: &mut [u8]) -> i32;
}

/// Constructor seam for codec engines.
///
/// Opening never fails: an engine whose parameter finalization was rejected
/// must still be returned, and must answer every subsequent call with
/// [`ENGINE_NOT_INITIALIZED`] instead of panicking. This keeps session
/// creation infallible (the always-register policy) while still surfacing
/// the failure through the ordinary return-code channel.
pub trait EngineFactory {
    type Engine: CodecEngine;

    fn open(&self, config: &EncoderConfig, tags: &TagMetadata) -> Self::Engine;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_case_bound_matches_documented_formula() {
        assert_eq!(worst_case_buffer_len(0), 7200);
        assert_eq!(worst_case_buffer_len(1152), 7200 + 1440);
        assert_eq!(worst_case_buffer_len(4), 7205);
    }
}
