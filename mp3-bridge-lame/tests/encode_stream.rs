//! End-to-end encoding against the real LAME engine.

use mp3_bridge_core::models::config::EncoderConfig;
use mp3_bridge_core::models::tags::TagMetadata;
use mp3_bridge_core::session::registry::SessionRegistry;
use mp3_bridge_core::traits::codec_engine::worst_case_buffer_len;
use mp3_bridge_lame::LameFactory;

const FRAMES_PER_CHUNK: usize = 1152;
const CHUNKS: usize = 10;

fn sine_stereo(frames: usize) -> Vec<i16> {
    (0..frames)
        .flat_map(|i| {
            let t = i as f32 / 44100.0;
            let left = (t * 440.0 * std::f32::consts::TAU).sin();
            let right = (t * 554.37 * std::f32::consts::TAU).sin();
            [(left * 12000.0) as i16, (right * 12000.0) as i16]
        })
        .collect()
}

fn stream_config(bitrate_kbps: u32) -> EncoderConfig {
    EncoderConfig {
        input_sample_rate: 44100,
        channels: 2,
        output_sample_rate: 44100,
        bitrate_kbps,
        quality: 2,
    }
}

/// Encode `chunks` repetitions of `pcm` then flush, returning the stream.
fn encode_stream(config: EncoderConfig, tags: TagMetadata, pcm: &[i16], chunks: usize) -> Vec<u8> {
    let mut registry = SessionRegistry::new(LameFactory);
    let handle = registry.create(config, tags);
    let session = registry.get_mut(handle).unwrap();

    let mut out = vec![0u8; worst_case_buffer_len(FRAMES_PER_CHUNK)];
    let mut stream = Vec::new();
    for _ in 0..chunks {
        let written = session.encode_interleaved(pcm, &mut out).unwrap();
        assert!(written >= 0, "encode returned {written}");
        stream.extend_from_slice(&out[..written as usize]);
    }
    let flushed = session.flush(&mut out).unwrap();
    assert!(flushed >= 0, "flush returned {flushed}");
    stream.extend_from_slice(&out[..flushed as usize]);

    registry.close(handle).unwrap();
    stream
}

/// Drop an ID3v2 leader and/or ID3v1 trailer, leaving only audio frames.
fn strip_id3(stream: &[u8]) -> &[u8] {
    let mut stream = stream;
    if stream.len() >= 10 && &stream[..3] == b"ID3" {
        let size = stream[6..10]
            .iter()
            .fold(0usize, |acc, &byte| (acc << 7) | usize::from(byte & 0x7f));
        let end = (10 + size).min(stream.len());
        stream = &stream[end..];
    }
    if stream.len() >= 128 && &stream[stream.len() - 128..stream.len() - 125] == b"TAG" {
        stream = &stream[..stream.len() - 128];
    }
    stream
}

#[test]
fn create_then_close_without_encoding() {
    let mut registry = SessionRegistry::new(LameFactory);
    for config in [
        stream_config(128),
        EncoderConfig::default(),
        EncoderConfig {
            input_sample_rate: 22050,
            channels: 1,
            output_sample_rate: 22050,
            bitrate_kbps: 64,
            quality: 5,
        },
    ] {
        let handle = registry.create(config, TagMetadata::default());
        registry.close(handle).unwrap();
    }
    assert_eq!(registry.open_sessions(), 0);
    assert_eq!(registry.len(), 3);
}

#[test]
fn ten_chunk_stream_then_flush_produces_audio() {
    let pcm = sine_stereo(FRAMES_PER_CHUNK);
    let stream = encode_stream(stream_config(128), TagMetadata::default(), &pcm, CHUNKS);
    assert!(!stream.is_empty(), "ten chunks plus flush must yield bytes");
}

#[test]
fn worst_case_buffer_is_always_sufficient() {
    let mut registry = SessionRegistry::new(LameFactory);
    let handle = registry.create(stream_config(128), TagMetadata::default());
    let session = registry.get_mut(handle).unwrap();

    for frames in [0usize, 1, 576, 1152, 4096] {
        let pcm = sine_stereo(frames);
        let mut out = vec![0u8; worst_case_buffer_len(frames)];
        let written = session.encode_interleaved(&pcm, &mut out).unwrap();
        assert!(written >= 0, "frames = {frames}, returned {written}");
    }

    let mut out = vec![0u8; worst_case_buffer_len(0)];
    assert!(session.flush(&mut out).unwrap() >= 0);
}

#[test]
fn zero_capacity_output_returns_negative() {
    let mut registry = SessionRegistry::new(LameFactory);
    let handle = registry.create(stream_config(128), TagMetadata::default());
    let session = registry.get_mut(handle).unwrap();

    let pcm = sine_stereo(FRAMES_PER_CHUNK);
    let written = session.encode_interleaved(&pcm, &mut []).unwrap();
    assert!(written < 0, "expected failure, got {written}");
}

#[test]
fn bitrate_changes_stream_size_for_identical_input() {
    let pcm = sine_stereo(FRAMES_PER_CHUNK);
    let low = encode_stream(stream_config(128), TagMetadata::default(), &pcm, CHUNKS);
    let high = encode_stream(stream_config(320), TagMetadata::default(), &pcm, CHUNKS);

    assert!(!low.is_empty() && !high.is_empty());
    assert_ne!(low.len(), high.len());
    assert!(high.len() > low.len());
}

#[test]
fn tags_leave_audio_frames_unchanged() {
    let pcm = sine_stereo(FRAMES_PER_CHUNK);
    let plain = encode_stream(stream_config(128), TagMetadata::default(), &pcm, 4);

    let tags = TagMetadata {
        title: Some("bridge check".into()),
        artist: Some("nobody".into()),
        album: Some("none".into()),
        year: Some("2009".into()),
        comment: Some("tag isolation".into()),
    };
    let tagged = encode_stream(stream_config(128), tags, &pcm, 4);

    assert_eq!(strip_id3(&plain), strip_id3(&tagged));
}

#[test]
fn dual_channel_and_interleaved_streams_match() {
    let pcm = sine_stereo(FRAMES_PER_CHUNK);
    let left: Vec<i16> = pcm.iter().step_by(2).copied().collect();
    let right: Vec<i16> = pcm.iter().skip(1).step_by(2).copied().collect();

    let interleaved = encode_stream(stream_config(128), TagMetadata::default(), &pcm, 4);

    let mut registry = SessionRegistry::new(LameFactory);
    let handle = registry.create(stream_config(128), TagMetadata::default());
    let session = registry.get_mut(handle).unwrap();

    let mut out = vec![0u8; worst_case_buffer_len(FRAMES_PER_CHUNK)];
    let mut dual = Vec::new();
    for _ in 0..4 {
        let written = session.encode(&left, &right, &mut out).unwrap();
        assert!(written >= 0);
        dual.extend_from_slice(&out[..written as usize]);
    }
    let flushed = session.flush(&mut out).unwrap();
    assert!(flushed >= 0);
    dual.extend_from_slice(&out[..flushed as usize]);

    assert_eq!(interleaved, dual);
}

#[test]
fn mono_stream_encodes() {
    let config = EncoderConfig {
        input_sample_rate: 44100,
        channels: 1,
        output_sample_rate: 44100,
        bitrate_kbps: 64,
        quality: 5,
    };
    let pcm: Vec<i16> = sine_stereo(FRAMES_PER_CHUNK)
        .iter()
        .step_by(2)
        .copied()
        .collect();
    let stream = encode_stream(config, TagMetadata::default(), &pcm, CHUNKS);
    assert!(!stream.is_empty());
}
