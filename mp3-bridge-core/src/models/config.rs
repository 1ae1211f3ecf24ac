/// Configuration for one encoder session.
///
/// Immutable for the session's lifetime once passed to `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// PCM input sample rate in Hz (default: 44100).
    pub input_sample_rate: u32,

    /// Number of input channels (default: 2). Valid values: 1, 2.
    pub channels: u16,

    /// MP3 output sample rate in Hz (default: 44100).
    pub output_sample_rate: u32,

    /// CBR output bitrate in kbps (default: 128).
    pub bitrate_kbps: u32,

    /// Encode quality, 0 = best (very slow) to 9 = worst (default: 7).
    ///
    /// Recommended: 2 near-best quality, not too slow; 5 good quality,
    /// fast; 7 ok quality, really fast.
    pub quality: u32,
}

/// Output sample rates the MPEG layer III frame header can express.
const MPEG_SAMPLE_RATES: [u32; 9] = [
    8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000,
];

/// CBR bitrates (kbps) across the MPEG 1/2/2.5 tables.
const CBR_BITRATES: [u32; 18] = [
    8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 192, 224, 256, 320,
];

impl EncoderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.input_sample_rate == 0 {
            return Err("input sample rate must be positive".into());
        }
        if ![1, 2].contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if !MPEG_SAMPLE_RATES.contains(&self.output_sample_rate) {
            return Err(format!(
                "unsupported output sample rate: {}",
                self.output_sample_rate
            ));
        }
        if !CBR_BITRATES.contains(&self.bitrate_kbps) {
            return Err(format!("unsupported bitrate: {} kbps", self.bitrate_kbps));
        }
        if self.quality > 9 {
            return Err(format!("quality out of range: {}", self.quality));
        }
        Ok(())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            input_sample_rate: 44100,
            channels: 2,
            output_sample_rate: 44100,
            bitrate_kbps: 128,
            quality: 7,
        }
    }
}
