use crate::foundation::error::{MixlineError, MixlineResult};
use crate::timeline::model::MediaRef;

/// Decoded planar floating-point PCM.
///
/// Each channel is its own sample array; all channels have the same length.
/// The decode step owns these buffers until they are handed to the mixer,
/// which accumulates into its own output and retains no references back.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Per-channel sample arrays of uniform length.
    pub channels: Vec<Vec<f32>>,
}

impl AudioPcm {
    /// Number of channels.
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Check the planar invariants: non-zero rate, at least one channel,
    /// uniform channel lengths.
    pub fn validate(&self) -> MixlineResult<()> {
        if self.sample_rate == 0 {
            return Err(MixlineError::validation("pcm sample rate must be non-zero"));
        }
        if self.channels.is_empty() {
            return Err(MixlineError::validation("pcm must have at least one channel"));
        }
        let frames = self.channels[0].len();
        if self.channels.iter().any(|c| c.len() != frames) {
            return Err(MixlineError::validation(
                "pcm channel arrays must have uniform length",
            ));
        }
        Ok(())
    }

    /// Build planar PCM from interleaved samples (ch0, ch1, ... per frame).
    pub fn from_interleaved(
        sample_rate: u32,
        channels: u16,
        interleaved: &[f32],
    ) -> MixlineResult<Self> {
        if channels == 0 {
            return Err(MixlineError::validation("channel count must be non-zero"));
        }
        let n = usize::from(channels);
        if !interleaved.len().is_multiple_of(n) {
            return Err(MixlineError::validation(
                "interleaved sample count is not aligned to channel count",
            ));
        }
        let frames = interleaved.len() / n;
        let mut planar: Vec<Vec<f32>> = (0..n).map(|_| Vec::with_capacity(frames)).collect();
        for frame in interleaved.chunks_exact(n) {
            for (ch, &s) in frame.iter().enumerate() {
                planar[ch].push(s);
            }
        }
        Ok(Self {
            sample_rate,
            channels: planar,
        })
    }
}

/// Metadata of a video source, probed without decoding frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoMeta {
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Decode capability for audio sources (consumed, not implemented by the
/// compositor core itself).
///
/// The upstream decode step is responsible for unifying sample rate and
/// channel count across clips; the mixer only checks.
pub trait AudioDecoder {
    /// Decode a source to planar float PCM.
    ///
    /// Fails with [`MixlineError::Decode`] on corrupt or unsupported input;
    /// no partial buffer is returned.
    fn decode_audio(&self, media: &MediaRef) -> MixlineResult<AudioPcm>;
}

/// Probe capability for video sources.
pub trait VideoProber {
    /// Read duration and resolution of a video source.
    fn probe_video(&self, media: &MediaRef) -> MixlineResult<VideoMeta>;
}
