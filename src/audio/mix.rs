use crate::assets::decode::AudioPcm;
use crate::foundation::error::{MixlineError, MixlineResult};
use crate::foundation::units::delay_samples;
use crate::timeline::model::ClipId;

/// One decoded audio clip placed on the timeline, ready to mix.
#[derive(Clone, Debug)]
pub struct PlacedPcm {
    /// Originating clip.
    pub clip: ClipId,
    /// Timeline position in pixel units, snapshotted for this pass.
    pub offset_px: u32,
    /// Decoded planar PCM.
    pub pcm: AudioPcm,
}

/// Output of one mixing pass: planar float sample arrays of uniform length.
///
/// Owned exclusively by the pass that produced it and superseded, never
/// mutated, when the track set changes.
#[derive(Clone, Debug, PartialEq)]
pub struct MixedAudioBuffer {
    /// Sample rate shared by all mixed clips.
    pub sample_rate: u32,
    /// Per-channel sample arrays of uniform length.
    pub channels: Vec<Vec<f32>>,
}

impl MixedAudioBuffer {
    /// Number of channels.
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }
}

/// Sum time-shifted clips into one output buffer.
///
/// Each clip is delayed by `floor(offset_secs * sample_rate)` samples and
/// added sample-wise onto a zero-initialized buffer sized to the latest clip
/// end. Overlapping clips sum without normalization or limiting: the result
/// may leave `[-1, 1]` and is clipped only at 16-bit quantization time in
/// [`crate::encode_wav`].
///
/// Returns `Ok(None)` for an empty clip set (the no-op mix). Callers decide
/// what an absent mix means; it is not silently encoded as a zero-length
/// WAV.
///
/// All clips must share one sample rate and channel count (the upstream
/// decode step unifies formats); disagreement fails with
/// [`MixlineError::FormatMismatch`] instead of truncating or aliasing audio.
#[tracing::instrument(skip(clips), fields(clip_count = clips.len()))]
pub fn mix_placed(clips: &[PlacedPcm]) -> MixlineResult<Option<MixedAudioBuffer>> {
    let Some(first) = clips.first() else {
        return Ok(None);
    };

    first.pcm.validate()?;
    let sample_rate = first.pcm.sample_rate;
    let n_channels = first.pcm.channel_count();
    for placed in clips {
        placed.pcm.validate()?;
        if placed.pcm.sample_rate != sample_rate || placed.pcm.channel_count() != n_channels {
            return Err(MixlineError::FormatMismatch {
                expected_sample_rate: sample_rate,
                expected_channels: n_channels,
                got_sample_rate: placed.pcm.sample_rate,
                got_channels: placed.pcm.channel_count(),
            });
        }
    }

    let delays: Vec<usize> = clips
        .iter()
        .map(|p| delay_samples(p.offset_px, sample_rate))
        .collect();
    let total = clips
        .iter()
        .zip(&delays)
        .map(|(p, d)| d + p.pcm.frames())
        .max()
        .unwrap_or(0);

    let mut out: Vec<Vec<f32>> = (0..usize::from(n_channels))
        .map(|_| vec![0.0f32; total])
        .collect();

    for (placed, &delay) in clips.iter().zip(&delays) {
        for (ch, input) in placed.pcm.channels.iter().enumerate() {
            let dst = &mut out[ch];
            for (i, &s) in input.iter().enumerate() {
                let idx = i + delay;
                // Cannot fire given how `total` is sized; guarded anyway.
                if idx < total {
                    dst[idx] += s;
                }
            }
        }
    }

    Ok(Some(MixedAudioBuffer {
        sample_rate,
        channels: out,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
