use crate::audio::mix::MixedAudioBuffer;
use crate::foundation::error::{MixlineError, MixlineResult};

/// Serialize a mixed buffer into a canonical RIFF/WAVE PCM16 byte stream.
///
/// Layout: 44-byte header (`"RIFF"`, chunk size `36 + data_bytes`, `"WAVE"`,
/// 16-byte `"fmt "` sub-chunk with PCM tag 1, `"data"` sub-chunk header),
/// then frame-interleaved samples, each clamped to `[-1, 1]` and quantized
/// to little-endian signed 16-bit. This is the only place the mix is clipped
/// into range: summed floats beyond `[-1, 1]` saturate here, audibly, by
/// design.
///
/// Pure and deterministic; a zero-frame buffer encodes to a degenerate but
/// valid 44-byte WAV (callers normally gate on the mixer's `Option` first).
pub fn encode_wav(mix: &MixedAudioBuffer) -> MixlineResult<Vec<u8>> {
    let n_channels = mix.channel_count();
    if n_channels == 0 {
        return Err(MixlineError::validation("wav requires at least one channel"));
    }
    if mix.sample_rate == 0 {
        return Err(MixlineError::validation("wav sample rate must be non-zero"));
    }
    let frames = mix.frames();
    if mix.channels.iter().any(|c| c.len() != frames) {
        return Err(MixlineError::validation(
            "wav channel arrays must have uniform length",
        ));
    }

    let block_align = u32::from(n_channels) * 2;
    let byte_rate = mix.sample_rate * block_align;
    let data_bytes = (frames as u32) * block_align;

    let mut out = Vec::with_capacity(44 + data_bytes as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_bytes).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format tag
    out.extend_from_slice(&n_channels.to_le_bytes());
    out.extend_from_slice(&mix.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&(block_align as u16).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_bytes.to_le_bytes());

    for frame in 0..frames {
        for channel in &mix.channels {
            out.extend_from_slice(&quantize_i16(channel[frame]).to_le_bytes());
        }
    }

    Ok(out)
}

/// Clamp to `[-1, 1]` and quantize with asymmetric scaling: negative samples
/// span the full `-32768`, positive samples top out at `32767`.
fn quantize_i16(s: f32) -> i16 {
    let s = s.clamp(-1.0, 1.0);
    if s < 0.0 {
        (f64::from(s) * 32_768.0).round() as i16
    } else {
        (f64::from(s) * 32_767.0).round() as i16
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/wav.rs"]
mod tests;
