use std::path::{Path, PathBuf};

use crate::assets::decode::{AudioDecoder, AudioPcm, VideoMeta, VideoProber};
use crate::foundation::error::{MixlineError, MixlineResult};
use crate::timeline::model::MediaRef;

/// Decode/probe capabilities backed by the system `ffmpeg`/`ffprobe`
/// binaries (requires the `media-ffmpeg` feature).
///
/// [`MediaRef`] keys are treated as normalized relative paths and resolved
/// against `assets_root`.
#[derive(Clone, Debug)]
pub struct FfmpegMedia {
    assets_root: PathBuf,
}

impl FfmpegMedia {
    /// Create a media backend rooted at `assets_root`.
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
        }
    }

    /// Resolve a media key to an on-disk path under the assets root.
    pub fn resolve(&self, media: &MediaRef) -> MixlineResult<PathBuf> {
        let norm = normalize_rel_path(media.as_str())?;
        Ok(self.assets_root.join(Path::new(&norm)))
    }
}

impl AudioDecoder for FfmpegMedia {
    fn decode_audio(&self, media: &MediaRef) -> MixlineResult<AudioPcm> {
        let path = self.resolve(media)?;
        decode_audio_planar(&path)
    }
}

impl VideoProber for FfmpegMedia {
    fn probe_video(&self, media: &MediaRef) -> MixlineResult<VideoMeta> {
        let path = self.resolve(media)?;
        probe_video_meta(&path)
    }
}

pub(crate) fn normalize_rel_path(source: &str) -> MixlineResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(MixlineError::validation("media paths must be relative"));
    }
    if s.is_empty() {
        return Err(MixlineError::validation("media path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(MixlineError::validation("media paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(MixlineError::validation("media path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Probe video duration and resolution through `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
fn probe_video_meta(source_path: &Path) -> MixlineResult<VideoMeta> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: ProbeFormat,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| MixlineError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(MixlineError::decode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| MixlineError::decode(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| MixlineError::decode("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| MixlineError::decode("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| MixlineError::decode("missing video height from ffprobe"))?;
    let duration_secs = parsed
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MixlineError::decode("missing container duration from ffprobe"))?;

    Ok(VideoMeta {
        duration_secs,
        width,
        height,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
fn probe_video_meta(_source_path: &Path) -> MixlineResult<VideoMeta> {
    Err(MixlineError::decode(
        "probing media sources requires the 'media-ffmpeg' feature",
    ))
}

/// Decode any audio-bearing source to planar stereo `f32` PCM at 48 kHz
/// through `ffmpeg`.
///
/// Every clip lands on one shared rate and layout so the mixer's format
/// check holds; that unification is this step's job, not the mixer's.
#[cfg(feature = "media-ffmpeg")]
fn decode_audio_planar(path: &Path) -> MixlineResult<AudioPcm> {
    const DECODE_SAMPLE_RATE: u32 = 48_000;
    const DECODE_CHANNELS: u16 = 2;

    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &DECODE_CHANNELS.to_string(),
            "-ar",
            &DECODE_SAMPLE_RATE.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| MixlineError::decode(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(MixlineError::decode(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(MixlineError::decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut interleaved = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        interleaved.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    AudioPcm::from_interleaved(DECODE_SAMPLE_RATE, DECODE_CHANNELS, &interleaved)
}

#[cfg(not(feature = "media-ffmpeg"))]
fn decode_audio_planar(_path: &Path) -> MixlineResult<AudioPcm> {
    Err(MixlineError::decode(
        "decoding media sources requires the 'media-ffmpeg' feature",
    ))
}
