use crate::foundation::error::{MixlineError, MixlineResult};
use crate::plan::segment::{Segment, SegmentPlan};
use crate::timeline::model::ClipId;

/// Composition options for [`compose_graph`].
///
/// Defaults match the reference render path: portrait 720x1280 fallback
/// resolution, 60 fps black gap frames, stereo 48 kHz silence, and gap
/// durations formatted to 2 decimal places. Long timelines with many gaps
/// can accumulate sub-frame drift at low precision; raise `gap_precision`
/// when that matters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphOpts {
    /// Resolution used when no video segment supplies one.
    pub fallback_width: u32,
    /// See `fallback_width`.
    pub fallback_height: u32,
    /// Frame rate of synthesized gap video.
    pub gap_fps: u32,
    /// Decimal places used when formatting gap durations.
    pub gap_precision: usize,
    /// Sample rate of synthesized gap silence.
    pub audio_rate: u32,
    /// Channel layout of synthesized gap silence.
    pub audio_layout: String,
}

impl Default for GraphOpts {
    fn default() -> Self {
        Self {
            fallback_width: 720,
            fallback_height: 1280,
            gap_fps: 60,
            gap_precision: 2,
            audio_rate: 48_000,
            audio_layout: "stereo".to_string(),
        }
    }
}

/// One source the render engine must have available, by naming convention.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphInput {
    /// Source clip the input stands for.
    pub clip: ClipId,
    /// Conventional file name the render engine resolves
    /// (`video_{clip_id}.mp4`).
    pub file_name: String,
}

/// Video half of one segment chain, labeled `vS{i}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum VideoStep {
    /// Relabel an input's video stream with presentation time reset to zero.
    Relabel {
        /// Index into [`FilterGraph::inputs`].
        input: usize,
    },
    /// Synthesized constant-color frames covering a gap.
    Black {
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
        /// Gap duration, pre-formatted at the configured precision exactly
        /// as handed to the render engine.
        duration: String,
        /// Frame rate of the synthesized video.
        fps: u32,
    },
}

/// Audio half of one segment chain, labeled `aS{i}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AudioStep {
    /// Relabel an input's audio stream with presentation time reset to zero.
    Relabel {
        /// Index into [`FilterGraph::inputs`].
        input: usize,
    },
    /// Synthesized silence covering a gap.
    Silence {
        /// Channel layout.
        layout: String,
        /// Sample rate in Hz.
        rate: u32,
        /// Gap duration, pre-formatted like [`VideoStep::Black::duration`].
        duration: String,
    },
}

/// The two labeled processing steps of one segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentChain {
    /// Video stream label (`vS{i}`).
    pub video_label: String,
    /// Audio stream label (`aS{i}`).
    pub audio_label: String,
    /// Video step.
    pub video: VideoStep,
    /// Audio step.
    pub audio: AudioStep,
}

/// Final concatenation joining every chain pair in segment order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConcatStep {
    /// Number of segments joined.
    pub n: usize,
    /// Output video stream label.
    pub video_out: String,
    /// Output audio stream label.
    pub audio_out: String,
}

/// Renderer-agnostic graph description: per-segment stream relabeling plus
/// one final concatenation.
///
/// Pure structure: composing one never touches sample or pixel data, so
/// graphs are compared and serialized directly in tests.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterGraph {
    /// Source references in segment order, one per video segment.
    pub inputs: Vec<GraphInput>,
    /// Per-segment chains in segment order.
    pub chains: Vec<SegmentChain>,
    /// Final concatenation step.
    pub concat: ConcatStep,
}

/// Compose a segment plan into a filter graph.
///
/// `reference` is the resolution of the first video segment's source when
/// known; gaps fall back to `opts` otherwise. Gap durations are formatted
/// once here, at `opts.gap_precision` decimals, and used verbatim by the
/// rendered filter text.
pub fn compose_graph(
    plan: &SegmentPlan,
    reference: Option<(u32, u32)>,
    opts: &GraphOpts,
) -> MixlineResult<FilterGraph> {
    if plan.segments.is_empty() {
        return Err(MixlineError::EmptyTimeline);
    }
    let (width, height) = reference.unwrap_or((opts.fallback_width, opts.fallback_height));

    let mut inputs = Vec::new();
    let mut chains = Vec::with_capacity(plan.segments.len());
    for (i, segment) in plan.segments.iter().enumerate() {
        let (video, audio) = match segment {
            Segment::Video { clip, .. } => {
                let input = inputs.len();
                inputs.push(GraphInput {
                    clip: *clip,
                    file_name: format!("video_{clip}.mp4"),
                });
                (
                    VideoStep::Relabel { input },
                    AudioStep::Relabel { input },
                )
            }
            Segment::Gap { duration_secs } => {
                let duration = format_secs(*duration_secs, opts.gap_precision);
                (
                    VideoStep::Black {
                        width,
                        height,
                        duration: duration.clone(),
                        fps: opts.gap_fps,
                    },
                    AudioStep::Silence {
                        layout: opts.audio_layout.clone(),
                        rate: opts.audio_rate,
                        duration,
                    },
                )
            }
        };
        chains.push(SegmentChain {
            video_label: format!("vS{i}"),
            audio_label: format!("aS{i}"),
            video,
            audio,
        });
    }

    let n = chains.len();
    Ok(FilterGraph {
        inputs,
        chains,
        concat: ConcatStep {
            n,
            video_out: "outv".to_string(),
            audio_out: "outa".to_string(),
        },
    })
}

impl FilterGraph {
    /// Render the `-filter_complex` text the reference render path feeds to
    /// `ffmpeg`: per segment, a PTS-reset video and audio statement
    /// (synthesized from `color`/`anullsrc` for gaps), then the concat of
    /// every `[vS{i}][aS{i}]` pair.
    pub fn filter_complex(&self) -> String {
        let mut parts = Vec::with_capacity(self.chains.len() + 1);
        for chain in &self.chains {
            let v = &chain.video_label;
            let a = &chain.audio_label;
            let video = match &chain.video {
                VideoStep::Relabel { input } => {
                    format!("[{input}:v]setpts=PTS-STARTPTS[{v}];")
                }
                VideoStep::Black {
                    width,
                    height,
                    duration,
                    fps,
                } => format!(
                    "color=c=black:s={width}x{height}:d={duration}:r={fps}, \
                     setpts=PTS-STARTPTS[{v}];"
                ),
            };
            let audio = match &chain.audio {
                AudioStep::Relabel { input } => {
                    format!("[{input}:a]asetpts=PTS-STARTPTS[{a}];")
                }
                AudioStep::Silence {
                    layout,
                    rate,
                    duration,
                } => format!(
                    "anullsrc=cl={layout}:r={rate},atrim=duration={duration},\
                     asetpts=PTS-STARTPTS[{a}];"
                ),
            };
            parts.push(format!("{video} {audio}"));
        }

        let mut concat_inputs = String::new();
        for chain in &self.chains {
            concat_inputs.push_str(&format!("[{}][{}]", chain.video_label, chain.audio_label));
        }
        parts.push(format!(
            "{concat_inputs}concat=n={}:v=1:a=1[{}][{}]",
            self.concat.n, self.concat.video_out, self.concat.audio_out
        ));
        parts.join(" ")
    }

    /// Full `ffmpeg` argument vector: one `-i` per input in order, the
    /// filter text, and the output stream maps.
    pub fn ffmpeg_args(&self, out_path: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(self.inputs.len() * 2 + 7);
        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.file_name.clone());
        }
        args.push("-filter_complex".to_string());
        args.push(self.filter_complex());
        args.push("-map".to_string());
        args.push(format!("[{}]", self.concat.video_out));
        args.push("-map".to_string());
        args.push(format!("[{}]", self.concat.audio_out));
        args.push(out_path.to_string());
        args
    }
}

fn format_secs(secs: f64, precision: usize) -> String {
    format!("{secs:.precision$}")
}

#[cfg(test)]
#[path = "../../tests/unit/plan/filtergraph.rs"]
mod tests;
