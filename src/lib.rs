//! Mixline is the compositor core of a pixel-scaled timeline editor.
//!
//! Clips are placed on tracks at pixel offsets (one timeline second spans 50
//! pixel units) and four computational steps turn that arrangement into
//! publishable media artifacts:
//!
//! - Build and mutate a [`Timeline`] of audio and video [`Clip`]s
//! - Delay-mix all audio clips into one [`MixedAudioBuffer`]
//! - Encode the mix to canonical PCM16 WAV bytes with [`encode_wav`]
//! - Plan the video timeline into a gap-aware [`SegmentPlan`] and compose it
//!   into an ffmpeg-style [`FilterGraph`] for an external render engine
//!
//! All four steps are synchronous pure functions of their inputs. The only
//! asynchrony in a host application is media decoding and render execution,
//! both consumed here as capabilities ([`AudioDecoder`], [`VideoProber`],
//! [`RenderEngine`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod audio;
/// Byte-exact artifact encoders.
pub mod encode;
/// Video segment planning and filter-graph composition.
pub mod plan;
/// Render execution capability and its `ffmpeg` implementation.
pub mod render;
/// Session-oriented compositor API and the shared playback clock.
pub mod session;
pub(crate) mod timeline;

pub use crate::foundation::error::{MixlineError, MixlineResult};
pub use crate::foundation::units::{
    PX_PER_SECOND, clip_width_px, delay_samples, px_to_secs, secs_to_px,
};

pub use crate::assets::decode::{AudioDecoder, AudioPcm, VideoMeta, VideoProber};
pub use crate::assets::media::FfmpegMedia;
pub use crate::audio::mix::{MixedAudioBuffer, PlacedPcm, mix_placed};
pub use crate::encode::wav::encode_wav;
pub use crate::plan::filtergraph::{
    AudioStep, ConcatStep, FilterGraph, GraphInput, GraphOpts, SegmentChain, VideoStep,
    compose_graph,
};
pub use crate::plan::segment::{PlannedClip, Segment, SegmentPlan, plan_video_segments};
pub use crate::render::executor::{FfmpegRenderer, RenderEngine, SourceFile};
pub use crate::session::compositor::CompositorSession;
pub use crate::session::transport::Transport;
pub use crate::timeline::drag::DragGesture;
pub use crate::timeline::model::{
    Clip, ClipId, DEFAULT_CONTAINER_WIDTH_PX, MediaRef, Timeline, Track, TrackId, TrackKind,
};
