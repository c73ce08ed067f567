use crate::assets::decode::AudioDecoder;
use crate::audio::mix::{MixedAudioBuffer, PlacedPcm, mix_placed};
use crate::encode::wav::encode_wav;
use crate::foundation::error::MixlineResult;
use crate::plan::filtergraph::{FilterGraph, GraphOpts, compose_graph};
use crate::plan::segment::{SegmentPlan, plan_video_segments};
use crate::timeline::model::{ClipId, MediaRef, Timeline, TrackId, TrackKind};

/// Session tying a [`Timeline`] to the compositor's four computational
/// steps.
///
/// Every step is a synchronous pure function of a timeline snapshot; the
/// session's only job is the publication policy. Each mixing pass allocates
/// its own output and replaces the published one wholesale, so a mix
/// triggered by a newer mutation silently supersedes a stale result: there
/// is no aborting, only discarding. On a failed mix the previously
/// published buffer stays last-known-good.
pub struct CompositorSession<D> {
    timeline: Timeline,
    decoder: D,
    mixed: Option<MixedAudioBuffer>,
    wav: Option<Vec<u8>>,
    mix_epoch: u64,
}

impl<D: AudioDecoder> CompositorSession<D> {
    /// Create a session over a timeline and an audio decode capability.
    pub fn new(timeline: Timeline, decoder: D) -> Self {
        Self {
            timeline,
            decoder,
            mixed: None,
            wav: None,
            mix_epoch: 0,
        }
    }

    /// Borrow the current timeline snapshot.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Append a track and remix.
    pub fn add_track(&mut self, kind: TrackKind) -> MixlineResult<TrackId> {
        let id = self.timeline.add_track(kind);
        self.remix()?;
        Ok(id)
    }

    /// Place a clip and remix.
    pub fn add_clip(
        &mut self,
        track_id: TrackId,
        media: MediaRef,
        duration_secs: f64,
    ) -> MixlineResult<ClipId> {
        let id = self.timeline.add_clip(track_id, media, duration_secs)?;
        self.remix()?;
        Ok(id)
    }

    /// Move a clip and remix. Returns the applied (clamped) offset.
    pub fn move_clip(&mut self, clip_id: ClipId, new_offset_px: u32) -> MixlineResult<u32> {
        let applied = self.timeline.move_clip(clip_id, new_offset_px)?;
        self.remix()?;
        Ok(applied)
    }

    /// Recompute the mixed buffer and its WAV bytes from the current
    /// snapshot.
    ///
    /// Decodes every audio clip fresh, delay-mixes, encodes. On any failure
    /// (decode, format mismatch) the previously published mix is left
    /// untouched and the typed error is returned. An audio-less timeline
    /// publishes `None`, explicitly not a zero-length WAV.
    #[tracing::instrument(skip(self))]
    pub fn remix(&mut self) -> MixlineResult<()> {
        let mut placed = Vec::new();
        for clip in self.timeline.audio_clips() {
            placed.push(PlacedPcm {
                clip: clip.id,
                offset_px: clip.offset_px,
                pcm: self.decoder.decode_audio(&clip.media)?,
            });
        }

        let mixed = mix_placed(&placed)?;
        let wav = match &mixed {
            Some(buffer) => Some(encode_wav(buffer)?),
            None => None,
        };

        self.mix_epoch += 1;
        self.mixed = mixed;
        self.wav = wav;
        Ok(())
    }

    /// The published mix, if the last good pass produced one.
    pub fn mixed(&self) -> Option<&MixedAudioBuffer> {
        self.mixed.as_ref()
    }

    /// WAV bytes of the published mix.
    pub fn mixed_wav(&self) -> Option<&[u8]> {
        self.wav.as_deref()
    }

    /// Number of completed (published) mixing passes.
    pub fn mix_epoch(&self) -> u64 {
        self.mix_epoch
    }

    /// Plan the video timeline from the current snapshot.
    pub fn plan(&self) -> MixlineResult<SegmentPlan> {
        plan_video_segments(&self.timeline)
    }

    /// Plan and compose the filter graph from the current snapshot.
    pub fn compose(
        &self,
        reference: Option<(u32, u32)>,
        opts: &GraphOpts,
    ) -> MixlineResult<FilterGraph> {
        compose_graph(&self.plan()?, reference, opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/compositor.rs"]
mod tests;
