use crate::foundation::error::{MixlineError, MixlineResult};
use crate::foundation::units::clip_width_px;

/// Default pixel width of the track container (the horizontal drag bound).
pub const DEFAULT_CONTAINER_WIDTH_PX: u32 = 30_000;

/// Opaque clip identifier, assigned at creation and stable for the clip's
/// lifetime.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ClipId(
    /// Raw creation-order index.
    pub u64,
);

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque track identifier.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TrackId(
    /// Raw creation-order index.
    pub u64,
);

/// Opaque handle naming decodable source bytes.
///
/// The compositor never owns or copies the underlying media; decode
/// implementations resolve the key (a normalized relative path by
/// convention) against their own assets root.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MediaRef(String);

impl MediaRef {
    /// Wrap a source key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the source key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Media kind of a track and its clips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TrackKind {
    /// Audio clips, consumed by the delay-mixer.
    Audio,
    /// Video clips, consumed by the segment planner.
    Video,
}

/// One placed media item.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Clip {
    /// Stable identifier assigned at creation.
    pub id: ClipId,
    /// Handle to the decodable source bytes.
    pub media: MediaRef,
    /// Timeline position in pixel units, mutable via drag until a pass
    /// snapshots it.
    pub offset_px: u32,
    /// Decoded media duration, set once at decode time.
    pub duration_secs: f64,
    /// Media kind, inherited from the owning track.
    pub kind: TrackKind,
}

impl Clip {
    /// Timeline start in seconds.
    pub fn start_secs(&self) -> f64 {
        crate::foundation::units::px_to_secs(self.offset_px)
    }

    /// Timeline end in seconds.
    pub fn end_secs(&self) -> f64 {
        self.start_secs() + self.duration_secs
    }

    /// Display width on the timeline, recomputed from duration (never cached
    /// stale).
    pub fn width_px(&self) -> u32 {
        clip_width_px(self.duration_secs)
    }
}

/// An insertion-ordered list of same-kind clips sharing one stacking slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Track {
    /// Stable identifier.
    pub id: TrackId,
    /// Media kind shared by all clips on this track.
    pub kind: TrackKind,
    /// Position among sibling tracks of the same kind, in creation order.
    /// Used for stacking precedence; lower means created earlier.
    pub group_index: u32,
    /// Clips in insertion order. Overlap in time is allowed here and
    /// resolved by the mixing/compositing algorithms.
    pub clips: Vec<Clip>,
}

/// The track/clip arrangement a mix or plan pass reads as one consistent
/// snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Pixel width of the track container; drags clamp against it.
    pub container_width_px: u32,
    tracks: Vec<Track>,
    next_track: u64,
    next_clip: u64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// Create an empty timeline with the default container width.
    pub fn new() -> Self {
        Self::with_container_width(DEFAULT_CONTAINER_WIDTH_PX)
    }

    /// Create an empty timeline with an explicit container width.
    pub fn with_container_width(container_width_px: u32) -> Self {
        Self {
            container_width_px,
            tracks: Vec::new(),
            next_track: 0,
            next_clip: 0,
        }
    }

    /// Borrow all tracks in creation order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Append a new empty track of the given kind.
    ///
    /// The track's `group_index` is its position among existing same-kind
    /// tracks, so creation order fixes stacking precedence.
    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        let id = TrackId(self.next_track);
        self.next_track += 1;
        let group_index = self.tracks.iter().filter(|t| t.kind == kind).count() as u32;
        self.tracks.push(Track {
            id,
            kind,
            group_index,
            clips: Vec::new(),
        });
        id
    }

    /// Place a clip with a known decoded duration at offset zero.
    ///
    /// Duration comes from the upstream decode step; a clip whose duration
    /// is not yet known is simply not added, which keeps it invisible to
    /// mixing and planning.
    pub fn add_clip(
        &mut self,
        track_id: TrackId,
        media: MediaRef,
        duration_secs: f64,
    ) -> MixlineResult<ClipId> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(MixlineError::validation(format!(
                "clip duration must be finite and > 0, got {duration_secs}"
            )));
        }
        let track = self
            .tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .ok_or_else(|| MixlineError::validation(format!("unknown track {}", track_id.0)))?;

        let id = ClipId(self.next_clip);
        self.next_clip += 1;
        track.clips.push(Clip {
            id,
            media,
            offset_px: 0,
            duration_secs,
            kind: track.kind,
        });
        Ok(id)
    }

    /// Move a clip to a new pixel offset, clamped into
    /// `[0, container_width_px - clip_width_px]`. Returns the applied offset.
    pub fn move_clip(&mut self, clip_id: ClipId, new_offset_px: u32) -> MixlineResult<u32> {
        let container = self.container_width_px;
        let clip = self
            .clip_mut(clip_id)
            .ok_or_else(|| MixlineError::validation(format!("unknown clip {clip_id}")))?;
        let max = container.saturating_sub(clip.width_px());
        let applied = new_offset_px.min(max);
        clip.offset_px = applied;
        Ok(applied)
    }

    /// End of the timeline in seconds: the max clip end, or `0.0` when
    /// empty.
    pub fn timeline_end(&self) -> f64 {
        self.clips()
            .map(|c| c.end_secs())
            .fold(0.0f64, f64::max)
    }

    /// Iterate all clips across all tracks.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }

    /// Iterate audio clips across all audio tracks.
    pub fn audio_clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks
            .iter()
            .filter(|t| t.kind == TrackKind::Audio)
            .flat_map(|t| t.clips.iter())
    }

    /// Iterate video clips across all video tracks, tagged with the owning
    /// track's `group_index`.
    pub fn video_clips(&self) -> impl Iterator<Item = (u32, &Clip)> {
        self.tracks
            .iter()
            .filter(|t| t.kind == TrackKind::Video)
            .flat_map(|t| t.clips.iter().map(|c| (t.group_index, c)))
    }

    /// Clips whose `[start, end]` interval covers instant `t` (closed on
    /// both ends, matching preview visibility).
    pub fn active_at(&self, t: f64) -> impl Iterator<Item = &Clip> {
        self.clips()
            .filter(move |c| t >= c.start_secs() && t <= c.end_secs())
    }

    /// Look up a clip by id.
    pub fn clip(&self, clip_id: ClipId) -> Option<&Clip> {
        self.clips().find(|c| c.id == clip_id)
    }

    fn clip_mut(&mut self, clip_id: ClipId) -> Option<&mut Clip> {
        self.tracks
            .iter_mut()
            .flat_map(|t| t.clips.iter_mut())
            .find(|c| c.id == clip_id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
