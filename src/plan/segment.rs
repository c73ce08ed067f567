use crate::foundation::error::{MixlineError, MixlineResult};
use crate::timeline::model::{ClipId, Timeline};

/// One video clip as the planner sees it.
///
/// `group_index` (stacking precedence) and `start_secs` (temporal position)
/// are independent orderings of the same clips; both travel explicitly so a
/// downstream compositor never has to re-derive one from the other.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannedClip {
    /// Source clip.
    pub clip: ClipId,
    /// Creation-order slot of the originating track.
    pub group_index: u32,
    /// Timeline start in seconds.
    pub start_secs: f64,
    /// Intrinsic duration in seconds.
    pub duration_secs: f64,
}

/// One span of the planned output stream.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Segment {
    /// A span drawn from a source clip.
    Video {
        /// Source clip.
        clip: ClipId,
        /// Span duration in seconds.
        duration_secs: f64,
    },
    /// A synthesized span covering a timeline gap.
    Gap {
        /// Span duration in seconds.
        duration_secs: f64,
    },
}

impl Segment {
    /// Span duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        match *self {
            Segment::Video { duration_secs, .. } | Segment::Gap { duration_secs } => duration_secs,
        }
    }
}

/// Ordered segment sequence covering `[0, total_secs]` with no overlaps and
/// no holes, plus the stacking order for consumers that composite rather
/// than concatenate.
///
/// Rebuilt fully on every planning pass; never patched in place.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentPlan {
    /// Spans in temporal order.
    pub segments: Vec<Segment>,
    /// Clips in stacking-precedence order: last entry is topmost, so tracks
    /// created earlier win visually under a last-wins compositor.
    pub stacking: Vec<PlannedClip>,
    /// Total planned duration in seconds.
    pub total_secs: f64,
}

impl SegmentPlan {
    /// Number of real (non-gap) segments.
    pub fn video_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Video { .. }))
            .count()
    }

    /// The segment covering instant `t`, with its start time. Spans are
    /// half-open `[start, start + duration)`.
    pub fn segment_at(&self, t: f64) -> Option<(&Segment, f64)> {
        let mut start = 0.0f64;
        for seg in &self.segments {
            let end = start + seg.duration_secs();
            if t >= start && t < end {
                return Some((seg, start));
            }
            start = end;
        }
        None
    }
}

/// Plan the video timeline into an ordered, gap-free segment sequence.
///
/// Steps: flatten clips across video tracks tagging each with its track's
/// `group_index`; build the stacking order by sorting on `group_index`
/// ascending and reversing, so earlier-created tracks land last, i.e.
/// topmost for a last-wins compositor (layering depends on this exact
/// ordering); sort a second copy by start time; then walk a cursor from
/// zero, emitting a synthesized gap wherever the next clip starts past the
/// cursor.
///
/// Stateless and deterministic: an unchanged timeline yields a structurally
/// identical plan.
#[tracing::instrument(skip(timeline))]
pub fn plan_video_segments(timeline: &Timeline) -> MixlineResult<SegmentPlan> {
    let flat: Vec<PlannedClip> = timeline
        .video_clips()
        .map(|(group_index, c)| PlannedClip {
            clip: c.id,
            group_index,
            start_secs: c.start_secs(),
            duration_secs: c.duration_secs,
        })
        .collect();
    if flat.is_empty() {
        return Err(MixlineError::EmptyTimeline);
    }

    let mut stacking = flat.clone();
    stacking.sort_by_key(|p| p.group_index);
    stacking.reverse();

    let mut temporal = flat;
    temporal.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));

    let mut segments = Vec::with_capacity(temporal.len() * 2);
    let mut cursor = 0.0f64;
    for clip in &temporal {
        if clip.start_secs > cursor {
            segments.push(Segment::Gap {
                duration_secs: clip.start_secs - cursor,
            });
        }
        segments.push(Segment::Video {
            clip: clip.clip,
            duration_secs: clip.duration_secs,
        });
        cursor = clip.start_secs + clip.duration_secs;
    }

    Ok(SegmentPlan {
        segments,
        stacking,
        total_secs: cursor,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/plan/segment.rs"]
mod tests;
