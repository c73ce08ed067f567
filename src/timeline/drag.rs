use crate::foundation::error::{MixlineError, MixlineResult};
use crate::timeline::model::{ClipId, Timeline};

/// A drag interaction over one clip.
///
/// The gesture accumulates a pending offset locally while the pointer moves;
/// the [`Timeline`] is mutated exactly once, on [`DragGesture::commit`].
/// Intermediate positions are for display only.
#[derive(Clone, Copy, Debug)]
pub struct DragGesture {
    clip: ClipId,
    start_offset_px: u32,
    pending_px: u32,
}

impl DragGesture {
    /// Start dragging `clip` from its current offset.
    pub fn begin(timeline: &Timeline, clip: ClipId) -> MixlineResult<Self> {
        let c = timeline
            .clip(clip)
            .ok_or_else(|| MixlineError::validation(format!("unknown clip {clip}")))?;
        Ok(Self {
            clip,
            start_offset_px: c.offset_px,
            pending_px: c.offset_px,
        })
    }

    /// Apply a pointer delta (pixels, may be negative) relative to the
    /// gesture start, clamped the same way [`Timeline::move_clip`] clamps.
    /// Returns the pending offset for display.
    pub fn update(&mut self, timeline: &Timeline, delta_px: i64) -> u32 {
        let raw = i64::from(self.start_offset_px) + delta_px;
        let max = timeline
            .clip(self.clip)
            .map(|c| timeline.container_width_px.saturating_sub(c.width_px()))
            .unwrap_or(0);
        self.pending_px = raw.clamp(0, i64::from(max)) as u32;
        self.pending_px
    }

    /// Pending offset in pixels.
    pub fn pending_px(&self) -> u32 {
        self.pending_px
    }

    /// Finish the gesture: one clean state transition on the timeline.
    pub fn commit(self, timeline: &mut Timeline) -> MixlineResult<u32> {
        timeline.move_clip(self.clip, self.pending_px)
    }
}
