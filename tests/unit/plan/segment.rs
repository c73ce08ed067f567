use super::*;
use crate::timeline::model::{MediaRef, TrackKind};

fn video_timeline(placements: &[(u32, f64)]) -> (Timeline, Vec<ClipId>) {
    let mut tl = Timeline::new();
    let track = tl.add_track(TrackKind::Video);
    let mut ids = Vec::new();
    for &(offset_px, duration) in placements {
        let id = tl
            .add_clip(track, MediaRef::new("v.mp4"), duration)
            .unwrap();
        tl.move_clip(id, offset_px).unwrap();
        ids.push(id);
    }
    (tl, ids)
}

#[test]
fn planning_an_empty_timeline_fails() {
    let mut tl = Timeline::new();
    tl.add_track(TrackKind::Video);
    assert!(matches!(
        plan_video_segments(&tl),
        Err(MixlineError::EmptyTimeline)
    ));

    // Audio clips do not make a video timeline non-empty.
    let audio = tl.add_track(TrackKind::Audio);
    tl.add_clip(audio, MediaRef::new("a.wav"), 1.0).unwrap();
    assert!(matches!(
        plan_video_segments(&tl),
        Err(MixlineError::EmptyTimeline)
    ));
}

#[test]
fn gaps_are_inserted_between_spaced_clips() {
    // Starts 0 s, 5 s, 12 s with durations 3, 2, 1.
    let (tl, ids) = video_timeline(&[(0, 3.0), (250, 2.0), (600, 1.0)]);
    let plan = plan_video_segments(&tl).unwrap();

    assert_eq!(
        plan.segments,
        vec![
            Segment::Video {
                clip: ids[0],
                duration_secs: 3.0
            },
            Segment::Gap { duration_secs: 2.0 },
            Segment::Video {
                clip: ids[1],
                duration_secs: 2.0
            },
            Segment::Gap { duration_secs: 5.0 },
            Segment::Video {
                clip: ids[2],
                duration_secs: 1.0
            },
        ]
    );
    assert_eq!(plan.total_secs, 13.0);
    assert_eq!(plan.video_count(), 3);
}

#[test]
fn no_gap_when_first_clip_starts_at_zero_and_clips_touch() {
    // 2 s clip at 0, then a clip starting exactly at 2 s.
    let (tl, _) = video_timeline(&[(0, 2.0), (100, 1.5)]);
    let plan = plan_video_segments(&tl).unwrap();
    assert_eq!(plan.segments.len(), 2);
    assert!(plan.segments.iter().all(|s| matches!(s, Segment::Video { .. })));
    assert_eq!(plan.total_secs, 3.5);
}

#[test]
fn leading_gap_is_synthesized_before_a_late_first_clip() {
    let (tl, _) = video_timeline(&[(100, 1.0)]);
    let plan = plan_video_segments(&tl).unwrap();
    assert_eq!(plan.segments[0], Segment::Gap { duration_secs: 2.0 });
    assert_eq!(plan.total_secs, 3.0);
}

#[test]
fn stacking_reverses_group_index_order() {
    // Three tracks created in order, one clip each, all at the same start.
    let mut tl = Timeline::new();
    let mut clip_ids = Vec::new();
    for _ in 0..3 {
        let track = tl.add_track(TrackKind::Video);
        let id = tl.add_clip(track, MediaRef::new("v.mp4"), 1.0).unwrap();
        clip_ids.push(id);
    }

    let plan = plan_video_segments(&tl).unwrap();
    let groups: Vec<u32> = plan.stacking.iter().map(|p| p.group_index).collect();
    assert_eq!(groups, vec![2, 1, 0]);
    // Earliest-created track is last, i.e. topmost under last-wins stacking.
    assert_eq!(plan.stacking.last().unwrap().clip, clip_ids[0]);
}

#[test]
fn stacking_and_temporal_order_are_independent() {
    let mut tl = Timeline::new();
    let t0 = tl.add_track(TrackKind::Video);
    let t1 = tl.add_track(TrackKind::Video);
    // Track 0 holds the later clip, track 1 the earlier one.
    let late = tl.add_clip(t0, MediaRef::new("v.mp4"), 1.0).unwrap();
    tl.move_clip(late, 500).unwrap(); // 10 s
    let early = tl.add_clip(t1, MediaRef::new("v.mp4"), 1.0).unwrap();

    let plan = plan_video_segments(&tl).unwrap();
    // Temporal: early clip first.
    assert_eq!(
        plan.segments[0],
        Segment::Video {
            clip: early,
            duration_secs: 1.0
        }
    );
    // Stacking: track 0's clip last (topmost) regardless of start time.
    assert_eq!(plan.stacking.last().unwrap().clip, late);
    assert_eq!(plan.stacking[0].clip, early);
}

#[test]
fn replanning_an_unchanged_timeline_is_idempotent() {
    let (tl, _) = video_timeline(&[(0, 3.0), (250, 2.0), (600, 1.0)]);
    let a = plan_video_segments(&tl).unwrap();
    let b = plan_video_segments(&tl).unwrap();
    assert_eq!(a, b);

    // Structural identity survives serialization too.
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn segment_at_walks_half_open_spans() {
    let (tl, ids) = video_timeline(&[(0, 3.0), (250, 2.0)]);
    let plan = plan_video_segments(&tl).unwrap();

    let (seg, start) = plan.segment_at(0.0).unwrap();
    assert_eq!(start, 0.0);
    assert!(matches!(seg, Segment::Video { clip, .. } if *clip == ids[0]));

    let (seg, start) = plan.segment_at(4.0).unwrap();
    assert_eq!(start, 3.0);
    assert!(matches!(seg, Segment::Gap { .. }));

    let (seg, _) = plan.segment_at(5.0).unwrap();
    assert!(matches!(seg, Segment::Video { clip, .. } if *clip == ids[1]));

    assert!(plan.segment_at(7.0).is_none());
}
