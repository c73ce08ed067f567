use super::*;
use crate::plan::segment::plan_video_segments;
use crate::timeline::model::{MediaRef, Timeline, TrackKind};

fn plan_for(placements: &[(u32, f64)]) -> (SegmentPlan, Vec<ClipId>) {
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
    (plan_video_segments(&tl).unwrap(), ids)
}

#[test]
fn video_gap_video_renders_the_reference_filter_text() {
    // 3 s at 0, then 2 s of gap, then 2 s at 5 s.
    let (plan, ids) = plan_for(&[(0, 3.0), (250, 2.0)]);
    let graph = compose_graph(&plan, Some((1920, 1080)), &GraphOpts::default()).unwrap();

    assert_eq!(graph.inputs.len(), 2);
    assert_eq!(graph.inputs[0].file_name, format!("video_{}.mp4", ids[0]));
    assert_eq!(graph.inputs[1].file_name, format!("video_{}.mp4", ids[1]));

    let expected = "[0:v]setpts=PTS-STARTPTS[vS0]; [0:a]asetpts=PTS-STARTPTS[aS0]; \
                    color=c=black:s=1920x1080:d=2.00:r=60, setpts=PTS-STARTPTS[vS1]; \
                    anullsrc=cl=stereo:r=48000,atrim=duration=2.00,asetpts=PTS-STARTPTS[aS1]; \
                    [1:v]setpts=PTS-STARTPTS[vS2]; [1:a]asetpts=PTS-STARTPTS[aS2]; \
                    [vS0][aS0][vS1][aS1][vS2][aS2]concat=n=3:v=1:a=1[outv][outa]";
    assert_eq!(graph.filter_complex(), expected);
}

#[test]
fn missing_reference_resolution_falls_back_to_opts() {
    let (plan, _) = plan_for(&[(100, 1.0)]);
    let graph = compose_graph(&plan, None, &GraphOpts::default()).unwrap();
    match &graph.chains[0].video {
        VideoStep::Black { width, height, .. } => {
            assert_eq!((*width, *height), (720, 1280));
        }
        other => panic!("expected Black gap video, got {other:?}"),
    }
}

#[test]
fn gap_precision_is_configurable() {
    // 1/3 s gap before a clip at 1/3 s... use 17 px = 0.34 s for exactness
    // of the formatted text instead.
    let (plan, _) = plan_for(&[(17, 1.0)]);

    let two = compose_graph(&plan, None, &GraphOpts::default()).unwrap();
    let AudioStep::Silence { duration, .. } = &two.chains[0].audio else {
        panic!("expected Silence");
    };
    assert_eq!(duration, "0.34");

    let five = compose_graph(
        &plan,
        None,
        &GraphOpts {
            gap_precision: 5,
            ..GraphOpts::default()
        },
    )
    .unwrap();
    let AudioStep::Silence { duration, .. } = &five.chains[0].audio else {
        panic!("expected Silence");
    };
    assert_eq!(duration, "0.34000");
}

#[test]
fn labels_follow_segment_indices() {
    let (plan, _) = plan_for(&[(100, 1.0), (300, 1.0)]);
    let graph = compose_graph(&plan, Some((640, 480)), &GraphOpts::default()).unwrap();

    // gap, video, gap, video
    assert_eq!(graph.chains.len(), 4);
    for (i, chain) in graph.chains.iter().enumerate() {
        assert_eq!(chain.video_label, format!("vS{i}"));
        assert_eq!(chain.audio_label, format!("aS{i}"));
    }
    assert_eq!(graph.concat.n, 4);

    // Input indices advance only on video segments.
    assert_eq!(graph.chains[1].video, VideoStep::Relabel { input: 0 });
    assert_eq!(graph.chains[3].video, VideoStep::Relabel { input: 1 });
}

#[test]
fn ffmpeg_args_order_inputs_filter_maps_output() {
    let (plan, ids) = plan_for(&[(0, 1.0), (100, 1.0)]);
    let graph = compose_graph(&plan, Some((640, 480)), &GraphOpts::default()).unwrap();
    let args = graph.ffmpeg_args("output.mp4");

    assert_eq!(args[0], "-i");
    assert_eq!(args[1], format!("video_{}.mp4", ids[0]));
    assert_eq!(args[2], "-i");
    assert_eq!(args[3], format!("video_{}.mp4", ids[1]));
    assert_eq!(args[4], "-filter_complex");
    assert_eq!(args[5], graph.filter_complex());
    assert_eq!(&args[6..], &["-map", "[outv]", "-map", "[outa]", "output.mp4"]);
}

#[test]
fn graphs_serialize_stably() {
    let (plan, _) = plan_for(&[(0, 1.0), (200, 1.0)]);
    let graph = compose_graph(&plan, Some((640, 480)), &GraphOpts::default()).unwrap();
    let json = serde_json::to_string(&graph).unwrap();
    let back: FilterGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(back, graph);
    assert_eq!(back.filter_complex(), graph.filter_complex());
}
