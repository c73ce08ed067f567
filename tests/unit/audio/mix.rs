use super::*;

fn mono(samples: Vec<f32>, sample_rate: u32) -> AudioPcm {
    AudioPcm {
        sample_rate,
        channels: vec![samples],
    }
}

fn placed(clip: u64, offset_px: u32, pcm: AudioPcm) -> PlacedPcm {
    PlacedPcm {
        clip: ClipId(clip),
        offset_px,
        pcm,
    }
}

#[test]
fn empty_clip_set_is_a_no_op() {
    assert_eq!(mix_placed(&[]).unwrap(), None);
}

#[test]
fn delay_places_clip_at_floor_of_offset_times_rate() {
    // 100 px = 2.0 s at 48 kHz -> 96_000 samples of leading silence.
    let clips = [placed(0, 100, mono(vec![0.5, 0.5], 48_000))];
    let out = mix_placed(&clips).unwrap().unwrap();
    assert_eq!(out.frames(), 96_002);
    assert_eq!(out.channels[0][95_999], 0.0);
    assert_eq!(out.channels[0][96_000], 0.5);
    assert_eq!(out.channels[0][96_001], 0.5);
}

#[test]
fn fully_overlapped_clips_sum_per_sample() {
    let n = 64;
    let clips = [
        placed(0, 0, mono(vec![0.5; n], 48_000)),
        placed(1, 0, mono(vec![0.3; n], 48_000)),
    ];
    let out = mix_placed(&clips).unwrap().unwrap();
    assert_eq!(out.frames(), n);
    assert_eq!(out.channel_count(), 1);
    for &s in &out.channels[0] {
        assert!((s - 0.8).abs() < 1e-6);
    }
}

#[test]
fn sums_are_not_normalized() {
    // 0.9 + 0.9 stays 1.8 in the float buffer; clipping happens only at
    // 16-bit quantization.
    let clips = [
        placed(0, 0, mono(vec![0.9; 4], 48_000)),
        placed(1, 0, mono(vec![0.9; 4], 48_000)),
    ];
    let out = mix_placed(&clips).unwrap().unwrap();
    for &s in &out.channels[0] {
        assert!((s - 1.8).abs() < 1e-6);
    }
}

#[test]
fn total_length_is_latest_clip_end() {
    // Clip 0: [0, 100). Clip 1: delay 48 (1 px at 48 kHz = 0.02 s -> 960)...
    let clips = [
        placed(0, 0, mono(vec![0.1; 100], 48_000)),
        placed(1, 1, mono(vec![0.2; 100], 48_000)),
    ];
    let out = mix_placed(&clips).unwrap().unwrap();
    assert_eq!(out.frames(), 960 + 100);
    // Disjoint regions keep each clip's own samples.
    assert!((out.channels[0][0] - 0.1).abs() < 1e-6);
    assert!((out.channels[0][960] - 0.2).abs() < 1e-6);
    assert_eq!(out.channels[0][100], 0.0);
}

#[test]
fn stereo_channels_mix_independently() {
    let a = AudioPcm {
        sample_rate: 44_100,
        channels: vec![vec![0.25; 8], vec![-0.25; 8]],
    };
    let b = AudioPcm {
        sample_rate: 44_100,
        channels: vec![vec![0.5; 8], vec![0.5; 8]],
    };
    let out = mix_placed(&[placed(0, 0, a), placed(1, 0, b)])
        .unwrap()
        .unwrap();
    assert!((out.channels[0][0] - 0.75).abs() < 1e-6);
    assert!((out.channels[1][0] - 0.25).abs() < 1e-6);
}

#[test]
fn sample_rate_mismatch_aborts_the_mix() {
    let clips = [
        placed(0, 0, mono(vec![0.1; 4], 48_000)),
        placed(1, 0, mono(vec![0.1; 4], 44_100)),
    ];
    match mix_placed(&clips) {
        Err(MixlineError::FormatMismatch {
            expected_sample_rate,
            got_sample_rate,
            ..
        }) => {
            assert_eq!(expected_sample_rate, 48_000);
            assert_eq!(got_sample_rate, 44_100);
        }
        other => panic!("expected FormatMismatch, got {other:?}"),
    }
}

#[test]
fn channel_count_mismatch_aborts_the_mix() {
    let stereo = AudioPcm {
        sample_rate: 48_000,
        channels: vec![vec![0.1; 4], vec![0.1; 4]],
    };
    let clips = [placed(0, 0, mono(vec![0.1; 4], 48_000)), placed(1, 0, stereo)];
    assert!(matches!(
        mix_placed(&clips),
        Err(MixlineError::FormatMismatch { .. })
    ));
}

#[test]
fn ragged_pcm_is_rejected_before_summation() {
    let ragged = AudioPcm {
        sample_rate: 48_000,
        channels: vec![vec![0.1; 4], vec![0.1; 3]],
    };
    assert!(matches!(
        mix_placed(&[placed(0, 0, ragged)]),
        Err(MixlineError::Validation(_))
    ));
}
