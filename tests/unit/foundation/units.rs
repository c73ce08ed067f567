use super::*;

#[test]
fn px_and_secs_convert_both_ways() {
    assert_eq!(px_to_secs(100), 2.0);
    assert_eq!(px_to_secs(0), 0.0);
    assert_eq!(secs_to_px(2.0), 100);
    // round, not truncate
    assert_eq!(secs_to_px(1.01), 51);
    assert_eq!(secs_to_px(1.009), 50);
}

#[test]
fn clip_width_uses_ceiling() {
    assert_eq!(clip_width_px(1.0), 50);
    assert_eq!(clip_width_px(1.001), 51);
    assert_eq!(clip_width_px(0.0), 0);
}

#[test]
fn delay_samples_floors_at_sample_rate() {
    // 100 px = 2.0 s at 48 kHz
    assert_eq!(delay_samples(100, 48_000), 96_000);
    // 33 px = 0.66 s; floor(31680.000...) with float slop stays below 31681
    assert_eq!(delay_samples(33, 48_000), 31_680);
    assert_eq!(delay_samples(0, 48_000), 0);
}

#[test]
fn audio_and_video_paths_agree_on_the_law() {
    // The same pixel offset must produce the same instant on both paths.
    let px = 137;
    let secs = px_to_secs(px);
    assert_eq!(delay_samples(px, 44_100), (secs * 44_100.0).floor() as usize);
    assert_eq!(secs_to_px(secs), px);
}
