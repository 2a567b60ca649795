// Unit tests for domain models

use super::*;

#[test]
fn test_time_range_new() {
    let range = TimeRange::new(10.0, 30.0).unwrap();
    assert_eq!(range.start(), 10.0);
    assert_eq!(range.end(), 30.0);
    assert_eq!(range.duration(), 20.0);
}

#[test]
fn test_time_range_rejects_invalid() {
    assert!(TimeRange::new(20.0, 10.0).is_err());
    assert!(TimeRange::new(10.0, 10.0).is_err());
    assert!(TimeRange::new(-1.0, 10.0).is_err());
    assert!(TimeRange::new(0.0, f64::NAN).is_err());
    assert!(TimeRange::new(0.0, f64::INFINITY).is_err());
}

#[test]
fn test_clamp_inside_source_is_unchanged() {
    let range = TimeRange::new(5.0, 8.0).unwrap();
    assert_eq!(range.clamp_to(10.0).unwrap(), range);
}

#[test]
fn test_clamp_partially_beyond_source() {
    let range = TimeRange::new(5.0, 15.0).unwrap();
    let clamped = range.clamp_to(10.0).unwrap();
    assert_eq!(clamped.start(), 5.0);
    assert_eq!(clamped.end(), 10.0);
}

#[test]
fn test_clamp_entirely_beyond_source() {
    let range = TimeRange::new(12.0, 15.0).unwrap();
    assert!(matches!(range.clamp_to(10.0), Err(DomainError::OutOfBounds(_))));

    let at_end = TimeRange::new(10.0, 15.0).unwrap();
    assert!(at_end.clamp_to(10.0).is_err());
}

#[test]
fn test_format_hms() {
    assert_eq!(format_hms(0.0), "00:00:00");
    assert_eq!(format_hms(150.0), "00:02:30");
    assert_eq!(format_hms(3723.5), "01:02:03.500");
}

#[test]
fn test_time_range_display() {
    let range = TimeRange::new(60.0, 150.0).unwrap();
    assert_eq!(range.to_string(), "00:01:00-00:02:30");
}

#[test]
fn test_frame_window_rounding() {
    let range = TimeRange::new(0.5, 2.0).unwrap();
    let window = FrameWindow::from_range(&range, 25.0);
    assert_eq!(window.start_frame, 13); // 12.5 rounds away from zero
    assert_eq!(window.end_frame, 50);
    assert_eq!(window.frame_count(), 37);
}

#[test]
fn test_frame_window_ntsc_rate() {
    let fps = 30000.0 / 1001.0;
    let range = TimeRange::new(10.0, 20.0).unwrap();
    let window = FrameWindow::from_range(&range, fps);
    assert_eq!(window.start_frame, 300);
    assert_eq!(window.end_frame, 599);
    assert_eq!(window.frame_count(), 299);
}

#[test]
fn test_frame_window_can_be_empty() {
    let range = TimeRange::new(1.0, 1.01).unwrap();
    let window = FrameWindow::from_range(&range, 24.0);
    assert!(window.is_empty());
}

#[test]
fn test_strategy_preference_parse() {
    assert_eq!("auto".parse::<StrategyPreference>().unwrap(), StrategyPreference::Auto);
    assert_eq!("Precise".parse::<StrategyPreference>().unwrap(), StrategyPreference::Precise);
    assert_eq!(" frames ".parse::<StrategyPreference>().unwrap(), StrategyPreference::Frames);
    assert!("fast".parse::<StrategyPreference>().is_err());
}

#[test]
fn test_codec_mode_parse() {
    assert_eq!("copy".parse::<CodecMode>().unwrap(), CodecMode::Copy);
    assert_eq!("REENCODE".parse::<CodecMode>().unwrap(), CodecMode::Reencode);
    assert!("lossless".parse::<CodecMode>().is_err());
}

#[test]
fn test_clip_result_accessors() {
    let range = TimeRange::new(0.0, 1.0).unwrap();
    let ok = ClipResult {
        index: 1,
        range,
        effective_range: Some(range),
        status: ClipStatus::Success {
            output_path: PathBuf::from("out/clip_01.mp4"),
        },
        audio_preserved: true,
        strategy: StrategyKind::Precise,
        frames_written: None,
    };
    assert!(ok.is_success());
    assert_eq!(ok.output_path(), Some(Path::new("out/clip_01.mp4")));
    assert_eq!(ok.error(), None);

    let failed = ClipResult {
        status: ClipStatus::Failed {
            reason: "boom".to_string(),
        },
        ..ok
    };
    assert!(!failed.is_success());
    assert_eq!(failed.output_path(), None);
    assert_eq!(failed.error(), Some("boom"));
}

#[test]
fn test_clip_result_json_shape() {
    let range = TimeRange::new(10.0, 20.0).unwrap();
    let result = ClipResult {
        index: 2,
        range,
        effective_range: Some(range),
        status: ClipStatus::Failed {
            reason: "no frames".to_string(),
        },
        audio_preserved: false,
        strategy: StrategyKind::Frames,
        frames_written: None,
    };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["reason"], "no frames");
    assert_eq!(json["strategy"], "frames");
    assert_eq!(json["range"]["start"], 10.0);
    assert!(json.get("frames_written").is_none());
}
