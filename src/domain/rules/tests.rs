// Unit tests for range parsing and frame selection

use super::*;

fn bounds(ranges: &[TimeRange]) -> Vec<(f64, f64)> {
    ranges.iter().map(|r| (r.start(), r.end())).collect()
}

#[test]
fn test_parse_documented_formats() {
    let ranges = RangeParser::parse("00:00:10-00:00:30\n1:00-2:30\n10-20").unwrap();
    assert_eq!(bounds(&ranges), vec![(10.0, 30.0), (60.0, 150.0), (10.0, 20.0)]);
}

#[test]
fn test_parse_skips_blank_lines_and_trims() {
    let text = "\n   \n  5-10  \n\n\t1:00 - 1:30\n";
    let ranges = RangeParser::parse(text).unwrap();
    assert_eq!(bounds(&ranges), vec![(5.0, 10.0), (60.0, 90.0)]);
}

#[test]
fn test_parse_preserves_order_and_overlaps() {
    let ranges = RangeParser::parse("30-40\n10-20\n15-35\n10-20").unwrap();
    assert_eq!(
        bounds(&ranges),
        vec![(30.0, 40.0), (10.0, 20.0), (15.0, 35.0), (10.0, 20.0)]
    );
}

#[test]
fn test_parse_to_separator() {
    let ranges = RangeParser::parse("1:00 to 2:00\n5 TO 7.5").unwrap();
    assert_eq!(bounds(&ranges), vec![(60.0, 120.0), (5.0, 7.5)]);
}

#[test]
fn test_parse_to_separator_with_any_whitespace() {
    let ranges = RangeParser::parse("1:00\tto\t2:00\n3  To   4").unwrap();
    assert_eq!(bounds(&ranges), vec![(60.0, 120.0), (3.0, 4.0)]);

    // `to` inside a word is not a separator
    assert!(RangeParser::parse("1:00 toward 2:00").is_err());
}

#[test]
fn test_parse_colon_fields_are_not_capped_at_sixty() {
    let ranges = RangeParser::parse("0:00-0:90\n1:75:00-1:80:00").unwrap();
    assert_eq!(bounds(&ranges), vec![(0.0, 90.0), (8100.0, 8400.0)]);
}

#[test]
fn test_parse_decimal_seconds() {
    let ranges = RangeParser::parse("1.5-2.25\n0:01.5-0:02").unwrap();
    assert_eq!(bounds(&ranges), vec![(1.5, 2.25), (1.5, 2.0)]);
}

#[test]
fn test_end_before_start_rejects_whole_request() {
    let err = RangeParser::parse("10-20\n20-10\n30-40").unwrap_err();
    match err {
        DomainError::InvalidRanges(errors) => {
            assert_eq!(errors.lines(), vec![2]);
            assert_eq!(errors.errors[0].text, "20-10");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_zero_length_range_rejected() {
    assert!(RangeParser::parse("10-10").is_err());
}

#[test]
fn test_collects_every_bad_line() {
    let text = "abc-10\n\n5-10\n1:2:3:4-10\n7\n-5-10\n4-2";
    let err = RangeParser::parse(text).unwrap_err();
    match err {
        DomainError::InvalidRanges(errors) => {
            assert_eq!(errors.lines(), vec![1, 4, 5, 6, 7]);
            let rendered = errors.to_string();
            assert!(rendered.contains("line 1: \"abc-10\""));
            assert!(rendered.contains("line 6: \"-5-10\""));
            assert_eq!(rendered.lines().count(), 5);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_negative_values_rejected() {
    assert!(RangeParser::parse_line("-5-10").is_err());
    assert!(RangeParser::parse_line("5--10").is_err());
    assert!(RangeParser::parse_line("5 - -10").is_err());
    assert!(RangeParser::parse_time_token("-3").is_err());
}

#[test]
fn test_extra_separator_rejected() {
    let reason = RangeParser::parse_line("1-2-3").unwrap_err();
    assert!(reason.contains("more than one"));
}

#[test]
fn test_missing_separator_rejected() {
    let reason = RangeParser::parse_line("00:10").unwrap_err();
    assert!(reason.contains("separator"));
}

#[test]
fn test_empty_input_is_an_error() {
    assert!(matches!(RangeParser::parse(""), Err(DomainError::BadArgs(_))));
    assert!(matches!(RangeParser::parse("\n  \n"), Err(DomainError::BadArgs(_))));
}

#[test]
fn test_time_token_forms() {
    assert_eq!(RangeParser::parse_time_token("45").unwrap(), 45.0);
    assert_eq!(RangeParser::parse_time_token("2:30").unwrap(), 150.0);
    assert_eq!(RangeParser::parse_time_token("1:02:03").unwrap(), 3723.0);
    assert_eq!(RangeParser::parse_time_token("100:00").unwrap(), 6000.0);
    assert_eq!(RangeParser::parse_time_token(".5").unwrap(), 0.5);
    assert_eq!(RangeParser::parse_time_token("1:60").unwrap(), 120.0);
    assert_eq!(RangeParser::parse_time_token("0:90.5").unwrap(), 90.5);
}

#[test]
fn test_time_token_rejects_malformed() {
    for token in ["", "abc", "1e3", "inf", "+5", "1..2", "1::2", ":30", "1:2:3:4", "1.5:00"] {
        assert!(
            RangeParser::parse_time_token(token).is_err(),
            "token {token:?} should be rejected"
        );
    }
}

fn drain(cursor: &mut FrameCursor<i64>, frames: &[i64]) -> Vec<i64> {
    let mut out = Vec::new();
    for &index in frames {
        if let Some((frame, repeat)) = cursor.push(index, index) {
            out.extend(std::iter::repeat(frame).take(repeat as usize));
        }
        if cursor.is_done() {
            break;
        }
    }
    out
}

fn finish(cursor: FrameCursor<i64>, mut out: Vec<i64>) -> Vec<i64> {
    if let Some((frame, repeat)) = cursor.finish() {
        out.extend(std::iter::repeat(frame).take(repeat as usize));
    }
    out
}

#[test]
fn test_cursor_constant_rate_emits_window_exactly() {
    let window = FrameWindow { start_frame: 10, end_frame: 15 };
    let mut cursor = FrameCursor::new(window);
    // decode starts at a keyframe before the window
    let frames: Vec<i64> = (4..30).collect();
    let out = drain(&mut cursor, &frames);
    assert!(cursor.is_done());
    assert_eq!(out, vec![10, 11, 12, 13, 14]);
}

#[test]
fn test_cursor_fills_gaps_with_previous_frame() {
    let window = FrameWindow { start_frame: 0, end_frame: 6 };
    let mut cursor = FrameCursor::new(window);
    let out = drain(&mut cursor, &[0, 2, 3, 7]);
    assert_eq!(out, vec![0, 0, 2, 3, 3, 3]);
}

#[test]
fn test_cursor_first_frame_fills_leading_slots() {
    let window = FrameWindow { start_frame: 10, end_frame: 14 };
    let mut cursor = FrameCursor::new(window);
    let out = drain(&mut cursor, &[12, 13, 14]);
    assert_eq!(out, vec![12, 12, 12, 13]);
}

#[test]
fn test_cursor_pads_when_stream_ends_early() {
    let window = FrameWindow { start_frame: 0, end_frame: 5 };
    let mut cursor = FrameCursor::new(window);
    let out = drain(&mut cursor, &[0, 1, 2]);
    assert!(!cursor.is_done());
    let out = finish(cursor, out);
    assert_eq!(out, vec![0, 1, 2, 2, 2]);
}

#[test]
fn test_cursor_without_frames_emits_nothing() {
    let window = FrameWindow { start_frame: 0, end_frame: 5 };
    let cursor: FrameCursor<i64> = FrameCursor::new(window);
    assert!(cursor.finish().is_none());
}

#[test]
fn test_cursor_count_matches_rounded_window() {
    let fps = 25.0;
    let range = TimeRange::new(1.3, 4.7).unwrap();
    let window = FrameWindow::from_range(&range, fps);
    let mut cursor = FrameCursor::new(window);
    let frames: Vec<i64> = (0..200).collect();
    let out = drain(&mut cursor, &frames);
    let expected = (4.7_f64 * fps).round() as usize - (1.3_f64 * fps).round() as usize;
    assert_eq!(out.len(), expected);
    assert_eq!(out.len() as u64, window.frame_count());
}
