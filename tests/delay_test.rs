use assert_fs::prelude::*;
use predicates::prelude::*;
use subsync_engine::subtitle::{save_as_srt, to_srt_string};
use subsync_engine::sync::{apply_delay, nudge_delay, reset_delay, set_delay, DelayStep};
use subsync_engine::{
    active_cue_at, format_ms_to_srt_timestamp, parse_srt_timestamp, Result, SubtitleCue,
    SubtitleDocument, SubtitleFormat, SubtitleParser,
};

const SRT: &str = "1\n00:00:01,000 --> 00:00:03,500\nHello world\n\n2\n00:00:04,000 --> 00:00:05,000\nSecond line\n\n";

fn parsed() -> SubtitleDocument {
    SubtitleParser::default().parse_str(SRT).unwrap()
}

#[test]
fn test_timestamp_round_trip() {
    for ms in [0i64, 1, 999, 1000, 3_661_001, 359_999_999] {
        assert_eq!(parse_srt_timestamp(&format_ms_to_srt_timestamp(ms)), ms as u64);
    }
}

#[test]
fn test_delay_is_reversible() {
    let mut document = parsed();
    let original = document.cues().to_vec();

    apply_delay(&mut document, 2000);
    assert_ne!(document.cues(), original.as_slice());

    apply_delay(&mut document, -2000);
    assert_eq!(document.cues(), original.as_slice());
}

#[test]
fn test_delay_is_clamped() {
    let mut document = parsed();
    apply_delay(&mut document, 10_000_000);
    assert_eq!(document.active_delay_ms(), 3_600_000);

    let mut document = parsed();
    apply_delay(&mut document, -10_000_000);
    assert_eq!(document.active_delay_ms(), -3_600_000);
    assert!(document.iter().all(|cue| cue.start_ms == 0 && cue.end_ms == 0));

    reset_delay(&mut document);
    assert_eq!(document[1].start_ms, 4000);
}

#[test]
fn test_many_nudges_do_not_drift() {
    let mut document = parsed();
    let original = document.cues().to_vec();

    for _ in 0..50 {
        nudge_delay(&mut document, DelayStep::Back5s);
    }
    for _ in 0..50 {
        nudge_delay(&mut document, DelayStep::Forward5s);
    }

    assert_eq!(document.active_delay_ms(), 0);
    assert_eq!(document.cues(), original.as_slice());
}

#[test]
fn test_locator_after_delay() {
    let mut document = parsed();
    assert_eq!(active_cue_at(&document, 3500).unwrap().text, "Hello world");
    assert!(active_cue_at(&document, 3600).is_none());

    set_delay(&mut document, 500);
    assert_eq!(active_cue_at(&document, 3600).unwrap().text, "Hello world");
    assert!(active_cue_at(&document, 1200).is_none());
}

#[test]
fn test_save_shifted_document() -> Result<()> {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = temp.child("shifted.srt");

    let mut document = parsed();
    set_delay(&mut document, 1500);
    save_as_srt(&document, output.path())?;

    output.assert(predicate::path::exists());
    output.assert(predicate::str::contains("00:00:02,500 --> 00:00:05,000"));

    // Сохраненный файл разбирается обратно в те же значения
    let reloaded = SubtitleParser::default().parse_file(output.path())?;
    assert_eq!(reloaded.cues(), document.cues());
    assert_eq!(to_srt_string(&reloaded), to_srt_string(&document));

    temp.close().unwrap();
    Ok(())
}

#[test]
fn test_long_hours_survive_export_and_reload() -> Result<()> {
    let document = SubtitleDocument::from_cues(
        SubtitleFormat::Srt,
        vec![SubtitleCue::with_index(1, 360_000_000, 360_001_000, "Late".to_string())],
    );
    let exported = to_srt_string(&document);
    assert_eq!(exported, "1\n100:00:00,000 --> 100:00:01,000\nLate\n\n");

    // Без подсказки по расширению формат определяется по содержимому
    let reloaded = SubtitleParser::default().parse_str(&exported)?;
    assert_eq!(reloaded.detected_format(), SubtitleFormat::Srt);
    assert_eq!(reloaded.cues(), document.cues());

    Ok(())
}

#[test]
fn test_delay_on_huge_timestamps() -> Result<()> {
    let content = "1\n2562047788016:00:00,000 --> 2562047788016:00:01,000\nHuge\n";
    let mut document = SubtitleParser::default().parse_str(content)?;
    assert_eq!(document[0].start_ms, 9_223_372_036_857_600_000);

    apply_delay(&mut document, -3_000_000);
    assert_eq!(document[0].start_ms, 9_223_372_036_854_600_000);
    assert_eq!(document[0].end_ms, 9_223_372_036_854_601_000);

    reset_delay(&mut document);
    assert_eq!(document.cues(), document.original_cues());
    assert!(to_srt_string(&document).contains("2562047788016:00:00,000"));

    Ok(())
}
