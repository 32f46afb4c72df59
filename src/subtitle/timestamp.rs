//! Преобразование временных меток форматов субтитров в миллисекунды и обратно.
//!
//! Ошибки разбора не фатальны: функции `parse_*` возвращают 0 для
//! некорректной метки, а `try_parse_*` возвращают `None`, чтобы парсеры
//! могли пропустить испорченный блок.

use once_cell::sync::Lazy;
use regex::Regex;

static CLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{1,2})[,.](\d{1,3})$").unwrap()
});

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Разбирает "H:MM:SS[,.]fff". Дробная часть трактуется как десятичная доля
/// секунды: "5" = 500 мс, "50" = 500 мс, "500" = 500 мс.
fn parse_clock(s: &str, require_hours: bool) -> Option<u64> {
    let captures = CLOCK_REGEX.captures(s.trim())?;

    let hours = match captures.get(1) {
        Some(h) => h.as_str().parse::<u64>().ok()?,
        None if require_hours => return None,
        None => 0,
    };
    let minutes: u64 = captures[2].parse().ok()?;
    let seconds: u64 = captures[3].parse().ok()?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    let fraction = &captures[4];
    let value: u64 = fraction.parse().ok()?;
    let millis = match fraction.len() {
        1 => value * 100,
        2 => value * 10,
        _ => value,
    };

    hours
        .checked_mul(MS_PER_HOUR)?
        .checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis)
}

/// SRT: `H{1,2}:MM:SS[,.]mmm`, запятая и точка равноправны
pub fn try_parse_srt_timestamp(s: &str) -> Option<u64> {
    parse_clock(s, true)
}

/// SRT метка в миллисекундах, 0 при ошибке разбора
pub fn parse_srt_timestamp(s: &str) -> u64 {
    try_parse_srt_timestamp(s).unwrap_or(0)
}

/// ASS/SSA: `H:MM:SS.cc`, где cc - сотые доли секунды
pub fn try_parse_ass_timestamp(s: &str) -> Option<u64> {
    parse_clock(s, true)
}

pub fn parse_ass_timestamp(s: &str) -> u64 {
    try_parse_ass_timestamp(s).unwrap_or(0)
}

/// WebVTT: `MM:SS.mmm` или `H:MM:SS.mmm`, настройки после пробела игнорируются
pub fn try_parse_vtt_timestamp(s: &str) -> Option<u64> {
    let token = s.split_whitespace().next()?;
    parse_clock(token, false)
}

pub fn parse_vtt_timestamp(s: &str) -> u64 {
    try_parse_vtt_timestamp(s).unwrap_or(0)
}

/// Форматирует миллисекунды как `HH:MM:SS,mmm`.
/// Отрицательные значения дают 0, часы не обрезаются до двух цифр.
pub fn format_ms_to_srt_timestamp(ms: i64) -> String {
    format_srt_clock(ms.max(0) as u64)
}

/// `HH:MM:SS,mmm` для времени субтитра во всем диапазоне u64
pub fn format_srt_clock(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srt_timestamp() {
        assert_eq!(parse_srt_timestamp("00:00:01,000"), 1000);
        assert_eq!(parse_srt_timestamp("00:00:01.000"), 1000);
        assert_eq!(parse_srt_timestamp("1:02:03,456"), 3_723_456);
        assert_eq!(parse_srt_timestamp(" 01:30:45,500 "), 5_445_500);
    }

    #[test]
    fn test_parse_srt_timestamp_failure_is_zero() {
        assert_eq!(parse_srt_timestamp("garbage"), 0);
        assert_eq!(parse_srt_timestamp("00:61:00,000"), 0);
        assert_eq!(parse_srt_timestamp("00:00:xx,000"), 0);
        assert_eq!(try_parse_srt_timestamp("00:01,000"), None);
    }

    #[test]
    fn test_parse_ass_timestamp_centiseconds() {
        assert_eq!(parse_ass_timestamp("0:00:01.50"), 1500);
        assert_eq!(parse_ass_timestamp("1:00:00.05"), 3_600_050);
        assert_eq!(try_parse_ass_timestamp("nope"), None);
    }

    #[test]
    fn test_parse_vtt_timestamp() {
        assert_eq!(parse_vtt_timestamp("00:01.500"), 1500);
        assert_eq!(parse_vtt_timestamp("01:00:01.500"), 3_601_500);
        assert_eq!(parse_vtt_timestamp("00:00:04.000 align:start position:10%"), 4000);
        assert_eq!(try_parse_vtt_timestamp(""), None);
    }

    #[test]
    fn test_format_ms_to_srt_timestamp() {
        assert_eq!(format_ms_to_srt_timestamp(0), "00:00:00,000");
        assert_eq!(format_ms_to_srt_timestamp(-500), "00:00:00,000");
        assert_eq!(format_ms_to_srt_timestamp(3_661_001), "01:01:01,001");
        assert_eq!(format_ms_to_srt_timestamp(360_000_000), "100:00:00,000");
    }

    #[test]
    fn test_format_full_range() {
        assert_eq!(format_srt_clock(u64::MAX), "5124095576030:25:51,615");
        assert_eq!(parse_srt_timestamp(&format_srt_clock(u64::MAX)), u64::MAX);
    }

    #[test]
    fn test_round_trip() {
        for ms in [0i64, 1, 999, 1000, 3_661_001, 359_999_999, 400_000_123] {
            assert_eq!(parse_srt_timestamp(&format_ms_to_srt_timestamp(ms)), ms as u64);
        }
    }
}
