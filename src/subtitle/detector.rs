use crate::logging::log_debug;
use crate::subtitle::models::SubtitleFormat;
use crate::subtitle::normalize_newlines;
use once_cell::sync::Lazy;
use regex::Regex;

// Строка времени SRT. Номер блока не обязателен: SRT без номеров
// встречается в файлах из сторонних конвертеров. Часы не ограничены.
static SRT_TIMING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\d+:\d{2}:\d{2}[,.]\d{3}[ \t]*-->[ \t]*\d+:\d{2}:\d{2}[,.]\d{3}").unwrap()
});

static EVENTS_SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^[ \t]*\[Events\]").unwrap());

static DIALOGUE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*Dialogue:").unwrap());

static ASS_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:ScriptType:[ \t]*v4\.00\+|\[V4\+ Styles\])").unwrap()
});

static MICRODVD_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\{\d+\}\{\d+\}").unwrap());

static SIMPLE_TEXT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\d+:\d{2}:\d{2}[,.]\d{3}[ \t]+\S").unwrap());

/// Определяет формат по содержимому, независимо от расширения файла.
///
/// Порядок проверок: заголовок WEBVTT, секция [Events] с Dialogue,
/// блоки SRT, строки MicroDVD, простой текст с метками времени.
/// `None` означает, что файл не похож на субтитры.
pub fn detect(content: &str) -> Option<SubtitleFormat> {
    let content = normalize_newlines(content);
    let format = detect_normalized(&content);
    log_debug(&format!("Определен формат субтитров: {:?}", format));
    format
}

fn detect_normalized(content: &str) -> Option<SubtitleFormat> {
    if has_webvtt_header(content) {
        return Some(SubtitleFormat::Vtt);
    }

    if EVENTS_SECTION.is_match(content) && DIALOGUE_LINE.is_match(content) {
        return if ASS_MARKER.is_match(content) {
            Some(SubtitleFormat::Ass)
        } else {
            Some(SubtitleFormat::Ssa)
        };
    }

    if SRT_TIMING_LINE.is_match(content) {
        return Some(SubtitleFormat::Srt);
    }

    if MICRODVD_LINE.is_match(content) {
        return Some(SubtitleFormat::Sub);
    }

    let simple = content
        .lines()
        .any(|line| !line.contains("-->") && SIMPLE_TEXT_LINE.is_match(line));
    if simple {
        return Some(SubtitleFormat::SimpleText);
    }

    None
}

/// Первая непустая строка начинается с WEBVTT
fn has_webvtt_header(content: &str) -> bool {
    content
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim_start().starts_with("WEBVTT"))
        .unwrap_or(false)
}
