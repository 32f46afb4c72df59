use crate::logging::log_warning;
use crate::parser::{finish, strip_markup, FormatParser};
use crate::subtitle::models::{SubtitleCue, SubtitleFormat};
use crate::subtitle::normalize_newlines;
use crate::subtitle::timestamp::try_parse_srt_timestamp;
use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

static TIMING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+:\d{1,2}:\d{1,2}[,.]\d{1,3})\s*-->\s*(\d+:\d{1,2}:\d{1,2}[,.]\d{1,3})").unwrap()
});

/// Парсер SubRip.
///
/// Блок: номер, строка времени, одна или несколько строк текста.
/// Строки текста объединяются через пробел.
pub struct SrtParser;

impl SrtParser {
    fn parse_block(block: &str, block_number: usize) -> Option<SubtitleCue> {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        // Строка времени обычно вторая, но номер блока иногда отсутствует
        let timing_pos = lines.iter().take(2).position(|line| line.contains("-->"));
        let timing_pos = match timing_pos {
            Some(pos) => pos,
            None => {
                log_warning(&format!("SRT блок {}: не найдена строка времени, пропуск", block_number));
                return None;
            }
        };

        let captures = match TIMING_LINE.captures(lines[timing_pos]) {
            Some(captures) => captures,
            None => {
                log_warning(&format!(
                    "SRT блок {}: некорректная строка времени '{}', пропуск",
                    block_number, lines[timing_pos]
                ));
                return None;
            }
        };

        let (start_ms, end_ms) = match (
            try_parse_srt_timestamp(&captures[1]),
            try_parse_srt_timestamp(&captures[2]),
        ) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                log_warning(&format!("SRT блок {}: некорректные метки времени, пропуск", block_number));
                return None;
            }
        };

        let text = lines[timing_pos + 1..]
            .iter()
            .map(|line| strip_markup(line))
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            log_warning(&format!("SRT блок {}: пустой текст, пропуск", block_number));
            return None;
        }

        let index = if timing_pos == 1 { lines[0].parse::<usize>().ok() } else { None };

        Some(SubtitleCue {
            index,
            ..SubtitleCue::new(start_ms, end_ms, text)
        })
    }
}

impl FormatParser for SrtParser {
    fn format(&self) -> SubtitleFormat {
        SubtitleFormat::Srt
    }

    fn parse(&self, content: &str) -> Vec<SubtitleCue> {
        let content = normalize_newlines(content);

        let cues = BLOCK_SEPARATOR
            .split(content.trim())
            .enumerate()
            .filter(|(_, block)| !block.trim().is_empty())
            .filter_map(|(i, block)| Self::parse_block(block, i + 1))
            .collect();

        finish(cues, self.format())
    }
}
