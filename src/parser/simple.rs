use crate::config::DEFAULT_SIMPLE_TEXT_DURATION_MS;
use crate::parser::{finish, strip_markup, FormatParser};
use crate::subtitle::models::{SubtitleCue, SubtitleFormat};
use crate::subtitle::normalize_newlines;
use crate::subtitle::timestamp::try_parse_srt_timestamp;
use once_cell::sync::Lazy;
use regex::Regex;

static TIMED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+:\d{2}:\d{2}[,.]\d{3})\s+(.+)$").unwrap());

/// Текст вида "H:MM:SS.mmm текст". Времени окончания нет,
/// поэтому каждому субтитру назначается фиксированная длительность.
pub struct SimpleTextParser {
    duration_ms: u64,
}

impl SimpleTextParser {
    pub fn new(duration_ms: u64) -> Self {
        Self { duration_ms }
    }
}

impl Default for SimpleTextParser {
    fn default() -> Self {
        Self::new(DEFAULT_SIMPLE_TEXT_DURATION_MS)
    }
}

impl FormatParser for SimpleTextParser {
    fn format(&self) -> SubtitleFormat {
        SubtitleFormat::SimpleText
    }

    fn parse(&self, content: &str) -> Vec<SubtitleCue> {
        let content = normalize_newlines(content);

        let cues = content
            .lines()
            .filter(|line| !line.contains("-->"))
            .filter_map(|line| TIMED_LINE.captures(line.trim()))
            .filter_map(|captures| {
                let start_ms = try_parse_srt_timestamp(&captures[1])?;
                let text = strip_markup(&captures[2]).trim().to_string();
                if text.is_empty() {
                    return None;
                }
                Some(SubtitleCue::new(start_ms, start_ms.saturating_add(self.duration_ms), text))
            })
            .collect();

        finish(cues, self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_duration() {
        let cues = SimpleTextParser::default().parse("0:00:01.000 Hello\n0:00:10,500 World\nnoise\n");

        assert_eq!(cues.len(), 2);
        assert_eq!((cues[0].start_ms, cues[0].end_ms), (1000, 6000));
        assert_eq!((cues[1].start_ms, cues[1].end_ms), (10_500, 15_500));
        assert_eq!(cues[1].text, "World");
    }

    #[test]
    fn test_long_hours_and_huge_start() {
        let cues = SimpleTextParser::default().parse("123:00:00.000 Late\n");
        assert_eq!(cues[0].start_ms, 442_800_000);

        let cues = SimpleTextParser::default().parse("5124095576030:25:51.615 Huge\n");
        assert_eq!(cues[0].end_ms, u64::MAX);
    }

    #[test]
    fn test_custom_duration() {
        let cues = SimpleTextParser::new(2000).parse("00:00:03.000 Hi");
        assert_eq!(cues[0].end_ms, 5000);
    }
}
