use crate::config::DEFAULT_FRAME_RATE;
use crate::logging::log_debug;
use crate::parser::{finish, FormatParser};
use crate::subtitle::models::{SubtitleCue, SubtitleFormat};
use crate::subtitle::normalize_newlines;
use once_cell::sync::Lazy;
use regex::Regex;

static FRAME_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{(\d+)\}\{(\d+)\}(.*)$").unwrap());

// {y:i}, {c:$0000ff} и подобные управляющие коды
static CONTROL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Парсер MicroDVD. Частота кадров задается настройками, без автоопределения.
pub struct MicroDvdParser {
    frame_rate: f64,
}

impl MicroDvdParser {
    pub fn new(frame_rate: f64) -> Self {
        Self { frame_rate }
    }

    fn frames_to_ms(&self, frames: u64) -> u64 {
        (frames as f64 * 1000.0 / self.frame_rate).round() as u64
    }
}

impl Default for MicroDvdParser {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

impl FormatParser for MicroDvdParser {
    fn format(&self) -> SubtitleFormat {
        SubtitleFormat::Sub
    }

    fn parse(&self, content: &str) -> Vec<SubtitleCue> {
        let content = normalize_newlines(content);
        let mut cues = Vec::new();

        for (i, line) in content.lines().enumerate() {
            let captures = match FRAME_LINE.captures(line.trim()) {
                Some(captures) => captures,
                None => {
                    if !line.trim().is_empty() {
                        log_debug(&format!("MicroDVD строка {}: не распознана, пропуск", i + 1));
                    }
                    continue;
                }
            };

            let (start_frame, end_frame) = match (captures[1].parse::<u64>(), captures[2].parse::<u64>()) {
                (Ok(start), Ok(end)) => (start, end),
                _ => continue,
            };

            let text = CONTROL_CODE
                .replace_all(&captures[3], "")
                .split('|')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("\n");
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            cues.push(SubtitleCue::new(
                self.frames_to_ms(start_frame),
                self.frames_to_ms(end_frame),
                text.to_string(),
            ));
        }

        finish(cues, self.format())
    }
}
