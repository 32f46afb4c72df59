use crate::logging::{log_debug, log_warning};
use crate::parser::{finish, FormatParser};
use crate::subtitle::models::{SubtitleCue, SubtitleFormat};
use crate::subtitle::normalize_newlines;
use crate::subtitle::timestamp::try_parse_ass_timestamp;
use once_cell::sync::Lazy;
use regex::Regex;

static OVERRIDE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Поля Dialogue по умолчанию (Marked/Layer, Start, End, ..., Text)
const DEFAULT_FIELD_COUNT: usize = 10;
const DEFAULT_START_FIELD: usize = 1;
const DEFAULT_END_FIELD: usize = 2;

/// Расположение полей, прочитанное из строки Format: секции [Events]
#[derive(Debug, Clone, Copy, PartialEq)]
struct EventLayout {
    field_count: usize,
    start: usize,
    end: usize,
}

impl Default for EventLayout {
    fn default() -> Self {
        Self {
            field_count: DEFAULT_FIELD_COUNT,
            start: DEFAULT_START_FIELD,
            end: DEFAULT_END_FIELD,
        }
    }
}

impl EventLayout {
    fn from_format_line(line: &str) -> Self {
        let fields: Vec<String> = line.split(',').map(|f| f.trim().to_ascii_lowercase()).collect();
        let start = fields.iter().position(|f| f == "start");
        let end = fields.iter().position(|f| f == "end");

        // Text обязан быть последним, иначе раскладка непригодна
        match (start, end, fields.last().map(String::as_str)) {
            (Some(start), Some(end), Some("text")) => Self {
                field_count: fields.len(),
                start,
                end,
            },
            _ => {
                log_warning(&format!("Некорректная строка Format: '{}', используются поля по умолчанию", line));
                Self::default()
            }
        }
    }
}

/// Парсер ASS/SSA. Оба диалекта разбираются одинаково.
pub struct AssParser {
    format: SubtitleFormat,
}

impl AssParser {
    pub fn new(format: SubtitleFormat) -> Self {
        Self { format }
    }

    /// Убирает теги {...} и заменяет \N, \n, \h
    pub fn clean_text(raw: &str) -> String {
        let text = OVERRIDE_TAG.replace_all(raw, "");
        text.replace("\\N", "\n")
            .replace("\\n", "\n")
            .replace("\\h", " ")
            .trim()
            .to_string()
    }

    fn parse_dialogue(body: &str, layout: EventLayout, line_number: usize) -> Option<SubtitleCue> {
        let fields: Vec<&str> = body.splitn(layout.field_count, ',').collect();
        if fields.len() < layout.field_count {
            log_warning(&format!(
                "ASS строка {}: ожидалось {} полей, найдено {}, пропуск",
                line_number,
                layout.field_count,
                fields.len()
            ));
            return None;
        }

        let start = try_parse_ass_timestamp(fields[layout.start]);
        let end = try_parse_ass_timestamp(fields[layout.end]);
        let (start_ms, end_ms) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                log_warning(&format!("ASS строка {}: некорректное время, пропуск", line_number));
                return None;
            }
        };

        let text = Self::clean_text(fields[layout.field_count - 1]);
        if text.is_empty() {
            // Рисунки и пустые эффекты не содержат текста
            log_debug(&format!("ASS строка {}: нет текста после очистки", line_number));
            return None;
        }

        Some(SubtitleCue::new(start_ms, end_ms, text))
    }
}

impl FormatParser for AssParser {
    fn format(&self) -> SubtitleFormat {
        self.format
    }

    fn parse(&self, content: &str) -> Vec<SubtitleCue> {
        let content = normalize_newlines(content);
        let mut cues = Vec::new();
        let mut in_events = false;
        let mut layout = EventLayout::default();

        for (i, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.starts_with('[') && line.ends_with(']') {
                in_events = line.eq_ignore_ascii_case("[Events]");
                continue;
            }
            if !in_events {
                continue;
            }

            if let Some(format_line) = line.strip_prefix("Format:") {
                layout = EventLayout::from_format_line(format_line);
            } else if let Some(body) = line.strip_prefix("Dialogue:") {
                if let Some(cue) = Self::parse_dialogue(body.trim_start(), layout, i + 1) {
                    cues.push(cue);
                }
            }
        }

        finish(cues, self.format)
    }
}
