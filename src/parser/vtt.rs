use crate::logging::log_warning;
use crate::parser::{finish, strip_markup, FormatParser};
use crate::subtitle::models::{SubtitleCue, SubtitleFormat};
use crate::subtitle::normalize_newlines;
use crate::subtitle::timestamp::try_parse_vtt_timestamp;

/// Парсер WebVTT.
///
/// Строки текста одного субтитра объединяются через перевод строки,
/// в отличие от SRT.
pub struct VttParser;

/// Что сейчас читает парсер
#[derive(Debug, Clone, Copy, PartialEq)]
enum Block {
    /// Между блоками
    None,
    /// Заголовок WEBVTT, NOTE, STYLE или REGION - пропускается до пустой строки
    Skipped,
    /// Текст субтитра
    Cue,
}

impl VttParser {
    /// Декодирует основные HTML-сущности, допустимые в WebVTT
    fn decode_entities(text: &str) -> String {
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&nbsp;", " ")
            .replace("&lrm;", "")
            .replace("&rlm;", "")
            .replace("&amp;", "&")
    }

    fn parse_timing(line: &str, line_number: usize) -> Option<(u64, u64)> {
        let (start, end) = line.split_once("-->")?;
        match (try_parse_vtt_timestamp(start), try_parse_vtt_timestamp(end)) {
            (Some(start_ms), Some(end_ms)) => Some((start_ms, end_ms)),
            _ => {
                log_warning(&format!(
                    "VTT строка {}: некорректная строка времени '{}', пропуск",
                    line_number, line
                ));
                None
            }
        }
    }

    fn push_cue(cues: &mut Vec<SubtitleCue>, timing: Option<(u64, u64)>, lines: &mut Vec<String>) {
        if let Some((start_ms, end_ms)) = timing {
            let text = lines.join("\n");
            if !text.trim().is_empty() {
                cues.push(SubtitleCue::new(start_ms, end_ms, text.trim().to_string()));
            }
        }
        lines.clear();
    }
}

impl FormatParser for VttParser {
    fn format(&self) -> SubtitleFormat {
        SubtitleFormat::Vtt
    }

    fn parse(&self, content: &str) -> Vec<SubtitleCue> {
        let content = normalize_newlines(content);
        let mut cues = Vec::new();

        let mut block = Block::None;
        let mut current_timing: Option<(u64, u64)> = None;
        let mut current_lines: Vec<String> = Vec::new();

        for (i, line) in content.lines().enumerate() {
            let trimmed_line = line.trim();

            if trimmed_line.is_empty() {
                // Пустая строка завершает любой блок
                if block == Block::Cue {
                    Self::push_cue(&mut cues, current_timing.take(), &mut current_lines);
                }
                block = Block::None;
                continue;
            }

            match block {
                Block::Skipped => continue,
                Block::Cue => {
                    if trimmed_line.contains("-->") {
                        // Новая строка времени без пустой строки перед ней
                        Self::push_cue(&mut cues, current_timing.take(), &mut current_lines);
                        current_timing = Self::parse_timing(trimmed_line, i + 1);
                    } else {
                        let text = Self::decode_entities(&strip_markup(trimmed_line));
                        current_lines.push(text.trim().to_string());
                    }
                }
                Block::None => {
                    if trimmed_line.starts_with("WEBVTT")
                        || trimmed_line.starts_with("NOTE")
                        || trimmed_line.starts_with("STYLE")
                        || trimmed_line.starts_with("REGION")
                    {
                        block = Block::Skipped;
                    } else if trimmed_line.contains("-->") {
                        block = Block::Cue;
                        current_timing = Self::parse_timing(trimmed_line, i + 1);
                    }
                    // Иначе это идентификатор субтитра - он не нужен
                }
            }
        }

        // Последний субтитр без завершающей пустой строки
        if block == Block::Cue {
            Self::push_cue(&mut cues, current_timing.take(), &mut current_lines);
        }

        finish(cues, self.format())
    }
}
