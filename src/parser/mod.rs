pub mod ass;
pub mod microdvd;
pub mod simple;
pub mod srt;
pub mod vtt;

pub use ass::AssParser;
pub use microdvd::MicroDvdParser;
pub use simple::SimpleTextParser;
pub use srt::SrtParser;
pub use vtt::VttParser;

use crate::config::SubtitleEngineConfig;
use crate::discovery::language::detect_language;
use crate::encoding::EncodingResolver;
use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, log_info, log_warning};
use crate::subtitle::detector::detect;
use crate::subtitle::models::{SubtitleCue, SubtitleDocument, SubtitleFormat};
use crate::sync::delay::apply_delay;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

// Теги ASS иногда встречаются внутри SRT, например {\an8}
static ASS_TAG_IN_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\\[^}]*\}").unwrap());

/// Парсер одного формата субтитров.
///
/// Парсер не возвращает ошибок: испорченные блоки пропускаются
/// с записью в лог, результат отсортирован по времени начала.
pub trait FormatParser {
    /// Формат, который разбирает парсер
    fn format(&self) -> SubtitleFormat;

    /// Разбирает содержимое файла
    fn parse(&self, content: &str) -> Vec<SubtitleCue>;
}

/// Удаляет HTML-подобные теги и теги ASS из строки
pub fn strip_markup(text: &str) -> String {
    let text = HTML_TAG.replace_all(text, "");
    ASS_TAG_IN_TEXT.replace_all(&text, "").into_owned()
}

/// Стабильная сортировка по времени начала
pub(crate) fn finish(mut cues: Vec<SubtitleCue>, format: SubtitleFormat) -> Vec<SubtitleCue> {
    cues.sort_by_key(|cue| cue.start_ms);
    log_debug(&format!("Разобрано {} субтитров формата {}", cues.len(), format));
    cues
}

/// Загрузка субтитров: кодировка, определение формата, разбор
pub struct SubtitleParser {
    config: SubtitleEngineConfig,
}

impl SubtitleParser {
    pub fn new(config: SubtitleEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SubtitleEngineConfig {
        &self.config
    }

    /// Парсер для указанного формата с учетом настроек
    pub fn parser_for(&self, format: SubtitleFormat) -> Box<dyn FormatParser> {
        match format {
            SubtitleFormat::Srt => Box::new(SrtParser),
            SubtitleFormat::Ass | SubtitleFormat::Ssa => Box::new(AssParser::new(format)),
            SubtitleFormat::Sub => Box::new(MicroDvdParser::new(self.config.frame_rate)),
            SubtitleFormat::Vtt => Box::new(VttParser),
            SubtitleFormat::SimpleText => {
                Box::new(SimpleTextParser::new(self.config.simple_text_duration_ms))
            }
        }
    }

    /// Разбирает содержимое. Формат определяется по содержимому,
    /// `hint` (обычно из расширения) пробуется, если определение не помогло.
    pub fn parse_content(
        &self,
        content: &str,
        hint: Option<SubtitleFormat>,
    ) -> Result<(SubtitleFormat, Vec<SubtitleCue>)> {
        let detected = detect(content);

        let mut attempts: Vec<SubtitleFormat> = detected.into_iter().collect();
        if let Some(hint) = hint {
            if !attempts.contains(&hint) {
                attempts.push(hint);
            }
        }

        if attempts.is_empty() {
            return Err(Error::new(
                ErrorType::UnrecognizedFormat,
                "no subtitle structure found in content",
            ));
        }

        for format in attempts {
            let cues = self.parser_for(format).parse(content);
            if !cues.is_empty() {
                return Ok((format, cues));
            }
            log_warning(&format!("Формат {} не дал ни одного субтитра", format));
        }

        Err(Error::new(ErrorType::NoCues, "no usable subtitle content"))
    }

    /// Разбирает строку в документ без файла-источника
    pub fn parse_str(&self, content: &str) -> Result<SubtitleDocument> {
        let (format, cues) = self.parse_content(content, None)?;
        let mut document = SubtitleDocument::from_cues(format, cues);
        self.apply_saved_delay(&mut document);
        Ok(document)
    }

    /// Читает и разбирает файл субтитров
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<SubtitleDocument> {
        let path = path.as_ref();
        log_info(&format!("Загрузка субтитров из {:?}", path));

        let resolver = EncodingResolver::new(self.config.preferred_encoding.clone());
        let (content, encoding) = resolver.resolve_and_read(path)?;

        let (format, cues) = match self.parse_content(&content, SubtitleFormat::from_path(path)) {
            Ok(parsed) => parsed,
            Err(Error::UnrecognizedFormat(msg)) => {
                return Err(Error::UnrecognizedFormat(format!("{}: {}", path.display(), msg)))
            }
            Err(Error::NoCues(msg)) => return Err(Error::NoCues(format!("{}: {}", path.display(), msg))),
            Err(e) => return Err(e),
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut document = SubtitleDocument::new(
            path.to_path_buf(),
            format,
            encoding,
            detect_language(&file_name),
            cues,
        );
        self.apply_saved_delay(&mut document);

        log_info(&format!(
            "Загружено {} субтитров: формат {}, кодировка {}, язык {}",
            document.len(),
            document.detected_format(),
            document.encoding_used(),
            document.detected_language()
        ));

        Ok(document)
    }

    fn apply_saved_delay(&self, document: &mut SubtitleDocument) {
        let delay = self.config.effective_delay_ms();
        if delay != 0 {
            apply_delay(document, delay);
        }
    }
}

impl Default for SubtitleParser {
    fn default() -> Self {
        Self::new(SubtitleEngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>bold</b> {\\an8}top"), "bold top");
        assert_eq!(strip_markup("no tags"), "no tags");
    }

    #[test]
    fn test_parse_content_autodetects() {
        let parser = SubtitleParser::default();
        let (format, cues) = parser
            .parse_content("1\n00:00:01,000 --> 00:00:02,000\nHi\n", Some(SubtitleFormat::SimpleText))
            .unwrap();

        assert_eq!(format, SubtitleFormat::Srt);
        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn test_parse_content_unrecognized() {
        let parser = SubtitleParser::default();
        let result = parser.parse_content("hello there", None);
        assert!(matches!(result, Err(Error::UnrecognizedFormat(_))));
    }

    #[test]
    fn test_parse_content_no_cues() {
        let parser = SubtitleParser::default();
        let result = parser.parse_content("WEBVTT\n\nNOTE nothing here\n", None);
        assert!(matches!(result, Err(Error::NoCues(_))));
    }

    #[test]
    fn test_parse_str_applies_saved_delay() {
        let parser = SubtitleParser::new(SubtitleEngineConfig {
            delay_ms: 500,
            ..Default::default()
        });
        let doc = parser.parse_str("{25}{50}Hello").unwrap();

        assert_eq!(doc.active_delay_ms(), 500);
        assert_eq!(doc[0].start_ms, 1500);
        assert_eq!(doc.original_cues()[0].start_ms, 1000);
    }

    #[test]
    fn test_microdvd_uses_configured_frame_rate() {
        let parser = SubtitleParser::new(SubtitleEngineConfig {
            frame_rate: 50.0,
            ..Default::default()
        });
        let doc = parser.parse_str("{50}{100}Hello").unwrap();
        assert_eq!(doc[0].start_ms, 1000);
    }
}
