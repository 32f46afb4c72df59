pub mod config;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod logging;
pub mod parser;
pub mod subtitle;
pub mod sync;

pub use config::SubtitleEngineConfig;
pub use discovery::{find_candidates, is_subtitle_file, SubtitleCandidate};
pub use encoding::EncodingResolver;
pub use error::{Error, ErrorType, Result};
pub use logging::{
    setup_logging, setup_test_logging, log_error, log_warning, log_info, log_debug, log_trace
};
pub use parser::{FormatParser, SubtitleParser};
pub use subtitle::{
    detect, format_ms_to_srt_timestamp, format_srt_clock, parse_ass_timestamp, parse_srt_timestamp,
    parse_vtt_timestamp, SubtitleCue, SubtitleDocument, SubtitleFormat,
};
pub use sync::{active_cue_at, apply_delay, nudge_delay, set_delay, CueCursor, DelayStep};

use std::path::Path;

/// Основной интерфейс движка субтитров для хоста
pub struct SubtitleEngine {
    config: SubtitleEngineConfig,
}

impl SubtitleEngine {
    /// Создает новый экземпляр движка с заданными настройками
    pub fn new(config: SubtitleEngineConfig) -> Self {
        #[cfg(test)]
        {
            setup_test_logging(config.level_filter());
        }
        #[cfg(not(test))]
        {
            setup_logging(config.level_filter());
        }

        log_info(&format!("Создан движок субтитров с настройками: {:?}", config));

        Self { config }
    }

    /// Устанавливает предпочитаемую кодировку
    pub fn with_preferred_encoding(mut self, encoding: &str) -> Self {
        log_debug(&format!("Установлена предпочитаемая кодировка: {}", encoding));
        self.config.preferred_encoding = Some(encoding.to_string());
        self
    }

    /// Устанавливает предпочитаемый язык
    pub fn with_preferred_language(mut self, language: &str) -> Self {
        log_debug(&format!("Установлен предпочитаемый язык: {}", language));
        self.config.preferred_language = Some(language.to_string());
        self
    }

    /// Устанавливает частоту кадров для MicroDVD
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Result<Self> {
        self.config.frame_rate = frame_rate;
        self.config.validate()?;
        log_debug(&format!("Установлена частота кадров: {}", frame_rate));
        Ok(self)
    }

    /// Устанавливает сохраненную задержку, применяемую при загрузке
    pub fn with_delay(mut self, delay_ms: i64) -> Self {
        self.config.delay_ms = sync::clamp_delay(delay_ms);
        log_debug(&format!("Установлена задержка: {} мс", self.config.delay_ms));
        self
    }

    pub fn config(&self) -> &SubtitleEngineConfig {
        &self.config
    }

    /// Ищет файлы субтитров рядом с видео
    pub fn find_subtitles<P: AsRef<Path>>(&self, video_path: P) -> Vec<SubtitleCandidate> {
        find_candidates(video_path, &self.config)
    }

    /// Загружает файл субтитров
    pub fn open<P: AsRef<Path>>(&self, subtitle_path: P) -> Result<SubtitleDocument> {
        SubtitleParser::new(self.config.clone()).parse_file(subtitle_path)
    }

    /// Загружает наиболее подходящие субтитры для видео.
    /// Кандидаты пробуются по порядку, `None` если ни один не загрузился.
    pub fn open_for_video<P: AsRef<Path>>(&self, video_path: P) -> Option<SubtitleDocument> {
        for candidate in self.find_subtitles(video_path) {
            match self.open(&candidate.path) {
                Ok(document) => return Some(document),
                Err(e) => log_warning(&format!("Не удалось загрузить {:?}: {}", candidate.path, e)),
            }
        }
        None
    }

    /// Является ли файл субтитрами
    pub fn is_subtitle_file<P: AsRef<Path>>(&self, path: P) -> bool {
        is_subtitle_file(path, &self.config)
    }
}

impl Default for SubtitleEngine {
    fn default() -> Self {
        Self::new(SubtitleEngineConfig::default())
    }
}
