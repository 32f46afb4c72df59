use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, parse_level};
use crate::sync::delay::clamp_delay;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Частота кадров MicroDVD по умолчанию
pub const DEFAULT_FRAME_RATE: f64 = 25.0;

/// Длительность субтитра в простом текстовом формате по умолчанию (мс)
pub const DEFAULT_SIMPLE_TEXT_DURATION_MS: u64 = 5000;

/// Настройки движка субтитров.
///
/// Хост владеет жизненным циклом настроек и передает их явно в поиск и парсинг.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleEngineConfig {
    /// Предпочитаемая кодировка, пробуется первой
    pub preferred_encoding: Option<String>,

    /// Предпочитаемый язык субтитров (например, "English" или "Arabic")
    pub preferred_language: Option<String>,

    /// Частота кадров для MicroDVD
    pub frame_rate: f64,

    /// Длительность субтитра в простом текстовом формате
    pub simple_text_duration_ms: u64,

    /// Искать ли в подпапках Subs/Subtitles рядом с видео
    pub search_subfolders: bool,

    /// Сохраненная задержка, применяется при загрузке
    pub delay_ms: i64,

    /// Уровень логирования
    pub log_level: String,
}

impl Default for SubtitleEngineConfig {
    fn default() -> Self {
        Self {
            preferred_encoding: None,
            preferred_language: None,
            frame_rate: DEFAULT_FRAME_RATE,
            simple_text_duration_ms: DEFAULT_SIMPLE_TEXT_DURATION_MS,
            search_subfolders: true,
            delay_ms: 0,
            log_level: "info".to_string(),
        }
    }
}

impl SubtitleEngineConfig {
    /// Загружает настройки из JSON файла
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log_debug(&format!("Загрузка настроек из {:?}", path));

        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Сохраняет настройки в JSON файл
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        log_debug(&format!("Настройки сохранены в {:?}", path.as_ref()));
        Ok(())
    }

    /// Проверяет корректность настроек
    pub fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(Error::new(
                ErrorType::Config,
                &format!("frame_rate must be positive, got {}", self.frame_rate),
            ));
        }
        Ok(())
    }

    /// Сохраненная задержка, ограниченная допустимым диапазоном
    pub fn effective_delay_ms(&self) -> i64 {
        clamp_delay(self.delay_ms)
    }

    pub fn level_filter(&self) -> LevelFilter {
        parse_level(&self.log_level)
    }

    /// Язык, за который начисляется бонус при поиске субтитров
    pub fn bonus_language(&self) -> &str {
        self.preferred_language.as_deref().unwrap_or("English")
    }
}
