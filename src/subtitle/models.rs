use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Формат файла субтитров
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleFormat {
    /// SubRip
    Srt,
    /// Advanced SubStation Alpha
    Ass,
    /// SubStation Alpha
    Ssa,
    /// MicroDVD, время в кадрах
    Sub,
    /// WebVTT
    Vtt,
    /// Строки вида "0:00:01.000 текст" без времени окончания
    SimpleText,
}

impl SubtitleFormat {
    /// Формат по расширению файла. Расширение используется только как подсказка.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "ass" => Some(Self::Ass),
            "ssa" => Some(Self::Ssa),
            "sub" => Some(Self::Sub),
            "vtt" => Some(Self::Vtt),
            "txt" => Some(Self::SimpleText),
            _ => None,
        }
    }

    /// Формат по расширению пути
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Ass => "ass",
            Self::Ssa => "ssa",
            Self::Sub => "sub",
            Self::Vtt => "vtt",
            Self::SimpleText => "simple_text",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Один субтитр
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// Исходный порядковый номер (есть только в SRT)
    pub index: Option<usize>,
    /// Время начала в миллисекундах
    pub start_ms: u64,
    /// Время окончания в миллисекундах, не меньше start_ms
    pub end_ms: u64,
    /// Текст без разметки, может содержать переводы строк
    pub text: String,
}

impl SubtitleCue {
    /// Создает новый субтитр. Если end_ms < start_ms, интервал становится нулевым.
    pub fn new(start_ms: u64, end_ms: u64, text: String) -> Self {
        Self {
            index: None,
            start_ms,
            end_ms: end_ms.max(start_ms),
            text,
        }
    }

    /// Создает субтитр с исходным номером
    pub fn with_index(index: usize, start_ms: u64, end_ms: u64, text: String) -> Self {
        Self {
            index: Some(index),
            ..Self::new(start_ms, end_ms, text)
        }
    }

    /// Длительность в миллисекундах
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Активен ли субтитр в момент position_ms (обе границы включительно)
    pub fn contains(&self, position_ms: u64) -> bool {
        self.start_ms <= position_ms && position_ms <= self.end_ms
    }
}

/// Разобранный файл субтитров.
///
/// Хранит исходные (не сдвинутые) субтитры, поэтому любая задержка
/// пересчитывается от них, а не от уже сдвинутых значений.
/// Документ не синхронизирован: при доступе из нескольких потоков
/// вызывающий код должен сам сериализовать доступ.
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    source_path: PathBuf,
    detected_format: SubtitleFormat,
    encoding_used: String,
    detected_language: String,
    original_cues: Vec<SubtitleCue>,
    cues: Vec<SubtitleCue>,
    /// reach[i] = максимальный end_ms среди cues[..=i]
    reach: Vec<u64>,
    active_delay_ms: i64,
    revision: u64,
}

impl SubtitleDocument {
    /// Создает документ. Субтитры сортируются по времени начала (стабильно),
    /// у перевернутых интервалов конец подтягивается к началу.
    pub fn new(
        source_path: PathBuf,
        detected_format: SubtitleFormat,
        encoding_used: String,
        detected_language: String,
        mut cues: Vec<SubtitleCue>,
    ) -> Self {
        for cue in cues.iter_mut() {
            cue.end_ms = cue.end_ms.max(cue.start_ms);
        }
        cues.sort_by_key(|cue| cue.start_ms);
        let reach = compute_reach(&cues);

        Self {
            source_path,
            detected_format,
            encoding_used,
            detected_language,
            original_cues: cues.clone(),
            cues,
            reach,
            active_delay_ms: 0,
            revision: 0,
        }
    }

    /// Документ из набора субтитров без файла-источника
    pub fn from_cues(detected_format: SubtitleFormat, cues: Vec<SubtitleCue>) -> Self {
        Self::new(
            PathBuf::new(),
            detected_format,
            "utf-8".to_string(),
            "Unknown".to_string(),
            cues,
        )
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn detected_format(&self) -> SubtitleFormat {
        self.detected_format
    }

    pub fn encoding_used(&self) -> &str {
        &self.encoding_used
    }

    pub fn detected_language(&self) -> &str {
        &self.detected_language
    }

    /// Текущие субтитры с примененной задержкой
    pub fn cues(&self) -> &[SubtitleCue] {
        &self.cues
    }

    /// Субтитры в том виде, в каком они были разобраны
    pub fn original_cues(&self) -> &[SubtitleCue] {
        &self.original_cues
    }

    /// Суммарная примененная задержка
    pub fn active_delay_ms(&self) -> i64 {
        self.active_delay_ms
    }

    /// Счетчик изменений, увеличивается при каждой смене задержки
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubtitleCue> {
        self.cues.iter()
    }

    /// Общая длительность от начала первого до конца последнего субтитра
    pub fn duration_ms(&self) -> u64 {
        match (self.cues.first(), self.reach.last()) {
            (Some(first), Some(&max_end)) => max_end - first.start_ms,
            _ => 0,
        }
    }

    pub(crate) fn reach(&self) -> &[u64] {
        &self.reach
    }

    /// Подменяет субтитры целиком вместе с задержкой
    pub(crate) fn replace_cues(&mut self, cues: Vec<SubtitleCue>, active_delay_ms: i64) {
        self.reach = compute_reach(&cues);
        self.cues = cues;
        self.active_delay_ms = active_delay_ms;
        self.revision += 1;
    }
}

impl std::ops::Index<usize> for SubtitleDocument {
    type Output = SubtitleCue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cues[index]
    }
}

fn compute_reach(cues: &[SubtitleCue]) -> Vec<u64> {
    cues.iter()
        .scan(0u64, |max_end, cue| {
            *max_end = (*max_end).max(cue.end_ms);
            Some(*max_end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(start: u64, end: u64, text: &str) -> SubtitleCue {
        SubtitleCue::new(start, end, text.to_string())
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SubtitleFormat::from_extension("SRT"), Some(SubtitleFormat::Srt));
        assert_eq!(SubtitleFormat::from_extension(".vtt"), Some(SubtitleFormat::Vtt));
        assert_eq!(SubtitleFormat::from_path("a/b/movie.ssa"), Some(SubtitleFormat::Ssa));
        assert_eq!(SubtitleFormat::from_extension("mkv"), None);
    }

    #[test]
    fn test_cue_clamps_inverted_interval() {
        let c = cue(5000, 1000, "x");
        assert_eq!(c.end_ms, 5000);
        assert_eq!(c.duration_ms(), 0);
        assert!(c.contains(5000));
    }

    #[test]
    fn test_document_sorts_stably() {
        let doc = SubtitleDocument::from_cues(
            SubtitleFormat::Srt,
            vec![cue(3000, 4000, "c"), cue(1000, 2000, "a"), cue(1000, 1500, "b")],
        );

        let texts: Vec<&str> = doc.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(doc.original_cues(), doc.cues());
        assert_eq!(doc.active_delay_ms(), 0);
    }

    #[test]
    fn test_document_duration_and_reach() {
        let doc = SubtitleDocument::from_cues(
            SubtitleFormat::Srt,
            vec![cue(1000, 9000, "long"), cue(2000, 3000, "short")],
        );

        assert_eq!(doc.duration_ms(), 8000);
        assert_eq!(doc.reach(), &[9000, 9000]);
        assert_eq!(doc[1].text, "short");
    }

    #[test]
    fn test_document_fixes_inverted_literal_cue() {
        let inverted = SubtitleCue {
            index: Some(1),
            start_ms: 5000,
            end_ms: 1000,
            text: "x".to_string(),
        };
        assert_eq!(inverted.duration_ms(), 0);

        let doc = SubtitleDocument::from_cues(SubtitleFormat::Srt, vec![inverted]);
        assert_eq!(doc[0].end_ms, 5000);
        assert_eq!(doc.original_cues()[0].end_ms, 5000);
        assert_eq!(doc.duration_ms(), 0);
    }

    #[test]
    fn test_empty_document() {
        let doc = SubtitleDocument::from_cues(SubtitleFormat::Vtt, Vec::new());
        assert!(doc.is_empty());
        assert_eq!(doc.duration_ms(), 0);
    }
}
