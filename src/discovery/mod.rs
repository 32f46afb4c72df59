pub mod language;
pub mod normalize;

pub use language::{detect_language, UNKNOWN_LANGUAGE};
pub use normalize::{normalize_name, strip_language_suffix};

use crate::config::SubtitleEngineConfig;
use crate::encoding::EncodingResolver;
use crate::logging::{log_debug, log_info, log_warning};
use crate::subtitle::detector::detect;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Расширения, которые рассматриваются как субтитры
pub const SUBTITLE_EXTENSIONS: [&str; 6] = ["srt", "ass", "ssa", "sub", "vtt", "txt"];

/// Подпапки рядом с видео, где обычно лежат субтитры
pub const SUBTITLE_SUBFOLDERS: [&str; 5] = ["Subs", "subs", "Subtitles", "subtitles", "Sub"];

pub const EXACT_MATCH_BONUS: i32 = 100;
pub const SUBSTRING_MATCH_BONUS: i32 = 50;
pub const LANGUAGE_BONUS: i32 = 20;
pub const FILE_SIZE_BONUS: i32 = 10;
pub const SRT_BONUS: i32 = 5;

const MIN_REASONABLE_SIZE: u64 = 1024;
const MAX_REASONABLE_SIZE: u64 = 1024 * 1024;

/// Найденный файл субтитров
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleCandidate {
    pub path: PathBuf,
    pub detected_language: String,
    pub relevance_score: i32,
}

/// Как имя субтитров совпало с именем видео
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Имена равны, в том числе после удаления суффикса языка
    Exact,
    /// Имя видео входит в имя субтитров
    Substring,
}

/// Сравнивает нормализованные имена видео и субтитров
pub fn match_names(video: &str, subtitle: &str) -> Option<NameMatch> {
    if video.is_empty() || subtitle.is_empty() {
        return None;
    }
    if video == subtitle || strip_language_suffix(subtitle) == Some(video) {
        return Some(NameMatch::Exact);
    }
    if subtitle.contains(video) {
        return Some(NameMatch::Substring);
    }
    None
}

fn has_subtitle_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUBTITLE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Проверка "это действительно субтитры": известное расширение
/// и распознаваемая структура содержимого
pub fn is_subtitle_file<P: AsRef<Path>>(path: P, config: &SubtitleEngineConfig) -> bool {
    let path = path.as_ref();
    if !has_subtitle_extension(path) {
        return false;
    }

    let resolver = EncodingResolver::new(config.preferred_encoding.clone());
    match resolver.resolve_and_read(path) {
        Ok((content, _)) => detect(&content).is_some(),
        Err(e) => {
            log_debug(&format!("Файл {:?} не прочитан: {}", path, e));
            false
        }
    }
}

/// Каталоги для поиска: каталог видео и известные подпапки
pub fn search_dirs<P: AsRef<Path>>(video_path: P, config: &SubtitleEngineConfig) -> Vec<PathBuf> {
    let video_dir = match video_path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut dirs = vec![video_dir.clone()];
    if config.search_subfolders {
        dirs.extend(
            SUBTITLE_SUBFOLDERS
                .iter()
                .map(|name| video_dir.join(name))
                .filter(|dir| dir.is_dir()),
        );
    }

    // На нечувствительных к регистру ФС Subs и subs - один каталог
    let mut seen = HashSet::new();
    dirs.into_iter()
        .filter(|dir| seen.insert(dir.canonicalize().unwrap_or_else(|_| dir.clone())))
        .collect()
}

/// Ищет субтитры для видео. Результат отсортирован по убыванию
/// релевантности, при равенстве сохраняется порядок обхода.
/// Отсутствие кандидатов - не ошибка, а пустой список.
pub fn find_candidates<P: AsRef<Path>>(video_path: P, config: &SubtitleEngineConfig) -> Vec<SubtitleCandidate> {
    let video_path = video_path.as_ref();
    let video_stem = stem_of(video_path);
    let video_name = normalize_name(&video_stem);
    let video_name = if video_name.is_empty() {
        video_stem.to_lowercase()
    } else {
        video_name
    };

    log_debug(&format!("Поиск субтитров для {:?} (имя '{}')", video_path, video_name));

    let mut candidates = Vec::new();
    for dir in search_dirs(video_path, config) {
        let entries = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log_warning(&format!("Ошибка чтения каталога {:?}: {}", dir, e));
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !has_subtitle_extension(path) || path == video_path {
                continue;
            }

            if let Some(candidate) = score_candidate(path, &video_name, config) {
                candidates.push(candidate);
            }
        }
    }

    candidates.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    log_info(&format!("Найдено {} файлов субтитров для {:?}", candidates.len(), video_path));
    candidates
}

fn score_candidate(path: &Path, video_name: &str, config: &SubtitleEngineConfig) -> Option<SubtitleCandidate> {
    let subtitle_name = normalize_name(&stem_of(path));
    let name_match = match_names(video_name, &subtitle_name)?;

    if !is_subtitle_file(path, config) {
        log_debug(&format!("Файл {:?} не похож на субтитры, пропуск", path));
        return None;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let detected_language = detect_language(&file_name);

    let mut score = match name_match {
        NameMatch::Exact => EXACT_MATCH_BONUS,
        NameMatch::Substring => SUBSTRING_MATCH_BONUS,
    };
    if detected_language.eq_ignore_ascii_case(config.bonus_language()) {
        score += LANGUAGE_BONUS;
    }
    let size = path.metadata().map(|m| m.len()).unwrap_or(0);
    if (MIN_REASONABLE_SIZE..=MAX_REASONABLE_SIZE).contains(&size) {
        score += FILE_SIZE_BONUS;
    }
    let is_srt = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("srt"))
        .unwrap_or(false);
    if is_srt {
        score += SRT_BONUS;
    }

    Some(SubtitleCandidate {
        path: path.to_path_buf(),
        detected_language,
        relevance_score: score,
    })
}
