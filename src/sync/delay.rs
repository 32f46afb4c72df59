//! Сдвиг субтитров по времени.
//!
//! Задержка всегда пересчитывается от исходных субтитров документа,
//! поэтому последовательные изменения не накапливают ошибку округления
//! и сброс в 0 возвращает исходные значения точно.

use crate::logging::log_debug;
use crate::subtitle::models::{SubtitleCue, SubtitleDocument};

/// Максимальная задержка по модулю, 1 час
pub const MAX_DELAY_MS: i64 = 3_600_000;

/// Быстрые шаги подстройки из интерфейса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayStep {
    Back5s,
    Back1s,
    Back100ms,
    Forward100ms,
    Forward1s,
    Forward5s,
}

impl DelayStep {
    pub fn as_ms(&self) -> i64 {
        match self {
            Self::Back5s => -5000,
            Self::Back1s => -1000,
            Self::Back100ms => -100,
            Self::Forward100ms => 100,
            Self::Forward1s => 1000,
            Self::Forward5s => 5000,
        }
    }
}

/// Ограничивает задержку диапазоном [-1 ч, 1 ч]
pub fn clamp_delay(delay_ms: i64) -> i64 {
    delay_ms.clamp(-MAX_DELAY_MS, MAX_DELAY_MS)
}

// Время субтитра может занимать весь диапазон u64
fn shift_ms(value: u64, delay_ms: i64) -> u64 {
    let shifted = i128::from(value) + i128::from(delay_ms);
    shifted.clamp(0, i128::from(u64::MAX)) as u64
}

/// Сдвигает один субтитр. Время не уходит ниже нуля, конец не раньше начала.
pub fn shift_cue(cue: &SubtitleCue, delay_ms: i64) -> SubtitleCue {
    let start_ms = shift_ms(cue.start_ms, delay_ms);
    let end_ms = shift_ms(cue.end_ms, delay_ms).max(start_ms);

    SubtitleCue {
        start_ms,
        end_ms,
        ..cue.clone()
    }
}

/// Устанавливает абсолютную задержку относительно исходного разбора.
/// Возвращает фактически примененное значение после ограничения.
pub fn set_delay(document: &mut SubtitleDocument, delay_ms: i64) -> i64 {
    let delay_ms = clamp_delay(delay_ms);

    // Все субтитры пересчитываются в новый вектор и подменяются разом
    let shifted: Vec<SubtitleCue> = document
        .original_cues()
        .iter()
        .map(|cue| shift_cue(cue, delay_ms))
        .collect();
    document.replace_cues(shifted, delay_ms);

    log_debug(&format!("Задержка субтитров установлена: {} мс", delay_ms));
    delay_ms
}

/// Добавляет `delta_ms` к текущей суммарной задержке.
///
/// `apply_delay(apply_delay(doc, 500), -500)` возвращает исходные значения,
/// так как сдвиг считается от исходных субтитров.
pub fn apply_delay(document: &mut SubtitleDocument, delta_ms: i64) -> i64 {
    let target = document.active_delay_ms().saturating_add(clamp_delay(delta_ms));
    set_delay(document, target)
}

/// Быстрая подстройка на один шаг
pub fn nudge_delay(document: &mut SubtitleDocument, step: DelayStep) -> i64 {
    apply_delay(document, step.as_ms())
}

/// Сбрасывает задержку в 0
pub fn reset_delay(document: &mut SubtitleDocument) {
    set_delay(document, 0);
}
