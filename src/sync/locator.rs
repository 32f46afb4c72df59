use crate::subtitle::models::{SubtitleCue, SubtitleDocument};

/// Индекс первого (по времени начала) субтитра, активного в position_ms.
///
/// Субтитры отсортированы по началу, а `reach` хранит максимальный конец
/// на префиксе, поэтому оба поиска двоичные даже при перекрытиях.
pub fn active_index_at(document: &SubtitleDocument, position_ms: u64) -> Option<usize> {
    let cues = document.cues();
    let reach = document.reach();

    // Субтитры, начавшиеся не позже позиции
    let started = cues.partition_point(|cue| cue.start_ms <= position_ms);
    // Первый субтитр, чей префикс дотягивается до позиции
    let first = reach.partition_point(|&max_end| max_end < position_ms);

    if first < started {
        Some(first)
    } else {
        None
    }
}

/// Субтитр, активный в момент position_ms (границы включительно)
pub fn active_cue_at(document: &SubtitleDocument, position_ms: u64) -> Option<&SubtitleCue> {
    active_index_at(document, position_ms).map(|i| &document.cues()[i])
}

/// Первый субтитр, начинающийся строго после position_ms
pub fn next_cue_after(document: &SubtitleDocument, position_ms: u64) -> Option<&SubtitleCue> {
    let cues = document.cues();
    let i = cues.partition_point(|cue| cue.start_ms <= position_ms);
    cues.get(i)
}

/// Последний субтитр, начинающийся строго до position_ms
pub fn previous_cue_before(document: &SubtitleDocument, position_ms: u64) -> Option<&SubtitleCue> {
    let cues = document.cues();
    let i = cues.partition_point(|cue| cue.start_ms < position_ms);
    i.checked_sub(1).map(|i| &cues[i])
}

/// Субтитры, пересекающие интервал [from_ms, to_ms]
pub fn cues_in_range(document: &SubtitleDocument, from_ms: u64, to_ms: u64) -> Vec<&SubtitleCue> {
    let cues = document.cues();
    let end = cues.partition_point(|cue| cue.start_ms <= to_ms);
    cues[..end].iter().filter(|cue| cue.end_ms >= from_ms).collect()
}

/// Курсор для периодического опроса позиции воспроизведения.
///
/// При последовательном воспроизведении проверяет запомненный субтитр
/// и следующий за ним, при перемотке или смене задержки
/// возвращается к двоичному поиску.
#[derive(Debug, Clone, Default)]
pub struct CueCursor {
    last_index: Option<usize>,
    revision: Option<u64>,
}

impl CueCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Забывает запомненную позицию
    pub fn reset(&mut self) {
        self.last_index = None;
        self.revision = None;
    }

    /// То же, что `active_cue_at`, но с кэшем последнего индекса
    pub fn cue_at<'a>(&mut self, document: &'a SubtitleDocument, position_ms: u64) -> Option<&'a SubtitleCue> {
        if self.revision != Some(document.revision()) {
            self.reset();
            self.revision = Some(document.revision());
        }

        let cached = self.last_index.and_then(|last| {
            [last, last + 1]
                .into_iter()
                .find(|&i| is_first_active(document, i, position_ms))
        });

        let index = match cached {
            Some(i) => Some(i),
            None => active_index_at(document, position_ms),
        };

        if index.is_some() {
            self.last_index = index;
        }
        index.map(|i| &document.cues()[i])
    }
}

/// Субтитр i активен и ни один более ранний не активен
fn is_first_active(document: &SubtitleDocument, i: usize, position_ms: u64) -> bool {
    let cues = document.cues();
    match cues.get(i) {
        Some(cue) if cue.contains(position_ms) => {
            i == 0 || document.reach()[i - 1] < position_ms
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::models::SubtitleFormat;
    use crate::sync::delay::apply_delay;

    fn cue(start: u64, end: u64, text: &str) -> SubtitleCue {
        SubtitleCue::new(start, end, text.to_string())
    }

    fn two_cues() -> SubtitleDocument {
        SubtitleDocument::from_cues(
            SubtitleFormat::Srt,
            vec![cue(1000, 3500, "Hello world"), cue(4000, 5000, "Second line")],
        )
    }

    #[test]
    fn test_boundaries() {
        let doc = two_cues();
        assert_eq!(active_cue_at(&doc, 1000).unwrap().text, "Hello world");
        assert_eq!(active_cue_at(&doc, 3500).unwrap().text, "Hello world");
        assert!(active_cue_at(&doc, 3600).is_none());
        assert!(active_cue_at(&doc, 0).is_none());
        assert!(active_cue_at(&doc, 999_999).is_none());
        assert_eq!(active_cue_at(&doc, 5000).unwrap().text, "Second line");
    }

    #[test]
    fn test_overlap_returns_earliest() {
        let doc = SubtitleDocument::from_cues(
            SubtitleFormat::Ass,
            vec![cue(0, 10_000, "long"), cue(2000, 3000, "short"), cue(2000, 2500, "tie")],
        );
        assert_eq!(active_cue_at(&doc, 2200).unwrap().text, "long");

        let doc = SubtitleDocument::from_cues(
            SubtitleFormat::Ass,
            vec![cue(0, 1000, "gone"), cue(2000, 3000, "a"), cue(2000, 2500, "b")],
        );
        assert_eq!(active_cue_at(&doc, 2200).unwrap().text, "a");
    }

    #[test]
    fn test_matches_linear_scan() {
        let doc = SubtitleDocument::from_cues(
            SubtitleFormat::Ass,
            vec![
                cue(0, 500, "a"),
                cue(400, 4000, "b"),
                cue(1000, 1200, "c"),
                cue(5000, 5000, "d"),
                cue(5000, 7000, "e"),
                cue(9000, 9500, "f"),
            ],
        );

        for position in (0..10_000).step_by(50) {
            let linear = doc.iter().find(|c| c.contains(position));
            assert_eq!(active_cue_at(&doc, position), linear, "position {}", position);
        }
    }

    #[test]
    fn test_empty_document() {
        let doc = SubtitleDocument::from_cues(SubtitleFormat::Srt, Vec::new());
        assert!(active_cue_at(&doc, 0).is_none());
        assert!(next_cue_after(&doc, 0).is_none());
        assert!(previous_cue_before(&doc, 0).is_none());
    }

    #[test]
    fn test_navigation() {
        let doc = two_cues();
        assert_eq!(next_cue_after(&doc, 0).unwrap().text, "Hello world");
        assert_eq!(next_cue_after(&doc, 1000).unwrap().text, "Second line");
        assert!(next_cue_after(&doc, 4000).is_none());
        assert_eq!(previous_cue_before(&doc, 4500).unwrap().text, "Second line");
        assert_eq!(previous_cue_before(&doc, 4000).unwrap().text, "Hello world");
        assert!(previous_cue_before(&doc, 1000).is_none());
    }

    #[test]
    fn test_cues_in_range() {
        let doc = two_cues();
        assert_eq!(cues_in_range(&doc, 0, 10_000).len(), 2);
        assert_eq!(cues_in_range(&doc, 3600, 3900).len(), 0);
        assert_eq!(cues_in_range(&doc, 3500, 4000).len(), 2);
    }

    #[test]
    fn test_cursor_follows_playback_and_delay() {
        let mut doc = two_cues();
        let mut cursor = CueCursor::new();

        for position in (0..6000).step_by(250) {
            assert_eq!(cursor.cue_at(&doc, position), active_cue_at(&doc, position));
        }

        apply_delay(&mut doc, 1000);
        assert_eq!(cursor.cue_at(&doc, 1500), None);
        assert_eq!(cursor.cue_at(&doc, 4500).unwrap().text, "Hello world");

        // Перемотка назад
        assert_eq!(cursor.cue_at(&doc, 2000).unwrap().text, "Hello world");
        assert_eq!(cursor.cue_at(&doc, 5500).unwrap().text, "Second line");
    }
}
