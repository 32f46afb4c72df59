pub mod detector;
pub mod models;
pub mod timestamp;
pub mod writer;

pub use detector::detect;
pub use models::{SubtitleCue, SubtitleDocument, SubtitleFormat};
pub use timestamp::{
    format_ms_to_srt_timestamp, format_srt_clock, parse_ass_timestamp, parse_srt_timestamp,
    parse_vtt_timestamp,
};
pub use writer::{save_as_srt, to_srt_string};

use std::borrow::Cow;

/// Убирает BOM и приводит переводы строк к `\n`
pub fn normalize_newlines(content: &str) -> Cow<'_, str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}
