use crate::error::Result;
use crate::logging::log_info;
use crate::subtitle::models::SubtitleDocument;
use crate::subtitle::timestamp::format_srt_clock;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Сериализует текущие (сдвинутые) субтитры документа в SRT.
/// Блоки перенумеровываются с 1.
pub fn to_srt_string(document: &SubtitleDocument) -> String {
    let mut output = String::new();

    for (i, cue) in document.iter().enumerate() {
        // write! в String не возвращает ошибок
        let _ = writeln!(output, "{}", i + 1);
        let _ = writeln!(
            output,
            "{} --> {}",
            format_srt_clock(cue.start_ms),
            format_srt_clock(cue.end_ms)
        );
        let _ = writeln!(output, "{}", cue.text);
        output.push('\n');
    }

    output
}

/// Сохраняет документ в файл SRT в UTF-8
pub fn save_as_srt<P: AsRef<Path>>(document: &SubtitleDocument, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_srt_string(document))?;
    log_info(&format!(
        "Сохранено {} субтитров в {:?} (задержка {} мс)",
        document.len(),
        path,
        document.active_delay_ms()
    ));
    Ok(())
}
