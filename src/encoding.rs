use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, log_warning};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252, WINDOWS_1256};
use std::fs;
use std::path::Path;

/// Порядок попыток после предпочитаемой кодировки
pub const FALLBACK_ENCODINGS: [&str; 5] = ["utf-8", "latin-1", "cp1252", "cp1256", "iso-8859-1"];

/// Имя кодировки для последней, всегда успешной попытки
pub const LOSSY_UTF8: &str = "utf-8-lossy";

/// Подбирает кодировку файла субтитров по списку приоритетов.
///
/// Каждая попытка строгая: ошибка декодирования переводит к следующей.
/// Последняя попытка - UTF-8 с заменой неверных байтов, она не может
/// завершиться ошибкой.
pub struct EncodingResolver {
    preferred: Option<String>,
}

impl EncodingResolver {
    pub fn new(preferred: Option<String>) -> Self {
        Self { preferred }
    }

    /// Кодировки в порядке попыток, без повторов
    pub fn attempt_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::with_capacity(FALLBACK_ENCODINGS.len() + 1);
        let candidates = self
            .preferred
            .iter()
            .map(|label| label.trim().to_ascii_lowercase())
            .filter(|label| !label.is_empty())
            .chain(FALLBACK_ENCODINGS.iter().map(|label| label.to_string()));

        for label in candidates {
            if !order.contains(&label) {
                order.push(label);
            }
        }
        order
    }

    /// Читает файл и декодирует его. Ошибка только для
    /// отсутствующего, нечитаемого или пустого файла.
    pub fn resolve_and_read<P: AsRef<Path>>(&self, path: P) -> Result<(String, String)> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;

        if bytes.is_empty() {
            return Err(Error::new(ErrorType::EmptyFile, &path.display().to_string()));
        }

        let (content, encoding) = self.decode(&bytes);
        log_debug(&format!("Файл {:?} прочитан в кодировке {}", path, encoding));
        Ok((content, encoding))
    }

    /// Декодирует байты. Всегда успешно.
    pub fn decode(&self, bytes: &[u8]) -> (String, String) {
        if let Some((content, encoding)) = decode_utf16_bom(bytes) {
            return (content, encoding.to_string());
        }

        for label in self.attempt_order() {
            match decode_strict(bytes, &label) {
                Some(content) => return (content, label),
                None => log_debug(&format!("Кодировка {} не подошла", label)),
            }
        }

        log_warning("Ни одна кодировка не подошла, неверные байты будут заменены");
        let content = String::from_utf8_lossy(strip_utf8_bom(bytes)).into_owned();
        (content, LOSSY_UTF8.to_string())
    }
}

impl Default for EncodingResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

fn decode_utf16_bom(bytes: &[u8]) -> Option<(String, &'static str)> {
    let (encoding, bom_length) = Encoding::for_bom(bytes)?;
    let name = if encoding == UTF_16LE {
        "utf-16le"
    } else if encoding == UTF_16BE {
        "utf-16be"
    } else {
        return None;
    };

    let (content, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
    Some((content.into_owned(), name))
}

/// Строгое декодирование, `None` при любом неверном байте
pub fn decode_strict(bytes: &[u8], label: &str) -> Option<String> {
    match label {
        "utf-8" | "utf8" | "utf-8-sig" => std::str::from_utf8(strip_utf8_bom(bytes))
            .ok()
            .map(str::to_string),
        // ISO-8859-1 отображает каждый байт в U+0000..U+00FF
        "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => {
            Some(bytes.iter().map(|&b| b as char).collect())
        }
        "cp1252" | "windows-1252" => decode_with(WINDOWS_1252, bytes),
        "cp1256" | "windows-1256" => decode_with(WINDOWS_1256, bytes),
        other => match Encoding::for_label(other.as_bytes()) {
            Some(encoding) if encoding == UTF_8 => decode_strict(bytes, "utf-8"),
            Some(encoding) => decode_with(encoding, bytes),
            None => {
                log_warning(&format!("Неизвестная кодировка: {}", other));
                None
            }
        },
    }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|content| content.into_owned())
}
