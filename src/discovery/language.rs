//! Определение языка субтитров по имени файла.

use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

pub const UNKNOWN_LANGUAGE: &str = "Unknown";

static TOKEN_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.\-_\s\[\]()]+").unwrap());

/// Подстроки в национальной письменности
const NATIVE_SCRIPT: &[(&str, &str)] = &[
    ("العربية", "Arabic"),
    ("عربي", "Arabic"),
    ("فارسی", "Persian"),
    ("فارسي", "Persian"),
    ("עברית", "Hebrew"),
    ("中文", "Chinese"),
    ("简体", "Chinese"),
    ("繁體", "Chinese"),
    ("日本語", "Japanese"),
    ("한국어", "Korean"),
    ("हिन्दी", "Hindi"),
    ("हिंदी", "Hindi"),
    ("اردو", "Urdu"),
];

/// Названия языков (латиницей, в нижнем регистре)
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("english", "English"),
    ("arabic", "Arabic"),
    ("french", "French"),
    ("german", "German"),
    ("spanish", "Spanish"),
    ("italian", "Italian"),
    ("portuguese", "Portuguese"),
    ("russian", "Russian"),
    ("turkish", "Turkish"),
    ("persian", "Persian"),
    ("farsi", "Persian"),
    ("hebrew", "Hebrew"),
    ("chinese", "Chinese"),
    ("japanese", "Japanese"),
    ("korean", "Korean"),
    ("hindi", "Hindi"),
    ("urdu", "Urdu"),
    ("dutch", "Dutch"),
    ("polish", "Polish"),
    ("greek", "Greek"),
    ("swedish", "Swedish"),
    ("romanian", "Romanian"),
    ("indonesian", "Indonesian"),
];

/// Коды ISO 639-1 и 639-2, встречающиеся как отдельный токен (".en.", "_ara.")
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("en", "English"), ("eng", "English"),
    ("ar", "Arabic"), ("ara", "Arabic"),
    ("fr", "French"), ("fre", "French"), ("fra", "French"),
    ("de", "German"), ("ger", "German"), ("deu", "German"),
    ("es", "Spanish"), ("spa", "Spanish"),
    ("it", "Italian"), ("ita", "Italian"),
    ("pt", "Portuguese"), ("por", "Portuguese"),
    ("ru", "Russian"), ("rus", "Russian"),
    ("tr", "Turkish"), ("tur", "Turkish"),
    ("fa", "Persian"), ("per", "Persian"), ("fas", "Persian"),
    ("he", "Hebrew"), ("heb", "Hebrew"),
    ("zh", "Chinese"), ("chi", "Chinese"), ("zho", "Chinese"), ("chs", "Chinese"), ("cht", "Chinese"),
    ("ja", "Japanese"), ("jpn", "Japanese"),
    ("ko", "Korean"), ("kor", "Korean"),
    ("hi", "Hindi"), ("hin", "Hindi"),
    ("ur", "Urdu"), ("urd", "Urdu"),
    ("nl", "Dutch"), ("dut", "Dutch"), ("nld", "Dutch"),
    ("pl", "Polish"), ("pol", "Polish"),
    ("el", "Greek"), ("gre", "Greek"), ("ell", "Greek"),
    ("sv", "Swedish"), ("swe", "Swedish"),
    ("ro", "Romanian"), ("rum", "Romanian"), ("ron", "Romanian"),
    ("id", "Indonesian"), ("ind", "Indonesian"),
];

/// Является ли токен кодом или названием языка из таблиц
pub fn is_language_token(token: &str) -> bool {
    let token = token.to_lowercase();
    LANGUAGE_CODES.iter().any(|(code, _)| *code == token)
        || LANGUAGE_NAMES.iter().any(|(name, _)| *name == token)
}

/// Определяет язык по имени файла, "Unknown" если ничего не найдено.
///
/// Порядок: национальная письменность, название языка, код как
/// отдельный токен (ближе к расширению - приоритетнее), затем любой
/// двухбуквенный код ISO 639-1 непосредственно перед расширением.
pub fn detect_language(file_name: &str) -> String {
    if let Some((_, language)) = NATIVE_SCRIPT.iter().find(|(marker, _)| file_name.contains(marker)) {
        return language.to_string();
    }

    let lower = file_name.to_lowercase();
    if let Some((_, language)) = LANGUAGE_NAMES.iter().find(|(name, _)| lower.contains(name)) {
        return language.to_string();
    }

    let tokens: Vec<&str> = TOKEN_SEPARATORS.split(&lower).filter(|t| !t.is_empty()).collect();

    // Первый токен - начало названия ("It", "Die Hard"), его не трогаем
    let candidates = tokens.iter().skip(1).rev();
    for token in candidates {
        if let Some((_, language)) = LANGUAGE_CODES.iter().find(|(code, _)| code == token) {
            return language.to_string();
        }
    }

    // Токен перед расширением, например "movie.sv.srt" или "movie.nb.srt"
    if tokens.len() >= 3 {
        let before_extension = tokens[tokens.len() - 2];
        if before_extension.len() == 2 {
            if let Some(language) = Language::from_639_1(before_extension) {
                return language.to_name().to_string();
            }
        }
    }

    UNKNOWN_LANGUAGE.to_string()
}
