use crate::discovery::language::is_language_token;
use once_cell::sync::Lazy;
use regex::Regex;

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}").unwrap());

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.\-_\s]+").unwrap());

static NOISE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{3,4}[pi]|[xh]26[45]|\d{1,2}bit|ddp?\d*|dts\w*|aac\d*|ac3|atmos|\d+ch)$").unwrap()
});

/// Метки качества, источника, кодека и издания
const NOISE_TOKENS: &[&str] = &[
    "4k", "uhd", "hdr", "hdr10", "dv", "sdr",
    "bluray", "blu", "ray", "bdrip", "brrip", "bdremux", "remux", "web", "dl", "webdl", "webrip",
    "hdtv", "dvdrip", "dvdscr", "hdrip", "hdcam", "cam", "ts", "amzn", "nf", "dsnp", "hmax",
    "x264", "x265", "h264", "h265", "hevc", "avc", "xvid", "divx", "av1", "vp9", "mp3", "flac",
    "extended", "unrated", "uncut", "directors", "cut", "remastered", "proper", "repack",
    "imax", "limited", "internal", "dubbed", "subbed", "multi",
];

fn is_noise(token: &str) -> bool {
    NOISE_TOKENS.contains(&token) || NOISE_PATTERN.is_match(token)
}

/// Нормализует имя файла без расширения для сравнения видео и субтитров.
///
/// Убирает группы в скобках, приводит разделители к пробелу и обрезает
/// имя на первой метке качества/кодека: всё после неё, включая
/// название релиз-группы, считается шумом.
pub fn normalize_name(stem: &str) -> String {
    let lower = stem.to_lowercase();
    let without_groups = BRACKETED.replace_all(&lower, " ");

    let mut tokens: Vec<&str> = Vec::new();
    for token in SEPARATORS.split(&without_groups).filter(|t| !t.is_empty()) {
        if is_noise(token) {
            if tokens.is_empty() {
                continue;
            }
            break;
        }
        tokens.push(token);
    }

    tokens.join(" ")
}

/// Убирает последний токен, если это код или название языка
pub fn strip_language_suffix(normalized: &str) -> Option<&str> {
    let (rest, last) = normalized.rsplit_once(' ')?;
    let is_two_letter = last.len() == 2 && last.chars().all(|c| c.is_ascii_alphabetic());

    if is_two_letter || is_language_token(last) {
        Some(rest)
    } else {
        None
    }
}
