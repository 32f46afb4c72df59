use thiserror::Error;

/// Типы ошибок, которые может вернуть движок субтитров
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Ошибка ввода/вывода
    Io,
    /// Пустой файл
    EmptyFile,
    /// Формат субтитров не распознан
    UnrecognizedFormat,
    /// В файле нет пригодных субтитров
    NoCues,
    /// Ошибка конфигурации
    Config,
}

/// Ошибки движка субтитров
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ошибка ввода/вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Пустой файл: {0}")]
    EmptyFile(String),

    #[error("Формат субтитров не распознан: {0}")]
    UnrecognizedFormat(String),

    #[error("Нет пригодных субтитров: {0}")]
    NoCues(String),

    #[error("Ошибка конфигурации: {0}")]
    Config(String),

    #[error("Ошибка сериализации JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ошибка логирования: {0}")]
    LoggedError(String),
}

impl Error {
    /// Создает новую ошибку указанного типа с сообщением
    pub fn new(error_type: ErrorType, message: &str) -> Self {
        match error_type {
            ErrorType::Io => Self::Io(std::io::Error::new(std::io::ErrorKind::Other, message)),
            ErrorType::EmptyFile => Self::EmptyFile(message.to_string()),
            ErrorType::UnrecognizedFormat => Self::UnrecognizedFormat(message.to_string()),
            ErrorType::NoCues => Self::NoCues(message.to_string()),
            ErrorType::Config => Self::Config(message.to_string()),
        }
    }

    /// Возвращает тип ошибки
    pub fn error_type(&self) -> Option<ErrorType> {
        match self {
            Self::Io(_) => Some(ErrorType::Io),
            Self::EmptyFile(_) => Some(ErrorType::EmptyFile),
            Self::UnrecognizedFormat(_) => Some(ErrorType::UnrecognizedFormat),
            Self::NoCues(_) => Some(ErrorType::NoCues),
            Self::Config(_) | Self::Json(_) => Some(ErrorType::Config),
            Self::LoggedError(_) => None,
        }
    }
}

/// Результат с обработкой ошибок
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_maps_error_type() {
        let err = Error::new(ErrorType::NoCues, "movie.srt");
        assert!(matches!(err, Error::NoCues(ref msg) if msg == "movie.srt"));
        assert_eq!(err.error_type(), Some(ErrorType::NoCues));

        let err = Error::new(ErrorType::Io, "broken pipe");
        assert_eq!(err.error_type(), Some(ErrorType::Io));
    }

    #[test]
    fn test_every_error_type_round_trips() {
        let kinds = [
            ErrorType::Io,
            ErrorType::EmptyFile,
            ErrorType::UnrecognizedFormat,
            ErrorType::NoCues,
            ErrorType::Config,
        ];
        for kind in kinds {
            assert_eq!(Error::new(kind, "x").error_type(), Some(kind));
        }
    }

    #[test]
    fn test_display_contains_message() {
        let err = Error::new(ErrorType::EmptyFile, "empty.srt");
        assert!(err.to_string().contains("empty.srt"));
    }
}
