use thiserror::Error;

/// Результат для операций SHR
pub type ShrResult<T> = std::result::Result<T, ShrError>;

/// Типы ошибок разбора SHR файлов.
#[derive(Debug, Error)]
pub enum ShrError {
    /// Байт в источнике меньше, чем требует фиксированная раскладка
    #[error("Truncated read: expected {expected} bytes, found {found}")]
    TruncatedRead { expected: usize, found: usize },

    /// Запись не удалось разобрать (усечение, переполнение размеров)
    #[error("Malformed {record}: {reason}")]
    MalformedHeader {
        record: &'static str,
        reason: String,
    },

    /// В файле нет свипов: не ошибка, файл нужно пропустить
    #[error("No sweep data: sweep_count={sweep_count}, sweep_length={sweep_length}")]
    EmptySweepSet { sweep_count: u32, sweep_length: u32 },

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShrError {
    /// Удобные конструкторы
    pub fn malformed<S: ToString>(
        record: &'static str,
        reason: S,
    ) -> Self {
        Self::MalformedHeader {
            record,
            reason: reason.to_string(),
        }
    }

    pub fn truncated(
        expected: usize,
        found: usize,
    ) -> Self {
        Self::TruncatedRead { expected, found }
    }

    /// Переупаковывает ошибку чтения записи `record` в `MalformedHeader`.
    ///
    /// Ошибки ввода/вывода, не связанные с концом файла, и уже
    /// переупакованные ошибки возвращаются как есть.
    pub fn into_malformed(
        self,
        record: &'static str,
    ) -> Self {
        match self {
            e @ ShrError::TruncatedRead { .. } => Self::malformed(record, e),
            ShrError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Self::malformed(record, e)
            }
            other => other,
        }
    }

    /// `true` для информационной ошибки «нет данных».
    pub fn is_empty_sweep_set(&self) -> bool {
        matches!(self, ShrError::EmptySweepSet { .. })
    }
}
