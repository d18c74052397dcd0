use shr_types::ShrError;
use thiserror::Error;

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Ошибка разбора SHR
    #[error("SHR error: {0}")]
    Shr(#[from] ShrError),

    /// Ошибка чтения/записи файла
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка записи CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Ошибка сериализации отчёта
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Данные не помещаются в структуры FITS
    #[error("FITS error: {0}")]
    Fits(String),

    /// Некорректная конфигурация
    #[error("Config error: {0}")]
    Config(String),
}

impl ConvertError {
    /// `true`, если файл просто не содержит свипов.
    pub fn is_empty_sweep_set(&self) -> bool {
        matches!(self, ConvertError::Shr(e) if e.is_empty_sweep_set())
    }
}
