use std::path::{Path, PathBuf};

use crate::{ConvertError, ConvertResult};

/// Потоков по умолчанию не больше этого числа.
pub const MAX_DEFAULT_JOBS: usize = 8;

/// Формат выходных файлов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Один `.fits` на входной файл.
    Fits,
    /// Пара `_header.csv` + `_sweep.csv`.
    Csv,
}

/// Конфигурация пакетной конвертации.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Формат выходных файлов
    pub output_format: OutputFormat,
    /// Тайловое GZIP сжатие изображения (только FITS)
    pub compress: bool,
    /// Каталог для результатов (None = рядом с входным файлом)
    pub output_dir: Option<PathBuf>,
    /// Число рабочих потоков
    pub jobs: usize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ConvertConfig {
    /// Проверяет согласованность параметров до начала работы.
    pub fn validate(&self) -> ConvertResult<()> {
        if self.jobs == 0 {
            return Err(ConvertError::Config("jobs must be at least 1".into()));
        }

        if let Some(dir) = &self.output_dir {
            if !dir.is_dir() {
                return Err(ConvertError::Config(format!(
                    "output directory {} does not exist",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Путь выходного файла для `input` с суффиксом вместо расширения.
    pub fn output_path(
        &self,
        input: &Path,
        suffix: &str,
    ) -> PathBuf {
        output_path(input, self.output_dir.as_deref(), suffix)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для OutputFormat, ConvertConfig
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Fits => write!(f, "fits"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fits" | "fit" => Ok(OutputFormat::Fits),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: '{s}'. Use: fits, csv")),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Fits,
            compress: true,
            output_dir: None,
            jobs: default_jobs(),
        }
    }
}

/// Число доступных CPU, но не больше [`MAX_DEFAULT_JOBS`].
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_DEFAULT_JOBS)
}

/// Строит путь выходного файла: последнее расширение входа отбрасывается,
/// к остатку имени добавляется `suffix`.
///
/// # Примеры
/// ```
/// use std::path::Path;
/// use shr_convert::config::output_path;
///
/// let out = output_path(Path::new("data/run.01.shr"), None, ".fits");
/// assert_eq!(out, Path::new("data/run.01.fits"));
/// ```
pub fn output_path(
    input: &Path,
    output_dir: Option<&Path>,
    suffix: &str,
) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}{suffix}");

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
