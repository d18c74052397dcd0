use std::path::{Path, PathBuf};

use serde::Serialize;
use shr_core::{FileHeader, FileHeaderExt, ShrFile};

use crate::{
    fits::{convert_to_fits, format_timestamp},
    tabular::convert_to_csv,
    ConvertConfig, ConvertResult, OutputFormat,
};

/// Конвертирует один SHR файл в формат из конфигурации.
///
/// Файл без свипов даёт ошибку [`ConvertError::is_empty_sweep_set`], при этом
/// ничего не записывается.
///
/// [`ConvertError::is_empty_sweep_set`]: crate::ConvertError::is_empty_sweep_set
pub fn convert_file(
    input: &Path,
    config: &ConvertConfig,
) -> ConvertResult<Vec<PathBuf>> {
    let shr = ShrFile::open(input)?;
    shr.ensure_sweeps()?;

    match config.output_format {
        OutputFormat::Fits => Ok(vec![convert_to_fits(input, &shr, config)?]),
        OutputFormat::Csv => convert_to_csv(input, &shr, config),
    }
}

/// Окно записи в человекочитаемом виде.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionReport {
    pub start: String,
    pub end: String,
    pub sweep_interval_secs: f64,
    pub duration_secs: f64,
}

/// Сводка по одному файлу для команды `info`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    pub file_size: u64,
    /// Размер по заголовку (None при переполнении)
    pub expected_size: Option<u64>,
    pub header: FileHeader,
    pub sweeps: usize,
    pub overflowed_sweeps: usize,
    /// Только для файлов со свипами
    pub acquisition: Option<AcquisitionReport>,
    /// Частоты первого и последнего бина, Гц
    pub frequency_range_hz: Option<(f64, f64)>,
}

impl FileReport {
    pub fn from_path(path: &Path) -> ConvertResult<Self> {
        let file_size = std::fs::metadata(path)?.len();
        let shr = ShrFile::open(path)?;

        let acquisition = if shr.has_sweeps() {
            let window = shr.acquisition_window()?;
            Some(AcquisitionReport {
                start: format_timestamp(window.start_ms)?,
                end: format_timestamp(window.end_ms)?,
                sweep_interval_secs: window.sweep_interval_secs(),
                duration_secs: window.duration_ms() as f64 / 1e3,
            })
        } else {
            None
        };

        let frequency_range_hz = match shr.header.sweep_length {
            0 => None,
            n => Some((
                shr.header.first_bin_freq_hz,
                shr.header.bin_frequency(n as usize - 1),
            )),
        };

        Ok(Self {
            path: path.to_path_buf(),
            file_size,
            expected_size: shr.header.expected_file_size(),
            sweeps: shr.sweeps.len(),
            overflowed_sweeps: shr.overflow_count(),
            header: shr.header,
            acquisition,
            frequency_range_hz,
        })
    }
}

impl std::fmt::Display for FileReport {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let h = &self.header;

        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  File          : {}", self.path.display())?;
        writeln!(f, "  Title         : {}", h.title)?;
        writeln!(f, "  Version       : {} (signature 0x{:04X})", h.version, h.signature)?;
        writeln!(
            f,
            "  Sweeps        : {} x {} bins ({} overflowed)",
            self.sweeps, h.sweep_length, self.overflowed_sweeps
        )?;
        if let Some((lo, hi)) = self.frequency_range_hz {
            writeln!(
                f,
                "  Frequency     : {:.6} - {:.6} MHz (bin {:.3} kHz)",
                lo / 1e6,
                hi / 1e6,
                h.bin_size_hz / 1e3
            )?;
        }
        writeln!(
            f,
            "  RBW / VBW     : {:.3} / {:.3} kHz",
            h.rbw_hz / 1e3,
            h.vbw_hz / 1e3
        )?;
        writeln!(f, "  Amplitude     : {}", h.amplitude_unit())?;
        match &self.acquisition {
            Some(a) => {
                writeln!(f, "  Start         : {}", a.start)?;
                writeln!(f, "  End           : {}", a.end)?;
                writeln!(f, "  Sweep interval: {:.3} s", a.sweep_interval_secs)?;
            }
            None => writeln!(f, "  Acquisition   : no sweeps")?,
        }
        match self.expected_size {
            Some(expected) if expected != self.file_size => writeln!(
                f,
                "  Size          : {} bytes (header expects {expected})",
                self.file_size
            )?,
            _ => writeln!(f, "  Size          : {} bytes", self.file_size)?,
        }
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
