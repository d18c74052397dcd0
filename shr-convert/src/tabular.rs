//! Выгрузка в CSV: заголовок файла и таблица свипов.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::info;
use shr_core::{FieldValue, ShrFile};

use crate::{ConvertConfig, ConvertResult};

/// Заголовок первой колонки таблицы свипов.
pub const SWEEP_NUMBER_COLUMN: &str = "Sweep Number";

/// Две строки: имена полей заголовка и их значения.
pub fn write_header_csv<W: Write>(
    out: W,
    shr: &ShrFile,
) -> ConvertResult<()> {
    let fields = shr.header.fields();
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(fields.iter().map(|(name, _)| *name))?;
    writer.write_record(fields.iter().map(|(_, value)| value.to_string()))?;
    writer.flush()?;

    Ok(())
}

/// Таблица свипов: номер, поля заголовка свипа (без `reserved`), затем по
/// колонке на каждую частоту бина.
pub fn write_sweep_csv<W: Write>(
    out: W,
    shr: &ShrFile,
) -> ConvertResult<()> {
    let mut writer = csv::Writer::from_writer(out);

    let sweep_columns: Vec<&str> = shr
        .sweep_headers
        .first()
        .map(|s| s.fields())
        .unwrap_or_default()
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| !name.contains("reserved"))
        .collect();

    let mut columns: Vec<String> =
        Vec::with_capacity(1 + sweep_columns.len() + shr.header.sweep_length as usize);
    columns.push(SWEEP_NUMBER_COLUMN.to_string());
    columns.extend(sweep_columns.iter().map(|s| s.to_string()));
    columns.extend(
        shr.frequency_axis()
            .into_iter()
            .map(|hz| FieldValue::F64(hz).to_string()),
    );
    writer.write_record(&columns)?;

    let mut record = Vec::with_capacity(columns.len());
    for (i, (sweep, row)) in shr.sweep_headers.iter().zip(&shr.sweeps).enumerate() {
        record.clear();
        record.push((i + 1).to_string());
        record.extend(
            sweep
                .fields()
                .into_iter()
                .filter(|(name, _)| !name.contains("reserved"))
                .map(|(_, value)| value.to_string()),
        );
        record.extend(row.iter().map(|&v| FieldValue::F32(v).to_string()));

        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Конвертирует разобранный файл в `<stem>_header.csv` и `<stem>_sweep.csv`.
pub fn convert_to_csv(
    input: &Path,
    shr: &ShrFile,
    config: &ConvertConfig,
) -> ConvertResult<Vec<PathBuf>> {
    shr.ensure_sweeps()?;

    let header_path = config.output_path(input, "_header.csv");
    let sweep_path = config.output_path(input, "_sweep.csv");

    write_header_csv(std::fs::File::create(&header_path)?, shr)?;
    write_sweep_csv(std::fs::File::create(&sweep_path)?, shr)?;

    info!(
        "{} -> {}, {} ({} sweeps)",
        input.display(),
        header_path.display(),
        sweep_path.display(),
        shr.sweeps.len()
    );

    Ok(vec![header_path, sweep_path])
}
