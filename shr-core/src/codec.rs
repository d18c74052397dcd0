//! Декодеры SHR поверх открытого дескриптора.
//!
//! Каждая операция сохраняет позицию курсора и восстанавливает её перед
//! возвратом, поэтому вызовы можно чередовать на одном дескрипторе в любом
//! порядке.

use std::io::{Read, Seek, SeekFrom};

use log::debug;
use shr_types::{FileHeader, ShrError, ShrResult, SweepHeader};

use crate::{
    binary::{read_exact_at, skip_bytes, with_restored_cursor},
    format::{decode_samples, FileHeaderExt, SweepHeaderExt, FILE_HEADER_SIZE, SWEEP_HEADER_SIZE},
};

// Ёмкость, выделяемая заранее; дальше вектор растёт по мере чтения, чтобы
// повреждённый sweepCount не приводил к огромной аллокации.
const PREALLOC_SWEEPS: usize = 4096;

/// Читает заголовок файла со смещения 0 независимо от текущей позиции.
pub fn decode_file_header<R: Read + Seek>(handle: &mut R) -> ShrResult<FileHeader> {
    with_restored_cursor(handle, |h| {
        let buf = read_exact_at(h, Some(0), FILE_HEADER_SIZE)
            .map_err(|e| e.into_malformed("file header"))?;
        let header = FileHeader::deserialize(&buf).map_err(|e| e.into_malformed("file header"))?;

        debug!(
            "file header: sweeps={} x {} bins, data_offset={}, title={:?}",
            header.sweep_count, header.sweep_length, header.data_offset, header.title
        );

        Ok(header)
    })
}

/// Читает `sweepCount` заголовков свипов, пропуская блоки выборок.
pub fn decode_sweep_headers<R: Read + Seek>(
    handle: &mut R,
    header: &FileHeader,
) -> ShrResult<Vec<SweepHeader>> {
    let payload = header.sweep_payload_size();

    with_restored_cursor(handle, |h| {
        h.seek(SeekFrom::Start(header.data_offset))?;

        let count = header.sweep_count as usize;
        let mut sweeps = Vec::with_capacity(count.min(PREALLOC_SWEEPS));

        for _ in 0..count {
            let buf = read_exact_at(h, None, SWEEP_HEADER_SIZE)
                .map_err(|e| e.into_malformed("sweep header"))?;
            sweeps.push(SweepHeader::deserialize(&buf)?);

            skip_bytes(h, payload)?;
        }

        debug!("decoded {} sweep headers", sweeps.len());

        Ok(sweeps)
    })
}

/// Читает матрицу выборок: `sweepCount` строк по `sweepLength` значений.
pub fn decode_sweep_samples<R: Read + Seek>(
    handle: &mut R,
    header: &FileHeader,
) -> ShrResult<Vec<Vec<f32>>> {
    let length = header.sweep_length as usize;
    let row_bytes = usize::try_from(header.sweep_payload_size()).map_err(|_| {
        ShrError::malformed(
            "sweep samples",
            format!("sweep length {} does not fit in memory", header.sweep_length),
        )
    })?;

    with_restored_cursor(handle, |h| {
        h.seek(SeekFrom::Start(header.data_offset))?;

        let count = header.sweep_count as usize;
        let mut rows = Vec::with_capacity(count.min(PREALLOC_SWEEPS));

        for _ in 0..count {
            skip_bytes(h, SWEEP_HEADER_SIZE as u64)?;

            let buf =
                read_exact_at(h, None, row_bytes).map_err(|e| e.into_malformed("sweep samples"))?;
            rows.push(decode_samples(&buf, length)?);
        }

        debug!("decoded {} sweeps x {} samples", rows.len(), length);

        Ok(rows)
    })
}
