use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
};

use byteorder::WriteBytesExt;
use shr_types::{FileHeader, ShrError, ShrResult, SweepHeader};

use crate::{
    codec::{decode_file_header, decode_sweep_headers, decode_sweep_samples},
    derived::{frequency_axis, AcquisitionWindow},
    format::{FileHeaderExt, ShrByteOrder, SweepHeaderExt, FILE_HEADER_SIZE},
};

/// Полностью разобранный SHR файл.
#[derive(Debug, Clone, PartialEq)]
pub struct ShrFile {
    pub header: FileHeader,
    /// Заголовки свипов в порядке файла (хронологически)
    pub sweep_headers: Vec<SweepHeader>,
    /// Матрица выборок `sweep_count × sweep_length`
    pub sweeps: Vec<Vec<f32>>,
}

/// Потоковый писатель SHR файлов.
pub struct ShrWriter<W: Write + Seek> {
    writer: BufWriter<W>,
    header: FileHeader,
    sweep_count: u32,
}

impl ShrFile {
    /// Разбирает заголовок, заголовки свипов и выборки с одного дескриптора.
    pub fn read<R: Read + Seek>(handle: &mut R) -> ShrResult<Self> {
        let header = decode_file_header(handle)?;
        let sweep_headers = decode_sweep_headers(handle, &header)?;
        let sweeps = decode_sweep_samples(handle, &header)?;

        Ok(Self {
            header,
            sweep_headers,
            sweeps,
        })
    }

    /// Открывает и разбирает файл по пути.
    pub fn open<P: AsRef<Path>>(path: P) -> ShrResult<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        Self::read(&mut reader)
    }

    /// `true`, если в файле есть хотя бы одна выборка.
    pub fn has_sweeps(&self) -> bool {
        self.header.has_sweeps()
    }

    /// [`ShrError::EmptySweepSet`], если выборок нет.
    pub fn ensure_sweeps(&self) -> ShrResult<()> {
        if self.has_sweeps() {
            Ok(())
        } else {
            Err(ShrError::EmptySweepSet {
                sweep_count: self.header.sweep_count,
                sweep_length: self.header.sweep_length,
            })
        }
    }

    pub fn acquisition_window(&self) -> ShrResult<AcquisitionWindow> {
        AcquisitionWindow::from_sweep_headers(&self.sweep_headers)
    }

    pub fn frequency_axis(&self) -> Vec<f64> {
        frequency_axis(&self.header)
    }

    /// Количество свипов с переполнением АЦП.
    pub fn overflow_count(&self) -> usize {
        self.sweep_headers
            .iter()
            .filter(|s| s.is_overflowed())
            .count()
    }
}

impl<W: Write + Seek> ShrWriter<W> {
    /// Создаёт писатель, немедленно записывая заголовок в поток.
    ///
    /// `dataOffset` выставляется сразу за заголовком, `sweepCount`
    /// пересчитывается в [`ShrWriter::finish`].
    pub fn new(
        inner: W,
        mut header: FileHeader,
    ) -> ShrResult<Self> {
        header.data_offset = FILE_HEADER_SIZE as u64;
        header.sweep_count = 0;

        let mut writer = BufWriter::new(inner);
        writer.write_all(&header.serialize()?)?;

        Ok(Self {
            writer,
            header,
            sweep_count: 0,
        })
    }

    /// Записывает один свип: заголовок и `sweepLength` выборок.
    pub fn write_sweep(
        &mut self,
        sweep: &SweepHeader,
        samples: &[f32],
    ) -> ShrResult<()> {
        if samples.len() != self.header.sweep_length as usize {
            return Err(ShrError::malformed(
                "sweep samples",
                format!(
                    "expected {} samples, got {}",
                    self.header.sweep_length,
                    samples.len()
                ),
            ));
        }

        let count = self
            .sweep_count
            .checked_add(1)
            .ok_or_else(|| ShrError::malformed("file header", "sweep count overflow"))?;

        self.writer.write_all(&sweep.serialize())?;
        for &v in samples {
            self.writer.write_f32::<ShrByteOrder>(v)?;
        }
        self.sweep_count = count;

        Ok(())
    }

    /// Завершает запись: сбрасывает буфер и перезаписывает заголовок.
    pub fn finish(mut self) -> ShrResult<W> {
        self.writer.flush()?;
        self.header.sweep_count = self.sweep_count;

        let mut inner = self
            .writer
            .into_inner()
            .map_err(|e| ShrError::Io(e.into_error()))?;

        inner.seek(SeekFrom::Start(0))?;
        inner.write_all(&self.header.serialize()?)?;
        inner.flush()?;

        Ok(inner)
    }

    /// Количество записанных свипов.
    pub fn sweep_count(&self) -> u32 {
        self.sweep_count
    }

    /// Ссылка на текущий заголовок (до финализации).
    pub fn header(&self) -> &FileHeader {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn make_header() -> FileHeader {
        let mut h = FileHeader::new(4, 2.4e9, 1e6);
        h.title = "bench".into();
        h
    }

    fn write_file(n: u32) -> Vec<u8> {
        let mut writer = ShrWriter::new(Cursor::new(Vec::new()), make_header()).unwrap();
        for i in 0..n {
            let mut sweep = SweepHeader::new(1_000 + i as u64 * 500);
            sweep.adc_overflow = (i % 2) as u8;
            writer
                .write_sweep(&sweep, &[i as f32, -1.0, -2.0, -3.0])
                .unwrap();
        }
        assert_eq!(writer.sweep_count(), n);
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_writer_reader_round_trip() {
        let raw = write_file(3);
        let shr = ShrFile::read(&mut Cursor::new(raw)).unwrap();

        assert_eq!(shr.header.sweep_count, 3);
        assert_eq!(shr.header.data_offset, FILE_HEADER_SIZE as u64);
        assert_eq!(shr.header.title, "bench");
        assert_eq!(shr.sweep_headers.len(), 3);
        assert_eq!(shr.sweeps[2], vec![2.0, -1.0, -2.0, -3.0]);
        assert_eq!(shr.overflow_count(), 1);
    }

    #[test]
    fn test_writer_rejects_wrong_row_length() {
        let mut writer = ShrWriter::new(Cursor::new(Vec::new()), make_header()).unwrap();

        let err = writer
            .write_sweep(&SweepHeader::new(0), &[1.0, 2.0])
            .unwrap_err();
        assert!(err.to_string().contains("expected 4 samples"));
        assert_eq!(writer.sweep_count(), 0);
    }

    #[test]
    fn test_read_is_idempotent() {
        let mut cur = Cursor::new(write_file(4));

        let first = ShrFile::read(&mut cur).unwrap();
        let second = ShrFile::read(&mut cur).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ensure_sweeps() {
        let shr = ShrFile::read(&mut Cursor::new(write_file(0))).unwrap();

        assert!(!shr.has_sweeps());
        assert!(shr.ensure_sweeps().unwrap_err().is_empty_sweep_set());
        assert!(shr.acquisition_window().is_err());

        let shr = ShrFile::read(&mut Cursor::new(write_file(2))).unwrap();
        shr.ensure_sweeps().unwrap();
        assert_eq!(shr.acquisition_window().unwrap().end_ms, 2_000);
        assert_eq!(shr.frequency_axis().len(), 4);
    }
}
