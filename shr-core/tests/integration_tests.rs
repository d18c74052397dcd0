use std::{
    fs::{self, File},
    io::{Seek, SeekFrom},
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use shr_core::{
    decode_file_header, decode_sweep_headers, decode_sweep_samples, FileHeader, FileHeaderExt,
    ShrError, ShrFile, ShrWriter, SweepHeader, FILE_HEADER_SIZE, SWEEP_HEADER_SIZE,
};
use tempfile::NamedTempFile;

// ===========================================================================
// Helpers: детерминированные тест-данные
// ===========================================================================

/// Детерминированный заголовок: 2.4 ГГц, 8 бинов по 1 МГц.
fn deterministic_header() -> FileHeader {
    let mut h = FileHeader::new(8, 2_400_000_000.0, 1_000_000.0);

    h.signature = 0xAA10;
    h.version = 2;
    h.title = "  Test Vector  ".to_string();
    h.rbw_hz = 300e3;
    h.vbw_hz = 300e3;
    h.ref_level = -20.0;
    h.div = 10.0;
    h
}

/// Детерминированная строка выборок (пилообразный паттерн).
fn deterministic_row(sweep: usize) -> Vec<f32> {
    (0..8).map(|i| -100.0 + (sweep * 8 + i) as f32 * 0.5).collect()
}

/// Строит файл с `n` свипами через 250 мс начиная с 2024-01-01 00:00:00 UTC.
fn build_file(n: usize) -> NamedTempFile {
    let tmp = NamedTempFile::new().unwrap();
    let file = File::create(tmp.path()).unwrap();
    let mut writer = ShrWriter::new(file, deterministic_header()).unwrap();

    for i in 0..n {
        let mut sweep = SweepHeader::new(1_704_067_200_000 + i as u64 * 250);
        sweep.latitude = 55.75;
        sweep.longitude = 37.62;
        sweep.altitude = 150.0;
        writer.write_sweep(&sweep, &deterministic_row(i)).unwrap();
    }
    writer.finish().unwrap();

    tmp
}

// ===========================================================================
// Test Vector #1: минимальный валидный файл
// ===========================================================================

#[test]
fn test_vector_1_byte_layout() {
    let tmp = build_file(2);
    let bytes = fs::read(tmp.path()).unwrap();

    assert_eq!(bytes.len(), FILE_HEADER_SIZE + 2 * (SWEEP_HEADER_SIZE + 8 * 4));
    // sweepCount = 2 перезаписан в finish()
    assert_eq!(&bytes[16..20], &[2, 0, 0, 0], "sweepCount LE");
    // Первый свип сразу за заголовком: timestamp 1_704_067_200_000
    let ts = u64::from_le_bytes(bytes[472..480].try_into().unwrap());
    assert_eq!(ts, 1_704_067_200_000);
    // Первая выборка после 48-байтного заголовка свипа
    let first = f32::from_le_bytes(bytes[520..524].try_into().unwrap());
    assert_eq!(first, -100.0);
}

#[test]
fn test_vector_1_decode() {
    let tmp = build_file(2);
    let shr = ShrFile::open(tmp.path()).unwrap();

    assert_eq!(shr.header.title, "Test Vector", "title обрезан по пробелам");
    assert_eq!(shr.header.sweep_count, 2);
    assert_eq!(shr.sweep_headers.len(), 2);
    assert_eq!(shr.sweeps.len(), 2);
    assert!(shr.sweeps.iter().all(|row| row.len() == 8));
    assert_eq!(shr.sweeps[1], deterministic_row(1));
    assert_eq!(shr.sweep_headers[0].latitude, 55.75);

    let axis = shr.frequency_axis();
    assert_eq!(axis[0], 2_400_000_000.0);
    assert_eq!(axis[7], 2_407_000_000.0);
}

// ===========================================================================
// Свойства декодеров на реальном файловом дескрипторе
// ===========================================================================

#[test]
fn test_counts_match_header() {
    let tmp = build_file(17);
    let mut file = File::open(tmp.path()).unwrap();

    let header = decode_file_header(&mut file).unwrap();
    let sweeps = decode_sweep_headers(&mut file, &header).unwrap();
    let rows = decode_sweep_samples(&mut file, &header).unwrap();

    assert_eq!(sweeps.len(), header.sweep_count as usize);
    assert_eq!(rows.len(), header.sweep_count as usize);
    for row in &rows {
        assert_eq!(row.len(), header.sweep_length as usize);
    }
}

#[test]
fn test_cursor_invariance_any_order() {
    let tmp = build_file(5);
    let mut file = File::open(tmp.path()).unwrap();
    let header = decode_file_header(&mut file).unwrap();

    file.seek(SeekFrom::Start(123)).unwrap();

    let rows = decode_sweep_samples(&mut file, &header).unwrap();
    assert_eq!(file.stream_position().unwrap(), 123);

    let sweeps = decode_sweep_headers(&mut file, &header).unwrap();
    assert_eq!(file.stream_position().unwrap(), 123);

    let again = decode_file_header(&mut file).unwrap();
    assert_eq!(file.stream_position().unwrap(), 123);

    assert_eq!(again, header);
    assert_eq!(rows.len(), sweeps.len());
}

#[test]
fn test_decode_is_idempotent() {
    let tmp = build_file(9);
    let mut file = File::open(tmp.path()).unwrap();

    let first = ShrFile::read(&mut file).unwrap();
    let second = ShrFile::read(&mut file).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_header_size_independent_of_values() {
    let mut rng = StdRng::seed_from_u64(0x5348_5200);

    for _ in 0..32 {
        let mut h = FileHeader::new(rng.gen(), rng.gen(), rng.gen());
        h.signature = rng.gen();
        h.data_offset = rng.gen();
        h.sweep_count = rng.gen();
        h.ref_level = rng.gen();
        h.attenuation = rng.gen();
        h.channel_width_hz = rng.gen();
        h.reserved2 = rng.gen();

        let bytes = h.serialize().unwrap();
        let (parsed, consumed) = FileHeader::deserialize_prefix(&bytes).unwrap();

        assert_eq!(consumed, FILE_HEADER_SIZE);
        assert_eq!(parsed, h);
    }
}

// ===========================================================================
// Test Vector #2: файл без свипов
// ===========================================================================

#[test]
fn test_vector_2_zero_sweeps() {
    let tmp = build_file(0);
    let shr = ShrFile::open(tmp.path()).unwrap();

    assert!(shr.sweep_headers.is_empty());
    assert!(shr.sweeps.is_empty());
    assert!(!shr.has_sweeps());
    assert!(shr.ensure_sweeps().unwrap_err().is_empty_sweep_set());
}

// ===========================================================================
// Test Vector #3: усечённые файлы
// ===========================================================================

#[test]
fn test_vector_3_truncated_header() {
    let tmp = build_file(1);
    let bytes = fs::read(tmp.path()).unwrap();
    fs::write(tmp.path(), &bytes[..100]).unwrap();

    let err = ShrFile::open(tmp.path()).unwrap_err();
    assert!(
        matches!(
            err,
            ShrError::MalformedHeader {
                record: "file header",
                ..
            }
        ),
        "{err}"
    );
}

#[test]
fn test_vector_3_truncated_samples() {
    let tmp = build_file(3);
    let bytes = fs::read(tmp.path()).unwrap();
    fs::write(tmp.path(), &bytes[..bytes.len() - 1]).unwrap();

    let err = ShrFile::open(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("sweep samples"), "{err}");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ShrFile::open(dir.path().join("absent.shr")).unwrap_err();

    assert!(matches!(err, ShrError::Io(_)));
}
