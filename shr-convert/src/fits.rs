//! Запись FITS.
//!
//! Заголовок HDU состоит из 80-символьных карт, упакованных в блоки по
//! 2880 байт (добивка пробелами, последняя карта `END`). Данные пишутся в
//! big-endian и добиваются нулями до границы блока.
//!
//! Без сжатия матрица свипов лежит в первичном HDU (`BITPIX = -32`). Со
//! сжатием первичный HDU пустой и несёт только метаданные, а изображение
//! хранится в `BINTABLE` по соглашению о тайловом сжатии: один тайл на свип,
//! каждый тайл это gzip-поток big-endian байтов строки.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use byteorder::{BigEndian, WriteBytesExt};
use chrono::{DateTime, Utc};
use flate2::{write::GzEncoder, Compression};
use log::{info, warn};
use shr_core::{AcquisitionWindow, FieldValue, ShrFile};

use crate::{ConvertConfig, ConvertError, ConvertResult};

/// Длина одной карты заголовка.
pub const CARD_SIZE: usize = 80;
/// Размер логической записи FITS.
pub const BLOCK_SIZE: usize = 2880;
/// Формат меток времени в картах.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

const KEYWORD_WIDTH: usize = 8;
const VALUE_WIDTH: usize = 20;
const COMMENT_WIDTH: usize = CARD_SIZE - KEYWORD_WIDTH;
// Дескриптор `P`: (count: i32, offset: i32)
const DESCRIPTOR_SIZE: i64 = 8;

/// Значение карты заголовка.
#[derive(Debug, Clone, PartialEq)]
pub enum CardValue {
    Logical(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Пустое поле значения (например, для NaN).
    Undefined,
}

/// Одна карта заголовка.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    /// Стандартное ключевое слово (до 8 символов), значение в фиксированном формате.
    Keyword { name: String, value: CardValue },
    /// `HIERARCH NAME = value`, для длинных имён.
    Hierarch { name: String, value: CardValue },
    /// `COMMENT text`.
    Comment(String),
}

/// Упорядоченный набор карт одного HDU.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsHeader {
    cards: Vec<Card>,
}

impl CardValue {
    fn render(
        &self,
        fixed: bool,
    ) -> String {
        let raw = match self {
            CardValue::Logical(true) => "T".to_string(),
            CardValue::Logical(false) => "F".to_string(),
            CardValue::Integer(v) => v.to_string(),
            CardValue::Float(v) => format_float(*v),
            CardValue::Text(s) => return quote(s, fixed),
            CardValue::Undefined => String::new(),
        };

        if fixed {
            format!("{raw:>VALUE_WIDTH$}")
        } else {
            raw
        }
    }
}

impl Card {
    /// Карта как строка ровно из 80 символов.
    pub fn render(&self) -> String {
        let mut line = match self {
            Card::Keyword { name, value } => {
                format!("{name:<KEYWORD_WIDTH$}= {}", value.render(true))
            }
            Card::Hierarch { name, value } => format!("HIERARCH {name} = {}", value.render(false)),
            Card::Comment(text) => format!("COMMENT {text}"),
        };

        line.truncate(CARD_SIZE);
        format!("{line:<CARD_SIZE$}")
    }

    fn rendered_len(&self) -> usize {
        match self {
            Card::Keyword { value, .. } => KEYWORD_WIDTH + 2 + value.render(true).len(),
            Card::Hierarch { name, value } => 9 + name.len() + 3 + value.render(false).len(),
            Card::Comment(text) => KEYWORD_WIDTH + text.len(),
        }
    }

    /// Укорачивает текстовое значение, пока карта не уложится в 80 символов.
    fn fit(mut self) -> Self {
        if self.rendered_len() <= CARD_SIZE {
            return self;
        }

        let original = match &self {
            Card::Keyword {
                value: CardValue::Text(s),
                ..
            }
            | Card::Hierarch {
                value: CardValue::Text(s),
                ..
            } => s.len(),
            _ => return self,
        };

        while self.rendered_len() > CARD_SIZE {
            match &mut self {
                Card::Keyword {
                    value: CardValue::Text(s),
                    ..
                }
                | Card::Hierarch {
                    value: CardValue::Text(s),
                    ..
                } if !s.is_empty() => {
                    s.pop();
                }
                _ => break,
            }
        }

        if let Card::Keyword { name, value } | Card::Hierarch { name, value } = &self {
            if let CardValue::Text(s) = value {
                warn!(
                    "FITS card {name}: value truncated from {original} to {} characters",
                    s.len()
                );
            }
        }

        self
    }
}

impl FitsHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет стандартную карту. Имя не длиннее 8 символов.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<CardValue>,
    ) -> &mut Self {
        debug_assert!(name.len() <= KEYWORD_WIDTH, "keyword {name} too long");

        self.cards.push(
            Card::Keyword {
                name: name.to_string(),
                value: value.into(),
            }
            .fit(),
        );
        self
    }

    /// Добавляет карту `HIERARCH`.
    pub fn hierarch(
        &mut self,
        name: &str,
        value: impl Into<CardValue>,
    ) -> &mut Self {
        self.cards.push(
            Card::Hierarch {
                name: name.to_string(),
                value: value.into(),
            }
            .fit(),
        );
        self
    }

    /// Добавляет комментарий, разбивая длинный текст на несколько карт.
    pub fn comment(
        &mut self,
        text: &str,
    ) -> &mut Self {
        let chars: Vec<char> = sanitize(text).chars().collect();

        for chunk in chars.chunks(COMMENT_WIDTH) {
            self.cards.push(Card::Comment(chunk.iter().collect()));
        }
        self
    }

    /// Дописывает карты другого заголовка в конец.
    pub fn extend(
        &mut self,
        other: FitsHeader,
    ) -> &mut Self {
        self.cards.extend(other.cards);
        self
    }

    /// Значение первой карты с данным именем (стандартной или `HIERARCH`).
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&CardValue> {
        self.cards.iter().find_map(|card| match card {
            Card::Keyword { name: n, value } | Card::Hierarch { name: n, value } if n == name => {
                Some(value)
            }
            _ => None,
        })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Сериализует карты и `END`, добивая пробелами до целого числа блоков.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOCK_SIZE);

        for card in &self.cards {
            out.extend_from_slice(card.render().as_bytes());
        }
        out.extend_from_slice(format!("{:<CARD_SIZE$}", "END").as_bytes());
        out.resize(out.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE, b' ');

        out
    }
}

////////////////////////////////////////////////////////////////////////////////
// Преобразования в CardValue
////////////////////////////////////////////////////////////////////////////////

impl From<bool> for CardValue {
    fn from(v: bool) -> Self {
        CardValue::Logical(v)
    }
}

impl From<i64> for CardValue {
    fn from(v: i64) -> Self {
        CardValue::Integer(v)
    }
}

impl From<i32> for CardValue {
    fn from(v: i32) -> Self {
        CardValue::Integer(v as i64)
    }
}

impl From<u32> for CardValue {
    fn from(v: u32) -> Self {
        CardValue::Integer(v as i64)
    }
}

impl From<usize> for CardValue {
    fn from(v: usize) -> Self {
        i64::try_from(v)
            .map(CardValue::Integer)
            .unwrap_or(CardValue::Float(v as f64))
    }
}

impl From<f64> for CardValue {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            CardValue::Float(v)
        } else {
            CardValue::Undefined
        }
    }
}

impl From<&str> for CardValue {
    fn from(v: &str) -> Self {
        CardValue::Text(sanitize(v))
    }
}

impl From<String> for CardValue {
    fn from(v: String) -> Self {
        CardValue::Text(sanitize(&v))
    }
}

impl From<&FieldValue> for CardValue {
    fn from(v: &FieldValue) -> Self {
        match v {
            FieldValue::U64(n) => match i64::try_from(*n) {
                Ok(n) => CardValue::Integer(n),
                Err(_) => CardValue::Text(n.to_string()),
            },
            FieldValue::F32(f) => CardValue::from(f64::from(*f)),
            FieldValue::F64(f) => CardValue::from(*f),
            FieldValue::Text(s) => CardValue::from(s.as_str()),
            other => other
                .as_i64()
                .map(CardValue::Integer)
                .unwrap_or(CardValue::Undefined),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Форматирование
////////////////////////////////////////////////////////////////////////////////

/// Вещественное число в нотации FITS: кратчайшее точное представление,
/// экспонента через `E`, мантисса всегда с десятичной точкой.
pub fn format_float(v: f64) -> String {
    let s = format!("{v:?}").replace('e', "E");

    match s.split_once('E') {
        Some((mantissa, exp)) if !mantissa.contains('.') => format!("{mantissa}.0E{exp}"),
        _ => s,
    }
}

/// `firstBinFreqHz` → `FIRST_BIN_FREQ_HZ`.
pub fn hierarch_keyword(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);

    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }

    out
}

/// Миллисекунды Unix → `YYYY-MM-DDTHH:MM:SS.ffffff` (UTC).
pub fn format_timestamp(ms: u64) -> ConvertResult<String> {
    let dt = i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| ConvertError::Fits(format!("timestamp {ms} ms is out of range")))?;

    Ok(dt.format(TIMESTAMP_FORMAT).to_string())
}

// Карты допускают только печатный ASCII
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

fn quote(
    s: &str,
    fixed: bool,
) -> String {
    let escaped = s.replace('\'', "''");

    if fixed {
        format!("'{escaped:<8}'")
    } else {
        format!("'{escaped}'")
    }
}

////////////////////////////////////////////////////////////////////////////////
// Запись HDU
////////////////////////////////////////////////////////////////////////////////

/// Карты метаданных: происхождение, время записи, оси WCS и поля заголовка SHR.
pub fn metadata_header(
    shr: &ShrFile,
    window: &AcquisitionWindow,
    source_name: &str,
    converted_at: DateTime<Utc>,
) -> ConvertResult<FitsHeader> {
    let start = format_timestamp(window.start_ms)?;
    let end = format_timestamp(window.end_ms)?;
    let header = &shr.header;

    let mut cards = FitsHeader::new();
    cards
        .comment(&format!("This file was converted to FITS from {source_name}"))
        .set("DATE", converted_at.format("%Y-%m-%d").to_string())
        .set("DATE-OBS", start.as_str())
        .set("SACQTIME", start.as_str())
        .set("EACQTIME", end.as_str())
        .set("CTYPE1", "time")
        .set("CUNIT1", "seconds")
        .set("CDELT1", window.sweep_interval_secs())
        .set("CRPIX1", 1i64)
        .set("CRVAL1", start.as_str())
        .set("CTYPE2", "frequency")
        .set("CUNIT2", "Hz")
        .set("CDELT2", header.bin_size_hz)
        .set("CRPIX2", 1i64)
        .set("CRVAL2", header.first_bin_freq_hz)
        .set("BUNIT", header.amplitude_unit().as_str());

    for (name, value) in header.fields() {
        cards.hierarch(&hierarch_keyword(name), &value);
    }

    Ok(cards)
}

/// Пишет полный FITS файл в поток.
pub fn write_fits<W: Write>(
    out: &mut W,
    shr: &ShrFile,
    source_name: &str,
    compress: bool,
    converted_at: DateTime<Utc>,
) -> ConvertResult<()> {
    shr.ensure_sweeps()?;

    let window = shr.acquisition_window()?;
    let metadata = metadata_header(shr, &window, source_name, converted_at)?;
    let width = shr.header.sweep_length as usize;

    let mut primary = FitsHeader::new();
    primary.set("SIMPLE", true);

    if compress {
        primary
            .set("BITPIX", 8i64)
            .set("NAXIS", 0i64)
            .set("EXTEND", true)
            .extend(metadata);
        out.write_all(&primary.to_bytes())?;

        write_compressed_image(out, &shr.sweeps, width)?;
    } else {
        primary
            .set("BITPIX", -32i64)
            .set("NAXIS", 2i64)
            .set("NAXIS1", width)
            .set("NAXIS2", shr.sweeps.len())
            .set("EXTEND", true)
            .extend(metadata);
        out.write_all(&primary.to_bytes())?;

        let mut written = 0usize;
        for row in &shr.sweeps {
            for &v in row {
                out.write_f32::<BigEndian>(v)?;
            }
            written += row.len() * 4;
        }
        pad_block(out, written)?;
    }

    Ok(())
}

/// Конвертирует разобранный файл в `<stem>.fits`. Возвращает путь результата.
pub fn convert_to_fits(
    input: &Path,
    shr: &ShrFile,
    config: &ConvertConfig,
) -> ConvertResult<PathBuf> {
    shr.ensure_sweeps()?;

    let output = config.output_path(input, ".fits");
    let source_name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let mut writer = BufWriter::new(File::create(&output)?);
    write_fits(&mut writer, shr, &source_name, config.compress, Utc::now())?;
    writer.flush()?;

    info!(
        "{} -> {} ({} sweeps x {} bins{})",
        input.display(),
        output.display(),
        shr.sweeps.len(),
        shr.header.sweep_length,
        if config.compress { ", GZIP_1" } else { "" }
    );

    Ok(output)
}

/// Сжимает каждую строку отдельным gzip-потоком.
pub fn compress_tiles(rows: &[Vec<f32>]) -> ConvertResult<Vec<Vec<u8>>> {
    rows.iter()
        .map(|row| -> ConvertResult<Vec<u8>> {
            let mut enc = GzEncoder::new(Vec::with_capacity(row.len() * 2), Compression::default());
            for &v in row {
                enc.write_f32::<BigEndian>(v)?;
            }
            Ok(enc.finish()?)
        })
        .collect()
}

fn write_compressed_image<W: Write>(
    out: &mut W,
    rows: &[Vec<f32>],
    width: usize,
) -> ConvertResult<()> {
    let tiles = compress_tiles(rows)?;
    let heap_size: usize = tiles.iter().map(Vec::len).sum();
    let max_tile = tiles.iter().map(Vec::len).max().unwrap_or(0);

    // Смещения дескрипторов `P` 32-битные
    if i32::try_from(heap_size).is_err() {
        return Err(ConvertError::Fits(format!(
            "compressed heap of {heap_size} bytes exceeds 32-bit descriptors"
        )));
    }

    let mut table = FitsHeader::new();
    table
        .set("XTENSION", "BINTABLE")
        .set("BITPIX", 8i64)
        .set("NAXIS", 2i64)
        .set("NAXIS1", DESCRIPTOR_SIZE)
        .set("NAXIS2", tiles.len())
        .set("PCOUNT", heap_size)
        .set("GCOUNT", 1i64)
        .set("TFIELDS", 1i64)
        .set("TTYPE1", "COMPRESSED_DATA")
        .set("TFORM1", format!("1PB({max_tile})"))
        .set("ZIMAGE", true)
        .set("ZBITPIX", -32i64)
        .set("ZNAXIS", 2i64)
        .set("ZNAXIS1", width)
        .set("ZNAXIS2", rows.len())
        .set("ZTILE1", width)
        .set("ZTILE2", 1i64)
        .set("ZCMPTYPE", "GZIP_1")
        .set("ZQUANTIZ", "NONE")
        .set("EXTNAME", "COMPRESSED_IMAGE");
    out.write_all(&table.to_bytes())?;

    let mut offset = 0i32;
    for tile in &tiles {
        // Сумма длин уже проверена на i32
        let len = tile.len() as i32;
        out.write_i32::<BigEndian>(len)?;
        out.write_i32::<BigEndian>(offset)?;
        offset += len;
    }
    for tile in &tiles {
        out.write_all(tile)?;
    }

    pad_block(out, tiles.len() * DESCRIPTOR_SIZE as usize + heap_size)
}

fn pad_block<W: Write>(
    out: &mut W,
    written: usize,
) -> ConvertResult<()> {
    let rem = written % BLOCK_SIZE;

    if rem != 0 {
        out.write_all(&vec![0u8; BLOCK_SIZE - rem])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use flate2::read::GzDecoder;
    use shr_core::{FileHeader, SweepHeader};

    use super::*;

    const T0: u64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

    fn sample_file(sweeps: usize) -> ShrFile {
        let mut header = FileHeader::new(4, 2.4e9, 1e6);
        header.sweep_count = sweeps as u32;
        header.title = "lab 'A'".into();

        ShrFile {
            header,
            sweep_headers: (0..sweeps)
                .map(|i| SweepHeader::new(T0 + i as u64 * 250))
                .collect(),
            sweeps: (0..sweeps)
                .map(|i| (0..4).map(|j| -90.0 + (i * 4 + j) as f32).collect())
                .collect(),
        }
    }

    fn converted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
    }

    /// Карты одного HDU до `END` и длина заголовка в байтах.
    fn parse_header(bytes: &[u8]) -> (Vec<String>, usize) {
        let mut cards = Vec::new();
        let mut pos = 0;

        loop {
            let card = std::str::from_utf8(&bytes[pos..pos + CARD_SIZE]).unwrap();
            pos += CARD_SIZE;
            if card.trim_end() == "END" {
                break;
            }
            cards.push(card.to_string());
        }

        (cards, pos.div_ceil(BLOCK_SIZE) * BLOCK_SIZE)
    }

    fn value<'a>(
        cards: &'a [String],
        key: &str,
    ) -> &'a str {
        cards
            .iter()
            .find(|c| c[..KEYWORD_WIDTH].trim_end() == key)
            .map(|c| c[KEYWORD_WIDTH + 2..].trim())
            .unwrap_or_else(|| panic!("no card {key}"))
    }

    fn read_be_f32(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_be_bytes(c.try_into().unwrap()))
            .collect()
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2.4e9), "2400000000.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(1e-7), "1.0E-7");
        assert_eq!(format_float(-1.5e300), "-1.5E300");
        assert_eq!(format_float(0.0), "0.0");
    }

    #[test]
    fn test_hierarch_keyword() {
        assert_eq!(hierarch_keyword("firstBinFreqHz"), "FIRST_BIN_FREQ_HZ");
        assert_eq!(hierarch_keyword("dataOffset"), "DATA_OFFSET");
        assert_eq!(hierarch_keyword("reserved1"), "RESERVED1");
        assert_eq!(hierarch_keyword("signature"), "SIGNATURE");
    }

    #[test]
    fn test_card_layout() {
        let card = Card::Keyword {
            name: "NAXIS1".into(),
            value: 4i64.into(),
        }
        .render();
        assert_eq!(card.len(), CARD_SIZE);
        assert_eq!(&card[..30], "NAXIS1  =                    4");

        let card = Card::Keyword {
            name: "CTYPE1".into(),
            value: "time".into(),
        }
        .render();
        assert!(card.starts_with("CTYPE1  = 'time    '"));

        let card = Card::Hierarch {
            name: "TITLE".into(),
            value: "it's".into(),
        }
        .render();
        assert!(card.starts_with("HIERARCH TITLE = 'it''s'"));
    }

    #[test]
    fn test_long_text_is_truncated() {
        let mut header = FitsHeader::new();
        header.hierarch("TITLE", "x".repeat(128));

        let card = header.cards()[0].render();
        assert_eq!(card.len(), CARD_SIZE);
        assert!(card.ends_with("x'"));

        match header.get("TITLE") {
            Some(CardValue::Text(s)) => assert_eq!(s.len(), CARD_SIZE - "HIERARCH TITLE = ''".len()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_is_undefined() {
        assert_eq!(CardValue::from(f64::NAN), CardValue::Undefined);
        assert_eq!(CardValue::from(&FieldValue::F32(f32::INFINITY)), CardValue::Undefined);
        assert_eq!(CardValue::from(&FieldValue::U64(u64::MAX)), CardValue::Text(u64::MAX.to_string()));
        assert_eq!(CardValue::from("µ"), CardValue::Text("?".into()));
    }

    #[test]
    fn test_header_block_alignment() {
        let mut header = FitsHeader::new();
        header.set("SIMPLE", true).comment(&"y".repeat(100));

        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), BLOCK_SIZE);
        assert_eq!(&bytes[CARD_SIZE..CARD_SIZE + 8], b"COMMENT ");
        assert_eq!(&bytes[3 * CARD_SIZE..3 * CARD_SIZE + 3], b"END");
        assert!(bytes[4 * CARD_SIZE..].iter().all(|&b| b == b' '));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(T0).unwrap(), "2024-01-01T00:00:00.000000");
        assert_eq!(format_timestamp(T0 + 1_250).unwrap(), "2024-01-01T00:00:01.250000");
        assert!(format_timestamp(u64::MAX).is_err());
    }

    #[test]
    fn test_uncompressed_round_trip() {
        let shr = sample_file(3);
        let mut out = Vec::new();
        write_fits(&mut out, &shr, "scan.shr", false, converted_at()).unwrap();

        assert_eq!(out.len() % BLOCK_SIZE, 0);

        let (cards, header_len) = parse_header(&out);
        assert_eq!(value(&cards, "SIMPLE"), "T");
        assert_eq!(value(&cards, "BITPIX"), "-32");
        assert_eq!(value(&cards, "NAXIS1"), "4");
        assert_eq!(value(&cards, "NAXIS2"), "3");
        assert_eq!(value(&cards, "DATE"), "'2025-03-14'");
        assert_eq!(value(&cards, "DATE-OBS"), "'2024-01-01T00:00:00.000000'");
        assert_eq!(value(&cards, "EACQTIME"), "'2024-01-01T00:00:00.750000'");
        assert_eq!(value(&cards, "CTYPE2"), "'frequency'");
        assert_eq!(value(&cards, "BUNIT"), "'dB      '");
        assert_relative_eq!(value(&cards, "CDELT1").parse::<f64>().unwrap(), 0.25);
        assert_relative_eq!(value(&cards, "CRVAL2").parse::<f64>().unwrap(), 2.4e9);
        assert!(cards
            .iter()
            .any(|c| c.starts_with("COMMENT This file was converted to FITS from scan.shr")));
        assert!(cards
            .iter()
            .any(|c| c.starts_with("HIERARCH FIRST_BIN_FREQ_HZ = 2400000000.0")));
        assert!(cards.iter().any(|c| c.starts_with("HIERARCH TITLE = 'lab ''A'''")));

        let data = read_be_f32(&out[header_len..header_len + 3 * 4 * 4]);
        let expected: Vec<f32> = shr.sweeps.concat();
        assert_eq!(data, expected);
        assert!(out[header_len + 48..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_compressed_tiles_decompress() {
        let shr = sample_file(5);
        let mut out = Vec::new();
        write_fits(&mut out, &shr, "scan.shr", true, converted_at()).unwrap();

        assert_eq!(out.len() % BLOCK_SIZE, 0);

        let (primary, primary_len) = parse_header(&out);
        assert_eq!(value(&primary, "BITPIX"), "8");
        assert_eq!(value(&primary, "NAXIS"), "0");
        assert_eq!(value(&primary, "CUNIT2"), "'Hz      '");

        let (table, table_len) = parse_header(&out[primary_len..]);
        assert_eq!(value(&table, "XTENSION"), "'BINTABLE'");
        assert_eq!(value(&table, "ZIMAGE"), "T");
        assert_eq!(value(&table, "ZCMPTYPE"), "'GZIP_1  '");
        assert_eq!(value(&table, "ZNAXIS1"), "4");
        assert_eq!(value(&table, "ZNAXIS2"), "5");
        assert_eq!(value(&table, "NAXIS2"), "5");

        let main = primary_len + table_len;
        let heap = main + 5 * 8;
        let pcount: usize = value(&table, "PCOUNT").parse().unwrap();

        for (i, row) in shr.sweeps.iter().enumerate() {
            let d = &out[main + i * 8..main + i * 8 + 8];
            let count = i32::from_be_bytes(d[..4].try_into().unwrap()) as usize;
            let offset = i32::from_be_bytes(d[4..].try_into().unwrap()) as usize;
            assert!(offset + count <= pcount);

            let mut raw = Vec::new();
            GzDecoder::new(&out[heap + offset..heap + offset + count])
                .read_to_end(&mut raw)
                .unwrap();
            assert_eq!(&read_be_f32(&raw), row);
        }
    }

    #[test]
    fn test_empty_file_writes_nothing() {
        let shr = sample_file(0);
        let mut out = Vec::new();

        let err = write_fits(&mut out, &shr, "empty.shr", true, converted_at()).unwrap_err();
        assert!(err.is_empty_sweep_set());
        assert!(out.is_empty());
    }
}
