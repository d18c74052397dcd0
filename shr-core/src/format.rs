//! Раскладка формата SHR
//!
//! Бинарное представление .shr файлов: заголовок файла по смещению 0, затем
//! с `dataOffset` идут `sweepCount` записей вида
//! `[заголовок свипа][sweepLength × f32]`. Записи упакованы без
//! выравнивания, все многобайтовые числа в порядке [`ShrByteOrder`].
//!
//! Размеры записей вычисляются на этапе компиляции из таблиц раскладки,
//! декодеры читают поля в том же порядке.

use byteorder::{ByteOrder, LittleEndian};
use shr_types::{
    decode_code_units, FileHeader, ShrError, ShrResult, SweepHeader, RESERVED2_WORDS,
    SWEEP_RESERVED_BYTES, TITLE_UNITS,
};

use crate::binary::{FieldReader, FieldWriter};

/// Порядок байт, в котором анализатор пишет файлы.
pub type ShrByteOrder = LittleEndian;

/// Тип и ширина поля в упакованной записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    I32,
    F32,
    F64,
    U16Array(usize),
    U32Array(usize),
    Bytes(usize),
}

impl FieldKind {
    /// Ширина поля в байтах.
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 | FieldKind::I32 | FieldKind::F32 => 4,
            FieldKind::U64 | FieldKind::F64 => 8,
            FieldKind::U16Array(n) => 2 * n,
            FieldKind::U32Array(n) => 4 * n,
            FieldKind::Bytes(n) => n,
        }
    }
}

/// Одно поле таблицы раскладки.
#[derive(Debug, Clone, Copy)]
pub struct LayoutField {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(
    name: &'static str,
    kind: FieldKind,
) -> LayoutField {
    LayoutField { name, kind }
}

/// Раскладка заголовка файла в порядке следования на диске.
pub const FILE_HEADER_LAYOUT: [LayoutField; 31] = [
    field("signature", FieldKind::U16),
    field("version", FieldKind::U16),
    field("reserved1", FieldKind::U32),
    field("dataOffset", FieldKind::U64),
    field("sweepCount", FieldKind::U32),
    field("sweepLength", FieldKind::U32),
    field("firstBinFreqHz", FieldKind::F64),
    field("binSizeHz", FieldKind::F64),
    field("title", FieldKind::U16Array(TITLE_UNITS)),
    field("centerFreqHz", FieldKind::F64),
    field("spanHz", FieldKind::F64),
    field("rbwHz", FieldKind::F64),
    field("vbwHz", FieldKind::F64),
    field("refLevel", FieldKind::F32),
    field("refScale", FieldKind::U32),
    field("div", FieldKind::F32),
    field("window", FieldKind::U32),
    field("attenuation", FieldKind::I32),
    field("gain", FieldKind::I32),
    field("detector", FieldKind::I32),
    field("processingUnits", FieldKind::I32),
    field("windowBandwidth", FieldKind::F64),
    field("decimationType", FieldKind::I32),
    field("decimationDetector", FieldKind::I32),
    field("decimationCount", FieldKind::I32),
    field("decimationTimeMs", FieldKind::I32),
    field("channelizeEnabled", FieldKind::I32),
    field("channelOutputUnits", FieldKind::I32),
    field("channelCenterHz", FieldKind::F64),
    field("channelWidthHz", FieldKind::F64),
    field("reserved2", FieldKind::U32Array(RESERVED2_WORDS)),
];

/// Раскладка заголовка свипа.
pub const SWEEP_HEADER_LAYOUT: [LayoutField; 6] = [
    field("timestamp", FieldKind::U64),
    field("latitude", FieldKind::F64),
    field("longitude", FieldKind::F64),
    field("altitude", FieldKind::F64),
    field("adcOverflow", FieldKind::U8),
    field("reserved", FieldKind::Bytes(SWEEP_RESERVED_BYTES)),
];

/// Суммарная ширина полей раскладки.
pub const fn layout_size(fields: &[LayoutField]) -> usize {
    let mut total = 0;
    let mut i = 0;

    while i < fields.len() {
        total += fields[i].kind.width();
        i += 1;
    }

    total
}

/// Размер заголовка файла (472 байта)
pub const FILE_HEADER_SIZE: usize = layout_size(&FILE_HEADER_LAYOUT);

/// Размер заголовка свипа (48 байт)
pub const SWEEP_HEADER_SIZE: usize = layout_size(&SWEEP_HEADER_LAYOUT);

/// Размер одной выборки свипа (f32)
pub const SAMPLE_SIZE: usize = FieldKind::F32.width();

/// Кодек заголовка файла.
pub trait FileHeaderExt: Sized {
    /// Разбирает заголовок из начала `buf`.
    ///
    /// Срез короче [`FILE_HEADER_SIZE`] даёт [`ShrError::TruncatedRead`].
    fn deserialize(buf: &[u8]) -> ShrResult<Self>;

    /// То же, что [`FileHeaderExt::deserialize`], но возвращает и число
    /// прочитанных байт.
    fn deserialize_prefix(buf: &[u8]) -> ShrResult<(Self, usize)>;

    /// Сериализация заголовка в [`FILE_HEADER_SIZE`] байт.
    fn serialize(&self) -> ShrResult<[u8; FILE_HEADER_SIZE]>;

    /// Размер блока выборок одного свипа в байтах.
    fn sweep_payload_size(&self) -> u64;

    /// Размер записи свипа (заголовок + выборки) в байтах.
    fn sweep_record_size(&self) -> u64;

    /// Ожидаемый размер файла по полям заголовка (`None` при переполнении).
    fn expected_file_size(&self) -> Option<u64>;
}

/// Кодек заголовка свипа.
pub trait SweepHeaderExt: Sized {
    fn deserialize(buf: &[u8]) -> ShrResult<Self>;

    fn serialize(&self) -> [u8; SWEEP_HEADER_SIZE];
}

impl FileHeaderExt for FileHeader {
    fn deserialize(buf: &[u8]) -> ShrResult<Self> {
        Self::deserialize_prefix(buf).map(|(header, _)| header)
    }

    fn deserialize_prefix(buf: &[u8]) -> ShrResult<(Self, usize)> {
        if buf.len() < FILE_HEADER_SIZE {
            return Err(ShrError::truncated(FILE_HEADER_SIZE, buf.len()));
        }

        let mut r = FieldReader::<ShrByteOrder>::new(buf);

        let header = FileHeader {
            signature: r.u16()?,
            version: r.u16()?,
            reserved1: r.u32()?,
            data_offset: r.u64()?,
            sweep_count: r.u32()?,
            sweep_length: r.u32()?,
            first_bin_freq_hz: r.f64()?,
            bin_size_hz: r.f64()?,
            title: decode_code_units(&r.u16_array::<TITLE_UNITS>()?),
            center_freq_hz: r.f64()?,
            span_hz: r.f64()?,
            rbw_hz: r.f64()?,
            vbw_hz: r.f64()?,
            ref_level: r.f32()?,
            ref_scale: r.u32()?,
            div: r.f32()?,
            window: r.u32()?,
            attenuation: r.i32()?,
            gain: r.i32()?,
            detector: r.i32()?,
            processing_units: r.i32()?,
            window_bandwidth: r.f64()?,
            decimation_type: r.i32()?,
            decimation_detector: r.i32()?,
            decimation_count: r.i32()?,
            decimation_time_ms: r.i32()?,
            channelize_enabled: r.i32()?,
            channel_output_units: r.i32()?,
            channel_center_hz: r.f64()?,
            channel_width_hz: r.f64()?,
            reserved2: r.u32_array::<RESERVED2_WORDS>()?,
        };

        Ok((header, r.position()))
    }

    fn serialize(&self) -> ShrResult<[u8; FILE_HEADER_SIZE]> {
        let title = encode_title(&self.title)?;
        let mut buf = [0u8; FILE_HEADER_SIZE];
        let mut w = FieldWriter::<ShrByteOrder>::new(&mut buf);

        w.u16(self.signature);
        w.u16(self.version);
        w.u32(self.reserved1);
        w.u64(self.data_offset);
        w.u32(self.sweep_count);
        w.u32(self.sweep_length);
        w.f64(self.first_bin_freq_hz);
        w.f64(self.bin_size_hz);
        w.u16_slice(&title);
        w.f64(self.center_freq_hz);
        w.f64(self.span_hz);
        w.f64(self.rbw_hz);
        w.f64(self.vbw_hz);
        w.f32(self.ref_level);
        w.u32(self.ref_scale);
        w.f32(self.div);
        w.u32(self.window);
        w.i32(self.attenuation);
        w.i32(self.gain);
        w.i32(self.detector);
        w.i32(self.processing_units);
        w.f64(self.window_bandwidth);
        w.i32(self.decimation_type);
        w.i32(self.decimation_detector);
        w.i32(self.decimation_count);
        w.i32(self.decimation_time_ms);
        w.i32(self.channelize_enabled);
        w.i32(self.channel_output_units);
        w.f64(self.channel_center_hz);
        w.f64(self.channel_width_hz);
        w.u32_slice(&self.reserved2);

        debug_assert_eq!(w.position(), FILE_HEADER_SIZE);

        Ok(buf)
    }

    fn sweep_payload_size(&self) -> u64 {
        self.sweep_length as u64 * SAMPLE_SIZE as u64
    }

    fn sweep_record_size(&self) -> u64 {
        SWEEP_HEADER_SIZE as u64 + self.sweep_payload_size()
    }

    fn expected_file_size(&self) -> Option<u64> {
        self.sweep_record_size()
            .checked_mul(self.sweep_count as u64)?
            .checked_add(self.data_offset)
    }
}

impl SweepHeaderExt for SweepHeader {
    fn deserialize(buf: &[u8]) -> ShrResult<Self> {
        if buf.len() < SWEEP_HEADER_SIZE {
            return Err(ShrError::truncated(SWEEP_HEADER_SIZE, buf.len()));
        }

        let mut r = FieldReader::<ShrByteOrder>::new(buf);

        Ok(SweepHeader {
            timestamp: r.u64()?,
            latitude: r.f64()?,
            longitude: r.f64()?,
            altitude: r.f64()?,
            adc_overflow: r.u8()?,
            reserved: r.bytes::<SWEEP_RESERVED_BYTES>()?,
        })
    }

    fn serialize(&self) -> [u8; SWEEP_HEADER_SIZE] {
        let mut buf = [0u8; SWEEP_HEADER_SIZE];
        let mut w = FieldWriter::<ShrByteOrder>::new(&mut buf);

        w.u64(self.timestamp);
        w.f64(self.latitude);
        w.f64(self.longitude);
        w.f64(self.altitude);
        w.u8(self.adc_overflow);
        w.bytes(&self.reserved);

        buf
    }
}

/// Разбирает блок выборок одного свипа.
pub fn decode_samples(
    buf: &[u8],
    count: usize,
) -> ShrResult<Vec<f32>> {
    FieldReader::<ShrByteOrder>::new(buf).f32_vec(count)
}

/// Кодирует выборки свипа в байты формата.
pub fn encode_samples(samples: &[f32]) -> Vec<u8> {
    let mut buf = vec![0u8; samples.len() * SAMPLE_SIZE];
    ShrByteOrder::write_f32_into(samples, &mut buf);
    buf
}

// Одна кодовая единица на байт ASCII, остаток добивается нулями.
fn encode_title(title: &str) -> ShrResult<[u16; TITLE_UNITS]> {
    if !title.is_ascii() || title.len() > TITLE_UNITS {
        return Err(ShrError::malformed(
            "file header",
            format!("title must be ASCII of at most {TITLE_UNITS} chars: {title:?}"),
        ));
    }

    let mut units = [0u16; TITLE_UNITS];
    for (unit, b) in units.iter_mut().zip(title.bytes()) {
        *unit = b as u16;
    }

    Ok(units)
}
