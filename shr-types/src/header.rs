use serde::Serialize;

use crate::{decode_code_units, AmplitudeUnit, FieldValue};

/// Количество 16-битных кодовых единиц в поле `title`.
pub const TITLE_UNITS: usize = 128;

/// Количество 32-битных слов в поле `reserved2`.
pub const RESERVED2_WORDS: usize = 16;

/// Заголовок SHR файла (фиксированная раскладка по смещению 0).
///
/// Порядок полей совпадает с порядком на диске. Имена для сериализации и
/// плоского перечисления используют исходные имена формата (`firstBinFreqHz` и т.д.).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHeader {
    /// Сигнатура файла
    pub signature: u16,
    /// Версия формата
    pub version: u16,
    pub reserved1: u32,
    /// Смещение первой записи свипа от начала файла
    pub data_offset: u64,
    /// Количество свипов
    pub sweep_count: u32,
    /// Количество выборок (бинов) в одном свипе
    pub sweep_length: u32,
    /// Частота первого бина, Гц
    pub first_bin_freq_hz: f64,
    /// Шаг между бинами, Гц
    pub bin_size_hz: f64,
    /// Заголовок записи (128 кодовых единиц, без нулей и пробелов по краям)
    pub title: String,
    /// Центральная частота, Гц
    pub center_freq_hz: f64,
    /// Полоса обзора, Гц
    pub span_hz: f64,
    /// Полоса разрешения (RBW), Гц
    pub rbw_hz: f64,
    /// Видеополоса (VBW), Гц
    pub vbw_hz: f64,
    /// Опорный уровень
    pub ref_level: f32,
    /// Флаг шкалы амплитуды: 0 = дБ, иначе мВ
    pub ref_scale: u32,
    /// Цена деления
    pub div: f32,
    pub window: u32,
    pub attenuation: i32,
    pub gain: i32,
    pub detector: i32,
    pub processing_units: i32,
    pub window_bandwidth: f64,
    pub decimation_type: i32,
    pub decimation_detector: i32,
    pub decimation_count: i32,
    pub decimation_time_ms: i32,
    pub channelize_enabled: i32,
    pub channel_output_units: i32,
    pub channel_center_hz: f64,
    pub channel_width_hz: f64,
    pub reserved2: [u32; RESERVED2_WORDS],
}

impl FileHeader {
    /// Создаёт заголовок с заданной сеткой частот и нулевыми остальными
    /// полями.
    pub fn new(
        sweep_length: u32,
        first_bin_freq_hz: f64,
        bin_size_hz: f64,
    ) -> Self {
        FileHeader {
            signature: 0,
            version: 0,
            reserved1: 0,
            data_offset: 0,
            sweep_count: 0,
            sweep_length,
            first_bin_freq_hz,
            bin_size_hz,
            title: String::new(),
            center_freq_hz: first_bin_freq_hz + bin_size_hz * sweep_length as f64 / 2.0,
            span_hz: bin_size_hz * sweep_length as f64,
            rbw_hz: 0.0,
            vbw_hz: 0.0,
            ref_level: 0.0,
            ref_scale: 0,
            div: 0.0,
            window: 0,
            attenuation: 0,
            gain: 0,
            detector: 0,
            processing_units: 0,
            window_bandwidth: 0.0,
            decimation_type: 0,
            decimation_detector: 0,
            decimation_count: 0,
            decimation_time_ms: 0,
            channelize_enabled: 0,
            channel_output_units: 0,
            channel_center_hz: 0.0,
            channel_width_hz: 0.0,
            reserved2: [0; RESERVED2_WORDS],
        }
    }

    /// Единицы амплитуды, выбранные полем `refScale`.
    pub fn amplitude_unit(&self) -> AmplitudeUnit {
        AmplitudeUnit::from_ref_scale(self.ref_scale)
    }

    /// Частота бина `index`, Гц.
    pub fn bin_frequency(
        &self,
        index: usize,
    ) -> f64 {
        self.first_bin_freq_hz + index as f64 * self.bin_size_hz
    }

    /// `true`, если в файле есть хотя бы одна выборка.
    pub fn has_sweeps(&self) -> bool {
        self.sweep_count > 0 && self.sweep_length > 0
    }

    /// Все поля в порядке объявления с исходными именами формата.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("signature", FieldValue::U16(self.signature)),
            ("version", FieldValue::U16(self.version)),
            ("reserved1", FieldValue::U32(self.reserved1)),
            ("dataOffset", FieldValue::U64(self.data_offset)),
            ("sweepCount", FieldValue::U32(self.sweep_count)),
            ("sweepLength", FieldValue::U32(self.sweep_length)),
            ("firstBinFreqHz", FieldValue::F64(self.first_bin_freq_hz)),
            ("binSizeHz", FieldValue::F64(self.bin_size_hz)),
            ("title", FieldValue::Text(self.title.clone())),
            ("centerFreqHz", FieldValue::F64(self.center_freq_hz)),
            ("spanHz", FieldValue::F64(self.span_hz)),
            ("rbwHz", FieldValue::F64(self.rbw_hz)),
            ("vbwHz", FieldValue::F64(self.vbw_hz)),
            ("refLevel", FieldValue::F32(self.ref_level)),
            ("refScale", FieldValue::U32(self.ref_scale)),
            ("div", FieldValue::F32(self.div)),
            ("window", FieldValue::U32(self.window)),
            ("attenuation", FieldValue::I32(self.attenuation)),
            ("gain", FieldValue::I32(self.gain)),
            ("detector", FieldValue::I32(self.detector)),
            ("processingUnits", FieldValue::I32(self.processing_units)),
            ("windowBandwidth", FieldValue::F64(self.window_bandwidth)),
            ("decimationType", FieldValue::I32(self.decimation_type)),
            ("decimationDetector", FieldValue::I32(self.decimation_detector)),
            ("decimationCount", FieldValue::I32(self.decimation_count)),
            ("decimationTimeMs", FieldValue::I32(self.decimation_time_ms)),
            ("channelizeEnabled", FieldValue::I32(self.channelize_enabled)),
            ("channelOutputUnits", FieldValue::I32(self.channel_output_units)),
            ("channelCenterHz", FieldValue::F64(self.channel_center_hz)),
            ("channelWidthHz", FieldValue::F64(self.channel_width_hz)),
            // reserved2 не несёт смысла и выводится той же эвристикой, что и title
            (
                "reserved2",
                FieldValue::Text(decode_code_units(&self.reserved2)),
            ),
        ]
    }
}
