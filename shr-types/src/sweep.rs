use serde::Serialize;

use crate::FieldValue;

/// Размер поля `reserved` заголовка свипа.
pub const SWEEP_RESERVED_BYTES: usize = 15;

/// Заголовок одного свипа (фиксированный размер, перед выборками свипа).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepHeader {
    /// Метка времени свипа (мс с начала эпохи Unix)
    pub timestamp: u64,
    /// Широта, градусы
    pub latitude: f64,
    /// Долгота, градусы
    pub longitude: f64,
    /// Высота, метры
    pub altitude: f64,
    /// Флаг переполнения АЦП
    pub adc_overflow: u8,
    pub reserved: [u8; SWEEP_RESERVED_BYTES],
}

impl SweepHeader {
    /// Заголовок свипа без геопривязки.
    pub fn new(timestamp: u64) -> Self {
        SweepHeader {
            timestamp,
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            adc_overflow: 0,
            reserved: [0; SWEEP_RESERVED_BYTES],
        }
    }

    /// `true`, если во время свипа было переполнение АЦП.
    pub fn is_overflowed(&self) -> bool {
        self.adc_overflow != 0
    }

    /// Все поля в порядке объявления (включая `reserved`).
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("timestamp", FieldValue::U64(self.timestamp)),
            ("latitude", FieldValue::F64(self.latitude)),
            ("longitude", FieldValue::F64(self.longitude)),
            ("altitude", FieldValue::F64(self.altitude)),
            ("adcOverflow", FieldValue::U8(self.adc_overflow)),
            (
                "reserved",
                FieldValue::Text(format!("{:?}", self.reserved)),
            ),
        ]
    }
}
