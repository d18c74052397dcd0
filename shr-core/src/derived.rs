//! Производные метаданные: окно записи и ось частот.

use std::collections::BTreeMap;

use shr_types::{FileHeader, ShrError, ShrResult, SweepHeader};

/// Интервал времени, покрытый свипами файла.
///
/// Конец окна: метка последнего свипа плюс типичный (модальный) интервал
/// между свипами. Мода устойчива к редким большим разрывам из-за
/// пропущенных свипов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionWindow {
    /// Метка первого свипа, мс
    pub start_ms: u64,
    /// Метка последнего свипа + `sweep_interval_ms`, мс
    pub end_ms: u64,
    /// Модальный интервал между соседними свипами, мс
    pub sweep_interval_ms: i64,
}

impl AcquisitionWindow {
    /// Вычисляет окно по заголовкам свипов в порядке файла.
    ///
    /// Один свип даёт нулевой интервал (`end == start`).
    pub fn from_sweep_headers(sweeps: &[SweepHeader]) -> ShrResult<Self> {
        let (first, last) = match (sweeps.first(), sweeps.last()) {
            (Some(f), Some(l)) => (f.timestamp, l.timestamp),
            _ => {
                return Err(ShrError::EmptySweepSet {
                    sweep_count: 0,
                    sweep_length: 0,
                })
            }
        };

        let deltas = timestamp_deltas(sweeps);
        let sweep_interval_ms = modal_value(&deltas).unwrap_or(0);

        Ok(Self {
            start_ms: first,
            end_ms: last.saturating_add_signed(sweep_interval_ms),
            sweep_interval_ms,
        })
    }

    pub fn start_secs(&self) -> f64 {
        self.start_ms as f64 / 1e3
    }

    pub fn end_secs(&self) -> f64 {
        self.end_ms as f64 / 1e3
    }

    pub fn sweep_interval_secs(&self) -> f64 {
        self.sweep_interval_ms as f64 / 1e3
    }

    /// Длительность окна, мс.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Разности меток соседних свипов (со знаком).
pub fn timestamp_deltas(sweeps: &[SweepHeader]) -> Vec<i64> {
    sweeps
        .windows(2)
        .map(|w| w[1].timestamp.wrapping_sub(w[0].timestamp) as i64)
        .collect()
}

/// Статистическая мода: самое частое значение, при равенстве меньшее.
pub fn modal_value<T: Ord + Copy>(values: &[T]) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();

    for &v in values {
        *counts.entry(v).or_default() += 1;
    }

    // BTreeMap обходится по возрастанию: строгое `>` оставляет меньшее при равенстве
    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value)
}

/// Частоты бинов: `firstBinFreqHz + i * binSizeHz`, `i ∈ [0, sweepLength)`.
pub fn frequency_axis(header: &FileHeader) -> Vec<f64> {
    (0..header.sweep_length as usize)
        .map(|i| header.bin_frequency(i))
        .collect()
}
