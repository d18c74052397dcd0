use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

/// Счётчики пакета, обновляемые lock-free из рабочих потоков.
#[derive(Debug, Default)]
pub struct BatchMetrics {
    pub files_converted: AtomicU64,
    pub files_skipped: AtomicU64,
    pub files_failed: AtomicU64,
    /// Суммарный размер входных файлов
    pub bytes_read: AtomicU64,
}

/// Snapshot метрик для отображения / тестирования.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub duration_secs: f64,
    pub converted: u64,
    pub skipped: u64,
    pub failed: u64,
    pub bytes_read: u64,
    pub read_speed_mbps: f64,
}

impl BatchMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Скорость чтения входных файлов в МБ/с.
    pub fn read_speed_mbps(
        &self,
        elapsed: &Instant,
    ) -> f64 {
        let secs = elapsed.elapsed().as_secs_f64();

        if secs < 1e-9 {
            return 0.0;
        }

        self.bytes_read.load(Ordering::Relaxed) as f64 / secs / 1_000_000.0
    }

    /// Сколько файлов уже обработано (в любом исходе).
    pub fn processed(&self) -> u64 {
        self.files_converted.load(Ordering::Relaxed)
            + self.files_skipped.load(Ordering::Relaxed)
            + self.files_failed.load(Ordering::Relaxed)
    }

    /// Итоговая сводка для вывода в конце пакета.
    pub fn summary(
        &self,
        elapsed: &Instant,
    ) -> BatchSummary {
        BatchSummary {
            duration_secs: elapsed.elapsed().as_secs_f64(),
            converted: self.files_converted.load(Ordering::Relaxed),
            skipped: self.files_skipped.load(Ordering::Relaxed),
            failed: self.files_failed.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            read_speed_mbps: self.read_speed_mbps(elapsed),
        }
    }
}

impl BatchSummary {
    /// `true`, если ни один файл не упал с ошибкой.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.1}s", self.duration_secs)?;
        writeln!(f, "  Converted     : {}", self.converted)?;
        writeln!(f, "  Skipped       : {} (no sweeps)", self.skipped)?;
        writeln!(f, "  Failed        : {}", self.failed)?;
        writeln!(
            f,
            "  Bytes read    : {:.1} MB",
            self.bytes_read as f64 / 1e6
        )?;
        writeln!(f, "  Read speed    : {:.1} MB/s", self.read_speed_mbps)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
