use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use log::{debug, error, info, warn};

use crate::{convert_file, BatchMetrics, BatchSummary, ConvertConfig, ConvertResult};

/// Расширение входных файлов (без учёта регистра).
pub const SHR_EXTENSION: &str = "shr";

/// `true`, если у пути расширение `.shr` в любом регистре.
pub fn is_shr_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SHR_EXTENSION))
}

/// Собирает входные файлы. Файл принимается как есть, каталог обходится
/// рекурсивно. Результат отсортирован.
pub fn collect_shr_files(root: &Path) -> ConvertResult<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    walk(root, &mut files)?;
    files.sort();

    debug!("found {} SHR files under {}", files.len(), root.display());

    Ok(files)
}

fn walk(
    dir: &Path,
    out: &mut Vec<PathBuf>,
) -> ConvertResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            walk(&path, out)?;
        } else if is_shr_file(&path) {
            out.push(path);
        }
    }

    Ok(())
}

/// Параллельная конвертация набора файлов.
pub struct BatchConverter {
    config: ConvertConfig,
    metrics: Arc<BatchMetrics>,
    stop_flag: Arc<AtomicBool>,
}

impl BatchConverter {
    /// Создаёт конвертер. Возвращает также shared-ссылку на метрики.
    pub fn new(config: ConvertConfig) -> (Self, Arc<BatchMetrics>) {
        let metrics = BatchMetrics::new();
        let converter = Self {
            config,
            metrics: metrics.clone(),
            stop_flag: Arc::new(AtomicBool::new(false)),
        };

        (converter, metrics)
    }

    /// Флаг остановки. `true` прекращает выдачу новых файлов, начатые
    /// файлы дописываются.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Обрабатывает файлы на `jobs` потоках. Блокируется до завершения.
    ///
    /// Ошибка одного файла не прерывает пакет: она логируется и учитывается
    /// в сводке.
    pub fn run(
        &self,
        files: Vec<PathBuf>,
    ) -> BatchSummary {
        let started = Instant::now();
        let total = files.len();
        let jobs = self.config.jobs.clamp(1, total.max(1));

        info!(
            "Converting {total} files to {} with {jobs} worker(s)",
            self.config.output_format
        );

        let (tx, rx) = crossbeam_channel::bounded::<PathBuf>(jobs * 2);

        std::thread::scope(|scope| {
            for _ in 0..jobs {
                let rx = rx.clone();
                scope.spawn(move || {
                    for path in rx.iter() {
                        self.process(&path);
                    }
                });
            }
            drop(rx);

            for (queued, path) in files.into_iter().enumerate() {
                if self.stop_flag.load(Ordering::Relaxed) {
                    warn!(
                        "Stop requested, {} file(s) left unprocessed",
                        total - queued
                    );
                    break;
                }
                if tx.send(path).is_err() {
                    break;
                }
            }
            drop(tx);
        });

        self.metrics.summary(&started)
    }

    fn process(
        &self,
        path: &Path,
    ) {
        if let Ok(meta) = std::fs::metadata(path) {
            self.metrics
                .bytes_read
                .fetch_add(meta.len(), Ordering::Relaxed);
        }

        match convert_file(path, &self.config) {
            Ok(outputs) => {
                self.metrics.files_converted.fetch_add(1, Ordering::Relaxed);
                for output in outputs {
                    debug!("wrote {}", output.display());
                }
            }
            Err(e) if e.is_empty_sweep_set() => {
                self.metrics.files_skipped.fetch_add(1, Ordering::Relaxed);
                info!("{} does not contain sweep data, skipping", path.display());
            }
            Err(e) => {
                self.metrics.files_failed.fetch_add(1, Ordering::Relaxed);
                error!("Error processing {}: {e}", path.display());
            }
        }
    }
}
