use std::{
    path::{Path, PathBuf},
    sync::atomic::Ordering,
    time::Instant,
};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::{error, info, warn, LevelFilter};
use shr_convert::{
    collect_shr_files, default_jobs, BatchConverter, ConvertConfig, FileReport, OutputFormat,
};

#[derive(Parser, Debug)]
#[command(
    name = "shr-convert",
    version = env!("CARGO_PKG_VERSION"),
    about = "Convert SHR spectrum sweep recordings to FITS or CSV",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Рабочих потоков (по умолчанию: число CPU, не больше 8)
    #[arg(short, long, global = true)]
    jobs: Option<usize>,
    /// Тихий режим (только ошибки)
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Подробный вывод (по записям)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Конвертировать файл или каталог в FITS
    Fits {
        /// .shr файл или каталог (обходится рекурсивно)
        path: PathBuf,
        /// Писать изображение без тайлового GZIP сжатия
        #[arg(long)]
        no_compress: bool,
        /// Каталог для результатов (по умолчанию рядом с входным файлом)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Конвертировать файл или каталог в пару CSV (_header, _sweep)
    Csv {
        path: PathBuf,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Показать заголовок и окно записи
    Info {
        path: PathBuf,
        /// Вывести JSON вместо таблицы
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let jobs = cli.jobs.unwrap_or_else(default_jobs);

    let (path, config) = match cli.command {
        Command::Info { path, json } => return print_info(&path, json),
        Command::Fits {
            path,
            no_compress,
            output_dir,
        } => (
            path,
            ConvertConfig {
                output_format: OutputFormat::Fits,
                compress: !no_compress,
                output_dir,
                jobs,
            },
        ),
        Command::Csv { path, output_dir } => (
            path,
            ConvertConfig {
                output_format: OutputFormat::Csv,
                compress: false,
                output_dir,
                jobs,
            },
        ),
    };

    config.validate()?;
    let files = collect_shr_files(&path)
        .with_context(|| format!("failed to scan {}", path.display()))?;

    if files.is_empty() {
        warn!("No .shr files found under {}", path.display());
        return Ok(());
    }

    let (converter, _) = BatchConverter::new(config.clone());
    let stop_ctrlc = converter.stop_flag();

    if let Err(e) = ctrlc::set_handler(move || {
        if stop_ctrlc.swap(true, Ordering::SeqCst) {
            // Второй Ctrl+C: принудительный выход
            warn!("Force exit");
            std::process::exit(130);
        }
        warn!("Ctrl+C received, finishing files in progress...");
    }) {
        warn!("Failed to set Ctrl+C handler: {e}");
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Input         : {}", path.display());
    info!("  Files         : {}", files.len());
    info!("  Format        : {}", config.output_format);
    if config.output_format == OutputFormat::Fits {
        info!(
            "  Compression   : {}",
            if config.compress { "GZIP_1" } else { "none" }
        );
    }
    info!(
        "  Output dir    : {}",
        config
            .output_dir
            .as_deref()
            .map_or_else(|| "next to input".to_string(), |d| d.display().to_string())
    );
    info!("  Jobs          : {}", config.jobs);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let summary = converter.run(files);
    info!("\n{summary}");

    if !summary.is_success() {
        bail!("{} file(s) failed to convert", summary.failed);
    }

    info!("✓ Conversion complete");

    Ok(())
}

fn print_info(
    path: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let files = collect_shr_files(path)
        .with_context(|| format!("failed to scan {}", path.display()))?;
    let mut failed = 0usize;

    for file in &files {
        match FileReport::from_path(file) {
            Ok(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
            Ok(report) => println!("{report}"),
            Err(e) => {
                failed += 1;
                error!("Error reading {}: {e}", file.display());
            }
        }
    }

    info!(
        "Inspected {} file(s) in {:.1}s",
        files.len(),
        started.elapsed().as_secs_f64()
    );

    if failed > 0 {
        bail!("{failed} file(s) could not be read");
    }

    Ok(())
}
