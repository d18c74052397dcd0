//! Пример: запись SHR-файла через ShrWriter
//!
//! Демонстрирует:
//! - создание заголовка и ShrWriter
//! - генерацию синтетических свипов (шумовая полка + узкий пик)
//! - автоматическое обновление sweepCount при finish()

use std::fs::File;

use shr_core::{FileHeader, ShrWriter, SweepHeader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = "shr-core/test_output.shr";

    // --- Заголовок: 2.4–2.5 ГГц, 1000 бинов по 100 кГц ---
    let mut header = FileHeader::new(1_000, 2_400_000_000.0, 100_000.0);
    header.title = "Synthetic ISM sweep".to_string();
    header.rbw_hz = 100_000.0;
    header.vbw_hz = 100_000.0;
    header.ref_level = -20.0;
    header.div = 10.0;

    let sweep_length = header.sweep_length as usize;

    // --- ShrWriter ---
    let file = File::create(output_path)?;
    let mut writer = ShrWriter::new(file, header)?;

    let num_sweeps = 120u64;
    let start_ms = 1_704_067_200_000u64; // 2024-01-01 00:00:00 UTC

    for sweep_idx in 0..num_sweeps {
        // Пик медленно дрейфует по полосе
        let peak = (sweep_idx as usize * 7) % sweep_length;
        let row: Vec<f32> = (0..sweep_length)
            .map(|bin| {
                let d = bin.abs_diff(peak) as f32;
                -95.0 + 60.0 * (-d * d / 8.0).exp()
            })
            .collect();

        let sweep = SweepHeader::new(start_ms + sweep_idx * 250);
        writer.write_sweep(&sweep, &row)?;
    }

    writer.finish()?;

    println!("✓ Записано: {output_path}");
    println!("  Sweeps   : {num_sweeps}");
    println!("  Bins     : {sweep_length}");

    Ok(())
}
