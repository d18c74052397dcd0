//! Пример: чтение SHR-файла
//!
//! Демонстрирует:
//! - разбор заголовка, заголовков свипов и выборок одним вызовом
//! - вычисление окна записи и оси частот

use shr_core::ShrFile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_path = "shr-core/test_output.shr";

    let shr = match ShrFile::open(input_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("✗ Failed to read {input_path}: {e}");
            return Err(Box::new(e));
        }
    };

    let h = &shr.header;
    println!("✓ Header decoded");
    println!("  Title         : {}", h.title);
    println!("  Sweeps        : {}", h.sweep_count);
    println!("  Bins / sweep  : {}", h.sweep_length);
    println!("  First bin     : {:.3} MHz", h.first_bin_freq_hz / 1e6);
    println!("  Bin size      : {:.3} kHz", h.bin_size_hz / 1e3);
    println!("  Amplitude     : {}", h.amplitude_unit());

    if !shr.has_sweeps() {
        println!("\nFile contains no sweep data");
        return Ok(());
    }

    let window = shr.acquisition_window()?;
    println!("\n✓ Acquisition window");
    println!("  Start         : {} ms", window.start_ms);
    println!("  End           : {} ms", window.end_ms);
    println!("  Interval      : {} ms (mode)", window.sweep_interval_ms);
    println!("  ADC overflows : {}", shr.overflow_count());

    // --- Первые 3 свипа: максимум амплитуды ---
    let axis = shr.frequency_axis();
    println!("\nFirst sweeps:");
    for (i, row) in shr.sweeps.iter().take(3).enumerate() {
        let (bin, peak) = row
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |acc, (b, v)| if v > acc.1 { (b, v) } else { acc });
        println!(
            "  [{i}] peak {peak:.1} {} @ {:.3} MHz",
            h.amplitude_unit(),
            axis[bin] / 1e6
        );
    }

    Ok(())
}
