//! Пропускная способность разбора SHR и выгрузки в FITS / CSV.
//!
//! Запуск:
//!   cargo bench -p shr-benchmark

use std::{hint::black_box, io::Cursor};

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use shr_convert::{fits::write_fits, tabular::write_sweep_csv};
use shr_core::{FileHeader, ShrFile, ShrWriter, SweepHeader};

/// Синтетический файл: шумовой пол около -100 дБ, свипы через 250 мс.
fn synth_file(
    sweeps: usize,
    bins: u32,
) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut header = FileHeader::new(bins, 2.4e9, 100e3);
    header.title = "bench".into();

    let mut writer = ShrWriter::new(Cursor::new(Vec::new()), header).unwrap();
    let mut row = vec![0f32; bins as usize];

    for i in 0..sweeps {
        row.iter_mut()
            .for_each(|v| *v = -100.0 + rng.gen::<f32>() * 6.0);
        writer
            .write_sweep(&SweepHeader::new(1_704_067_200_000 + i as u64 * 250), &row)
            .unwrap();
    }

    writer.finish().unwrap().into_inner()
}

const SHAPES: [(usize, u32); 3] = [(100, 1_000), (500, 4_096), (2_000, 1_024)];

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("shr_decode");

    for (sweeps, bins) in SHAPES {
        let raw = synth_file(sweeps, bins);
        group.throughput(Throughput::Bytes(raw.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("read", format!("{sweeps}x{bins}")),
            &raw,
            |b, raw| {
                b.iter(|| {
                    let mut cur = Cursor::new(raw.as_slice());
                    black_box(ShrFile::read(&mut cur).unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("shr_export");
    group.sample_size(20);

    let (sweeps, bins) = SHAPES[0];
    let shr = ShrFile::read(&mut Cursor::new(synth_file(sweeps, bins))).unwrap();
    group.throughput(Throughput::Elements((sweeps * bins as usize) as u64));

    for compress in [false, true] {
        let label = if compress { "gzip" } else { "raw" };

        group.bench_function(BenchmarkId::new("fits", label), |b| {
            b.iter(|| {
                let mut out = Vec::new();
                write_fits(&mut out, &shr, "bench.shr", compress, Utc::now()).unwrap();
                black_box(out)
            });
        });
    }

    group.bench_function("csv_sweeps", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            write_sweep_csv(&mut out, &shr).unwrap();
            black_box(out)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_export);
criterion_main!(benches);
