//! Loader performance benchmarks.
//!
//! Measures parsing and type inference across file sizes and formats.

use std::io::Write;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use edastat::Loader;
use tempfile::NamedTempFile;

/// Generate synthetic TSV data with the specified number of rows and columns.
fn generate_tsv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    for i in 0..cols {
        if i > 0 {
            data.push('\t');
        }
        data.push_str(&format!("column_{}", i + 1));
    }
    data.push('\n');

    for row in 0..rows {
        for col in 0..cols {
            if col > 0 {
                data.push('\t');
            }
            match col % 5 {
                0 => data.push_str(&format!("{}", row)),
                1 => data.push_str(&format!("{:.2}", row as f64 * 1.5)),
                2 => data.push_str(&format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1)),
                3 => data.push_str(if row % 7 == 0 { "NA" } else { "true" }),
                4 => data.push_str(&format!("Category_{}", row % 10)),
                _ => unreachable!(),
            }
        }
        data.push('\n');
    }

    data
}

/// Same rows as JSON records.
fn generate_json_data(rows: usize) -> String {
    let records: Vec<serde_json::Value> = (0..rows)
        .map(|row| {
            serde_json::json!({
                "id": row,
                "value": row as f64 * 1.5,
                "label": format!("Category_{}", row % 10),
                "flag": (row % 7 != 0).then_some(true),
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}

fn temp_file(suffix: &str, data: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(suffix).unwrap();
    temp.write_all(data.as_bytes()).unwrap();
    temp
}

/// Benchmark loading delimited files of various sizes.
fn bench_load_delimited(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_delimited");

    for rows in [100, 1_000, 10_000] {
        let data = generate_tsv_data(rows, 10);
        group.throughput(Throughput::Bytes(data.len() as u64));

        let tsv = temp_file(".tsv", &data);
        group.bench_with_input(BenchmarkId::new("tsv_rows", rows), &tsv, |b, file| {
            b.iter(|| black_box(Loader::new().load_file(file.path()).unwrap()))
        });

        let csv = temp_file(".csv", &data.replace('\t', ","));
        group.bench_with_input(BenchmarkId::new("csv_rows", rows), &csv, |b, file| {
            b.iter(|| black_box(Loader::new().load_file(file.path()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark parsing JSON records.
fn bench_parse_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_json");

    for rows in [100, 1_000, 10_000] {
        let data = generate_json_data(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(Loader::new().parse_json(data).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load_delimited, bench_parse_json);
criterion_main!(benches);
