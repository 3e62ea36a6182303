//! Performance benchmarks for the HRMS engine.
//!
//! Covers the pure calculation path and the HTTP routes on top of it:
//! - CTC decomposition alone
//! - Full payroll calculation (decomposition, both regimes, recommendation)
//! - `POST /payroll/calculate` through the router
//! - Attendance import batches of increasing size
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use hrms_engine::api::{create_router, AppState};
use hrms_engine::calculation::{calculate_payroll, decompose_salary};
use hrms_engine::config::ConfigLoader;
use hrms_engine::models::SalaryInput;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/in_payroll").expect("Failed to load config")
}

/// Creates an import body with `row_count` rows spread over 20 employees.
fn create_import_body(row_count: usize) -> String {
    let rows: Vec<serde_json::Value> = (0..row_count)
        .map(|i| {
            serde_json::json!({
                "employee_id": format!("EMP{:03}", i % 20),
                "name": format!("Employee {}", i % 20),
                "status": "Present",
                "date": 45292 + (i / 20),
                "in_time": "09:00",
                "out_time": "17:30"
            })
        })
        .collect();
    serde_json::json!({ "source_file": "attendance.xlsx", "rows": rows }).to_string()
}

fn bench_decompose_salary(c: &mut Criterion) {
    let loader = load_config();
    let input = SalaryInput::new(Decimal::from(1_000_000), "Mumbai");

    c.bench_function("decompose_salary", |b| {
        b.iter(|| {
            black_box(decompose_salary(
                black_box(&input),
                loader.salary_structure(),
                1,
            ))
        })
    });
}

fn bench_calculate_payroll(c: &mut Criterion) {
    let loader = load_config();
    let mut group = c.benchmark_group("calculate_payroll");

    for ctc in [300_000i64, 1_000_000, 5_000_000] {
        let input = SalaryInput::new(Decimal::from(ctc), "Bengaluru");
        group.bench_with_input(BenchmarkId::new("ctc", ctc), &input, |b, input| {
            b.iter(|| black_box(calculate_payroll(input, loader.config())))
        });
    }

    group.finish();
}

/// Benchmark: a single payroll request through the router.
fn bench_payroll_route(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(load_config()).unwrap());
    let body = r#"{ "ctc": "1000000", "city": "Mumbai" }"#;

    c.bench_function("payroll_route", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll/calculate")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: attendance import scaling. Every iteration after the first
/// updates existing records, which is the common re-upload case.
fn bench_import_scaling(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("attendance_import");

    for row_count in [10usize, 100, 1000] {
        let router = create_router(AppState::new(load_config()).unwrap());
        let body = create_import_body(row_count);

        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &row_count, |b, _| {
            b.to_async(&rt).iter(|| async {
                let router = router.clone();
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/attendance/import")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body.clone()))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(response)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_decompose_salary,
    bench_calculate_payroll,
    bench_payroll_route,
    bench_import_scaling,
);
criterion_main!(benches);
