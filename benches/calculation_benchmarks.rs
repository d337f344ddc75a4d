//! Performance benchmarks for the Workforce Engine.
//!
//! This suite covers the monthly calculation path:
//! - Summary and salary for one employee, called directly
//! - The same path through the HTTP router
//! - A month-end report over 100 employees
//! - Scaling with the number of attendance records
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use workforce_engine::api::{AppState, MonthlyRequest, create_router};
use workforce_engine::calculation::{MonthlyActivity, compute_salary_record, summarize_month};
use workforce_engine::config::{ConfigLoader, PolicyConfig};
use workforce_engine::models::{
    AttendanceRecord, BreakRequest, BreakSource, BreakType, Employee, RequestStatus, Role,
    default_working_days,
};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    AppState::new(config)
}

fn employee(id: &str) -> Employee {
    Employee {
        id: id.to_string(),
        full_name: format!("Employee {}", id),
        email: format!("{}@example.com", id),
        role: Role::Employee,
        base_salary: Decimal::from(4200),
        working_days: default_working_days(),
        is_active: true,
    }
}

/// Weekday attendance for March 2026 with an approved lunch on each day.
fn create_activity(employee_id: &str, days: usize) -> MonthlyActivity {
    let dates: Vec<NaiveDate> = (1..=31)
        .filter_map(|d| NaiveDate::from_ymd_opt(2026, 3, d))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(days)
        .collect();

    let mut activity = MonthlyActivity::default();
    for (i, date) in dates.iter().enumerate() {
        let at = |h: u32, m: u32| {
            Utc.with_ymd_and_hms(date.year(), date.month(), date.day(), h, m, 0)
                .unwrap()
        };
        activity.attendance.push(AttendanceRecord {
            id: format!("att_{:03}", i),
            employee_id: employee_id.to_string(),
            date: *date,
            check_in: at(9, (i % 20) as u32),
            check_out: Some(at(17, 30)),
            notes: None,
        });
        activity.breaks.push(BreakRequest {
            id: format!("brk_{:03}", i),
            employee_id: employee_id.to_string(),
            date: *date,
            break_type: BreakType::Lunch,
            requested_start: at(12, 0),
            requested_end: at(12, 0) + Duration::minutes(30),
            approved_start: None,
            approved_end: None,
            status: RequestStatus::Approved,
            source: BreakSource::Employee,
            reason: None,
            reviewer_note: None,
        });
    }
    activity
}

fn create_request_body(employee_id: &str, days: usize) -> String {
    let emp = employee(employee_id);
    let activity = create_activity(employee_id, days);
    let request = serde_json::json!({
        "employee": {"id": emp.id, "base_salary": emp.base_salary},
        "year": 2026,
        "month": 3,
        "attendance": activity.attendance,
        "breaks": activity.breaks,
    });
    // Round-trip through the request type so a schema drift fails here.
    let request: MonthlyRequest = serde_json::from_value(request).expect("Failed to create request");
    serde_json::to_string(&request).unwrap()
}

/// Benchmark: summary and salary for one employee-month, no HTTP.
fn bench_monthly_salary(c: &mut Criterion) {
    let policy = PolicyConfig::default();
    let emp = employee("emp_bench_001");
    let activity = create_activity(&emp.id, 22);

    c.bench_function("monthly_salary", |b| {
        b.iter(|| {
            let summary =
                summarize_month(&emp, 2026, 3, black_box(&activity), &policy, None).unwrap();
            black_box(compute_salary_record(&summary, &emp, &policy).unwrap())
        })
    });
}

/// Benchmark: one salary calculation through the router.
fn bench_salary_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = create_request_body("emp_bench_001", 22);

    c.bench_function("salary_endpoint", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/salary/calculate")
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

/// Benchmark: a month-end run over 100 employees.
fn bench_batch_100(c: &mut Criterion) {
    let policy = PolicyConfig::default();
    let staff: Vec<(Employee, MonthlyActivity)> = (0..100)
        .map(|i| {
            let emp = employee(&format!("emp_batch_{:03}", i));
            let activity = create_activity(&emp.id, 12 + i % 11);
            (emp, activity)
        })
        .collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100", |b| {
        b.iter(|| {
            let records: Vec<_> = staff
                .iter()
                .map(|(emp, activity)| {
                    let summary = summarize_month(emp, 2026, 3, activity, &policy, None).unwrap();
                    compute_salary_record(&summary, emp, &policy).unwrap()
                })
                .collect();
            black_box(records)
        })
    });

    group.finish();
}

/// Benchmark: various attendance counts to understand scaling behavior.
fn bench_scaling(c: &mut Criterion) {
    let policy = PolicyConfig::default();
    let emp = employee("emp_scale_001");

    let mut group = c.benchmark_group("scaling");

    for days in [1usize, 5, 10, 22].iter() {
        let activity = create_activity(&emp.id, *days);

        group.throughput(Throughput::Elements(*days as u64));
        group.bench_with_input(BenchmarkId::new("days", days), days, |b, _| {
            b.iter(|| {
                black_box(summarize_month(&emp, 2026, 3, &activity, &policy, None).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_monthly_salary,
    bench_salary_endpoint,
    bench_batch_100,
    bench_scaling,
);
criterion_main!(benches);
