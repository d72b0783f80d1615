// Benchmark for the scheduling grid's hot paths
// Measures day layout and conflict validation over a busy schedule

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::{NaiveDate, NaiveTime};

use salon_scheduler::grid::conflict::{self, DurationLimits};
use salon_scheduler::grid::drag::CandidateInterval;
use salon_scheduler::grid::layout::layout_day;
use salon_scheduler::grid::slots::DayAvailability;
use salon_scheduler::models::appointment::Appointment;
use salon_scheduler::models::availability::StaffAvailability;
use salon_scheduler::models::settings::GridSettings;
use salon_scheduler::utils::time::local_at;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn availability(staff_id: i64) -> DayAvailability {
    DayAvailability::from_staff(
        &StaffAvailability::new(
            staff_id,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            vec![],
        )
        .unwrap(),
    )
}

/// Back-to-back half-hour bookings for each staff member.
fn busy_day(staff_count: i64, per_staff: i64) -> Vec<Appointment> {
    let mut appointments = Vec::new();
    let mut id = 1;
    for staff_id in 1..=staff_count {
        for slot in 0..per_staff {
            let start = 540 + slot * 30;
            let mut appointment = Appointment::new(
                staff_id,
                local_at(day(), start).unwrap(),
                local_at(day(), start + 30).unwrap(),
            )
            .unwrap();
            appointment.id = Some(id);
            id += 1;
            appointments.push(appointment);
        }
    }
    appointments
}

fn bench_layout(c: &mut Criterion) {
    let settings = GridSettings::default();
    let mut group = c.benchmark_group("layout_day");

    for staff_count in [2i64, 8, 16] {
        let staff_ids: Vec<i64> = (1..=staff_count).collect();
        let appointments = busy_day(staff_count, 12);
        group.bench_with_input(
            BenchmarkId::from_parameter(staff_count),
            &staff_count,
            |b, _| {
                b.iter(|| {
                    layout_day(
                        black_box(&staff_ids),
                        availability,
                        black_box(&appointments),
                        None,
                        &settings,
                        None,
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let appointments = busy_day(1, 14);
    let day_availability = availability(1);
    let candidate = CandidateInterval {
        start: local_at(day(), 600).unwrap(),
        end: local_at(day(), 645).unwrap(),
    };

    c.bench_function("validate_busy_day", |b| {
        b.iter(|| {
            conflict::validate(
                black_box(&candidate),
                1,
                Some(3),
                black_box(&appointments),
                &day_availability,
                DurationLimits::default(),
            )
        })
    });
}

criterion_group!(benches, bench_layout, bench_validate);
criterion_main!(benches);
