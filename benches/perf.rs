use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use atp_terminal::career::compute_career_stats;
use atp_terminal::dataset::{mock_dataset, parse_csv_reader};
use atp_terminal::head_to_head::compute_head_to_head;
use atp_terminal::match_record::{MatchStore, YearRange, select_head_to_head};
use atp_terminal::matrix::head_to_head_diff;
use atp_terminal::trend::compute_cumulative_trend;

const P1: &str = "Roger Federer";
const P2: &str = "Rafael Nadal";

fn sample_store() -> MatchStore {
    mock_dataset(99, 50_000).store
}

fn sample_csv(store: &MatchStore) -> String {
    let mut out = String::from("Tournament,Date,Surface,Round,Player_1,Player_2,Winner\n");
    for r in store.records() {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            r.tournament.as_deref().unwrap_or_default(),
            r.date.format("%Y-%m-%d"),
            r.surface.as_deref().unwrap_or_default(),
            r.round.as_deref().unwrap_or_default(),
            r.player_a,
            r.player_b,
            r.winner
        ));
    }
    out
}

fn bench_career(c: &mut Criterion) {
    let store = sample_store();
    c.bench_function("career_stats", |b| {
        b.iter(|| {
            let stats = compute_career_stats(black_box(store.records()), P1);
            black_box(stats.map(|s| s.total_wins));
        })
    });
}

fn bench_head_to_head(c: &mut Criterion) {
    let store = sample_store();
    c.bench_function("head_to_head_full", |b| {
        b.iter(|| {
            let records = black_box(store.records());
            let h2h = compute_head_to_head(records, P1, P2);
            let meetings = select_head_to_head(records, P1, P2);
            let trend = compute_cumulative_trend(&meetings, P1, P2);
            let matrix = head_to_head_diff(&meetings, P1, P2);
            black_box((h2h, trend.points.len(), matrix.is_ok()));
        })
    });
}

fn bench_era_filter(c: &mut Criterion) {
    let store = sample_store();
    c.bench_function("era_filter", |b| {
        b.iter(|| {
            let window = store.filter_years(black_box(YearRange::new(2008, 2012)));
            black_box(window.len());
        })
    });
}

fn bench_csv_parse(c: &mut Criterion) {
    let raw = sample_csv(&mock_dataset(5, 10_000).store);
    c.bench_function("csv_parse", |b| {
        b.iter(|| {
            let (records, _) = parse_csv_reader(black_box(raw.as_bytes())).unwrap();
            black_box(records.len());
        })
    });
}

criterion_group!(
    benches,
    bench_career,
    bench_head_to_head,
    bench_era_filter,
    bench_csv_parse
);
criterion_main!(benches);
