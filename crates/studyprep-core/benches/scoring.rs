use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;

use studyprep_core::model::{timestamp, AnswerRecord, GradingMode};
use studyprep_core::scoring::score_for_week;
use studyprep_core::statistics::analyze;

fn make_log(weeks: u32, per_week: usize) -> Vec<AnswerRecord> {
    let now = timestamp::now();
    (1..=weeks)
        .flat_map(|week| {
            (0..per_week).map(move |i| AnswerRecord {
                timestamp: now,
                week,
                question_index: i,
                question: format!("q{i}"),
                user_answer: "a".into(),
                correct: if i % 5 == 0 { None } else { Some(i % 2 == 0) },
                grading: if i % 5 == 0 {
                    GradingMode::ManualReview
                } else {
                    GradingMode::Auto
                },
                source: "bench".into(),
            })
        })
        .collect()
}

fn make_scores(weeks: u32) -> IndexMap<String, f64> {
    (1..=weeks)
        .map(|w| (w.to_string(), (w * 37 % 101) as f64))
        .collect()
}

fn bench_score_for_week(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_for_week");

    let small = make_log(12, 10);
    group.bench_function("12 weeks x 10 answers", |b| {
        b.iter(|| score_for_week(black_box(6), black_box(&small)))
    });

    let large = make_log(52, 200);
    group.bench_function("52 weeks x 200 answers", |b| {
        b.iter(|| score_for_week(black_box(26), black_box(&large)))
    });

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for weeks in [4, 16, 52] {
        let scores = make_scores(weeks);
        group.bench_function(format!("{weeks} weeks"), |b| {
            b.iter(|| analyze(black_box(&scores)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_score_for_week, bench_analyze);
criterion_main!(benches);
