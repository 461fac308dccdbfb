// Criterion benchmarks for Canje Engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use canje_engine::core::{normalize, DistressedAnalyzer, MatchScorer};
use canje_engine::models::{Property, PropertyStatus, PropertyType, Requirement, RequirementPriority};
use rust_decimal::Decimal;

const COMUNAS: [&str; 6] = ["Las Condes", "Vitacura", "Providencia", "Ñuñoa", "Temuco", "Concón"];

fn create_property() -> Property {
    Property {
        id: "bench_property".to_string(),
        owner_id: "broker_a".to_string(),
        title: "Casa en Las Condes".to_string(),
        description: None,
        price: Decimal::from(420_000_000),
        currency: "CLP".to_string(),
        location: "Av. Apoquindo 3000, Las Condes".to_string(),
        latitude: Some(-33.4150),
        longitude: Some(-70.5830),
        property_type: PropertyType::House,
        bedrooms: Some(4),
        bathrooms: Some(3),
        square_meters: Some(180),
        status: PropertyStatus::Active,
        is_distressed: false,
        opportunity_score: None,
        internal_notes: None,
        created_at: None,
    }
}

fn create_requirement(id: usize) -> Requirement {
    Requirement {
        id: format!("req_{}", id),
        user_id: format!("broker_{}", id % 7),
        budget_max: Decimal::from(300_000_000 + (id as i64 % 20) * 10_000_000),
        currency: "CLP".to_string(),
        zone_interest: COMUNAS
            .iter()
            .cycle()
            .skip(id % COMUNAS.len())
            .take(1 + id % 3)
            .map(|z| z.to_string())
            .collect(),
        property_types: vec![PropertyType::House],
        min_bedrooms: Some((id % 5) as i32),
        min_bathrooms: Some((id % 4) as i32),
        min_square_meters: None,
        priority: RequirementPriority::Medium,
        is_active: true,
        exchange_notes: None,
    }
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box("Irarrázaval 2000, Ñuñoa")));
    });
}

fn bench_score(c: &mut Criterion) {
    let scorer = MatchScorer::default();
    let property = create_property();
    let requirement = create_requirement(0);

    c.bench_function("match_score", |b| {
        b.iter(|| scorer.score(black_box(&property), black_box(&requirement)));
    });
}

fn bench_distressed(c: &mut Criterion) {
    let analyzer = DistressedAnalyzer::default();
    let property = create_property();

    c.bench_function("distressed_analysis", |b| {
        b.iter(|| analyzer.analyze(black_box(&property)));
    });
}

fn bench_candidate_scoring(c: &mut Criterion) {
    let scorer = MatchScorer::default();
    let property = create_property();

    let mut group = c.benchmark_group("candidate_scoring");

    for candidate_count in [10, 100, 1000].iter() {
        let candidates: Vec<Requirement> = (0..*candidate_count).map(create_requirement).collect();

        group.bench_with_input(
            BenchmarkId::new("score_and_filter", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    let matched: Vec<_> = candidates
                        .iter()
                        .map(|r| (r, scorer.score(&property, r)))
                        .filter(|(_, score)| *score >= 40)
                        .collect();
                    black_box(matched)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_score,
    bench_distressed,
    bench_candidate_scoring
);

criterion_main!(benches);
