// Criterion benchmarks for Mentor Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mentor_match::core::{HungarianSolver, Solver};
use mentor_match::{CostMatrix, MatchAssembler, Person};
use std::collections::BTreeSet;
use std::sync::Arc;

const ACTIVITIES: [&str; 6] = ["finance", "law", "research", "consulting", "industry", "public"];

fn create_person(id: usize, year: i32) -> Person {
    let activities: BTreeSet<String> = ACTIVITIES
        .iter()
        .enumerate()
        .filter(|(index, _)| (id + index) % 3 == 0)
        .map(|(_, activity)| activity.to_string())
        .collect();
    Person {
        first_name: format!("Person {}", id),
        last_name: String::new(),
        year: year + (id % 5) as i32,
        activities,
        motivations: BTreeSet::new(),
        english: id % 7 == 0,
    }
}

fn population(count: usize, year: i32) -> Arc<Vec<Person>> {
    Arc::new((0..count).map(|id| create_person(id, year)).collect())
}

fn bench_cost_matrix(c: &mut Criterion) {
    let criteria = Person::default_criteria();
    let mut group = c.benchmark_group("cost_matrix");

    for size in [10, 50, 100, 200].iter() {
        let mentees = population(*size, 2024);
        let mentors = population(*size, 2012);

        group.bench_with_input(BenchmarkId::new("build", size), size, |b, _| {
            b.iter(|| {
                CostMatrix::new(
                    black_box(Arc::clone(&mentees)),
                    black_box(Arc::clone(&mentors)),
                    criteria.progressive_criteria(),
                )
                .map(|matrix| matrix.with_necessary_criteria(criteria.necessary_criteria()))
            });
        });
    }

    group.finish();
}

fn bench_hungarian(c: &mut Criterion) {
    let solver = HungarianSolver::new();
    let mut group = c.benchmark_group("hungarian");

    for size in [10, 50, 100, 200].iter() {
        let costs: Vec<Vec<i32>> = (0..*size)
            .map(|i| (0..*size).map(|j| ((i * 37 + j * 101) % 997) as i32).collect())
            .collect();

        group.bench_with_input(BenchmarkId::new("solve", size), size, |b, _| {
            b.iter(|| solver.solve(black_box(&costs)));
        });
    }

    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let criteria = Person::default_criteria();
    let mentees = population(100, 2024);
    let mentors = population(80, 2012);

    c.bench_function("assemble_100_mentees_80_mentors", |b| {
        b.iter(|| {
            MatchAssembler::new(
                Arc::clone(&mentees),
                Arc::clone(&mentors),
                criteria.progressive_criteria(),
            )
            .map(|assembler| {
                assembler
                    .with_necessary_criteria(criteria.necessary_criteria())
                    .with_placeholder_persons(Person::placeholder("-"), Person::placeholder("-"))
            })
            .and_then(|assembler| assembler.build())
        });
    });
}

criterion_group!(benches, bench_cost_matrix, bench_hungarian, bench_assembly);

criterion_main!(benches);
