//! Benchmark for faceted plot building and rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trueno_multivar::datasets;
use trueno_multivar::grammar::{Aes, Facet, GGPlot, Geom};
use trueno_multivar::summary::group_summary;

fn salaries_plot(facet: Facet) -> GGPlot {
    GGPlot::new()
        .data(datasets::load("Salaries").unwrap())
        .aes(Aes::new().x("yrs.since.phd").y("salary").color("rank"))
        .geom(Geom::point())
        .facet(facet)
}

fn facet_build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("facet_build");

    let facets = [
        ("none", Facet::none()),
        ("wrap_rank", Facet::wrap(&["rank"])),
        ("grid_sex_discipline", Facet::grid(&["sex"], &["discipline"])),
        ("grid_rank_discipline", Facet::grid(&[], &["rank", "discipline"])),
    ];
    for (name, facet) in facets {
        let plot = salaries_plot(facet);
        group.bench_with_input(BenchmarkId::from_parameter(name), &plot, |b, plot| {
            b.iter(|| black_box(plot.clone().build().unwrap()));
        });
    }

    group.finish();
}

fn facet_render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("facet_render");

    let built = salaries_plot(Facet::wrap(&["rank"]).ncol(1)).dimensions(800, 600).build().unwrap();
    group.bench_function("framebuffer_800x600", |b| {
        b.iter(|| black_box(built.to_framebuffer().unwrap()));
    });
    group.bench_function("svg_800x600", |b| {
        b.iter(|| black_box(built.to_svg().unwrap().render()));
    });

    group.finish();
}

fn summary_benchmark(c: &mut Criterion) {
    let salaries = datasets::load("Salaries").unwrap();
    c.bench_function("group_summary_sex_rank_discipline", |b| {
        b.iter(|| {
            black_box(group_summary(&salaries, &["sex", "rank", "discipline"], "salary").unwrap())
        });
    });
}

criterion_group!(benches, facet_build_benchmark, facet_render_benchmark, summary_benchmark);
criterion_main!(benches);
