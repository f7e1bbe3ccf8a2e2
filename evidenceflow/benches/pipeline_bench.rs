//! Benchmarks for the extraction hot path and a full in-memory run.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evidenceflow::audit::MemoryAuditSink;
use evidenceflow::extraction::html::{clean_html, PageHints};
use evidenceflow::extraction::parse::parse_model_response;
use evidenceflow::pipeline::PipelineBuilder;
use evidenceflow::testing::{
    MemoryReportGenerator, ScriptedModel, StaticEvidenceCollector, ACME_HTML, ACME_RESPONSE,
    PROSE_RESPONSE,
};
use std::sync::Arc;

fn extraction_benchmark(c: &mut Criterion) {
    c.bench_function("clean_html", |b| b.iter(|| clean_html(black_box(ACME_HTML))));

    let text = clean_html(ACME_HTML);
    c.bench_function("page_hints", |b| {
        b.iter(|| PageHints::from_text(black_box(&text)));
    });

    c.bench_function("parse_prose_response", |b| {
        b.iter(|| parse_model_response(black_box(PROSE_RESPONSE)));
    });
}

fn pipeline_benchmark(c: &mut Criterion) {
    let Ok(runtime) = tokio::runtime::Runtime::new() else {
        return;
    };

    c.bench_function("happy_path_run", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let pipeline = PipelineBuilder::new()
                    .with_collector(Arc::new(StaticEvidenceCollector::new(ACME_HTML)))
                    .with_model(Arc::new(ScriptedModel::replying(&[ACME_RESPONSE])))
                    .with_report_generator(Arc::new(MemoryReportGenerator::new()))
                    .with_audit_sink(Arc::new(MemoryAuditSink::new()))
                    .build();
                if let Ok(pipeline) = pipeline {
                    let _ = black_box(pipeline.run("https://acme.example").await);
                }
            });
        });
    });
}

criterion_group!(benches, extraction_benchmark, pipeline_benchmark);
criterion_main!(benches);
