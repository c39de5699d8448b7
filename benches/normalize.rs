//! Benchmarks for response normalization.
//!
//! Normalization runs on every backend reply, so it should stay far below
//! the cost of the OCR call itself even for long multi-page documents.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ocr_router::normalize::Normalizer;
use ocr_router::registry::{BackendDescriptor, BackendFamily, Registry};
use serde_json::json;

fn create_normalizer() -> Normalizer {
    let registry = Registry::from_descriptors(vec![
        BackendDescriptor::new("deepseek-ocr", "DeepSeek OCR", "http://a", BackendFamily::DeepSeek),
        BackendDescriptor::new("mineru", "Mineru", "http://b", BackendFamily::Mineru),
    ])
    .unwrap();
    Normalizer::from_registry(&registry)
}

/// DeepSeek PDF reply without a native markdown field, so pages are joined.
fn deepseek_pdf_body(page_count: usize) -> String {
    let pages: Vec<_> = (1..=page_count)
        .map(|p| {
            json!({
                "page": p,
                "raw_output": format!("<|ref|>Heading {p}<|/ref|><|det|>[[0,0,10,10]]<|/det|> body text {p}<|endoftext|>")
            })
        })
        .collect();

    json!({
        "success": true,
        "raw_result": {
            "deepseek": {"pages": pages, "total_pages": page_count},
            "mineru": {}
        },
        "markdown": "",
        "processing_time": 10.0
    })
    .to_string()
}

fn mineru_pdf_body(page_count: usize) -> String {
    let pdf_info: Vec<_> = (0..page_count).map(|p| json!({"page_idx": p})).collect();
    json!({
        "success": true,
        "raw_result": {
            "deepseek": "",
            "mineru": {"middle_json": {"pdf_info": pdf_info}, "model_output": []}
        },
        "markdown": "# Report\n\n".repeat(page_count),
        "processing_time": 10.0
    })
    .to_string()
}

fn bench_normalize_by_page_count(c: &mut Criterion) {
    let normalizer = create_normalizer();
    let mut group = c.benchmark_group("normalize_pdf");

    for pages in [1, 10, 50, 200] {
        let deepseek = deepseek_pdf_body(pages);
        let mineru = mineru_pdf_body(pages);

        group.bench_with_input(BenchmarkId::new("deepseek", pages), &deepseek, |b, body| {
            b.iter(|| black_box(normalizer.normalize("deepseek-ocr", body).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("mineru", pages), &mineru, |b, body| {
            b.iter(|| black_box(normalizer.normalize("mineru", body).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize_by_page_count);
criterion_main!(benches);
