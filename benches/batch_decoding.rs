//! Benchmarks for multipart batch encoding and decoding
//!
//! Run with: cargo bench --bench batch_decoding

use async_fcm::multipart::MultipartBatchRequest;
use async_fcm::{RawResponse, ResponseDecoder};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::json;

const BOUNDARY: &str = "batch_llG_9dniIyeFXPERplIRPwpVYtn3RBa4";

/// A provider-style batch response with every fifth part failing.
fn batch_response(parts: usize) -> RawResponse {
    let mut body = String::from("\r\n");
    for i in 0..parts {
        let (status, json) = if i % 5 == 4 {
            (
                "HTTP/1.1 404 Not Found",
                r#"{"error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND", "details": [{"@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError", "errorCode": "UNREGISTERED"}]}}"#.to_string(),
            )
        } else {
            (
                "HTTP/1.1 200 OK",
                format!("{{\n  \"name\": \"projects/bench/messages/0:{}\"\n}}\n", i),
            )
        };
        body.push_str(&format!(
            "--{}\r\nContent-Type: application/http\r\nContent-ID: response-{}\r\n\r\n{}\r\n\
             Content-Type: application/json; charset=UTF-8\r\nVary: Origin\r\n\r\n{}\r\n",
            BOUNDARY, i, status, json
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&format!("multipart/mixed; boundary={}", BOUNDARY)).unwrap(),
    );
    RawResponse::new(200, headers, body)
}

fn bench_decode_batch(c: &mut Criterion) {
    let decoder = ResponseDecoder::new();
    let mut group = c.benchmark_group("decode_batch");

    for parts in [1usize, 50, 500] {
        let resp = batch_response(parts);
        group.throughput(Throughput::Bytes(resp.body().len() as u64));
        group.bench_with_input(BenchmarkId::new("parts", parts), &resp, |b, resp| {
            b.iter(|| {
                let batch = decoder.decode_batch(black_box(resp)).unwrap();
                black_box(batch)
            })
        });
    }

    group.finish();
}

fn bench_encode_batch(c: &mut Criterion) {
    let payload = json!({
        "message": {
            "token": "device-token",
            "notification": {"title": "Hello", "body": "World"}
        },
        "validate_only": false
    });
    let mut group = c.benchmark_group("encode_batch");

    group.bench_function("500_parts", |b| {
        b.iter(|| {
            let mut batch = MultipartBatchRequest::new();
            for _ in 0..500 {
                batch.push_json(
                    "/v1/projects/bench/messages:send",
                    &[("Authorization", "Bearer token")],
                    black_box(&payload),
                );
            }
            black_box(batch.to_body())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_decode_batch, bench_encode_batch);
criterion_main!(benches);
