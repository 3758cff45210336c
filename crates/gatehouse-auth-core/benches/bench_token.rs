//! Benchmarks for token issuance and validation hot paths

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use gatehouse_auth_core::{fingerprint, AuthConfig, TokenCodec, TokenKind};
use gatehouse_types::{PrincipalId, RoleTag, SessionId};

fn codec() -> TokenCodec {
    let config =
        AuthConfig::try_new("bench-secret-that-is-long-enough!", "gatehouse").unwrap();
    TokenCodec::new(&config)
}

fn bench_token_issue(c: &mut Criterion) {
    let codec = codec();
    let id = PrincipalId::new();
    let role = RoleTag::from("member");
    let ttl = Duration::from_secs(900);

    let mut group = c.benchmark_group("token_issue");

    group.bench_function("access", |b| {
        b.iter(|| codec.issue_access(black_box(id), black_box(&role), ttl));
    });

    let sid = SessionId::new();
    group.bench_function("refresh", |b| {
        b.iter(|| codec.issue_refresh(black_box(id), black_box(&role), sid, ttl));
    });

    group.finish();
}

fn bench_token_verify(c: &mut Criterion) {
    let codec = codec();
    let role = RoleTag::from("member");
    let ttl = Duration::from_secs(900);

    let access = codec.issue_access(PrincipalId::new(), &role, ttl).unwrap();
    let refresh = codec
        .issue_refresh(PrincipalId::new(), &role, SessionId::new(), ttl)
        .unwrap();

    let mut group = c.benchmark_group("token_verify");

    group.bench_function("access_ok", |b| {
        b.iter(|| codec.verify(black_box(&access), TokenKind::Access));
    });

    group.bench_function("refresh_ok", |b| {
        b.iter(|| codec.verify(black_box(&refresh), TokenKind::Refresh));
    });

    group.bench_function("kind_mismatch", |b| {
        b.iter(|| codec.verify(black_box(&access), TokenKind::Refresh));
    });

    group.bench_function("garbage", |b| {
        b.iter(|| codec.verify(black_box("not.a.token"), TokenKind::Access));
    });

    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let sizes = [32, 128, 512, 2048];

    let mut group = c.benchmark_group("fingerprint");

    for size in sizes {
        let token: String = (0..size).map(|i| ((i % 26) as u8 + b'a') as char).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &token, |b, token| {
            b.iter(|| fingerprint(black_box(token)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_token_issue, bench_token_verify, bench_fingerprint);
criterion_main!(benches);
