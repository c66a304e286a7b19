//! Benchmarks for the line codec

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use annex_remote::protocol::{decode, decode_creds, decode_value, encode};

fn codec_benchmarks(c: &mut Criterion) {
    c.bench_function("encode_transfer_reply", |b| {
        b.iter(|| {
            encode(
                black_box("TRANSFER-FAILURE"),
                black_box(&["STORE", "SHA256E-s1048576--0123456789abcdef", "disk full on /mnt/backup drive"]),
            )
        })
    });

    c.bench_function("decode_transfer_command", |b| {
        b.iter(|| {
            decode(
                black_box("TRANSFER STORE SHA256E-s1048576--0123456789abcdef /home/user/annex/.git/annex/objects/file with spaces"),
                3,
            )
        })
    });

    c.bench_function("decode_value", |b| {
        b.iter(|| decode_value(black_box("VALUE /path/to/gitdir with spaces/")))
    });

    c.bench_function("decode_creds", |b| {
        b.iter(|| decode_creds(black_box("CREDS user a long password with spaces")))
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
