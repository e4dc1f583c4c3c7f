use criterion::{black_box, criterion_group, criterion_main, Criterion};
use huffzip::HuffmanCodec;
use lipsum::lipsum;

fn huffman_compression(c: &mut Criterion) {
    let input = lipsum(2048);
    let input = input.as_bytes();

    c.bench_function("huffman compression", |b| {
        b.iter(|| HuffmanCodec::compress_bytes(black_box(input)))
    });
}

fn huffman_decompression(c: &mut Criterion) {
    let input = lipsum(4096);
    let compressed = HuffmanCodec::compress_bytes(input.as_bytes()).unwrap_or_default();

    c.bench_function("huffman decompression", |b| {
        b.iter(|| HuffmanCodec::decompress_bytes(black_box(&compressed)))
    });
}

criterion_group!(benches, huffman_compression, huffman_decompression);
criterion_main!(benches);
