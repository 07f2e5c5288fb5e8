use climgrid::{
    decode_raw_grid, nearest_index, DataPoint, DatasetKind, RawGridLayout, SeriesExtractor,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_year(layout: &RawGridLayout) -> Vec<u8> {
    (0..365 * layout.cells_per_day())
        .map(|i| if i % 97 == 0 { 99.9f32 } else { (i % 45) as f32 })
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

fn bench_grid(c: &mut Criterion) {
    let layout = RawGridLayout::default();
    let bytes = synthetic_year(&layout);

    c.bench_function("decode_raw_year", |b| {
        b.iter(|| decode_raw_grid(black_box(&bytes), &layout, DatasetKind::Temperature, 2015))
    });

    let grid = decode_raw_grid(&bytes, &layout, DatasetKind::Temperature, 2015).unwrap();
    let axis = grid.latitudes().values().to_vec();
    c.bench_function("nearest_index", |b| {
        b.iter(|| nearest_index(black_box(&axis), black_box(19.37)))
    });

    let extractor = SeriesExtractor::new(&grid);
    c.bench_function("extract_point_year", |b| {
        b.iter(|| extractor.extract(black_box(DataPoint::new(19.0, 73.0))))
    });
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
