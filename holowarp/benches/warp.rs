use criterion::{Criterion, criterion_group, criterion_main};
use holowarp::transform::{Polynomial, WarpMap, WarpOptions, warp};
use holowarp::{Raster, RasterMut, color, transform};
use std::hint::black_box;

fn gradient(width: u32, height: u32) -> Raster {
    let mut rm = RasterMut::new(width, height).expect("bench image");
    for y in 0..height {
        for (x, p) in rm.row_data_mut(y).iter_mut().enumerate() {
            *p = color::compose_rgb((x % 256) as u8, (y % 256) as u8, 128);
        }
    }
    rm.into()
}

fn bench_warp(c: &mut Criterion) {
    let src = gradient(640, 480);
    // z^7 + z^5
    let p = Polynomial::from_reals(&[
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
    ])
    .expect("coefficients");
    let opts = WarpOptions::default();

    c.bench_function("warp 640x480", |b| {
        b.iter(|| black_box(warp(&src, &p, 640, 480, &opts)))
    });

    let map = WarpMap::new(&p, (640, 480), (640, 480), &opts).expect("warp map");
    c.bench_function("warp map apply 640x480", |b| {
        b.iter(|| black_box(map.apply(&src)))
    });

    let png = holowarp::io::write_image_mem(&src, holowarp::ImageFormat::Png).expect("png");
    let coeffs = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.3, 0.0];
    c.bench_function("transform png -> jpeg 640x480", |b| {
        b.iter(|| black_box(transform(&png, 640, 480, &coeffs)))
    });
}

criterion_group!(benches, bench_warp);
criterion_main!(benches);
