use std::convert::TryFrom;

use criterion::{criterion_group, criterion_main, Criterion};

use eyedropper::{
    color::aggregate,
    image::*,
    models::{PickRadius, Point},
};

fn random_image(width: u32, height: u32) -> RawImage {
    let data: Vec<u8> = (0..width as usize * height as usize * RawImage::CHANNELS)
        .map(|_| rand::random::<u8>())
        .collect();

    RawImage::try_from((data, width, height)).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let width = 1920 / 4;
    let height = 1080 / 4;
    let image = random_image(width, height);
    let center = Point::new(width as i32 / 2, height as i32 / 2);

    for amount in [1u32, 5, 15, 31].iter().copied() {
        let neighborhood = PickRadius::pixel(amount).neighborhood().unwrap();

        c.bench_function(
            &format!("{0}x{0} px neighborhood", neighborhood.side()),
            |b| b.iter(|| aggregate(&neighborhood.gather(&image, center))),
        );
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
