use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use std::hint::black_box;
use swingcoach_core::{AnalysisConfig, Joint, LandmarkSet, Point, SwingAggregator};

fn sample_pose(t: f64) -> LandmarkSet {
    let mut map: HashMap<Joint, Point> =
        Joint::ALL.iter().map(|&j| (j, Point::new(0.5, 0.5))).collect();
    map.insert(Joint::LeftHip, Point::new(0.4, 0.5));
    map.insert(Joint::RightHip, Point::new(0.6, 0.5 + 0.1 * t.sin()));
    map.insert(Joint::LeftShoulder, Point::new(0.4, 0.3));
    map.insert(Joint::RightShoulder, Point::new(0.6, 0.3 + 0.1 * t.cos()));
    map.insert(Joint::LeftWrist, Point::new(0.5, 0.6));
    map.insert(Joint::RightWrist, Point::new(0.5 + 0.03 * t.sin(), 0.6));
    LandmarkSet::from_map(&map).unwrap()
}

fn bench_aggregate_300_frames(c: &mut Criterion) {
    // ~10 s of 30 fps video, every third frame a miss
    let poses: Vec<Option<LandmarkSet>> = (0..300)
        .map(|i| (i % 3 != 0).then(|| sample_pose(i as f64 / 30.0)))
        .collect();

    c.bench_function("aggregate_300_frames", |b| {
        b.iter(|| {
            let mut aggregator = SwingAggregator::new(AnalysisConfig::default());
            for pose in &poses {
                aggregator.observe(black_box(pose.as_ref()));
            }
            aggregator.summary()
        });
    });
}

criterion_group!(benches, bench_aggregate_300_frames);
criterion_main!(benches);
