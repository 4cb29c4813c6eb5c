#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use puzzle_forge::prelude::*;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// A 16:9-ish board with roughly `pieces` pieces and the default organic tabs.
pub fn board_config(pieces: u32) -> PuzzleConfig {
    PuzzleConfig::new(1920.0, 1080.0, pieces).with_seed("bench")
}
