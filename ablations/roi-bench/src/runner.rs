//! 程序运行函数.

use crate::phantom::{self, NODULE_HU};
use crate::result::{BenchResult, Profile};
use ndarray::Array3;
use nodule_roi::batch::{self, BatchConfig};
use std::env;
use std::time::Instant;

/// 默认病例数.
const DEFAULT_CASES: usize = 64;

/// ROI 立方体全边长.
const ROI_SIZE: usize = 32;

/// 读取病例数.
///
/// 1. 若环境变量 `$ROI_BENCH_CASES` 可以解析为整数, 则使用其值;
/// 2. 否则, 使用 64.
fn cases_from_env() -> usize {
    env::var("ROI_BENCH_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CASES)
}

/// ROI 中心体素是否是结节.
#[inline]
fn centered_on_nodule(roi: &Array3<i16>) -> bool {
    let (a, c, s) = roi.dim();
    roi[[a / 2, c / 2, s / 2]] == NODULE_HU
}

/// 实际运行.
pub fn run() -> BenchResult {
    let n = cases_from_env();
    println!("Generating {n} phantom volumes...");
    let data = phantom::dataset(n, ROI_SIZE);

    println!("Running batch extraction on {} threads...", crate::cpus());
    let now = Instant::now();
    let seq = batch::run_batch(data.records.clone(), &data.volumes);
    let seq_profile = Profile::new(&seq, now.elapsed(), centered_on_nodule);

    let now = Instant::now();
    let par = batch::par_run_batch(data.records, &data.volumes);
    let par_profile = Profile::new(&par, now.elapsed(), centered_on_nodule);

    match BatchConfig::from_env_or_home() {
        Some(cfg) => {
            for (id, _) in seq.succeeded().take(3) {
                log::info!("`{id}` would be written to {}", cfg.output_path(id).display());
            }
        }
        None => log::warn!("cannot determine output directory"),
    }

    BenchResult::new(
        [("sequential", seq_profile), ("rayon", par_profile)],
        seq.cases() == par.cases(),
    )
}
