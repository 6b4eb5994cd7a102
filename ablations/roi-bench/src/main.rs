//! 在合成体模上比较串行与并行批处理 ROI 提取.

mod phantom;
mod result;
mod runner;

use simple_logger::SimpleLogger;

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
fn sep() {
    println!("{SEP}");
}

/// 获得可并行核心数.
fn cpus() -> usize {
    std::thread::available_parallelism().map_or_else(|_| num_cpus::get(), usize::from)
}

fn main() -> std::io::Result<()> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .map_err(std::io::Error::other)?;

    let result = runner::run();
    result.analyze()
}
