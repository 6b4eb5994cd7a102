//! 实验结果.

use nodule_roi::batch::BatchReport;
use std::io::{self, Write};
use std::time::Duration;

/// 单次批处理的统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 病例总数.
    cases: usize,

    /// 成功提取的病例数.
    extracted: usize,

    /// 总耗时.
    elapsed: Duration,

    /// ROI 中心体素中, 结节 HU 值的占比.
    hit_rate: Option<f64>,
}

impl Profile {
    /// 由批处理结果统计. `is_hit` 判断一个 ROI 的中心是否落在结节上.
    pub fn new<F>(report: &BatchReport<i16>, elapsed: Duration, is_hit: F) -> Self
    where
        F: Fn(&ndarray::Array3<i16>) -> bool,
    {
        let extracted = report.success_count();
        let hits = report.succeeded().filter(|&(_, roi)| is_hit(roi)).count();
        let hit_rate = (extracted != 0).then(|| hits as f64 / extracted as f64);
        Self {
            cases: report.len(),
            extracted,
            elapsed,
            hit_rate,
        }
    }

    /// 平均每个病例的耗时 (微秒).
    #[inline]
    fn avg_us(&self) -> Option<f64> {
        (self.cases != 0).then(|| self.elapsed.as_micros() as f64 / self.cases as f64)
    }
}

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.3}"),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Cases: {}", p.cases)?;
    writeln!(w, "{S4}Extracted: {}", p.extracted)?;
    writeln!(w, "{S4}Skipped: {}", p.cases - p.extracted)?;
    writeln!(w, "{S4}Total time: {} us", p.elapsed.as_micros())?;
    writeln!(w, "{S4}Average time: {} us", f64_to_display(p.avg_us()))?;
    write!(w, "{S4}Centered on nodule: {}", f64_to_display(p.hit_rate))?;
    Ok(())
}

/// 实验最终结果.
pub struct BenchResult {
    data: Vec<(&'static str, Profile)>,
    consistent: bool,
}

impl BenchResult {
    /// `consistent` 表示各个运行方式的结果是否完全一致.
    pub fn new<I: IntoIterator<Item = (&'static str, Profile)>>(it: I, consistent: bool) -> Self {
        Self {
            data: it.into_iter().collect(),
            consistent,
        }
    }

    /// 分析运行结果.
    pub fn analyze(&self) -> io::Result<()> {
        crate::sep();
        let mut buf = Vec::with_capacity(512);

        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut buf)?;
            println!("{}", String::from_utf8_lossy(&buf));
            buf.clear();

            crate::sep();
        }
        println!("Sequential and parallel results identical: {}", self.consistent);
        Ok(())
    }
}
