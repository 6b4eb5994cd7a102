//! 批处理操作.
//!
//! 坐标列表的解析和体数据的读写都由调用方完成. 本模块只负责将病例与体数据对应起来,
//! 逐个提取 ROI, 并为结果生成输出路径.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_OUTPUT_SUFFIX, OUTPUT_DIR_ENV};

mod record;
mod runner;

pub use record::CaseRecord;
pub use runner::{run_batch, BatchReport, BatchRunner, CaseError, CaseResult, CaseVolumes};

#[cfg(feature = "rayon")]
pub use runner::par_run_batch;

/// 从体数据文件名中解析病人编号.
///
/// 取文件名 (不含目录) 中第一个 `_` 之前的部分; 不存在 `_` 时取第一个 `.` 之前的部分.
/// 例如 `LIDC-0001_ct.nii.gz` 和 `LIDC-0001.nrrd` 都对应 `LIDC-0001`.
pub fn patient_id_of(file_name: &str) -> &str {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    let end = name
        .find('_')
        .or_else(|| name.find('.'))
        .unwrap_or(name.len());
    &name[..end]
}

/// 将体数据文件按病人编号归类. 同一编号出现多次时保留第一个文件.
pub fn match_volume_files<I, S>(file_names: I) -> HashMap<String, S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ans = HashMap::new();
    for name in file_names {
        let id = patient_id_of(name.as_ref()).to_owned();
        if id.is_empty() {
            log::warn!("cannot parse patient id from `{}`", name.as_ref());
            continue;
        }
        ans.entry(id).or_insert(name);
    }
    ans
}

/// 获取 `{用户主目录}/dataset/roi` 目录.
pub fn home_roi_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.extend(["dataset", "roi"]);
    Some(ans)
}

/// 批处理输出设置.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BatchConfig {
    /// 输出目录.
    pub output_dir: PathBuf,

    /// 输出文件名后缀 (包括扩展名).
    pub suffix: String,
}

impl BatchConfig {
    /// 以默认后缀创建.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_owned(),
            suffix: DEFAULT_OUTPUT_SUFFIX.to_owned(),
        }
    }

    /// 获取输出目录.
    ///
    /// 1. 若环境变量 `$NODULE_ROI_OUTPUT_DIR` 非空, 则使用其值;
    /// 2. 否则, 使用 `$HOME/dataset/roi`.
    ///
    /// 两者都不可用时返回 `None`.
    pub fn from_env_or_home() -> Option<Self> {
        match env::var(OUTPUT_DIR_ENV) {
            Ok(d) if !d.is_empty() => Some(Self::new(d)),
            _ => home_roi_dir().map(Self::new),
        }
    }

    /// 替换后缀.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// 病人 `patient_id` 的 ROI 输出路径: `{output_dir}/{patient_id}{suffix}`.
    pub fn output_path(&self, patient_id: &str) -> PathBuf {
        self.output_dir.join(format!("{patient_id}{}", self.suffix))
    }
}
