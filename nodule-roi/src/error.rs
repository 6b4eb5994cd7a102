//! 运行时错误.

use thiserror::Error;

use crate::resample::ResampleError;
use crate::roi::ExtractError;

/// 缺失必要输入. 属于调用 ROI 提取之前的前置检查.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum InvalidInput {
    /// 未选择体数据.
    #[error("no volume selected")]
    NoVolume,

    /// 未给出结节中心 (既没有标记点, 也没有手动输入).
    #[error("no centroid selected")]
    NoCentroid,
}

/// 交互式 ROI 流程的错误.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum RoiError {
    /// 前置检查失败.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// 提取失败.
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// 重采样失败.
    #[error("resampling failed: {0}")]
    Resample(#[from] ResampleError),
}

/// ROI 流程运行时错误.
pub type RoiResult<T> = Result<T, RoiError>;
