#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 根据肺结节中心 (标记点或切片号) 从 3D 胸部 CT 体数据中裁剪感兴趣区域 (ROI).
//!
//! 该 crate 只提供 `safe` 接口, 不负责文件读写, 也不依赖任何界面.
//!
//! # 坐标约定
//!
//! 1. 物理坐标按 `(x, y, z)` 排列, 单位与体数据的 spacing 一致 (一般为毫米).
//! 2. 体素索引按临床顺序 `(sagittal, coronal, axial)` 排列, 与 `(x, y, z)` 一一对应.
//! 3. 体数据按 `[axial, coronal, sagittal]` 存储, 即 `Array3` 的第 0 维是切片号.
//!
//! 跨越这一边界的换算集中在 [`geometry::axis`] 中.
//!
//! # 注意
//!
//! 1. 物理坐标换算为体素索引时取了绝对值, 位于原点 "负" 侧的点会被镜像.
//!   这一行为被刻意保留, 见 [`geometry::map_to_voxel_index`].
//! 2. ROI 越界时直接报错, 不做截断或填充.
//!
//! # 功能
//!
//! ### 坐标换算 ✅
//!
//! 实现位于 `nodule-roi/src/geometry`.
//!
//! ### ROI 提取 ✅
//!
//! 各向同性 (半边长) 与各向异性 (全边长) 两种尺寸.
//!
//! 实现位于 `nodule-roi/src/roi`.
//!
//! ### 交互式流程 ✅
//!
//! 实现位于 `nodule-roi/src/pipeline.rs`.
//!
//! ### 重采样 ✅
//!
//! 三线性插值, 原点不变.
//!
//! 实现位于 `nodule-roi/src/resample.rs`.
//!
//! ### 批处理 ✅
//!
//! 按病人编号匹配体数据, 单个病例失败不影响其它病例.
//!
//! 实现位于 `nodule-roi/src/batch`.

/// 三维索引, 按存储顺序 `(axial, coronal, sagittal)` 排列.
pub type Idx3d = (usize, usize, usize);

pub mod consts;

/// 3D CT 体数据.
mod data;

pub use data::{CtVolume, GeometryAttr};

pub mod geometry;

pub mod roi;

pub mod resample;

pub mod batch;

pub mod error;

mod pipeline;

pub use pipeline::{crop_roi, crop_roi_resampled};

pub use error::{InvalidInput, RoiError, RoiResult};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        pub use batch::par_run_batch;
        pub use resample::par_resample;
    }
}

pub mod prelude;
