//! 通用常量.

/// ROI 尺寸相关的约定值.
///
/// 各向同性模式下, 用户给出的是半边长 `h`, 实际立方体边长为 `2h`.
pub mod size {
    /// 默认半边长. 对应 20 层切片的立方体.
    pub const HALF_WIDTH_DEFAULT: usize = 10;
}

/// 默认的重采样目标分辨率 (单位: 毫米).
pub const DEFAULT_RESAMPLE_MM: f64 = 1.0;

/// 批处理输出文件默认后缀.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_roi.nii.gz";

/// 批处理输出目录的环境变量名.
pub const OUTPUT_DIR_ENV: &str = "NODULE_ROI_OUTPUT_DIR";
