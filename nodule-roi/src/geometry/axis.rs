//! 临床轴与数组存储轴之间的对应关系.
//!
//! 体素索引按照临床习惯以 `(sagittal, coronal, axial)` 排列, 分别对应物理空间的
//! `x`, `y`, `z`. 而体数据在内存中按 `[axial, coronal, sagittal]` 存储,
//! 即第一维是切片 (变化最慢), 最后一维是列 (变化最快).

use ndarray::Axis;
use std::fmt::{self, Display, Formatter};

/// 临床轴.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClinicalAxis {
    /// 矢状位, 对应物理 `x`.
    Sagittal,

    /// 冠状位, 对应物理 `y`.
    Coronal,

    /// 轴位 (横断位), 对应物理 `z`.
    Axial,
}

impl ClinicalAxis {
    /// 按临床顺序排列的全部轴.
    pub const ALL: [ClinicalAxis; 3] = [Self::Sagittal, Self::Coronal, Self::Axial];

    /// 在临床顺序 `(sagittal, coronal, axial)` 中的位置.
    #[inline]
    pub const fn clinical_index(self) -> usize {
        match self {
            Self::Sagittal => 0,
            Self::Coronal => 1,
            Self::Axial => 2,
        }
    }

    /// 在存储顺序 `[axial, coronal, sagittal]` 中的位置.
    #[inline]
    pub const fn storage_index(self) -> usize {
        2 - self.clinical_index()
    }

    /// 对应的 `ndarray` 存储轴.
    #[inline]
    pub const fn storage_axis(self) -> Axis {
        Axis(self.storage_index())
    }

    /// 由存储轴位置反查临床轴. 越界时返回 `None`.
    #[inline]
    pub const fn from_storage_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Axial),
            1 => Some(Self::Coronal),
            2 => Some(Self::Sagittal),
            _ => None,
        }
    }

    /// 轴名.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sagittal => "sagittal",
            Self::Coronal => "coronal",
            Self::Axial => "axial",
        }
    }
}

impl Display for ClinicalAxis {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 将临床顺序的三元组转换为存储顺序. 该变换是对合的.
#[inline]
pub fn clinical_to_storage<T: Copy>([s, c, a]: [T; 3]) -> [T; 3] {
    [a, c, s]
}

/// 将存储顺序的三元组转换为临床顺序.
#[inline]
pub fn storage_to_clinical<T: Copy>([a, c, s]: [T; 3]) -> [T; 3] {
    [s, c, a]
}
