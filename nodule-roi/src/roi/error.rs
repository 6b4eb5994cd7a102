//! ROI 提取错误.

use crate::geometry::ClinicalAxis;

/// 提取 ROI 的运行时错误. 发生错误时不会返回任何部分结果.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ExtractError {
    /// 提取范围超出体数据边界.
    ///
    /// `value` 是越界的那一端: 下界为负时是该负值, 上界过大时是上界本身.
    /// `len` 是体数据在该轴上的长度.
    #[error("ROI range on {axis} axis reaches {value}, outside of [0, {len}]")]
    OutOfBounds {
        /// 越界的临床轴.
        axis: ClinicalAxis,
        /// 越界的范围端点.
        value: i64,
        /// 该轴的长度.
        len: usize,
    },

    /// 某个轴上的半边长为 0, 提取范围为空.
    ///
    /// `width` 是该轴上给定的尺寸参数: 各向同性时为半边长, 各向异性时为全边长.
    #[error("ROI size {width} on {axis} axis yields an empty region")]
    EmptyRegion {
        /// 为空的临床轴.
        axis: ClinicalAxis,
        /// 给定尺寸.
        width: usize,
    },
}

impl ExtractError {
    /// 出错的临床轴.
    #[inline]
    pub fn axis(&self) -> ClinicalAxis {
        match self {
            Self::OutOfBounds { axis, .. } | Self::EmptyRegion { axis, .. } => *axis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = ExtractError::OutOfBounds {
            axis: ClinicalAxis::Sagittal,
            value: -3,
            len: 10,
        };
        assert_eq!(
            e.to_string(),
            "ROI range on sagittal axis reaches -3, outside of [0, 10]"
        );

        let e = ExtractError::EmptyRegion {
            axis: ClinicalAxis::Coronal,
            width: 1,
        };
        assert_eq!(e.to_string(), "ROI size 1 on coronal axis yields an empty region");
        assert_eq!(e.axis(), ClinicalAxis::Coronal);
    }
}
