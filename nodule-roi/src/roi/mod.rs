//! 以体素索引为中心的长方体 ROI 提取.
//!
//! 中心与尺寸都按临床顺序 `(sagittal, coronal, axial)` 给出, 体数据按
//! `[axial, coronal, sagittal]` 存储. 提取前先在每个临床轴上求出半开区间,
//! 再按存储顺序重排后切片. 任何越界都会直接报错, 不做截断.

mod error;
mod extent;

pub use error::ExtractError;
pub use extent::Extent;

use ndarray::{s, Array3, ArrayView3};
use std::ops::Range;

use crate::geometry::axis::clinical_to_storage;
use crate::geometry::{ClinicalAxis, VoxelIndex};
use crate::Idx3d;

/// ROI 提取结果. 按 `[axial, coronal, sagittal]` 存储, 与源数据不共享内存.
pub type RoiArray<T> = Array3<T>;

/// 单轴上的半开区间 `[low, high)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AxisRange {
    /// 下界 (包含).
    pub low: usize,

    /// 上界 (不包含).
    pub high: usize,
}

impl AxisRange {
    /// 区间长度.
    #[inline]
    pub const fn len(&self) -> usize {
        self.high - self.low
    }

    /// 区间是否为空?
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.high <= self.low
    }

    /// 转换为 `Range`.
    #[inline]
    pub const fn to_range(&self) -> Range<usize> {
        self.low..self.high
    }
}

/// 求单个临床轴上的区间, 并检查 `0 <= low < high <= len`.
fn axis_range(
    axis: ClinicalAxis,
    center: usize,
    half: usize,
    len: usize,
) -> Result<AxisRange, ExtractError> {
    debug_assert_ne!(half, 0);
    let Some(low) = center.checked_sub(half) else {
        let value = -i64::try_from(half - center).unwrap_or(i64::MAX);
        return Err(ExtractError::OutOfBounds { axis, value, len });
    };
    let high = center.saturating_add(half);
    if high > len {
        let value = i64::try_from(high).unwrap_or(i64::MAX);
        return Err(ExtractError::OutOfBounds { axis, value, len });
    }
    Ok(AxisRange { low, high })
}

/// 在形状为 `shape` (存储顺序) 的体数据上, 求以 `centroid` 为中心,
/// 尺寸为 `extent` 的 ROI 在每个存储轴上的区间.
///
/// 返回值按存储顺序 `[axial, coronal, sagittal]` 排列.
///
/// # 错误
///
/// 1. 先按临床顺序检查各轴半边长, 为 0 则返回 [`ExtractError::EmptyRegion`];
/// 2. 再按临床顺序检查各轴区间, 越界则返回 [`ExtractError::OutOfBounds`].
pub fn crop_ranges(
    shape: Idx3d,
    centroid: &VoxelIndex,
    extent: &Extent,
) -> Result<[AxisRange; 3], ExtractError> {
    for axis in ClinicalAxis::ALL {
        if extent.half_width(axis) == 0 {
            return Err(ExtractError::EmptyRegion {
                axis,
                width: extent.given(axis),
            });
        }
    }

    let (len_a, len_c, len_s) = shape;
    let lens = [len_s, len_c, len_a];
    let mut ranges = [AxisRange { low: 0, high: 0 }; 3];
    for axis in ClinicalAxis::ALL {
        let i = axis.clinical_index();
        ranges[i] = axis_range(
            axis,
            centroid.get(axis),
            extent.half_width(axis),
            lens[i],
        )?;
    }
    Ok(clinical_to_storage(ranges))
}

/// 从 `array` 中提取以 `centroid` 为中心, 尺寸为 `extent` 的 ROI.
///
/// 返回一份新分配的拷贝, 调用方可以独立修改或保存, 不会影响原数据.
/// 各临床轴上的结果长度为 `2 * half_width`, 见 [`Extent::widths`].
///
/// # 错误
///
/// 见 [`crop_ranges`]. 出错时不会产生任何部分结果.
pub fn extract<T: Clone>(
    array: ArrayView3<'_, T>,
    centroid: &VoxelIndex,
    extent: &Extent,
) -> Result<RoiArray<T>, ExtractError> {
    let [ra, rc, rs] = crop_ranges(array.dim(), centroid, extent)?;
    log::debug!(
        "ROI centroid {:?} -> axial {:?}, coronal {:?}, sagittal {:?}",
        centroid,
        ra.to_range(),
        rc.to_range(),
        rs.to_range()
    );
    let roi = array
        .slice(s![ra.to_range(), rc.to_range(), rs.to_range()])
        .to_owned();
    debug_assert_eq!(roi.dim(), (ra.len(), rc.len(), rs.len()));
    Ok(roi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn pattern((a, c, s): Idx3d) -> u32 {
        (a * 10000 + c * 100 + s) as u32
    }

    fn pattern_volume(shape: Idx3d) -> Array3<u32> {
        Array3::from_shape_fn(shape, pattern)
    }

    fn oob(axis: ClinicalAxis, value: i64, len: usize) -> ExtractError {
        ExtractError::OutOfBounds { axis, value, len }
    }

    /// 100^3, 中心 (50, 50, 50), 半边长 5.
    #[test]
    fn test_isotropic_pattern_block() {
        let vol = pattern_volume((100, 100, 100));
        let roi = extract(vol.view(), &VoxelIndex::new(50, 50, 50), &Extent::Isotropic(5)).unwrap();

        assert_eq!(roi.dim(), (10, 10, 10));
        for ((a, c, s), v) in roi.indexed_iter() {
            assert_eq!(*v, pattern((45 + a, 45 + c, 45 + s)));
        }
    }

    /// 各向异性尺寸按 `(sagittal, coronal, axial)` 给出, 结果按存储顺序排列.
    #[test]
    fn test_anisotropic_storage_shape() {
        let vol = pattern_volume((100, 100, 100));
        let c = VoxelIndex::new(50, 50, 50);

        let roi = extract(vol.view(), &c, &Extent::Anisotropic([20, 30, 40])).unwrap();
        assert_eq!(roi.dim(), (40, 30, 20));
        assert_eq!(roi[[0, 0, 0]], pattern((30, 35, 40)));
        assert_eq!(roi[[39, 29, 19]], pattern((69, 64, 59)));

        let roi = extract(vol.view(), &c, &Extent::Anisotropic([40, 30, 20])).unwrap();
        assert_eq!(roi.dim(), (20, 30, 40));
        assert_eq!(roi[[0, 0, 0]], pattern((40, 35, 30)));
    }

    #[test]
    fn test_odd_widths_are_halved() {
        let vol = pattern_volume((100, 100, 100));
        let roi = extract(
            vol.view(),
            &VoxelIndex::new(50, 50, 50),
            &Extent::Anisotropic([21, 31, 41]),
        )
        .unwrap();
        assert_eq!(roi.dim(), (40, 30, 20));
    }

    /// 非立方体体数据上, 交换任意两个轴都会得到不同结果 (甚至越界).
    #[test]
    fn test_axis_mapping_non_cubic() {
        let vol = pattern_volume((8, 20, 30));
        let centroid = VoxelIndex::new(25, 10, 4);
        let roi = extract(vol.view(), &centroid, &Extent::Anisotropic([10, 6, 4])).unwrap();

        assert_eq!(roi.dim(), (4, 6, 10));
        assert_eq!(roi[[0, 0, 0]], pattern((2, 7, 20)));
        assert_eq!(roi[[3, 5, 9]], pattern((5, 12, 29)));
    }

    #[test]
    fn test_shape_equals_twice_half_width() {
        let vol = pattern_volume((64, 48, 40));
        for h in 1..=8 {
            for centroid in [(20, 24, 32), (8, 8, 8), (31, 39, 31)] {
                let centroid = VoxelIndex::from_storage(centroid);
                let roi = extract(vol.view(), &centroid, &Extent::Isotropic(h)).unwrap();
                assert_eq!(roi.dim(), (2 * h, 2 * h, 2 * h));
            }
        }
        for w in [[2, 3, 4], [7, 7, 7], [16, 9, 2]] {
            let extent = Extent::Anisotropic(w);
            let roi = extract(vol.view(), &VoxelIndex::new(20, 24, 32), &extent).unwrap();
            let [s, c, a] = w.map(|x| 2 * (x / 2));
            assert_eq!(roi.dim(), (a, c, s));
        }
    }

    #[test]
    fn test_idempotent() {
        let vol = Array3::from_shape_fn((30, 30, 30), |(a, c, s)| {
            ((a * 7 + c * 13 + s * 31) % 97) as f32 - 1024.0
        });
        let centroid = VoxelIndex::new(11, 17, 13);
        let extent = Extent::Anisotropic([10, 12, 14]);
        let first = extract(vol.view(), &centroid, &extent).unwrap();
        let second = extract(vol.view(), &centroid, &extent).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exact_boundary() {
        let vol = pattern_volume((10, 10, 10));
        let h = Extent::Isotropic(5);

        // low = 0, high = len.
        let roi = extract(vol.view(), &VoxelIndex::new(5, 5, 5), &h).unwrap();
        assert_eq!(roi, vol);

        let err = extract(vol.view(), &VoxelIndex::new(4, 5, 5), &h).unwrap_err();
        assert_eq!(err, oob(ClinicalAxis::Sagittal, -1, 10));

        let err = extract(vol.view(), &VoxelIndex::new(6, 5, 5), &h).unwrap_err();
        assert_eq!(err, oob(ClinicalAxis::Sagittal, 11, 10));

        let err = extract(vol.view(), &VoxelIndex::new(5, 4, 5), &h).unwrap_err();
        assert_eq!(err, oob(ClinicalAxis::Coronal, -1, 10));

        let err = extract(vol.view(), &VoxelIndex::new(5, 5, 6), &h).unwrap_err();
        assert_eq!(err, oob(ClinicalAxis::Axial, 11, 10));
    }

    /// 中心 (2, 2, 2), 半边长 5, 10^3 体数据: 下界 -3 越界.
    #[test]
    fn test_low_end_out_of_bounds() {
        let vol = pattern_volume((10, 10, 10));
        let err = extract(vol.view(), &VoxelIndex::new(2, 2, 2), &Extent::Isotropic(5)).unwrap_err();
        assert_eq!(err, oob(ClinicalAxis::Sagittal, -3, 10));
        assert_eq!(err.axis(), ClinicalAxis::Sagittal);
    }

    #[test]
    fn test_empty_region() {
        let vol = pattern_volume((10, 10, 10));
        let c = VoxelIndex::new(5, 5, 5);

        let err = extract(vol.view(), &c, &Extent::Isotropic(0)).unwrap_err();
        assert_eq!(
            err,
            ExtractError::EmptyRegion {
                axis: ClinicalAxis::Sagittal,
                width: 0
            }
        );

        // 1 / 2 == 0
        let err = extract(vol.view(), &c, &Extent::Anisotropic([4, 1, 4])).unwrap_err();
        assert_eq!(
            err,
            ExtractError::EmptyRegion {
                axis: ClinicalAxis::Coronal,
                width: 1
            }
        );

        // 空区域先于越界被检查.
        let err = extract(vol.view(), &VoxelIndex::new(0, 0, 0), &Extent::Anisotropic([4, 4, 0]))
            .unwrap_err();
        assert!(matches!(err, ExtractError::EmptyRegion { .. }));
    }

    #[test]
    fn test_result_is_independent_copy() {
        let vol = pattern_volume((20, 20, 20));
        let mut roi = extract(vol.view(), &VoxelIndex::new(10, 10, 10), &Extent::Isotropic(3)).unwrap();
        assert!(roi.is_standard_layout());

        roi.fill(0);
        assert_eq!(vol[[10, 10, 10]], pattern((10, 10, 10)));
        assert_eq!(vol[[7, 7, 7]], pattern((7, 7, 7)));
    }

    #[test]
    fn test_crop_ranges_storage_order() {
        let ranges = crop_ranges(
            (50, 60, 70),
            &VoxelIndex::new(30, 20, 10),
            &Extent::Anisotropic([8, 6, 4]),
        )
        .unwrap();
        assert_eq!(ranges[0].to_range(), 8..12);
        assert_eq!(ranges[1].to_range(), 17..23);
        assert_eq!(ranges[2].to_range(), 26..34);
        assert!(ranges.iter().all(|r| !r.is_empty()));
    }
}
