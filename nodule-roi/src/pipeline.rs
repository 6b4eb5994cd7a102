//! 交互式 ROI 提取流程.
//!
//! 对应用户在界面上选择体数据, 放置标记点 (或手动输入切片号), 然后点击 "应用" 的过程.
//! 界面状态全部以参数形式传入.

use num::{NumCast, ToPrimitive, Zero};

use crate::data::{CtVolume, GeometryAttr};
use crate::error::{InvalidInput, RoiResult};
use crate::geometry::CentroidInput;
use crate::roi::{Extent, RoiArray};

/// 前置检查: 先检查体数据, 再检查中心.
fn check_inputs<'a, T>(
    volume: Option<&'a CtVolume<T>>,
    centroid: Option<CentroidInput>,
) -> Result<(&'a CtVolume<T>, CentroidInput), InvalidInput> {
    let volume = volume.ok_or(InvalidInput::NoVolume)?;
    let centroid = centroid.ok_or(InvalidInput::NoCentroid)?;
    Ok((volume, centroid))
}

/// 在 `volume` 上提取以 `centroid` 为中心, 尺寸为 `extent` 的 ROI.
///
/// 标记点按 `volume` 的几何信息换算为体素索引; 手动输入的索引直接使用.
///
/// # 错误
///
/// 1. 未给出体数据时返回 [`InvalidInput::NoVolume`];
/// 2. 未给出中心时返回 [`InvalidInput::NoCentroid`];
/// 3. 其余错误见 [`crate::roi::extract`].
pub fn crop_roi<T: Clone>(
    volume: Option<&CtVolume<T>>,
    centroid: Option<CentroidInput>,
    extent: &Extent,
) -> RoiResult<RoiArray<T>> {
    let (volume, centroid) = check_inputs(volume, centroid)?;
    let index = centroid.resolve(volume.geometry());
    log::debug!("centroid {centroid:?} -> {index:?}, extent {extent:?}");
    let roi = volume.extract_roi(&index, extent)?;
    log::debug!("ROI shape {:?}", roi.dim());
    Ok(roi)
}

/// 先将 `volume` 重采样为各向同性的 `mm` 分辨率, 再提取 ROI.
///
/// 标记点在重采样后的几何信息上换算. 手动输入的索引是在原始网格上给出的,
/// 按两个网格的尺寸比例换算到新网格 (见 [`crate::geometry::VoxelIndex::rescale`]).
///
/// # 错误
///
/// 除 [`crop_roi`] 的错误外, 重采样失败时返回 [`crate::error::RoiError::Resample`].
pub fn crop_roi_resampled<T>(
    volume: Option<&CtVolume<T>>,
    centroid: Option<CentroidInput>,
    extent: &Extent,
    mm: f64,
) -> RoiResult<RoiArray<T>>
where
    T: Copy + ToPrimitive + NumCast + Zero,
{
    let (volume, centroid) = check_inputs(volume, centroid)?;
    let resampled = volume.resample_isotropic(mm)?;
    let centroid = match centroid {
        CentroidInput::Manual(idx) => {
            // 重采样成功时源数据各轴长度均非 0, 因此换算不会失败.
            let scaled = idx.rescale(volume.clinical_size(), resampled.clinical_size());
            debug_assert!(scaled.is_some());
            CentroidInput::Manual(scaled.unwrap_or(idx))
        }
        fiducial => fiducial,
    };
    crop_roi(Some(&resampled), Some(centroid), extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_RESAMPLE_MM;
    use crate::error::RoiError;
    use crate::geometry::{ClinicalAxis, PhysicalPoint, VolumeGeometry, VoxelIndex};
    use crate::resample::ResampleError;
    use crate::roi::ExtractError;
    use ndarray::Array3;

    fn volume() -> CtVolume<i32> {
        let g = VolumeGeometry::new([-32.0, -32.0, -16.0], [1.0, 1.0, 1.0]).unwrap();
        let data = Array3::from_shape_fn((32, 64, 64), |(a, c, s)| (a * 10000 + c * 100 + s) as i32);
        CtVolume::new(data, g)
    }

    #[test]
    fn test_missing_inputs() {
        let vol = volume();
        let extent = Extent::default();
        let manual = CentroidInput::Manual(VoxelIndex::new(32, 32, 16));

        // 两者都缺失时先报告体数据.
        assert_eq!(
            crop_roi::<i32>(None, None, &extent).unwrap_err(),
            RoiError::InvalidInput(InvalidInput::NoVolume)
        );
        assert_eq!(
            crop_roi::<i32>(None, Some(manual), &extent).unwrap_err(),
            RoiError::InvalidInput(InvalidInput::NoVolume)
        );
        assert_eq!(
            crop_roi(Some(&vol), None, &extent).unwrap_err(),
            RoiError::InvalidInput(InvalidInput::NoCentroid)
        );
    }

    #[test]
    fn test_fiducial_and_manual_agree() {
        let vol = volume();
        let extent = Extent::Isotropic(5);
        // (0, 0, 0) mm -> (32, 32, 16)
        let fiducial = CentroidInput::from(PhysicalPoint::new(0.0, 0.0, 0.0));
        let manual = CentroidInput::from(VoxelIndex::new(32, 32, 16));

        let a = crop_roi(Some(&vol), Some(fiducial), &extent).unwrap();
        let b = crop_roi(Some(&vol), Some(manual), &extent).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dim(), (10, 10, 10));
        assert_eq!(a[[0, 0, 0]], 11 * 10000 + 27 * 100 + 27);
    }

    #[test]
    fn test_manual_bypasses_mapping() {
        let vol = volume();
        // 若被当作物理坐标换算, (0, 0, 0) 会变成 (32, 32, 16).
        let manual = CentroidInput::Manual(VoxelIndex::new(0, 0, 0));
        let err = crop_roi(Some(&vol), Some(manual), &Extent::Isotropic(4)).unwrap_err();
        assert_eq!(
            err,
            RoiError::Extract(ExtractError::OutOfBounds {
                axis: ClinicalAxis::Sagittal,
                value: -4,
                len: 64
            })
        );
    }

    #[test]
    fn test_crop_resampled() {
        let g = VolumeGeometry::new([0.0; 3], [0.5, 0.5, 2.0]).unwrap();
        let vol = CtVolume::new(Array3::<f32>::from_elem((20, 80, 80), -800.0), g);
        let extent = Extent::Isotropic(6);

        // 重采样后尺寸为 (sagittal, coronal, axial) = (40, 40, 40).
        let manual = CentroidInput::Manual(VoxelIndex::new(40, 40, 10));
        let roi = crop_roi_resampled(Some(&vol), Some(manual), &extent, DEFAULT_RESAMPLE_MM).unwrap();
        assert_eq!(roi.dim(), (12, 12, 12));
        assert!(roi.iter().all(|v| *v == -800.0));

        let fiducial = CentroidInput::Fiducial(PhysicalPoint::new(20.0, 20.0, 20.0));
        let same = crop_roi_resampled(Some(&vol), Some(fiducial), &extent, 1.0).unwrap();
        assert_eq!(same, roi);

        assert_eq!(
            crop_roi_resampled(Some(&vol), Some(fiducial), &extent, -1.0).unwrap_err(),
            RoiError::Resample(ResampleError::InvalidSpacing)
        );
        assert_eq!(
            crop_roi_resampled::<f32>(None, Some(fiducial), &extent, -1.0).unwrap_err(),
            RoiError::InvalidInput(InvalidInput::NoVolume)
        );
    }

    #[test]
    fn test_manual_index_follows_resampled_grid() {
        let g = VolumeGeometry::new([0.0; 3], [0.5, 0.5, 2.0]).unwrap();
        let ramp = Array3::from_shape_fn((20, 80, 80), |(_, _, s)| s as f32);
        let vol = CtVolume::new(ramp, g);

        // 原网格上的 (40, 40, 10) 对应新网格上的 (20, 20, 20).
        let manual = CentroidInput::Manual(VoxelIndex::new(40, 40, 10));
        let roi = crop_roi_resampled(Some(&vol), Some(manual), &Extent::Isotropic(6), 1.0).unwrap();
        // 新网格矢状位 14 对应原网格矢状位 28.
        assert_eq!(roi[[0, 0, 0]], 28.0);
        assert_eq!(roi[[0, 0, 11]], 50.0);

        // 源数据存在长度为 0 的轴时, 重采样先失败, 不会走到索引换算.
        let empty = CtVolume::new(Array3::<f32>::zeros((0, 8, 8)), g);
        assert_eq!(
            crop_roi_resampled(Some(&empty), Some(manual), &Extent::Isotropic(2), 1.0).unwrap_err(),
            RoiError::Resample(ResampleError::EmptyAxis(ClinicalAxis::Axial))
        );
    }
}
