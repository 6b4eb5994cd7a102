use std::ops::{Index, IndexMut};

use ndarray::{Array3, ArrayView3, ArrayViewMut3};
use nifti::NiftiHeader;
use num::{NumCast, ToPrimitive, Zero};

use crate::geometry::{map_to_voxel_index, ClinicalAxis, PhysicalPoint, VolumeGeometry, VoxelIndex};
use crate::resample::{resample, ResampleError};
use crate::roi::{extract, Extent, ExtractError, RoiArray};
use crate::Idx3d;

/// 从 nifti header 读取数据形状. 将 (W, H, z) 转换成 (z, H, W).
#[inline]
fn get_shape_from_header(h: &NiftiHeader) -> Idx3d {
    // [ndim, W, H, z, ...]. 体素个数数组.
    let [_, w, h, z, ..] = h.dim;
    (z as usize, h as usize, w as usize)
}

/// 3D 体数据的几何属性和部分通用操作.
pub trait GeometryAttr {
    /// 获取几何信息.
    fn geometry(&self) -> &VolumeGeometry;

    /// 获取数据形状, 按存储顺序 `(axial, coronal, sagittal)`.
    fn shape(&self) -> Idx3d;

    /// 获取某一临床轴上的长度.
    #[inline]
    fn len_along(&self, axis: ClinicalAxis) -> usize {
        let (a, c, s) = self.shape();
        match axis {
            ClinicalAxis::Sagittal => s,
            ClinicalAxis::Coronal => c,
            ClinicalAxis::Axial => a,
        }
    }

    /// 获取轴位切片个数.
    #[inline]
    fn len_axial(&self) -> usize {
        self.shape().0
    }

    /// 获取数据体素个数.
    #[inline]
    fn size(&self) -> usize {
        let (a, c, s) = self.shape();
        a * c * s
    }

    /// 按临床顺序 `[sagittal, coronal, axial]` 获取数据尺寸.
    #[inline]
    fn clinical_size(&self) -> [usize; 3] {
        let (a, c, s) = self.shape();
        [s, c, a]
    }

    /// 检查体素索引是否合法.
    #[inline]
    fn check(&self, index: &VoxelIndex) -> bool {
        let (a, c, s) = self.shape();
        index.axial < a && index.coronal < c && index.sagittal < s
    }

    /// 获取原点, `(x, y, z)`.
    #[inline]
    fn origin(&self) -> [f64; 3] {
        self.geometry().origin()
    }

    /// 获取单个体素分辨率, `(x, y, z)`.
    #[inline]
    fn spacing(&self) -> [f64; 3] {
        self.geometry().spacing()
    }

    /// 获取体素的实际体积值.
    #[inline]
    fn voxel(&self) -> f64 {
        self.geometry().voxel()
    }

    /// 体素分辨率在三个维度上是否是各向同的?
    #[inline]
    fn is_isotropic(&self) -> bool {
        self.geometry().is_isotropic()
    }
}

/// 3D CT 体数据, 包括几何信息和按 `[axial, coronal, sagittal]` 存储的体素.
#[derive(Debug, Clone, PartialEq)]
pub struct CtVolume<T> {
    geometry: VolumeGeometry,
    data: Array3<T>,
}

impl<T> GeometryAttr for CtVolume<T> {
    #[inline]
    fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    #[inline]
    fn shape(&self) -> Idx3d {
        self.data.dim()
    }
}

impl<T> Index<VoxelIndex> for CtVolume<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: VoxelIndex) -> &Self::Output {
        &self.data[index.to_storage()]
    }
}

impl<T> IndexMut<VoxelIndex> for CtVolume<T> {
    #[inline]
    fn index_mut(&mut self, index: VoxelIndex) -> &mut Self::Output {
        &mut self.data[index.to_storage()]
    }
}

impl<T> CtVolume<T> {
    /// 由已按 `[axial, coronal, sagittal]` 排列的体素和几何信息构建.
    #[inline]
    pub fn new(data: Array3<T>, geometry: VolumeGeometry) -> Self {
        Self { geometry, data }
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// 获得数据的一份可变 shallow copy.
    #[inline]
    pub fn data_mut(&mut self) -> ArrayViewMut3<'_, T> {
        self.data.view_mut()
    }

    /// 拆分为体素和几何信息.
    #[inline]
    pub fn into_parts(self) -> (Array3<T>, VolumeGeometry) {
        (self.data, self.geometry)
    }
}

impl<T: Clone> CtVolume<T> {
    /// 根据 nifti header 和按 nifti 惯用标准以 \[x, y, z\] 排列的体素创建实体.
    /// 体素会被转换为 \[z, y, x\] 排列.
    ///
    /// header 中的几何信息不合法, 或 header 记录的形状与 `data` 不一致时返回 `None`.
    pub fn from_nifti_layout(header: &NiftiHeader, data: Array3<T>) -> Option<Self> {
        let geometry = VolumeGeometry::from_nifti_header(header)?;
        // [x, y, z] -> [z, y, x]
        let data = data.permuted_axes([2, 1, 0]);
        if data.dim() != get_shape_from_header(header) {
            return None;
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        debug_assert!(data.is_standard_layout());
        Some(Self { geometry, data })
    }

    /// 提取以 `centroid` 为中心, 尺寸为 `extent` 的 ROI. 见 [`extract`].
    #[inline]
    pub fn extract_roi(
        &self,
        centroid: &VoxelIndex,
        extent: &Extent,
    ) -> Result<RoiArray<T>, ExtractError> {
        extract(self.data(), centroid, extent)
    }

    /// 先将物理点 `point` 换算为体素索引, 再提取 ROI.
    #[inline]
    pub fn extract_roi_at(
        &self,
        point: &PhysicalPoint,
        extent: &Extent,
    ) -> Result<RoiArray<T>, ExtractError> {
        let centroid = map_to_voxel_index(point, &self.geometry);
        self.extract_roi(&centroid, extent)
    }
}

impl<T> CtVolume<T>
where
    T: Copy + ToPrimitive + NumCast + Zero,
{
    /// 重采样到三个方向分辨率均为 `mm` 的新体数据. 原点不变.
    pub fn resample_isotropic(&self, mm: f64) -> Result<Self, ResampleError> {
        let (data, geometry) = resample(self.data(), &self.geometry, [mm; 3])?;
        Ok(Self { geometry, data })
    }
}
