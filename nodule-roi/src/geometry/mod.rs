//! 物理坐标与体素索引之间的转换.
//!
//! 物理坐标按 `(x, y, z)` 排列, 体素索引按 `(sagittal, coronal, axial)` 排列,
//! 二者一一对应. 见 [`axis`].

use itertools::izip;

use crate::Idx3d;

pub mod axis;
mod header;

pub use axis::ClinicalAxis;

/// 物理空间中的一个点 (单位与体数据的 spacing 一致, 一般为毫米).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalPoint {
    /// 物理 `x`.
    pub x: f64,

    /// 物理 `y`.
    pub y: f64,

    /// 物理 `z`.
    pub z: f64,
}

impl PhysicalPoint {
    /// 构建物理点.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 以 `[x, y, z]` 形式返回.
    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for PhysicalPoint {
    #[inline]
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// 体数据的几何信息, 包括原点 (体素 `[0, 0, 0]` 的物理坐标)
/// 和每个方向上单个体素的物理尺寸.
///
/// 该结构是只读的. 若要修改参数, 你应该创建新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeGeometry {
    origin: [f64; 3],
    spacing: [f64; 3],
}

impl VolumeGeometry {
    /// 构建几何信息. `origin` 和 `spacing` 均按 `(x, y, z)` 排列.
    ///
    /// `origin` 必须是有限值, `spacing` 必须是有限正数, 否则返回 `None`.
    pub fn new(origin: [f64; 3], spacing: [f64; 3]) -> Option<Self> {
        let origin_ok = origin.iter().all(|o| o.is_finite());
        let spacing_ok = spacing.iter().all(|s| s.is_finite() && *s > 0.0);
        (origin_ok && spacing_ok).then_some(Self { origin, spacing })
    }

    /// 原点在 `(0, 0, 0)`, 分辨率为 1 的几何信息.
    #[inline]
    pub const fn unit() -> Self {
        Self {
            origin: [0.0; 3],
            spacing: [1.0; 3],
        }
    }

    /// 原点, `(x, y, z)`.
    #[inline]
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// 分辨率, `(x, y, z)`.
    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// 某一临床轴上的分辨率.
    #[inline]
    pub fn spacing_along(&self, axis: ClinicalAxis) -> f64 {
        self.spacing[axis.clinical_index()]
    }

    /// 保持原点不变, 替换分辨率. `spacing` 不合法时返回 `None`.
    #[inline]
    pub fn with_spacing(&self, spacing: [f64; 3]) -> Option<Self> {
        Self::new(self.origin, spacing)
    }

    /// 单个体素的体积.
    #[inline]
    pub fn voxel(&self) -> f64 {
        self.spacing.iter().product()
    }

    /// 三个方向的分辨率是否完全相同?
    #[inline]
    pub fn is_isotropic(&self) -> bool {
        let [x, y, z] = self.spacing;
        x == y && x == z
    }

    /// 见 [`map_to_voxel_index`].
    #[inline]
    pub fn voxel_index_of(&self, point: &PhysicalPoint) -> VoxelIndex {
        map_to_voxel_index(point, self)
    }
}

impl Default for VolumeGeometry {
    #[inline]
    fn default() -> Self {
        Self::unit()
    }
}

/// 临床顺序的体素索引.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelIndex {
    /// 矢状位索引 (物理 `x` 方向).
    pub sagittal: usize,

    /// 冠状位索引 (物理 `y` 方向).
    pub coronal: usize,

    /// 轴位索引, 即切片号 (物理 `z` 方向).
    pub axial: usize,
}

impl VoxelIndex {
    /// 按临床顺序构建.
    #[inline]
    pub const fn new(sagittal: usize, coronal: usize, axial: usize) -> Self {
        Self {
            sagittal,
            coronal,
            axial,
        }
    }

    /// 从 `[sagittal, coronal, axial]` 构建.
    #[inline]
    pub const fn from_clinical([sagittal, coronal, axial]: [usize; 3]) -> Self {
        Self::new(sagittal, coronal, axial)
    }

    /// 以 `[sagittal, coronal, axial]` 形式返回.
    #[inline]
    pub const fn to_clinical(&self) -> [usize; 3] {
        [self.sagittal, self.coronal, self.axial]
    }

    /// 从存储顺序 `(axial, coronal, sagittal)` 的索引构建.
    #[inline]
    pub const fn from_storage((axial, coronal, sagittal): Idx3d) -> Self {
        Self::new(sagittal, coronal, axial)
    }

    /// 转换为存储顺序 `(axial, coronal, sagittal)`, 可直接用于索引 `Array3`.
    #[inline]
    pub const fn to_storage(&self) -> Idx3d {
        (self.axial, self.coronal, self.sagittal)
    }

    /// 获取某一临床轴上的分量.
    #[inline]
    pub const fn get(&self, axis: ClinicalAxis) -> usize {
        match axis {
            ClinicalAxis::Sagittal => self.sagittal,
            ClinicalAxis::Coronal => self.coronal,
            ClinicalAxis::Axial => self.axial,
        }
    }

    /// 将在尺寸为 `from` 的网格上测得的索引换算到尺寸为 `to` 的网格上.
    /// 两个尺寸都按临床顺序给出. 每个分量乘以 `to / from` 后向零截断.
    ///
    /// `from` 存在 0 分量时返回 `None`.
    pub fn rescale(&self, from: [usize; 3], to: [usize; 3]) -> Option<Self> {
        if from.contains(&0) {
            return None;
        }
        let mut ans = [0usize; 3];
        for (dst, idx, f, t) in izip!(&mut ans, self.to_clinical(), from, to) {
            let ratio = t as f64 / f as f64;
            *dst = (idx as f64 * ratio) as usize;
        }
        Some(Self::from_clinical(ans))
    }
}

impl From<[usize; 3]> for VoxelIndex {
    #[inline]
    fn from(value: [usize; 3]) -> Self {
        Self::from_clinical(value)
    }
}

/// 单轴换算: 向零截断后取绝对值.
#[inline]
fn axis_index(point: f64, origin: f64, spacing: f64) -> usize {
    // float -> int 为饱和转换, NaN 得 0.
    let idx = ((point - origin) / spacing) as i64;
    idx.unsigned_abs() as usize
}

/// 将物理点 `point` 转换为 `geometry` 所描述的体数据上的体素索引.
///
/// 每个分量为 `|trunc((point - origin) / spacing)|`.
///
/// # 注意
///
/// 1. 使用截断而不是四舍五入, 因此结果可能存在半个体素的偏差.
/// 2. 结果取绝对值, 符号信息丢失: 原点两侧等距的点会映射到同一索引,
///   即该映射不可逆.
/// 3. 该函数不会失败. 结果是否落在体数据范围内由调用方在提取 ROI 时检查.
pub fn map_to_voxel_index(point: &PhysicalPoint, geometry: &VolumeGeometry) -> VoxelIndex {
    let mut ans = [0usize; 3];
    for (dst, p, o, s) in izip!(
        &mut ans,
        point.to_array(),
        geometry.origin,
        geometry.spacing
    ) {
        *dst = axis_index(p, o, s);
    }
    VoxelIndex::from_clinical(ans)
}

/// ROI 中心的来源.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CentroidInput {
    /// 用户放置的标记点, 物理坐标.
    Fiducial(PhysicalPoint),

    /// 用户直接输入的切片索引, 不经过坐标换算.
    Manual(VoxelIndex),
}

impl CentroidInput {
    /// 求体素索引. 标记点经由 [`map_to_voxel_index`] 换算, 手动输入原样返回.
    #[inline]
    pub fn resolve(&self, geometry: &VolumeGeometry) -> VoxelIndex {
        match self {
            Self::Fiducial(p) => map_to_voxel_index(p, geometry),
            Self::Manual(idx) => *idx,
        }
    }
}

impl From<PhysicalPoint> for CentroidInput {
    #[inline]
    fn from(value: PhysicalPoint) -> Self {
        Self::Fiducial(value)
    }
}

impl From<VoxelIndex> for CentroidInput {
    #[inline]
    fn from(value: VoxelIndex) -> Self {
        Self::Manual(value)
    }
}
