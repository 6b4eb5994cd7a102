use crate::geometry::VoxelIndex;
use crate::roi::Extent;

/// 批处理中的一个病例. 各字段已由调用方从坐标列表中解析出来.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseRecord {
    /// 病人编号, 与体数据文件名的前缀对应.
    pub patient_id: String,

    /// 矢状位索引.
    pub sagittal_index: usize,

    /// 冠状位索引.
    pub coronal_index: usize,

    /// 轴位索引.
    pub axial_index: usize,

    /// ROI 立方体的全边长.
    pub size: usize,
}

impl CaseRecord {
    /// 构建病例.
    pub fn new(
        patient_id: impl Into<String>,
        [sagittal_index, coronal_index, axial_index]: [usize; 3],
        size: usize,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            sagittal_index,
            coronal_index,
            axial_index,
            size,
        }
    }

    /// 结节中心.
    #[inline]
    pub fn centroid(&self) -> VoxelIndex {
        VoxelIndex::new(self.sagittal_index, self.coronal_index, self.axial_index)
    }

    /// ROI 尺寸. `size` 是全边长, 因此按各向异性规则在每个轴上取半.
    #[inline]
    pub fn extent(&self) -> Extent {
        Extent::cube(self.size)
    }
}
