use nifti::NiftiHeader;

use super::VolumeGeometry;

impl VolumeGeometry {
    /// 从 nifti header 读取几何信息.
    ///
    /// 1. 若 `sform_code > 0`, 原点取 `srow_{x, y, z}` 的平移列;
    ///   否则取 `quatern_{x, y, z}` (即 qoffset).
    /// 2. 分辨率取 `pixdim[1..=3]` 的绝对值 (`pixdim[0]` 是 qfac).
    ///
    /// 方向矩阵被忽略. 结果不合法 (如分辨率为 0) 时返回 `None`.
    pub fn from_nifti_header(header: &NiftiHeader) -> Option<Self> {
        let origin = if header.sform_code > 0 {
            [header.srow_x[3], header.srow_y[3], header.srow_z[3]]
        } else {
            [header.quatern_x, header.quatern_y, header.quatern_z]
        };
        let [_, sx, sy, sz, ..] = header.pixdim;
        Self::new(
            origin.map(f64::from),
            [sx, sy, sz].map(|s| f64::from(s.abs())),
        )
    }
}
