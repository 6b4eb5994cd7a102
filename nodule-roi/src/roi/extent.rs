use crate::consts::size::HALF_WIDTH_DEFAULT;
use crate::geometry::ClinicalAxis;

/// ROI 的尺寸.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extent {
    /// 各向同性. 参数是半边长 `h`, 三个临床轴上的范围都是 `[c - h, c + h)`,
    /// 立方体边长为 `2h`.
    Isotropic(usize),

    /// 各向异性. 参数是按 `(sagittal, coronal, axial)` 排列的全边长 `w`.
    /// 每个分量先向下取半, 然后对称地作用在中心两侧: `[c - w / 2, c + w / 2)`.
    /// 因此奇数边长会损失一个体素.
    Anisotropic([usize; 3]),
}

impl Extent {
    /// 由全边长构建立方体尺寸. 等价于三个分量相同的 [`Extent::Anisotropic`].
    #[inline]
    pub const fn cube(width: usize) -> Self {
        Self::Anisotropic([width; 3])
    }

    /// 按临床顺序返回每个轴上的半边长.
    #[inline]
    pub const fn half_widths(&self) -> [usize; 3] {
        match *self {
            Self::Isotropic(h) => [h; 3],
            Self::Anisotropic([s, c, a]) => [s / 2, c / 2, a / 2],
        }
    }

    /// 某一临床轴上的半边长.
    #[inline]
    pub const fn half_width(&self, axis: ClinicalAxis) -> usize {
        self.half_widths()[axis.clinical_index()]
    }

    /// 某一临床轴上给定的尺寸参数 (未经取半).
    #[inline]
    pub const fn given(&self, axis: ClinicalAxis) -> usize {
        match *self {
            Self::Isotropic(h) => h,
            Self::Anisotropic(w) => w[axis.clinical_index()],
        }
    }

    /// 按临床顺序返回实际提取出的边长, 即 `2 * half_width`.
    #[inline]
    pub fn widths(&self) -> [usize; 3] {
        self.half_widths().map(|h| 2 * h)
    }
}

impl Default for Extent {
    #[inline]
    fn default() -> Self {
        Self::Isotropic(HALF_WIDTH_DEFAULT)
    }
}
