//! 体数据重采样.
//!
//! 保持原点不变, 将体数据重采样到给定分辨率 (一般为 1 x 1 x 1 mm),
//! 使用三线性插值. 输出在每个轴上的长度为 `trunc(len * spacing / target)`.

use ndarray::{Array3, ArrayView3, ArrayViewMut2, Axis};
use num::{NumCast, ToPrimitive, Zero};
use thiserror::Error;

use crate::geometry::axis::{clinical_to_storage, storage_to_clinical};
use crate::geometry::{ClinicalAxis, VolumeGeometry};

/// 重采样错误.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ResampleError {
    /// 目标分辨率不是有限正数.
    #[error("target spacing must be finite and positive")]
    InvalidSpacing,

    /// 目标分辨率过大, 导致某个轴上的输出长度为 0.
    #[error("resampled volume is empty along {0} axis")]
    EmptyAxis(ClinicalAxis),
}

/// 单轴上的插值位置: 两个相邻源索引和靠后一个的权重.
#[derive(Copy, Clone, Debug)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f64,
}

impl Tap {
    /// `pos` 为连续的源索引. 超出 `[0, len - 1]` 的部分按边缘值处理.
    #[inline]
    fn new(pos: f64, len: usize) -> Self {
        debug_assert!(len > 0);
        let last = (len - 1) as f64;
        let pos = pos.clamp(0.0, last);
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(len - 1);
        Self {
            lo,
            hi,
            frac: pos - lo as f64,
        }
    }
}

/// 预先计算好的重采样网格.
struct Plan {
    /// 按存储顺序排列的输出形状.
    out_shape: [usize; 3],

    /// 按存储顺序排列, 每个输出索引在源数据上的步长.
    steps: [f64; 3],
}

impl Plan {
    fn new(
        shape: (usize, usize, usize),
        spacing: [f64; 3],
        target: [f64; 3],
    ) -> Result<Self, ResampleError> {
        let (la, lc, ls) = shape;
        let lens = [ls, lc, la];
        let mut out = [0usize; 3];
        let mut steps = [0f64; 3];
        for axis in ClinicalAxis::ALL {
            let i = axis.clinical_index();
            let n = (lens[i] as f64 * spacing[i] / target[i]) as usize;
            if n == 0 {
                return Err(ResampleError::EmptyAxis(axis));
            }
            out[i] = n;
            steps[i] = target[i] / spacing[i];
        }
        Ok(Self {
            out_shape: clinical_to_storage(out),
            steps: clinical_to_storage(steps),
        })
    }

    fn taps(&self, axis: usize, len: usize) -> Vec<Tap> {
        (0..self.out_shape[axis])
            .map(|i| Tap::new(i as f64 * self.steps[axis], len))
            .collect()
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// 填充一个输出轴位切片.
fn fill_slice<A>(
    src: &ArrayView3<'_, A>,
    mut dst: ArrayViewMut2<'_, A>,
    ta: Tap,
    tc: &[Tap],
    ts: &[Tap],
) where
    A: Copy + ToPrimitive + NumCast + Zero,
{
    let at = |a: usize, c: usize, s: usize| src[[a, c, s]].to_f64().unwrap_or(0.0);
    for ((c, s), out) in dst.indexed_iter_mut() {
        let (tc, ts) = (tc[c], ts[s]);
        let plane = |a: usize| {
            let lo = lerp(at(a, tc.lo, ts.lo), at(a, tc.lo, ts.hi), ts.frac);
            let hi = lerp(at(a, tc.hi, ts.lo), at(a, tc.hi, ts.hi), ts.frac);
            lerp(lo, hi, tc.frac)
        };
        let v = lerp(plane(ta.lo), plane(ta.hi), ta.frac);
        *out = <A as NumCast>::from(v).unwrap_or_else(A::zero);
    }
}

/// 两种重采样共用的准备工作: 输出几何信息, 网格, 冠状/矢状插值位置和输出数组.
struct Setup<A> {
    geometry: VolumeGeometry,
    plan: Plan,
    tc: Vec<Tap>,
    ts: Vec<Tap>,
    out: Array3<A>,
}

impl<A: Copy + Zero> Setup<A> {
    fn new(
        shape: (usize, usize, usize),
        geometry: &VolumeGeometry,
        target: [f64; 3],
    ) -> Result<Self, ResampleError> {
        let out_geometry = geometry
            .with_spacing(target)
            .ok_or(ResampleError::InvalidSpacing)?;
        let (la, lc, ls) = shape;
        let plan = Plan::new(shape, geometry.spacing(), target)?;
        let (tc, ts) = (plan.taps(1, lc), plan.taps(2, ls));
        log::debug!(
            "resample {:?} -> {:?}",
            storage_to_clinical([la, lc, ls]),
            storage_to_clinical(plan.out_shape)
        );
        let [na, nc, ns] = plan.out_shape;
        Ok(Self {
            geometry: out_geometry,
            plan,
            tc,
            ts,
            out: Array3::zeros((na, nc, ns)),
        })
    }
}

/// 将 `array` 从 `geometry` 描述的分辨率重采样到 `target` (按 `(x, y, z)` 排列).
///
/// 返回新的体数据和对应的几何信息 (原点不变, 分辨率为 `target`).
/// 整数体素类型的插值结果向零截断; 无法表示的值记为 0.
///
/// # 错误
///
/// 1. `target` 不是有限正数时返回 [`ResampleError::InvalidSpacing`];
/// 2. 某个轴的输出长度为 0 时返回 [`ResampleError::EmptyAxis`].
pub fn resample<A>(
    array: ArrayView3<'_, A>,
    geometry: &VolumeGeometry,
    target: [f64; 3],
) -> Result<(Array3<A>, VolumeGeometry), ResampleError>
where
    A: Copy + ToPrimitive + NumCast + Zero,
{
    let la = array.dim().0;
    let Setup {
        geometry: out_geometry,
        plan,
        tc,
        ts,
        mut out,
    } = Setup::new(array.dim(), geometry, target)?;
    for (a, slice) in out.axis_iter_mut(Axis(0)).enumerate() {
        let ta = Tap::new(a as f64 * plan.steps[0], la);
        fill_slice(&array, slice, ta, &tc, &ts);
    }
    Ok((out, out_geometry))
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
    }
}

/// 借助 `rayon`, 按轴位切片并行地执行 [`resample`]. 结果与串行版本完全一致.
#[cfg(feature = "rayon")]
pub fn par_resample<A>(
    array: ArrayView3<'_, A>,
    geometry: &VolumeGeometry,
    target: [f64; 3],
) -> Result<(Array3<A>, VolumeGeometry), ResampleError>
where
    A: Copy + ToPrimitive + NumCast + Zero + Send + Sync,
{
    let la = array.dim().0;
    let Setup {
        geometry: out_geometry,
        plan,
        tc,
        ts,
        mut out,
    } = Setup::new(array.dim(), geometry, target)?;
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(a, slice)| {
            let ta = Tap::new(a as f64 * plan.steps[0], la);
            fill_slice(&array, slice, ta, &tc, &ts);
        });
    Ok((out, out_geometry))
}
