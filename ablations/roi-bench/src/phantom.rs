//! 合成胸部 CT 体模.
//!
//! 肺实质为 -850 HU, 其中嵌有一个 40 HU 的球形结节. 体模之外的数据不依赖任何文件.

use ndarray::Array3;
use nodule_roi::batch::CaseRecord;
use nodule_roi::Idx3d;
use std::collections::HashMap;

/// 肺实质 HU 值.
pub const PARENCHYMA_HU: i16 = -850;

/// 结节 HU 值.
pub const NODULE_HU: i16 = 40;

/// 结节半径 (体素).
const NODULE_RADIUS: usize = 4;

/// 单个体模的形状, 按存储顺序.
const SHAPE: Idx3d = (96, 128, 128);

/// 生成以 `(sagittal, coronal, axial)` 为结节中心的体模.
pub fn phantom([s0, c0, a0]: [usize; 3]) -> Array3<i16> {
    let r2 = NODULE_RADIUS * NODULE_RADIUS;
    Array3::from_shape_fn(SHAPE, |(a, c, s)| {
        let d2 = a.abs_diff(a0).pow(2) + c.abs_diff(c0).pow(2) + s.abs_diff(s0).pow(2);
        if d2 <= r2 {
            NODULE_HU
        } else {
            PARENCHYMA_HU
        }
    })
}

/// 第 `i` 个病例的结节中心. 保证远离边界.
#[inline]
fn centroid_of(i: usize) -> [usize; 3] {
    let (a, c, s) = SHAPE;
    [
        32 + (i * 7) % (s - 64),
        32 + (i * 11) % (c - 64),
        24 + (i * 5) % (a - 48),
    ]
}

/// 合成数据集.
pub struct Dataset {
    /// 病例列表.
    pub records: Vec<CaseRecord>,

    /// 病人编号 -> 体数据.
    pub volumes: HashMap<String, Array3<i16>>,
}

/// 生成 `n` 个正常病例, 再附加一个越界病例和一个缺失体数据的病例.
pub fn dataset(n: usize, size: usize) -> Dataset {
    let mut records = Vec::with_capacity(n + 2);
    let mut volumes = HashMap::with_capacity(n);
    for i in 0..n {
        let id = format!("PHANTOM-{i:04}");
        let centroid = centroid_of(i);
        volumes.insert(id.clone(), phantom(centroid));
        records.push(CaseRecord::new(id, centroid, size));
    }
    if n > 0 {
        // 中心贴近边界, 必然越界.
        records.push(CaseRecord::new("PHANTOM-0000", [1, 64, 48], size));
    }
    records.push(CaseRecord::new("PHANTOM-MISSING", [64, 64, 48], size));
    Dataset { records, volumes }
}
