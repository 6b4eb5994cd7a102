//! 批量提取 ROI.
//!
//! 提供迭代器风格的批处理模式. 单个病例失败时仅记录日志, 不影响其他病例.

use ndarray::{Array3, ArrayView3};
use std::collections::HashMap;
use thiserror::Error;

use super::CaseRecord;
use crate::data::CtVolume;
use crate::roi::{extract, ExtractError};

/// 按病人编号提供体数据. 由调用方实现, 可以是已加载到内存的集合.
pub trait CaseVolumes<T> {
    /// 获取病人 `patient_id` 的体数据视图. 不存在时返回 `None`.
    fn volume(&self, patient_id: &str) -> Option<ArrayView3<'_, T>>;
}

impl<T> CaseVolumes<T> for HashMap<String, Array3<T>> {
    #[inline]
    fn volume(&self, patient_id: &str) -> Option<ArrayView3<'_, T>> {
        self.get(patient_id).map(|a| a.view())
    }
}

impl<T> CaseVolumes<T> for HashMap<String, CtVolume<T>> {
    #[inline]
    fn volume(&self, patient_id: &str) -> Option<ArrayView3<'_, T>> {
        self.get(patient_id).map(CtVolume::data)
    }
}

/// 单个病例的错误.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum CaseError {
    /// 找不到该病人的体数据.
    #[error("no volume found for patient `{0}`")]
    MissingVolume(String),

    /// 提取 ROI 失败.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// 单个病例的结果.
pub type CaseResult<T> = Result<Array3<T>, CaseError>;

/// 处理单个病例. 失败时以 `warn` 级别记录病人编号.
fn run_case<T, V>(record: &CaseRecord, volumes: &V) -> CaseResult<T>
where
    T: Clone,
    V: CaseVolumes<T> + ?Sized,
{
    let id = record.patient_id.as_str();
    let ans = match volumes.volume(id) {
        Some(vol) => extract(vol, &record.centroid(), &record.extent()).map_err(CaseError::from),
        None => Err(CaseError::MissingVolume(id.to_owned())),
    };
    match &ans {
        Ok(roi) => log::debug!("case `{id}`: ROI shape {:?}", roi.dim()),
        Err(e) => log::warn!("case `{id}` skipped: {e}"),
    }
    ans
}

/// 批处理器. 按输入顺序迭代所有病例, 返回 `(病人编号, 结果)`.
pub struct BatchRunner<'a, T, V: ?Sized> {
    volumes: &'a V,
    data_rev: Vec<CaseRecord>,
    _elem: std::marker::PhantomData<fn() -> T>,
}

impl<'a, T, V> BatchRunner<'a, T, V>
where
    T: Clone,
    V: CaseVolumes<T> + ?Sized,
{
    /// 由病例列表和体数据集合创建批处理器.
    pub fn new<I: IntoIterator<Item = CaseRecord>>(records: I, volumes: &'a V) -> Self {
        let mut data: Vec<CaseRecord> = records.into_iter().collect();
        data.reverse();
        Self {
            volumes,
            data_rev: data,
            _elem: std::marker::PhantomData,
        }
    }
}

impl<'a, T, V> Iterator for BatchRunner<'a, T, V>
where
    T: Clone,
    V: CaseVolumes<T> + ?Sized,
{
    type Item = (String, CaseResult<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.data_rev.pop()?;
        let ans = run_case(&record, self.volumes);
        Some((record.patient_id, ans))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.data_rev.len(), Some(self.data_rev.len()))
    }
}

impl<'a, T, V> ExactSizeIterator for BatchRunner<'a, T, V>
where
    T: Clone,
    V: CaseVolumes<T> + ?Sized,
{
    #[inline]
    fn len(&self) -> usize {
        self.data_rev.len()
    }
}

/// 批处理结果. 顺序与输入病例一致.
#[derive(Debug, Clone)]
pub struct BatchReport<T> {
    cases: Vec<(String, CaseResult<T>)>,
}

impl<T> BatchReport<T> {
    /// 全部结果.
    #[inline]
    pub fn cases(&self) -> &[(String, CaseResult<T>)] {
        &self.cases
    }

    /// 获取所有权.
    #[inline]
    pub fn into_cases(self) -> Vec<(String, CaseResult<T>)> {
        self.cases
    }

    /// 病例总数.
    #[inline]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// 是否没有病例?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// 成功的病例.
    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &Array3<T>)> {
        self.cases
            .iter()
            .filter_map(|(id, r)| r.as_ref().ok().map(|roi| (id.as_str(), roi)))
    }

    /// 失败的病例.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &CaseError)> {
        self.cases
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| (id.as_str(), e)))
    }

    /// 成功的病例数.
    #[inline]
    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }
}

impl<T> FromIterator<(String, CaseResult<T>)> for BatchReport<T> {
    fn from_iter<I: IntoIterator<Item = (String, CaseResult<T>)>>(iter: I) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}

/// 依次处理所有病例. 某个病例失败不会中断整个批处理.
pub fn run_batch<T, V, I>(records: I, volumes: &V) -> BatchReport<T>
where
    T: Clone,
    V: CaseVolumes<T> + ?Sized,
    I: IntoIterator<Item = CaseRecord>,
{
    let report: BatchReport<T> = BatchRunner::new(records, volumes).collect();
    log::info!(
        "batch finished: {}/{} cases extracted",
        report.success_count(),
        report.len()
    );
    report
}

/// 借助 `rayon`, 并行地处理所有病例. 结果顺序与输入一致, 与 [`run_batch`] 等价.
#[cfg(feature = "rayon")]
pub fn par_run_batch<T, V>(records: Vec<CaseRecord>, volumes: &V) -> BatchReport<T>
where
    T: Clone + Send,
    V: CaseVolumes<T> + Sync + ?Sized,
{
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    let cases: Vec<_> = records
        .into_par_iter()
        .map(|record| {
            let ans = run_case(&record, volumes);
            (record.patient_id, ans)
        })
        .collect();
    let report = BatchReport { cases };
    log::info!(
        "batch finished: {}/{} cases extracted",
        report.success_count(),
        report.len()
    );
    report
}
