//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx3d;

pub use crate::data::{CtVolume, GeometryAttr};
pub use crate::geometry::{
    map_to_voxel_index, CentroidInput, ClinicalAxis, PhysicalPoint, VolumeGeometry, VoxelIndex,
};
pub use crate::roi::{extract, Extent, ExtractError, RoiArray};

pub use crate::consts::size::HALF_WIDTH_DEFAULT;
pub use crate::consts::DEFAULT_RESAMPLE_MM;

pub use crate::error::{InvalidInput, RoiError, RoiResult};
pub use crate::pipeline::{crop_roi, crop_roi_resampled};
pub use crate::resample::resample;

pub use crate::batch::{self, run_batch, BatchConfig, BatchReport, CaseRecord, CaseVolumes};

#[cfg(feature = "rayon")]
pub use crate::batch::par_run_batch;
