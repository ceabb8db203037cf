use serde::{Deserialize, Serialize};
use std::fmt;

/// One sampled batch: how many units were inspected and how many failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgroupRecord {
    #[serde(rename = "sub_group", alias = "subgroup")]
    pub subgroup: u64,
    #[serde(rename = "sub_group_size", alias = "subgroup_size")]
    pub size: u64,
    #[serde(rename = "number_of_defective_units", alias = "defective")]
    pub defective: u64,
}

impl SubgroupRecord {
    pub fn new(subgroup: u64, size: u64, defective: u64) -> Self {
        Self {
            subgroup,
            size,
            defective,
        }
    }
}

/// The `n` used for the center line and sigma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubgroupSize {
    /// Every record shares this size.
    Constant(u64),
    /// Sizes vary; arithmetic mean of all sizes.
    Mean(f64),
}

impl SubgroupSize {
    pub fn value(&self) -> f64 {
        match *self {
            SubgroupSize::Constant(n) => n as f64,
            SubgroupSize::Mean(n) => n,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, SubgroupSize::Constant(_))
    }
}

impl fmt::Display for SubgroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubgroupSize::Constant(n) => write!(f, "{}", n),
            SubgroupSize::Mean(n) => write!(f, "{:.2}", n),
        }
    }
}

/// Center line and 3-sigma limits of an np chart.
///
/// `lcl` is clamped at zero, so `0 <= lcl <= cl <= ucl` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlLimits {
    pub n: SubgroupSize,
    pub p_bar: f64,
    pub cl: f64,
    pub sigma: f64,
    pub ucl: f64,
    pub lcl: f64,
}

impl ControlLimits {
    /// Strictly outside `[lcl, ucl]`; a count equal to a limit is in control.
    pub fn is_out_of_control(&self, defective: u64) -> bool {
        let value = defective as f64;
        value > self.ucl || value < self.lcl
    }
}

#[derive(Debug, Clone)]
pub struct ChartReport {
    pub records: usize,
    pub limits: ControlLimits,
    pub outliers: Vec<SubgroupRecord>,
    pub output_path: String,
}
