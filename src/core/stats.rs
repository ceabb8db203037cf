//! np chart control limits.
//!
//! - p-bar = total defectives / total inspected
//! - CL    = n * p-bar
//! - sigma = sqrt(n * p-bar * (1 - p-bar))
//! - UCL   = CL + 3 sigma, LCL = max(0, CL - 3 sigma)

use crate::core::{ControlLimits, SubgroupRecord, SubgroupSize};
use crate::utils::error::{NpChartError, Result};

/// Chooses the `n` of the chart from the loaded subgroups.
///
/// Called only with a non-empty slice whose total size is positive.
pub type SizePolicy = fn(&[SubgroupRecord]) -> SubgroupSize;

const SIGMA_MULTIPLIER: f64 = 3.0;

/// Constant size when all subgroups agree, otherwise the mean size.
///
/// np charts assume a constant `n`; the mean is a compatibility fallback and
/// is reported with a warning.
pub fn mean_size_fallback(records: &[SubgroupRecord]) -> SubgroupSize {
    let first = records.first().map(|r| r.size).unwrap_or(0);
    if records.iter().all(|r| r.size == first) {
        tracing::info!("Constant subgroup size: n = {}", first);
        return SubgroupSize::Constant(first);
    }

    let total: f64 = records.iter().map(|r| r.size as f64).sum();
    let mean = total / records.len() as f64;
    tracing::warn!(
        "Subgroup size varies across {} subgroups; using mean size n = {:.2}",
        records.len(),
        mean
    );
    SubgroupSize::Mean(mean)
}

pub fn compute_limits(records: &[SubgroupRecord]) -> Result<ControlLimits> {
    compute_limits_with(records, mean_size_fallback)
}

pub fn compute_limits_with(records: &[SubgroupRecord], policy: SizePolicy) -> Result<ControlLimits> {
    validate_records(records)?;

    let total_size = checked_total(records, |r| r.size)
        .ok_or_else(|| NpChartError::invalid_input("total subgroup size overflows"))?;
    if total_size == 0 {
        return Err(NpChartError::invalid_input(format!(
            "total subgroup size is zero across {} subgroups",
            records.len()
        )));
    }
    let total_defective = checked_total(records, |r| r.defective)
        .ok_or_else(|| NpChartError::invalid_input("total defective count overflows"))?;

    let n = policy(records);
    let n_value = n.value();
    let p_bar = total_defective as f64 / total_size as f64;
    let cl = n_value * p_bar;
    let sigma = (n_value * p_bar * (1.0 - p_bar)).sqrt();
    let ucl = cl + SIGMA_MULTIPLIER * sigma;
    let lcl = (cl - SIGMA_MULTIPLIER * sigma).max(0.0);

    tracing::debug!(
        total_defective,
        total_size,
        p_bar,
        sigma,
        "Computed np chart limits"
    );

    Ok(ControlLimits {
        n,
        p_bar,
        cl,
        sigma,
        ucl,
        lcl,
    })
}

/// Subgroups whose defective count lies strictly outside the limits, in order.
pub fn find_outliers(records: &[SubgroupRecord], limits: &ControlLimits) -> Vec<SubgroupRecord> {
    records
        .iter()
        .filter(|r| limits.is_out_of_control(r.defective))
        .copied()
        .collect()
}

fn checked_total(records: &[SubgroupRecord], field: fn(&SubgroupRecord) -> u64) -> Option<u64> {
    records
        .iter()
        .try_fold(0u64, |acc, r| acc.checked_add(field(r)))
}

fn validate_records(records: &[SubgroupRecord]) -> Result<()> {
    for record in records {
        if record.defective > record.size {
            return Err(NpChartError::invalid_input(format!(
                "subgroup {} has {} defective units but only {} inspected",
                record.subgroup, record.defective, record.size
            )));
        }
    }
    Ok(())
}
