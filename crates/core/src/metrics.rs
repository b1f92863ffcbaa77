//! Energy and carbon figures derived from a result
//!
//! All values stay in base units (kWh, kg, MiB) at full precision. Scaling to
//! µWh / µg and rounding happen only when text is produced.

use crate::data::{BenchmarkResult, DEFAULT_CO2_RATE};

/// kWh to µWh, kg to µg
pub const MICRO: f64 = 1_000_000.0;

/// Carbon intensity for the result, falling back to [`DEFAULT_CO2_RATE`]
pub fn effective_co2_rate(result: &BenchmarkResult) -> f64 {
    result
        .co2_rate
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .unwrap_or(DEFAULT_CO2_RATE)
}

/// kg CO2 emitted: energy (kWh) times carbon intensity (kg/kWh)
pub fn carbon_footprint_kg(energy_kwh: f64, co2_rate: f64) -> f64 {
    energy_kwh * co2_rate
}

pub fn to_micro(value: f64) -> f64 {
    value * MICRO
}

/// Average memory as a percentage of peak, 0 when peak is 0 or the ratio is not finite
pub fn memory_bar_percent(avg_mem_mib: f64, peak_mem_mib: f64) -> f64 {
    if peak_mem_mib == 0.0 {
        return 0.0;
    }
    let percent = avg_mem_mib / peak_mem_mib * 100.0;
    if percent.is_finite() {
        percent
    } else {
        0.0
    }
}

/// Bar fill in [0, 100]; an average above peak shows a full bar
pub fn bar_fill(percent: f64) -> f64 {
    if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Energy-related figures for one result
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySummary {
    pub avg_power_watt: f64,
    pub energy_kwh: f64,
    pub co2_rate: f64,
    pub carbon_kg: f64,
    pub region_name: Option<String>,
}

impl EnergySummary {
    pub fn from_result(result: &BenchmarkResult) -> Self {
        let co2_rate = effective_co2_rate(result);
        Self {
            avg_power_watt: result.metrics.avg_power_watt,
            energy_kwh: result.metrics.energy_kwh,
            co2_rate,
            carbon_kg: carbon_footprint_kg(result.metrics.energy_kwh, co2_rate),
            region_name: result.region_name.clone(),
        }
    }

    pub fn energy_micro_wh(&self) -> f64 {
        to_micro(self.energy_kwh)
    }

    pub fn carbon_micro_g(&self) -> f64 {
        to_micro(self.carbon_kg)
    }
}
