//! Data structures for benchmark results, submissions and history entries

use crate::cpu_models::{find_cpu_model, preset_notes, CpuModel, CUSTOM_CPU_MODEL};
use crate::regions::{find_region, GridRegion, DEFAULT_REGION};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Carbon intensity used when a result carries no usable rate (kg CO2 per kWh)
pub const DEFAULT_CO2_RATE: f64 = 0.5;

/// Region label recorded when the submission did not resolve a region name
pub const UNKNOWN_REGION: &str = "Unknown Region";

/// Code directory the benchmark service resolves relative to its workspace
pub const DEFAULT_CODE_DIR: &str = "../test/code";

/// Status string the benchmark service reports for a completed run
pub const STATUS_SUCCESS: &str = "success";

/// One measurement tick reported by the benchmark service.
///
/// `time` is an absolute timestamp in **seconds since the Unix epoch**.
/// Fields that are missing or of the wrong type never fail the sample:
/// numbers decode as NaN and the CPU string decodes as empty (NaN percent).
/// The chart renderer skips non-finite values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Seconds since the Unix epoch
    #[serde(default = "nan", deserialize_with = "nan_if_invalid")]
    pub time: f64,
    /// CPU usage as reported, e.g. `"12.5%"`
    #[serde(default, deserialize_with = "text_or_empty")]
    pub cpu_perc_str: String,
    /// Memory usage in MiB
    #[serde(default = "nan", deserialize_with = "nan_if_invalid")]
    pub mem_usage_mib: f64,
}

impl Sample {
    pub fn new(time: f64, cpu_perc_str: impl Into<String>, mem_usage_mib: f64) -> Self {
        Self {
            time,
            cpu_perc_str: cpu_perc_str.into(),
            mem_usage_mib,
        }
    }

    /// CPU usage in percent, NaN when `cpu_perc_str` has no numeric prefix
    pub fn cpu_percent(&self) -> f64 {
        crate::normalize::parse_percent(&self.cpu_perc_str)
    }
}

/// Power model declared by the user at submission time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PowerAssumptions {
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub cpu_per_core_watt: f64,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub ram_per_gb_watt: f64,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub baseline_container_watt: f64,
    #[serde(default)]
    pub notes: String,
}

/// Snapshot of the submission inputs, stored alongside the result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub repo_url: String,
    pub entrypoint: String,
    pub cpu_watt: f64,
    pub ram_watt: f64,
    pub baseline_watt: f64,
    /// Seconds the service may wait on the container before killing it
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "eGridRegion", default)]
    pub egrid_region: String,
    pub co2_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_model: Option<String>,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            repo_url: String::new(),
            entrypoint: String::new(),
            cpu_watt: 2.5,
            ram_watt: 0.15,
            baseline_watt: 0.3,
            timeout: default_timeout(),
            notes: "Rough estimates for M1 MacBook Air - ADJUST FOR YOUR HARDWARE".to_string(),
            egrid_region: DEFAULT_REGION.id.to_string(),
            co2_rate: DEFAULT_REGION.co2_rate,
            cpu_model: Some(CUSTOM_CPU_MODEL.to_string()),
        }
    }
}

impl FormData {
    /// Power assumptions as sent to the benchmark service
    pub fn power_assumptions(&self) -> PowerAssumptions {
        PowerAssumptions {
            cpu_per_core_watt: self.cpu_watt,
            ram_per_gb_watt: self.ram_watt,
            baseline_container_watt: self.baseline_watt,
            notes: self.notes.clone(),
        }
    }

    /// Switch to `region` and its carbon intensity
    pub fn apply_region(&mut self, region: &GridRegion) {
        self.egrid_region = region.id.to_string();
        self.co2_rate = region.co2_rate;
    }

    /// Take the per-core wattage of `preset` and retire the placeholder note
    pub fn apply_cpu_model(&mut self, preset: &CpuModel) {
        self.cpu_watt = preset.watts;
        self.notes = preset_notes(&self.notes, preset);
        self.cpu_model = Some(preset.model.to_string());
    }

    /// Apply the named CPU preset if there is one, returning whether it matched
    pub fn select_cpu_model(&mut self, model: &str) -> bool {
        match find_cpu_model(model) {
            Some(preset) => {
                self.apply_cpu_model(preset);
                true
            }
            None => {
                self.cpu_model = Some(model.trim().to_string()).filter(|m| !m.is_empty());
                false
            }
        }
    }

    /// Display name of the selected grid region, if it is a known one
    pub fn region_name(&self) -> Option<&'static str> {
        find_region(&self.egrid_region).map(|r| r.name)
    }
}

/// Request body accepted by the benchmark service
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionRequest {
    pub data: SubmissionData,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionData {
    pub user_code_dir_relative: String,
    pub code_entrypoint: String,
    pub power_assumptions: PowerAssumptions,
    pub repo_url: String,
    pub co2_rate: f64,
    pub container_wait_timeout: u64,
}

impl SubmissionRequest {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            data: SubmissionData {
                user_code_dir_relative: DEFAULT_CODE_DIR.to_string(),
                code_entrypoint: form.entrypoint.clone(),
                power_assumptions: form.power_assumptions(),
                repo_url: form.repo_url.clone(),
                co2_rate: form.co2_rate,
                container_wait_timeout: form.timeout,
            },
        }
    }
}

/// Identity and context attached to a response when it is normalized
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionContext {
    pub benchmark_id: String,
    pub timestamp: DateTime<Utc>,
    pub region_name: String,
    pub form_data: FormData,
}

impl SubmissionContext {
    /// Build a context for a submission made at `timestamp`.
    ///
    /// Without an explicit `region_name` the form's region is looked up.
    pub fn new(form_data: FormData, region_name: Option<String>, timestamp: DateTime<Utc>) -> Self {
        let region_name = region_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| form_data.region_name().map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_REGION.to_string());

        Self {
            benchmark_id: benchmark_id_for(timestamp),
            timestamp,
            region_name,
            form_data,
        }
    }
}

/// Generate the benchmark identifier for a submission time
pub fn benchmark_id_for(timestamp: DateTime<Utc>) -> String {
    format!("benchmark_{}", timestamp.timestamp_millis())
}

/// Aggregate metrics computed by the benchmark service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RunMetrics {
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub avg_cpu_percent: f64,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub avg_mem_mib: f64,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub peak_mem_mib: f64,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub avg_power_watt: f64,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub energy_kwh: f64,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub runtime_seconds: f64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub samples_collected: u64,
}

/// Canonical record of one completed benchmark run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkResult {
    #[serde(rename = "benchmarkId")]
    pub benchmark_id: String,
    /// Submission time
    pub timestamp: DateTime<Utc>,
    /// `"success"` or whatever the service reported otherwise
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "count_or_zero_i64")]
    pub exit_code: i64,
    #[serde(flatten)]
    pub metrics: RunMetrics,
    /// kg CO2 per kWh for the selected grid region
    #[serde(rename = "co2Rate", default, skip_serializing_if = "Option::is_none")]
    pub co2_rate: Option<f64>,
    #[serde(rename = "regionName", default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(rename = "formData", default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<FormData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_assumptions_used: Option<PowerAssumptions>,
    /// Log lines joined with `\n`
    #[serde(default)]
    pub logs: String,
    #[serde(default)]
    pub raw_stats: Vec<Sample>,
}

impl BenchmarkResult {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn repo_url(&self) -> Option<&str> {
        self.form_data.as_ref().map(|f| f.repo_url.as_str())
    }

    pub fn entrypoint(&self) -> Option<&str> {
        self.form_data.as_ref().map(|f| f.entrypoint.as_str())
    }
}

/// A stored reference to a past result plus lookup metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub repo_url: String,
    #[serde(default)]
    pub entrypoint: String,
    #[serde(default)]
    pub region_name: String,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub co2_rate: f64,
    pub result: BenchmarkResult,
}

impl HistoryEntry {
    /// Derive the history entry recorded for a freshly normalized result
    pub fn from_result(result: &BenchmarkResult) -> Self {
        let co2_rate = result
            .form_data
            .as_ref()
            .map(|f| f.co2_rate)
            .or(result.co2_rate)
            .unwrap_or(DEFAULT_CO2_RATE);

        Self {
            id: result.benchmark_id.clone(),
            timestamp: result.timestamp,
            repo_url: result.repo_url().unwrap_or_default().to_string(),
            entrypoint: result.entrypoint().unwrap_or_default().to_string(),
            region_name: result
                .region_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_REGION.to_string()),
            co2_rate,
            result: result.clone(),
        }
    }

    /// Short label for listings: the last path segment of the repo URL
    pub fn repo_label(&self) -> &str {
        self.repo_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.repo_url)
    }
}

fn default_timeout() -> u64 {
    60
}

fn nan() -> f64 {
    f64::NAN
}

/// Read a JSON number or numeric string, `None` for anything else
pub(crate) fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strings verbatim, other scalars as JSON text, null or containers as empty
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn zero_if_invalid<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value).unwrap_or(0.0))
}

fn nan_if_invalid<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value).unwrap_or(f64::NAN))
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u64)
        .unwrap_or(0))
}

fn count_or_zero_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value)
        .filter(|n| n.is_finite())
        .map(|n| n as i64)
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sample_tolerates_bad_fields() {
        let sample: Sample =
            serde_json::from_str(r#"{"cpu_perc_str": "n/a", "mem_usage_mib": "12.5"}"#).unwrap();

        assert!(sample.time.is_nan());
        assert!(sample.cpu_percent().is_nan());
        assert_eq!(sample.mem_usage_mib, 12.5);
    }

    #[test]
    fn test_sample_cpu_of_any_type_keeps_the_sample() {
        let samples: Vec<Sample> = serde_json::from_str(
            r#"[
                {"time": 100, "cpu_perc_str": null, "mem_usage_mib": 50},
                {"time": 101, "cpu_perc_str": 20.0, "mem_usage_mib": 55},
                {"time": 102, "mem_usage_mib": 52}
            ]"#,
        )
        .unwrap();

        assert_eq!(samples.len(), 3);
        assert!(samples[0].cpu_percent().is_nan());
        assert_eq!(samples[0].mem_usage_mib, 50.0);
        assert_eq!(samples[1].cpu_percent(), 20.0);
        assert!(samples[2].cpu_percent().is_nan());
    }

    #[test]
    fn test_sample_nan_survives_persistence() {
        let sample = Sample::new(f64::NAN, "5%", 10.0);
        let json = serde_json::to_string(&sample).unwrap();
        let back: Sample = serde_json::from_str(&json).unwrap();

        assert!(back.time.is_nan());
        assert_eq!(back.mem_usage_mib, 10.0);
    }

    #[test]
    fn test_submission_request_shape() {
        let form = FormData {
            repo_url: "https://github.com/acme/widget".to_string(),
            entrypoint: "main.py".to_string(),
            co2_rate: 0.4,
            ..FormData::default()
        };

        let body = serde_json::to_value(SubmissionRequest::from_form(&form)).unwrap();

        assert_eq!(body["data"]["code_entrypoint"], "main.py");
        assert_eq!(body["data"]["container_wait_timeout"], 60);
        assert_eq!(body["data"]["co2_rate"], 0.4);
        assert_eq!(body["data"]["power_assumptions"]["cpu_per_core_watt"], 2.5);
        assert_eq!(body["data"]["user_code_dir_relative"], DEFAULT_CODE_DIR);
    }

    #[test]
    fn test_benchmark_id_from_timestamp() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(benchmark_id_for(ts), "benchmark_1700000000123");
    }

    #[test]
    fn test_repo_label() {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let form = FormData {
            repo_url: "https://github.com/acme/widget/".to_string(),
            ..FormData::default()
        };
        let ctx = SubmissionContext::new(form, None, ts);
        let result = crate::normalize::normalize(&serde_json::json!({"results": {}}), &ctx).unwrap();
        let entry = HistoryEntry::from_result(&result);

        assert_eq!(entry.repo_label(), "widget");
        assert_eq!(entry.region_name, "WECC California");
    }

    #[test]
    fn test_unknown_region_name() {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let form = FormData {
            egrid_region: "ZZZZ".to_string(),
            ..FormData::default()
        };

        let ctx = SubmissionContext::new(form.clone(), None, ts);
        assert_eq!(ctx.region_name, UNKNOWN_REGION);

        let ctx = SubmissionContext::new(form, Some("Lab grid".to_string()), ts);
        assert_eq!(ctx.region_name, "Lab grid");
    }

    #[test]
    fn test_default_form_uses_default_region() {
        let form = FormData::default();

        assert_eq!(form.egrid_region, "CAMX");
        assert_eq!(form.co2_rate, DEFAULT_REGION.co2_rate);
        assert_eq!(form.region_name(), Some("WECC California"));
    }

    #[test]
    fn test_cpu_preset_sets_watts_and_notes() {
        let mut form = FormData::default();

        assert!(form.select_cpu_model("Apple M2"));
        assert_eq!(form.cpu_watt, 2.8);
        assert_eq!(form.cpu_model.as_deref(), Some("Apple M2"));
        assert_eq!(form.notes, "Using Apple M2 (2.8W) - Adjust other values as needed");

        let mut form = FormData::default();
        assert!(!form.select_cpu_model("Homebuilt RISC-V"));
        assert_eq!(form.cpu_watt, 2.5);
        assert_eq!(form.cpu_model.as_deref(), Some("Homebuilt RISC-V"));
    }

    #[test]
    fn test_apply_region() {
        let mut form = FormData::default();
        form.apply_region(find_region("NYUP").unwrap());

        assert_eq!(form.egrid_region, "NYUP");
        assert_eq!(form.co2_rate, 0.124);
    }
}
