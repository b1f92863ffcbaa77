//! Normalizer for benchmark service responses
//!
//! The service response shape has drifted between versions. Logs have been
//! reported at the top level, under `results.logs`, `results.output` and
//! `results.console`, either as an array of lines or as a single string:
//!
//! ```text
//! { "status": "success", "logs": ["line1", "line2"], "results": { ... } }
//! { "status": "success", "results": { "output": "line1\nline2", ... } }
//! ```
//!
//! Everything below `results` is optional. Only a response without a
//! `results` object is rejected.

use crate::data::{lenient_number, BenchmarkResult, PowerAssumptions, RunMetrics, Sample, SubmissionContext};
use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Places the service has reported log output, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    /// `logs` at the top level of the response
    TopLevel,
    /// `results.logs`
    ResultsLogs,
    /// `results.output`
    ResultsOutput,
    /// `results.console`
    ResultsConsole,
}

impl LogSource {
    /// Evaluation order: the first source holding a value wins
    pub const PRECEDENCE: [LogSource; 4] = [
        LogSource::TopLevel,
        LogSource::ResultsLogs,
        LogSource::ResultsOutput,
        LogSource::ResultsConsole,
    ];

    fn lookup(self, response: &Value) -> Option<&Value> {
        match self {
            LogSource::TopLevel => response.get("logs"),
            LogSource::ResultsLogs => response.get("results")?.get("logs"),
            LogSource::ResultsOutput => response.get("results")?.get("output"),
            LogSource::ResultsConsole => response.get("results")?.get("console"),
        }
    }
}

/// Extract log text following [`LogSource::PRECEDENCE`].
///
/// Returns the winning source alongside the joined text; an absent log is an
/// empty string, not an error.
pub fn extract_logs(response: &Value) -> (Option<LogSource>, String) {
    for source in LogSource::PRECEDENCE {
        if let Some(value) = source.lookup(response).filter(|v| has_content(v)) {
            return (Some(source), log_text(value));
        }
    }
    (None, String::new())
}

/// Empty values do not shadow later sources
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Bool(b) => *b,
        _ => true,
    }
}

fn log_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join("\n"),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse the numeric prefix of a percent string (`"12.5%"` -> 12.5).
///
/// Anything without a leading number yields NaN.
pub fn parse_percent(text: &str) -> f64 {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(prefix) = PREFIX
        .get_or_init(|| Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").ok())
        .as_ref()
    else {
        return f64::NAN;
    };

    prefix
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(f64::NAN)
}

/// Reshape a raw service response into a canonical [`BenchmarkResult`]
pub fn normalize(response: &Value, submission: &SubmissionContext) -> Result<BenchmarkResult> {
    let results = response
        .get("results")
        .filter(|r| r.is_object())
        .ok_or_else(|| Error::MalformedResponse("response has no `results` object".to_string()))?;

    let metrics: RunMetrics = serde_json::from_value(results.clone())?;

    let (log_source, logs) = extract_logs(response);
    match log_source {
        Some(source) => debug!("Logs taken from {:?}", source),
        None => debug!("No logs in response"),
    }

    let raw_stats = extract_samples(response);

    let co2_rate = results
        .get("co2_rate")
        .and_then(lenient_number)
        .filter(|r| r.is_finite())
        .or(Some(submission.form_data.co2_rate));

    let power_assumptions_used = results
        .get("power_assumptions_used")
        .filter(|p| p.is_object())
        .and_then(|p| serde_json::from_value::<PowerAssumptions>(p.clone()).ok());

    let exit_code = results
        .get("exit_code")
        .and_then(lenient_number)
        .filter(|c| c.is_finite())
        .map(|c| c as i64)
        .unwrap_or(0);

    Ok(BenchmarkResult {
        benchmark_id: submission.benchmark_id.clone(),
        timestamp: submission.timestamp,
        status: response
            .get("status")
            .map(scalar_text)
            .unwrap_or_default(),
        message: response
            .get("message")
            .map(scalar_text)
            .unwrap_or_default(),
        exit_code,
        metrics,
        co2_rate,
        region_name: Some(submission.region_name.clone()),
        form_data: Some(submission.form_data.clone()),
        power_assumptions_used,
        logs,
        raw_stats,
    })
}

/// `results.raw_stats`, then top-level `raw_stats`; non-arrays yield nothing.
///
/// Sample objects always decode, with bad fields left as NaN. Items that are
/// not objects at all are skipped.
fn extract_samples(response: &Value) -> Vec<Sample> {
    let candidate = response
        .get("results")
        .and_then(|r| r.get("raw_stats"))
        .filter(|v| v.is_array())
        .or_else(|| response.get("raw_stats").filter(|v| v.is_array()));

    let Some(Value::Array(items)) = candidate else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| {
            let keep = item.is_object();
            if !keep {
                warn!("Skipping non-object sample: {}", item);
            }
            keep
        })
        .filter_map(|item| match serde_json::from_value::<Sample>(item.clone()) {
            Ok(sample) => Some(sample),
            Err(e) => {
                warn!("Skipping malformed sample: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FormData;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn context() -> SubmissionContext {
        let form = FormData {
            repo_url: "https://github.com/acme/widget".to_string(),
            entrypoint: "main.py".to_string(),
            co2_rate: 0.4,
            ..FormData::default()
        };
        SubmissionContext::new(
            form,
            Some("WECC California".to_string()),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
    }

    #[test]
    fn test_missing_results_is_malformed() {
        let err = normalize(&json!({"status": "error", "message": "boom"}), &context()).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));

        let err = normalize(&json!({"results": "nope"}), &context()).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_every_log_shape_yields_same_text() {
        let shapes = [
            json!({"logs": ["line1", "line2"], "results": {}}),
            json!({"logs": "line1\nline2", "results": {}}),
            json!({"results": {"logs": ["line1", "line2"]}}),
            json!({"results": {"output": "line1\nline2"}}),
            json!({"results": {"console": ["line1", "line2"]}}),
        ];

        for shape in &shapes {
            let result = normalize(shape, &context()).unwrap();
            assert_eq!(result.logs, "line1\nline2", "shape: {}", shape);
        }
    }

    #[test]
    fn test_log_precedence() {
        let response = json!({
            "results": {"logs": [], "output": "from output", "console": "from console"}
        });
        assert_eq!(
            extract_logs(&response),
            (Some(LogSource::ResultsOutput), "from output".to_string())
        );

        let response = json!({"logs": "top", "results": {"logs": "nested"}});
        assert_eq!(extract_logs(&response), (Some(LogSource::TopLevel), "top".to_string()));

        assert_eq!(extract_logs(&json!({"results": {}})), (None, String::new()));
    }

    #[test]
    fn test_scalar_logs_coerced_to_text() {
        let (_, text) = extract_logs(&json!({"logs": [1, "two", true]}));
        assert_eq!(text, "1\ntwo\ntrue");

        let (_, text) = extract_logs(&json!({"results": {"output": 42}}));
        assert_eq!(text, "42");
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("10.0%"), 10.0);
        assert_eq!(parse_percent(" 3.25 %"), 3.25);
        assert_eq!(parse_percent("100"), 100.0);
        assert_eq!(parse_percent(".5%"), 0.5);
        assert!(parse_percent("").is_nan());
        assert!(parse_percent("n/a").is_nan());
    }

    #[test]
    fn test_missing_fields_default() {
        let result = normalize(&json!({"status": "success", "results": {}}), &context()).unwrap();

        assert!(result.is_success());
        assert_eq!(result.metrics, RunMetrics::default());
        assert!(result.raw_stats.is_empty());
        assert_eq!(result.co2_rate, Some(0.4));
        assert!(result.power_assumptions_used.is_none());
        assert_eq!(result.region_name.as_deref(), Some("WECC California"));
    }

    #[test]
    fn test_metrics_and_context() {
        let response = json!({
            "status": "success",
            "message": "Benchmark complete",
            "results": {
                "avg_cpu_percent": 42.5,
                "avg_mem_mib": "50.5",
                "peak_mem_mib": 80,
                "avg_power_watt": 3.1,
                "energy_kwh": 0.002,
                "runtime_seconds": 12.0,
                "samples_collected": 12,
                "exit_code": 1,
                "co2_rate": 0.25,
                "power_assumptions_used": {
                    "cpu_per_core_watt": 2.5,
                    "ram_per_gb_watt": 0.15,
                    "baseline_container_watt": 0.3,
                    "notes": "M1"
                }
            }
        });

        let result = normalize(&response, &context()).unwrap();

        assert_eq!(result.message, "Benchmark complete");
        assert_eq!(result.metrics.avg_mem_mib, 50.5);
        assert_eq!(result.metrics.peak_mem_mib, 80.0);
        assert_eq!(result.metrics.samples_collected, 12);
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.co2_rate, Some(0.25));
        assert_eq!(result.benchmark_id, "benchmark_1700000000000");
        assert_eq!(result.power_assumptions_used.unwrap().notes, "M1");
    }

    #[test]
    fn test_raw_stats_locations() {
        let nested = json!({"results": {"raw_stats": [{"time": 1.0, "cpu_perc_str": "5%", "mem_usage_mib": 2.0}]}});
        assert_eq!(normalize(&nested, &context()).unwrap().raw_stats.len(), 1);

        let top = json!({"results": {}, "raw_stats": [{"time": 1.0, "cpu_perc_str": "5%", "mem_usage_mib": 2.0}]});
        assert_eq!(normalize(&top, &context()).unwrap().raw_stats.len(), 1);

        // Older clients stored an empty object here
        let object = json!({"results": {}, "raw_stats": {}});
        assert!(normalize(&object, &context()).unwrap().raw_stats.is_empty());
    }

    #[test]
    fn test_bad_cpu_field_keeps_sample_positions() {
        let response = json!({"results": {"raw_stats": [
            {"time": 100, "cpu_perc_str": null, "mem_usage_mib": 50},
            {"time": 101, "cpu_perc_str": 20.0, "mem_usage_mib": 55},
            {"time": 102, "cpu_perc_str": "15.0%", "mem_usage_mib": 52}
        ]}});

        let result = normalize(&response, &context()).unwrap();
        let data = crate::chart::ChartData::from_samples(&result.raw_stats);

        assert_eq!(data.elapsed(), vec![0.0, 1.0, 2.0]);
        assert_eq!(data.mem_values(), vec![50.0, 55.0, 52.0]);
        let cpu = data.cpu_values();
        assert!(cpu[0].is_nan());
        assert_eq!(&cpu[1..], &[20.0, 15.0]);
    }

    #[test]
    fn test_non_object_samples_skipped() {
        let response = json!({"results": {"raw_stats": [
            7,
            {"time": 1.0, "cpu_perc_str": "5%", "mem_usage_mib": 2.0}
        ]}});

        assert_eq!(normalize(&response, &context()).unwrap().raw_stats.len(), 1);
    }
}
