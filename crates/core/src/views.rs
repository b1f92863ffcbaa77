//! Text views of the active result: overview, performance and energy tabs
//!
//! Shared by the CLI printer, the HTML export and the dashboard so that every
//! surface rounds numbers the same way.

use crate::chart::ChartData;
use crate::data::{BenchmarkResult, HistoryEntry};
use crate::metrics::{bar_fill, memory_bar_percent, EnergySummary};
use crate::regions::carbon_ranking;
use chrono::{DateTime, Utc};
use std::str::FromStr;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Performance,
    Energy,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Performance, Tab::Energy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Performance => "performance",
            Tab::Energy => "energy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Performance => "Performance",
            Tab::Energy => "Energy",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overview" => Ok(Tab::Overview),
            "performance" => Ok(Tab::Performance),
            "energy" => Ok(Tab::Energy),
            other => Err(format!("Unknown tab: {}", other)),
        }
    }
}

/// Human timestamp, e.g. "Nov 14, 2023, 10:13 PM"
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y, %I:%M %p").to_string()
}

pub fn status_label(result: &BenchmarkResult) -> &'static str {
    if result.is_success() {
        "Success"
    } else {
        "Failed"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewView {
    pub status: &'static str,
    pub run_on: String,
    pub runtime: String,
    pub energy: String,
    pub repo: String,
    pub entrypoint: String,
    pub region: String,
    pub cpu_model: Option<String>,
    pub samples_collected: u64,
    pub message: String,
    /// `None` renders as "No logs available"
    pub logs: Option<String>,
}

impl OverviewView {
    pub fn new(result: &BenchmarkResult, log_content: &str) -> Self {
        let energy = EnergySummary::from_result(result);
        let or_na = |value: Option<&str>| {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };

        Self {
            status: status_label(result),
            run_on: format_date(&result.timestamp),
            runtime: format!("{:.1}s", result.metrics.runtime_seconds),
            energy: format!("{:.2} μWh", energy.energy_micro_wh()),
            repo: or_na(result.repo_url()),
            entrypoint: or_na(result.entrypoint()),
            region: or_na(result.region_name.as_deref()),
            cpu_model: result.form_data.as_ref().and_then(|f| f.cpu_model.clone()),
            samples_collected: result.metrics.samples_collected,
            message: result.message.clone(),
            logs: Some(log_content.to_string()).filter(|l| !l.is_empty()),
        }
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("## Overview ({})", self.status),
            String::new(),
            format!("Benchmark run on {}", self.run_on),
            format!("Runtime: {}", self.runtime),
            format!("Energy Used: {}", self.energy),
            String::new(),
            format!("Repo: {}", self.repo),
            format!("Entrypoint: {}", self.entrypoint),
            format!("Region: {}", self.region),
        ];
        if let Some(model) = &self.cpu_model {
            lines.push(format!("CPU Model: {}", model));
        }
        lines.push(String::new());
        lines.push(format!("Samples Collected: {}", self.samples_collected));
        if !self.message.is_empty() {
            lines.push(self.message.clone());
        }
        lines.push(String::new());
        lines.push("### Logs".to_string());
        lines.push(String::new());
        lines.push(
            self.logs
                .clone()
                .unwrap_or_else(|| "No logs available".to_string()),
        );
        render_lines(lines)
    }
}

/// One row of the raw measurement table
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub elapsed: String,
    pub cpu: String,
    pub mem: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceView {
    pub avg_cpu: String,
    pub avg_cpu_fill: f64,
    pub avg_mem: String,
    /// Average memory as a share of peak, bar fill in [0, 100]
    pub avg_mem_fill: f64,
    pub peak_mem: String,
    pub rows: Vec<SampleRow>,
}

impl PerformanceView {
    pub fn new(result: &BenchmarkResult) -> Self {
        let metrics = &result.metrics;
        let data = ChartData::from_samples(&result.raw_stats);

        let rows = data
            .points()
            .iter()
            .zip(&result.raw_stats)
            .map(|(point, sample)| SampleRow {
                elapsed: format!("{:.1}s", point.elapsed),
                cpu: sample.cpu_perc_str.clone(),
                mem: format!("{:.3}", sample.mem_usage_mib),
            })
            .collect();

        Self {
            avg_cpu: format!("{:.1}%", metrics.avg_cpu_percent),
            avg_cpu_fill: bar_fill(metrics.avg_cpu_percent),
            avg_mem: format!("{:.2} MiB", metrics.avg_mem_mib),
            avg_mem_fill: bar_fill(memory_bar_percent(metrics.avg_mem_mib, metrics.peak_mem_mib)),
            peak_mem: format!("{:.2} MiB", metrics.peak_mem_mib),
            rows,
        }
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![
            "## Performance".to_string(),
            String::new(),
            format!("CPU Usage: {} {}", self.avg_cpu, text_bar(self.avg_cpu_fill)),
            format!("Memory (Average): {} {}", self.avg_mem, text_bar(self.avg_mem_fill)),
            format!("Memory (Peak): {} {}", self.peak_mem, text_bar(100.0)),
        ];

        if !self.rows.is_empty() {
            lines.extend([
                String::new(),
                "### Raw Measurement Data".to_string(),
                String::new(),
                "| Time (s) | CPU Usage | Memory (MiB) |".to_string(),
                "|----------|-----------|-------------:|".to_string(),
            ]);
            lines.extend(
                self.rows
                    .iter()
                    .map(|row| format!("| {} | {} | {} |", row.elapsed, row.cpu, row.mem)),
            );
        }
        render_lines(lines)
    }
}

/// One line of the carbon intensity ranking, cleanest grid first
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub rank: usize,
    pub id: &'static str,
    pub name: &'static str,
    pub co2_rate: String,
    /// Region the result was measured against
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyView {
    pub avg_power: String,
    pub total_energy: String,
    pub carbon: String,
    pub carbon_basis: String,
    pub co2_rate: String,
    pub assumptions: Vec<String>,
    pub notes: Option<String>,
    pub ranking: Vec<RankingRow>,
}

impl EnergyView {
    pub fn new(result: &BenchmarkResult) -> Self {
        let energy = EnergySummary::from_result(result);
        let co2_rate = format!("{:.3} kg/kWh", energy.co2_rate);
        let region = energy
            .region_name
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "selected".to_string());

        let mut assumptions = Vec::new();
        let mut notes = None;
        if let Some(power) = &result.power_assumptions_used {
            assumptions.push(format!("CPU per core: {} W", power.cpu_per_core_watt));
            assumptions.push(format!("RAM per GB: {} W", power.ram_per_gb_watt));
            assumptions.push(format!("Baseline: {} W", power.baseline_container_watt));
            notes = Some(power.notes.clone()).filter(|n| !n.is_empty());
        }
        assumptions.push(format!("CO₂ Rate: {}", co2_rate));

        let current_region = result
            .form_data
            .as_ref()
            .map(|f| f.egrid_region.trim())
            .unwrap_or_default();
        let ranking = carbon_ranking()
            .into_iter()
            .enumerate()
            .map(|(i, region)| RankingRow {
                rank: i + 1,
                id: region.id,
                name: region.name,
                co2_rate: format!("{:.3}", region.co2_rate),
                current: region.id.eq_ignore_ascii_case(current_region),
            })
            .collect();

        Self {
            avg_power: format!("{:.3} W", energy.avg_power_watt),
            total_energy: format!("{:.2} μWh", energy.energy_micro_wh()),
            carbon: format!("{:.2} μg CO₂", energy.carbon_micro_g()),
            carbon_basis: format!(
                "Based on {} region carbon intensity ({:.3} kg/kWh)",
                region, energy.co2_rate
            ),
            co2_rate,
            assumptions,
            notes,
            ranking,
        }
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![
            "## Energy".to_string(),
            String::new(),
            format!("Average Power: {}", self.avg_power),
            format!("Total Energy: {}", self.total_energy),
            String::new(),
            format!("Carbon Footprint: {}", self.carbon),
            self.carbon_basis.clone(),
            String::new(),
            "### Power Assumptions Used".to_string(),
            String::new(),
        ];
        lines.extend(self.assumptions.iter().map(|line| format!("- {}", line)));
        if let Some(notes) = &self.notes {
            lines.push(String::new());
            lines.push(notes.clone());
        }

        lines.extend([
            String::new(),
            "### eGRID Region Carbon Intensity Ranking".to_string(),
            String::new(),
            "| Rank | Region | CO₂ Rate (kg/kWh) |".to_string(),
            "|-----:|--------|------------------:|".to_string(),
        ]);
        lines.extend(self.ranking.iter().map(|row| {
            let current = if row.current { " (Current)" } else { "" };
            format!(
                "| {} | {} ({}) | {}{} |",
                row.rank, row.name, row.id, row.co2_rate, current
            )
        }));
        render_lines(lines)
    }
}

/// Text for one tab of the active result
pub fn tab_summary(tab: Tab, result: &BenchmarkResult, log_content: &str) -> String {
    match tab {
        Tab::Overview => OverviewView::new(result, log_content).summary(),
        Tab::Performance => PerformanceView::new(result).summary(),
        Tab::Energy => EnergyView::new(result).summary(),
    }
}

/// One line of the history picker
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub id: String,
    pub label: String,
    pub detail: String,
    pub selected: bool,
}

impl HistoryRow {
    pub fn new(entry: &HistoryEntry, selected_id: Option<&str>) -> Self {
        Self {
            id: entry.id.clone(),
            label: entry.repo_label().to_string(),
            detail: format!("{} • {}", format_date(&entry.timestamp), entry.entrypoint),
            selected: selected_id == Some(entry.id.as_str()),
        }
    }
}

fn render_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Twenty-cell text bar for a percentage in [0, 100]
fn text_bar(fill: f64) -> String {
    let cells = (bar_fill(fill) / 5.0).round() as usize;
    format!("[{}{}]", "#".repeat(cells), ".".repeat(20 - cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FormData, Sample, SubmissionContext};
    use crate::normalize::normalize;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn result() -> BenchmarkResult {
        let form = FormData {
            repo_url: "https://github.com/acme/widget".to_string(),
            entrypoint: "main.py".to_string(),
            co2_rate: 0.4,
            ..FormData::default()
        };
        let ctx = SubmissionContext::new(
            form,
            Some("WECC California".to_string()),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        );
        let mut result = normalize(
            &json!({
                "status": "success",
                "message": "done",
                "results": {
                    "avg_cpu_percent": 12.345,
                    "avg_mem_mib": 50,
                    "peak_mem_mib": 0,
                    "avg_power_watt": 1.5,
                    "energy_kwh": 0.002,
                    "runtime_seconds": 4.26,
                    "samples_collected": 2,
                    "power_assumptions_used": {
                        "cpu_per_core_watt": 2.5,
                        "ram_per_gb_watt": 0.15,
                        "baseline_container_watt": 0.3,
                        "notes": "M1"
                    }
                }
            }),
            &ctx,
        )
        .unwrap();
        result.raw_stats = vec![Sample::new(10.0, "1.5%", 3.0), Sample::new(10.5, "2.5%", 4.25)];
        result
    }

    #[test]
    fn test_tab_parsing() {
        assert_eq!("Energy".parse::<Tab>().unwrap(), Tab::Energy);
        assert!("logs".parse::<Tab>().is_err());
    }

    #[test]
    fn test_overview() {
        let view = OverviewView::new(&result(), "");

        assert_eq!(view.status, "Success");
        assert_eq!(view.runtime, "4.3s");
        assert_eq!(view.energy, "2000.00 μWh");
        assert_eq!(view.region, "WECC California");
        assert_eq!(view.logs, None);
        assert!(view.summary().contains("No logs available"));
    }

    #[test]
    fn test_performance_rows_and_zero_peak() {
        let view = PerformanceView::new(&result());

        assert_eq!(view.avg_cpu, "12.3%");
        assert_eq!(view.avg_mem_fill, 0.0);
        assert_eq!(
            view.rows[1],
            SampleRow {
                elapsed: "0.5s".to_string(),
                cpu: "2.5%".to_string(),
                mem: "4.250".to_string(),
            }
        );
    }

    #[test]
    fn test_energy() {
        let view = EnergyView::new(&result());

        assert_eq!(view.avg_power, "1.500 W");
        assert_eq!(view.carbon, "800.00 μg CO₂");
        assert_eq!(
            view.carbon_basis,
            "Based on WECC California region carbon intensity (0.400 kg/kWh)"
        );
        assert_eq!(view.assumptions.len(), 4);
        assert_eq!(view.notes.as_deref(), Some("M1"));
    }

    #[test]
    fn test_energy_ranking_marks_current_region() {
        let view = EnergyView::new(&result());

        assert_eq!(view.ranking.len(), crate::regions::EGRID_REGIONS.len());
        assert_eq!(view.ranking[0].rank, 1);
        assert_eq!(view.ranking[0].id, "NYUP");

        let current: Vec<_> = view.ranking.iter().filter(|r| r.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, "CAMX");
        assert_eq!(current[0].co2_rate, "0.225");
        assert!(view
            .summary()
            .contains("| WECC California (CAMX) | 0.225 (Current) |"));
    }

    #[test]
    fn test_summary_layout() {
        let summary = OverviewView::new(&result(), "line1\nline2").summary();

        assert!(summary.starts_with("## Overview (Success)\n\nBenchmark run on "));
        assert!(summary.ends_with("### Logs\n\nline1\nline2\n"));
    }

    #[test]
    fn test_history_row() {
        let entry = HistoryEntry::from_result(&result());
        let row = HistoryRow::new(&entry, Some(entry.id.as_str()));

        assert_eq!(row.label, "widget");
        assert!(row.selected);
        assert!(row.detail.ends_with("• main.py"));
    }

    #[test]
    fn test_text_bar() {
        assert_eq!(text_bar(50.0), "[##########..........]");
        assert_eq!(text_bar(f64::NAN), "[....................]");
    }
}
