//! Standalone HTML report for one result

use crate::error::Result;
use greenbench_core::svg::to_svg;
use greenbench_core::views::{EnergyView, HistoryRow, OverviewView, PerformanceView};
use greenbench_core::{render, BenchmarkResult, ChartSurface, HistoryEntry};
use minijinja::{context, Environment};
use serde::Serialize;

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <style>
        :root {
            --bg-primary: #f8fafc;
            --bg-card: #ffffff;
            --text-primary: #0f172a;
            --text-secondary: #475569;
            --border-color: #e2e8f0;
            --accent-green: #16a34a;
            --accent-red: #dc2626;
            --accent-cpu: #E11D48;
            --accent-mem: #2563EB;
        }

        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container { max-width: 960px; margin: 0 auto; padding: 2rem; }

        header { margin-bottom: 2rem; }
        h1 { font-size: 2rem; font-weight: 600; }
        h2 { font-size: 1.25rem; margin-bottom: 1rem; }
        .subtitle { color: var(--text-secondary); }

        .card {
            background: var(--bg-card);
            border: 1px solid var(--border-color);
            border-radius: 12px;
            padding: 1.5rem;
            margin-bottom: 1.5rem;
        }

        .status-success { color: var(--accent-green); }
        .status-failed { color: var(--accent-red); }

        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 1rem; }
        .stat-label { color: var(--text-secondary); font-size: 0.85rem; }
        .stat-value { font-size: 1.25rem; font-weight: 600; }

        .bar { height: 8px; background: var(--border-color); border-radius: 4px; overflow: hidden; }
        .bar-fill { height: 100%; }
        .bar-cpu { background: var(--accent-cpu); }
        .bar-mem { background: var(--accent-mem); }

        pre {
            background: #0f172a;
            color: #e2e8f0;
            padding: 1rem;
            border-radius: 8px;
            max-height: 24rem;
            overflow: auto;
            font-size: 0.85rem;
        }

        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid var(--border-color); }
        td.num { text-align: right; font-variant-numeric: tabular-nums; }
        .selected { font-weight: 600; }
        .current { background: #f0fdf4; }
        .badge { font-size: 0.75rem; background: #dcfce7; color: #166534; padding: 0.1rem 0.4rem; border-radius: 999px; }
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>{{ title }}</h1>
            <p class="subtitle">
                <span class="{% if overview.success %}status-success{% else %}status-failed{% endif %}">{{ overview.status }}</span>
                · Benchmark run on {{ overview.run_on }}
            </p>
        </header>

        <section class="card">
            <h2>Overview</h2>
            <div class="stats">
                <div><div class="stat-label">Runtime</div><div class="stat-value">{{ overview.runtime }}</div></div>
                <div><div class="stat-label">Energy Used</div><div class="stat-value">{{ overview.energy }}</div></div>
                <div><div class="stat-label">Samples Collected</div><div class="stat-value">{{ overview.samples_collected }}</div></div>
            </div>
            <p>Repo: {{ overview.repo }}</p>
            <p>Entrypoint: {{ overview.entrypoint }}</p>
            <p>Region: {{ overview.region }}</p>
            {% if overview.cpu_model %}<p>CPU Model: {{ overview.cpu_model }}</p>{% endif %}
            {% if overview.message %}<p>{{ overview.message }}</p>{% endif %}
            <h2>Logs</h2>
            {% if overview.logs %}<pre>{{ overview.logs }}</pre>{% else %}<p>No logs available</p>{% endif %}
        </section>

        <section class="card">
            <h2>Performance</h2>
            <p class="stat-label">CPU Usage: {{ performance.avg_cpu }}</p>
            <div class="bar"><div class="bar-fill bar-cpu" style="width: {{ performance.avg_cpu_fill }}%"></div></div>
            <p class="stat-label">Memory (Average): {{ performance.avg_mem }}</p>
            <div class="bar"><div class="bar-fill bar-mem" style="width: {{ performance.avg_mem_fill }}%"></div></div>
            <p class="stat-label">Memory (Peak): {{ performance.peak_mem }}</p>
            <div class="bar"><div class="bar-fill bar-mem" style="width: 100%"></div></div>
            {% if chart_svg %}
            <div class="chart">{{ chart_svg | safe }}</div>
            {% endif %}
            {% if performance.rows %}
            <h2>Raw Measurement Data</h2>
            <table>
                <thead><tr><th>Time (s)</th><th>CPU Usage</th><th>Memory (MiB)</th></tr></thead>
                <tbody>
                {% for row in performance.rows %}
                    <tr><td>{{ row.elapsed }}</td><td>{{ row.cpu }}</td><td class="num">{{ row.mem }}</td></tr>
                {% endfor %}
                </tbody>
            </table>
            {% endif %}
        </section>

        <section class="card">
            <h2>Energy</h2>
            <div class="stats">
                <div><div class="stat-label">Average Power</div><div class="stat-value">{{ energy.avg_power }}</div></div>
                <div><div class="stat-label">Total Energy</div><div class="stat-value">{{ energy.total_energy }}</div></div>
                <div><div class="stat-label">Carbon Footprint</div><div class="stat-value">{{ energy.carbon }}</div></div>
            </div>
            <p class="stat-label">{{ energy.carbon_basis }}</p>
            <h2>Power Assumptions Used</h2>
            <ul>
            {% for line in energy.assumptions %}
                <li>{{ line }}</li>
            {% endfor %}
            </ul>
            {% if energy.notes %}<p class="stat-label">{{ energy.notes }}</p>{% endif %}
            <h2>eGRID Region Carbon Intensity Ranking</h2>
            <table>
                <thead><tr><th>Rank</th><th>Region</th><th>CO₂ Rate (kg/kWh)</th></tr></thead>
                <tbody>
                {% for row in energy.ranking %}
                    <tr{% if row.current %} class="current"{% endif %}><td>{{ row.rank }}</td><td>{{ row.name }} ({{ row.id }})</td><td class="num">{{ row.co2_rate }}{% if row.current %} <span class="badge">Current</span>{% endif %}</td></tr>
                {% endfor %}
                </tbody>
            </table>
        </section>

        {% if history %}
        <section class="card">
            <h2>History</h2>
            <table>
                <tbody>
                {% for row in history %}
                    <tr{% if row.selected %} class="selected"{% endif %}><td>{{ row.label }}</td><td>{{ row.detail }}</td><td>{{ row.id }}</td></tr>
                {% endfor %}
                </tbody>
            </table>
        </section>
        {% endif %}

        <footer class="subtitle">Generated {{ generated_at }}</footer>
    </div>
</body>
</html>
"#;

/// Report configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub title: String,
    pub surface: ChartSurface,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Benchmark Results".to_string(),
            surface: ChartSurface::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OverviewData {
    success: bool,
    status: &'static str,
    run_on: String,
    runtime: String,
    energy: String,
    repo: String,
    entrypoint: String,
    region: String,
    cpu_model: Option<String>,
    samples_collected: u64,
    message: String,
    logs: Option<String>,
}

#[derive(Debug, Serialize)]
struct RowData {
    elapsed: String,
    cpu: String,
    mem: String,
}

#[derive(Debug, Serialize)]
struct PerformanceData {
    avg_cpu: String,
    avg_cpu_fill: String,
    avg_mem: String,
    avg_mem_fill: String,
    peak_mem: String,
    rows: Vec<RowData>,
}

#[derive(Debug, Serialize)]
struct EnergyData {
    avg_power: String,
    total_energy: String,
    carbon: String,
    carbon_basis: String,
    assumptions: Vec<String>,
    notes: Option<String>,
    ranking: Vec<RankingData>,
}

#[derive(Debug, Serialize)]
struct RankingData {
    rank: usize,
    id: &'static str,
    name: &'static str,
    co2_rate: String,
    current: bool,
}

#[derive(Debug, Serialize)]
struct HistoryData {
    id: String,
    label: String,
    detail: String,
    selected: bool,
}

/// Render the report for `result`, listing `history` alongside it
pub fn generate_report(
    result: &BenchmarkResult,
    history: &[HistoryEntry],
    config: &ReportConfig,
) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("report.html", REPORT_TEMPLATE)?;

    let template = env.get_template("report.html")?;

    let view = OverviewView::new(result, &result.logs);
    let overview = OverviewData {
        success: result.is_success(),
        status: view.status,
        run_on: view.run_on,
        runtime: view.runtime,
        energy: view.energy,
        repo: view.repo,
        entrypoint: view.entrypoint,
        region: view.region,
        cpu_model: view.cpu_model,
        samples_collected: view.samples_collected,
        message: view.message,
        logs: view.logs,
    };

    let view = PerformanceView::new(result);
    let performance = PerformanceData {
        avg_cpu: view.avg_cpu,
        avg_cpu_fill: format!("{:.1}", view.avg_cpu_fill),
        avg_mem: view.avg_mem,
        avg_mem_fill: format!("{:.1}", view.avg_mem_fill),
        peak_mem: view.peak_mem,
        rows: view
            .rows
            .into_iter()
            .map(|r| RowData {
                elapsed: r.elapsed,
                cpu: r.cpu,
                mem: r.mem,
            })
            .collect(),
    };

    let view = EnergyView::new(result);
    let energy = EnergyData {
        avg_power: view.avg_power,
        total_energy: view.total_energy,
        carbon: view.carbon,
        carbon_basis: view.carbon_basis,
        assumptions: view.assumptions,
        notes: view.notes,
        ranking: view
            .ranking
            .into_iter()
            .map(|r| RankingData {
                rank: r.rank,
                id: r.id,
                name: r.name,
                co2_rate: r.co2_rate,
                current: r.current,
            })
            .collect(),
    };

    let history: Vec<HistoryData> = history
        .iter()
        .rev()
        .map(|entry| {
            let row = HistoryRow::new(entry, Some(result.benchmark_id.as_str()));
            HistoryData {
                id: row.id,
                label: row.label,
                detail: row.detail,
                selected: row.selected,
            }
        })
        .collect();

    let chart_svg = if result.raw_stats.is_empty() {
        None
    } else {
        Some(to_svg(
            &config.surface,
            &render(&config.surface, &result.raw_stats, None),
        ))
    };

    let generated_at = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();

    let html = template.render(context! {
        title => &config.title,
        overview => overview,
        performance => performance,
        energy => energy,
        history => history,
        chart_svg => chart_svg,
        generated_at => generated_at,
    })?;

    Ok(html)
}
