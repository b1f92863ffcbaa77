//! Submission response -> normalized result -> history -> dashboard -> chart

use chrono::{TimeZone, Utc};
use greenbench_core::{
    chart::ChartData, hover_at, normalize, svg, views, ChartSurface, Dashboard, FormData,
    HistoryStore, MemoryStore, Notifier, SubmissionContext, SubmissionRequest, Tab, ViewState,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn service_response() -> serde_json::Value {
    json!({
        "status": "success",
        "message": "Benchmark completed",
        "results": {
            "avg_cpu_percent": 15.0,
            "avg_mem_mib": 52.3,
            "peak_mem_mib": 55.0,
            "avg_power_watt": 2.9,
            "energy_kwh": 0.002,
            "exit_code": 0,
            "runtime_seconds": 2.0,
            "samples_collected": 3,
            "logs": ["line1", "line2"],
            "raw_stats": [
                {"time": 100, "cpu_perc_str": "10.0%", "mem_usage_mib": 50},
                {"time": 101, "cpu_perc_str": "20.0%", "mem_usage_mib": 55},
                {"time": 102, "cpu_perc_str": "15.0%", "mem_usage_mib": 52}
            ]
        }
    })
}

#[test]
fn end_to_end_submission() {
    let form = FormData {
        repo_url: "https://github.com/acme/widget".to_string(),
        entrypoint: "main.py".to_string(),
        timeout: 60,
        co2_rate: 0.4,
        ..FormData::default()
    };

    let request = serde_json::to_value(SubmissionRequest::from_form(&form)).unwrap();
    assert_eq!(request["data"]["container_wait_timeout"], 60);

    let ctx = SubmissionContext::new(
        form,
        Some("WECC California".to_string()),
        Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    );
    let result = normalize(&service_response(), &ctx).unwrap();

    let data = ChartData::from_samples(&result.raw_stats);
    assert_eq!(data.elapsed(), vec![0.0, 1.0, 2.0]);
    assert_eq!(data.cpu_values(), vec![10.0, 20.0, 15.0]);
    assert_eq!(data.mem_values(), vec![50.0, 55.0, 52.0]);

    let mut notifier = Notifier::new();
    let mut writer = HistoryStore::new(MemoryStore::new());
    writer.record(&result).unwrap();

    let mut dashboard = Dashboard::new(writer).with_events(notifier.subscribe());
    notifier.notify();
    assert!(dashboard.poll_events());

    assert_eq!(dashboard.state(), ViewState::Displaying);
    assert_eq!(dashboard.log_content(), "line1\nline2");
    assert_eq!(dashboard.entries().len(), 1);

    let energy = views::tab_summary(Tab::Energy, dashboard.active().unwrap(), dashboard.log_content());
    assert!(energy.contains("800.00 μg CO₂"));

    let surface = ChartSurface::default();
    let hover = hover_at(&surface, &result.raw_stats, 415.0).unwrap();
    assert_eq!((hover.cpu, hover.mem), (20.0, 55.0));
    assert!(hover_at(&surface, &result.raw_stats, -100.0).is_none());

    let markup = svg::to_svg(&surface, &dashboard.chart());
    assert_eq!(markup.matches("<polyline").count(), 2);
}

#[test]
fn persisted_history_survives_reopen() {
    let mut writer = HistoryStore::new(MemoryStore::new());
    for i in 0..12 {
        let ctx = SubmissionContext::new(
            FormData::default(),
            None,
            Utc.timestamp_opt(1_700_000_000 + i, 0).unwrap(),
        );
        writer.record(&normalize(&service_response(), &ctx).unwrap()).unwrap();
    }

    let mut dashboard = Dashboard::new(HistoryStore::new(writer.store().clone()));
    dashboard.mount();

    assert_eq!(dashboard.entries().len(), 10);
    assert_eq!(dashboard.entries()[0].id, "benchmark_1700000002000");
    assert!(!dashboard.select("benchmark_1700000000000"));
    assert_eq!(dashboard.selected_id(), Some("benchmark_1700000011000"));
}
