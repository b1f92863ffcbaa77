//! Dioxus-based dashboard for greenbench
//!
//! A pure Rust frontend that compiles to WebAssembly.
//! All styling is inline in Rust code.
//!
//! ## Data flow
//!
//! The form posts to the benchmark service, normalizes the answer and records
//! it in `localStorage`. It then bumps the [`UpdatedCtx`] generation counter;
//! the results panel reacts by reloading its [`Dashboard`] controller from
//! storage. Neither side hands the result to the other directly.

use chrono::Utc;
use dioxus::prelude::*;
use gloo_net::http::Request;
use greenbench_core::chart::{
    ChartScale, DrawCommand, Point, BACKGROUND_COLOR, CPU_COLOR, MEMORY_COLOR,
};
use greenbench_core::cpu_models::CUSTOM_CPU_MODEL;
use greenbench_core::svg::anchor_name;
use greenbench_core::views::{
    status_label, EnergyView, HistoryRow, OverviewView, PerformanceView,
};
use greenbench_core::{
    find_cpu_model, normalize, BenchmarkResult, ChartData, Dashboard, HistoryStore, StateStore,
    SubmissionContext, SubmissionRequest, Tab, ViewState, CPU_MODELS, EGRID_REGIONS,
};
use serde_json::Value;

mod form;
mod storage;
mod styles;

use form::FormFields;
use storage::BrowserStore;
use styles::*;

/// Global theme context - true = dark mode
#[derive(Clone, Copy)]
struct ThemeCtx(Signal<bool>);

/// Bumped every time a new result has been persisted
#[derive(Clone, Copy)]
struct UpdatedCtx(Signal<u64>);

#[derive(Clone, Copy)]
struct DashboardCtx(Signal<Dashboard<BrowserStore>>);

#[derive(Clone)]
struct StoreCtx(BrowserStore);

const ENDPOINT: &str = "http://127.0.0.1:1234/upload_data";

fn main() {
    tracing_wasm::set_as_global_default();
    launch(App);
}

#[component]
fn App() -> Element {
    let dark_mode = use_signal(|| false);
    use_context_provider(|| ThemeCtx(dark_mode));

    let StoreCtx(store) = use_context_provider(|| StoreCtx(BrowserStore::open()));

    let updated = use_signal(|| 0u64);
    use_context_provider(|| UpdatedCtx(updated));

    let mut dashboard = use_signal(move || {
        let mut dashboard = Dashboard::new(HistoryStore::new(store));
        dashboard.mount();
        dashboard
    });
    use_context_provider(|| DashboardCtx(dashboard));

    use_effect(move || {
        if *updated.read() > 0 {
            dashboard.write().on_benchmark_updated();
        }
    });

    let dark = *dark_mode.read();

    rsx! {
        div { style: "{app_style(dark)}",
            Header {}

            main { style: "{layout_style()}",
                SubmitForm {}
                ResultsPanel {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    let ThemeCtx(mut dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        header { style: "{header_style(dark)}",
            h1 { style: "{title_style(dark)}", "greenbench" }
            button {
                style: "{toggle_btn_style(dark)}",
                onclick: move |_| {
                    let current = *dark_mode.read();
                    dark_mode.set(!current);
                },
                if dark { "☀ light" } else { "☾ dark" }
            }
        }
    }
}

struct RegionOption {
    id: &'static str,
    label: String,
    selected: bool,
}

#[component]
fn SubmitForm() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();
    let StoreCtx(store) = use_context::<StoreCtx>();
    let UpdatedCtx(mut updated) = use_context::<UpdatedCtx>();
    let DashboardCtx(mut dashboard) = use_context::<DashboardCtx>();

    let mut fields = use_signal(FormFields::default);
    let submitting = dashboard.read().state() == ViewState::Loading;

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if dashboard.peek().state() == ViewState::Loading {
            return;
        }

        let (form, region_name) = {
            let fields = fields.read();
            (fields.parse(), fields.region_name())
        };
        let form = match form {
            Ok(form) => form,
            Err(message) => {
                dashboard.write().submission_failed(message);
                return;
            }
        };

        let context = SubmissionContext::new(form, region_name, Utc::now());
        let request = SubmissionRequest::from_form(&context.form_data);
        dashboard.write().begin_submission();

        let store = store.clone();
        spawn(async move {
            let outcome = submit_benchmark(&request).await.and_then(|response| {
                normalize(&response, &context).map_err(|e| e.to_string())
            });

            match outcome.and_then(|result| persist(store, &result)) {
                Ok(()) => {
                    let next = *updated.peek() + 1;
                    updated.set(next);
                }
                Err(message) => dashboard.write().submission_failed(message),
            }
        });
    };

    let values = fields.read().clone();
    let region_options: Vec<RegionOption> = EGRID_REGIONS
        .iter()
        .map(|region| RegionOption {
            id: region.id,
            label: format!("{} ({}) · {:.3} kg/kWh", region.name, region.id, region.co2_rate),
            selected: region.id == values.region,
        })
        .collect();

    rsx! {
        section { style: "{card_style(dark)}",
            h2 { style: "{card_title_style(dark)}", "Run a Benchmark" }

            form { onsubmit,
                label { style: "{label_style(dark)}", "Repository URL" }
                input {
                    style: "{input_style(dark)}",
                    placeholder: "https://github.com/user/repo",
                    value: "{values.repo_url}",
                    oninput: move |e| fields.write().repo_url = e.value(),
                }

                label { style: "{label_style(dark)}", "Entrypoint" }
                input {
                    style: "{input_style(dark)}",
                    placeholder: "main.py",
                    value: "{values.entrypoint}",
                    oninput: move |e| fields.write().entrypoint = e.value(),
                }

                label { style: "{label_style(dark)}", "CPU Power per Core (W)" }
                input {
                    style: "{input_style(dark)}",
                    r#type: "number",
                    step: "0.01",
                    value: "{values.cpu_watt}",
                    oninput: move |e| fields.write().cpu_watt = e.value(),
                }

                label { style: "{label_style(dark)}", "RAM Power per GB (W)" }
                input {
                    style: "{input_style(dark)}",
                    r#type: "number",
                    step: "0.01",
                    value: "{values.ram_watt}",
                    oninput: move |e| fields.write().ram_watt = e.value(),
                }

                label { style: "{label_style(dark)}", "Baseline Container Power (W)" }
                input {
                    style: "{input_style(dark)}",
                    r#type: "number",
                    step: "0.01",
                    value: "{values.baseline_watt}",
                    oninput: move |e| fields.write().baseline_watt = e.value(),
                }

                label { style: "{label_style(dark)}", "Container Timeout (seconds)" }
                input {
                    style: "{input_style(dark)}",
                    r#type: "number",
                    min: "1",
                    max: "3600",
                    value: "{values.timeout}",
                    oninput: move |e| fields.write().timeout = e.value(),
                }

                label { style: "{label_style(dark)}", "eGRID Region" }
                select {
                    style: "{input_style(dark)}",
                    onchange: move |e| fields.write().select_region(&e.value()),
                    for region in region_options.iter() {
                        option {
                            key: "{region.id}",
                            value: "{region.id}",
                            selected: region.selected,
                            "{region.label}"
                        }
                    }
                }

                label { style: "{label_style(dark)}", "CO₂ Rate (kg/kWh)" }
                input {
                    style: "{input_style(dark)}",
                    r#type: "number",
                    step: "0.001",
                    value: "{values.co2_rate}",
                    oninput: move |e| fields.write().co2_rate = e.value(),
                }

                label { style: "{label_style(dark)}", "CPU Model" }
                select {
                    style: "{input_style(dark)}",
                    onchange: move |e| fields.write().select_cpu_model(&e.value()),
                    option {
                        value: CUSTOM_CPU_MODEL,
                        selected: find_cpu_model(&values.cpu_model).is_none(),
                        "Custom"
                    }
                    for cpu in CPU_MODELS.iter() {
                        option {
                            key: "{cpu.model}",
                            value: "{cpu.model}",
                            selected: cpu.model == values.cpu_model,
                            "{cpu.model} ({cpu.watts} W/core)"
                        }
                    }
                }

                label { style: "{label_style(dark)}", "Notes" }
                textarea {
                    style: "{input_style(dark)}",
                    rows: "2",
                    value: "{values.notes}",
                    oninput: move |e| fields.write().notes = e.value(),
                }

                button {
                    style: "{primary_btn_style(submitting)}",
                    r#type: "submit",
                    disabled: submitting,
                    if submitting { "Running Benchmark..." } else { "Run Benchmark" }
                }
            }
        }
    }
}

#[component]
fn ResultsPanel() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();
    let DashboardCtx(dashboard) = use_context::<DashboardCtx>();

    let (state, error, active, rows, tab, log) = {
        let d = dashboard.read();
        let rows: Vec<HistoryRow> = d
            .entries()
            .iter()
            .rev()
            .map(|entry| HistoryRow::new(entry, d.selected_id()))
            .collect();
        (
            d.state(),
            d.error().map(str::to_string),
            d.active().cloned(),
            rows,
            d.tab(),
            d.log_content().to_string(),
        )
    };

    rsx! {
        section { style: "{card_style(dark)}",
            if let Some(message) = error {
                ErrorBanner { message }
            }

            {
                match (state, active) {
                    (ViewState::Loading, _) => rsx! { LoadingState {} },
                    (ViewState::Displaying, Some(result)) => rsx! {
                        ResultView { result, rows, tab, log }
                    },
                    _ => rsx! { EmptyState {} },
                }
            }
        }
    }
}

#[component]
fn LoadingState() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{loading_style(dark)}",
            p { "Running benchmark..." }
            p { style: "{muted_style(dark)}", "This can take as long as the container timeout." }
        }
    }
}

#[component]
fn ErrorBanner(message: String) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();
    let DashboardCtx(mut dashboard) = use_context::<DashboardCtx>();

    rsx! {
        div { style: "{error_style(dark)}",
            span {
                strong { "Error: " }
                "{message}"
            }
            button {
                style: "{toggle_btn_style(dark)}",
                onclick: move |_| dashboard.write().dismiss_error(),
                "Dismiss"
            }
        }
    }
}

#[component]
fn EmptyState() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{empty_style(dark)}",
            h3 { "No Results Yet" }
            p { "Submit your code using the form to see benchmark results here." }
        }
    }
}

#[component]
fn ResultView(result: BenchmarkResult, rows: Vec<HistoryRow>, tab: Tab, log: String) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();
    let DashboardCtx(mut dashboard) = use_context::<DashboardCtx>();

    let status = status_label(&result);

    rsx! {
        div { style: "{card_title_style(dark)}",
            "⚡ Benchmark Results"
            span { style: "{status_badge_style(result.is_success())}", "{status}" }
        }

        if !rows.is_empty() {
            select {
                style: "{input_style(dark)} margin-bottom: 0.75rem;",
                onchange: move |e| {
                    dashboard.write().select(&e.value());
                },
                for row in rows.iter() {
                    option {
                        key: "{row.id}",
                        value: "{row.id}",
                        selected: row.selected,
                        "{row.label} · {row.detail}"
                    }
                }
            }
        }

        div { style: "{tab_bar_style(dark)}",
            for t in Tab::ALL {
                button {
                    key: "{t.as_str()}",
                    style: "{tab_btn_style(dark, t == tab)}",
                    onclick: move |_| dashboard.write().set_tab(t),
                    "{t.title()}"
                }
            }
        }

        {
            match tab {
                Tab::Overview => rsx! { OverviewTab { view: OverviewView::new(&result, &log) } },
                Tab::Performance => rsx! { PerformanceTab { view: PerformanceView::new(&result) } },
                Tab::Energy => rsx! { EnergyTab { view: EnergyView::new(&result) } },
            }
        }
    }
}

#[component]
fn OverviewTab(view: OverviewView) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        p { style: "{muted_style(dark)}", "Benchmark run on {view.run_on}" }

        div { style: "{stats_grid_style()}",
            div {
                div { style: "{muted_style(dark)}", "Runtime" }
                div { style: "{stat_value_style()}", "{view.runtime}" }
            }
            div {
                div { style: "{muted_style(dark)}", "Energy Used" }
                div { style: "{stat_value_style()}", "{view.energy}" }
            }
            div {
                div { style: "{muted_style(dark)}", "Samples Collected" }
                div { style: "{stat_value_style()}", "{view.samples_collected}" }
            }
        }

        p { "Repo: {view.repo}" }
        p { "Entrypoint: {view.entrypoint}" }
        p { "Region: {view.region}" }
        if let Some(model) = view.cpu_model.as_ref() {
            p { "CPU Model: {model}" }
        }
        if !view.message.is_empty() {
            p { style: "{muted_style(dark)}", "{view.message}" }
        }

        h3 { "Logs" }
        {
            match view.logs.as_ref() {
                Some(logs) => rsx! { pre { style: "{log_style()}", "{logs}" } },
                None => rsx! { p { style: "{muted_style(dark)}", "No logs available" } },
            }
        }
    }
}

#[component]
fn PerformanceTab(view: PerformanceView) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{muted_style(dark)}", "CPU Usage: {view.avg_cpu}" }
        div { style: "{bar_track_style(dark)}",
            div { style: "{bar_fill_style(CPU_COLOR, view.avg_cpu_fill)}" }
        }
        div { style: "{muted_style(dark)}", "Memory (Average): {view.avg_mem}" }
        div { style: "{bar_track_style(dark)}",
            div { style: "{bar_fill_style(MEMORY_COLOR, view.avg_mem_fill)}" }
        }
        div { style: "{muted_style(dark)}", "Memory (Peak): {view.peak_mem}" }
        div { style: "{bar_track_style(dark)}",
            div { style: "{bar_fill_style(MEMORY_COLOR, 100.0)}" }
        }

        if !view.rows.is_empty() {
            ChartPanel {}

            h3 { "Raw Measurement Data" }
            table { style: "width: 100%; border-collapse: collapse;",
                thead {
                    tr {
                        th { style: "{table_header_style(dark)}", "Time (s)" }
                        th { style: "{table_header_style(dark)}", "CPU Usage" }
                        th { style: "{table_header_style(dark)} text-align: right;", "Memory (MiB)" }
                    }
                }
                tbody {
                    for (i, row) in view.rows.iter().enumerate() {
                        tr { key: "{i}", style: "{table_row_style(dark)}",
                            td { "{row.elapsed}" }
                            td { "{row.cpu}" }
                            td { style: "text-align: right;", "{row.mem}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn EnergyTab(view: EnergyView) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{stats_grid_style()}",
            div {
                div { style: "{muted_style(dark)}", "Average Power" }
                div { style: "{stat_value_style()}", "{view.avg_power}" }
            }
            div {
                div { style: "{muted_style(dark)}", "Total Energy" }
                div { style: "{stat_value_style()}", "{view.total_energy}" }
            }
        }

        h3 { "Carbon Footprint" }
        div { style: "{stat_value_style()}", "{view.carbon}" }
        p { style: "{muted_style(dark)}", "{view.carbon_basis}" }

        h3 { "Power Assumptions Used" }
        ul {
            for (i, line) in view.assumptions.iter().enumerate() {
                li { key: "{i}", "{line}" }
            }
        }
        if let Some(notes) = view.notes.as_ref() {
            p { style: "{muted_style(dark)}", "{notes}" }
        }

        h3 { "eGRID Region Carbon Intensity Ranking" }
        div { style: "max-height: 200px; overflow-y: auto;",
            table { style: "width: 100%; border-collapse: collapse;",
                thead {
                    tr {
                        th { style: "{table_header_style(dark)}", "Rank" }
                        th { style: "{table_header_style(dark)}", "Region" }
                        th { style: "{table_header_style(dark)} text-align: right;", "CO₂ Rate (kg/kWh)" }
                    }
                }
                tbody {
                    for row in view.ranking.iter() {
                        tr { key: "{row.id}", style: "{ranking_row_style(dark, row.current)}",
                            td { "{row.rank}" }
                            td {
                                "{row.name} "
                                span { style: "{muted_style(dark)}", "({row.id})" }
                            }
                            td { style: "text-align: right;",
                                "{row.co2_rate}"
                                if row.current {
                                    span { style: "{status_badge_style(true)} margin-left: 0.5rem;", "Current" }
                                }
                            }
                        }
                    }
                }
            }
        }
        p { style: "{muted_style(dark)}",
            "Choosing a region with lower carbon intensity can significantly reduce your application's environmental impact."
        }
    }
}

/// Dual-axis CPU/memory chart with hover readout
#[component]
fn ChartPanel() -> Element {
    let DashboardCtx(mut dashboard) = use_context::<DashboardCtx>();

    // Rendered width of the chart element, used to map pointer to surface pixels
    let mut element_width = use_signal(|| 0.0f64);

    let (commands, surface, hover, hover_left) = {
        let d = dashboard.read();
        let surface = *d.surface();
        let hover = d.hover().copied();
        let hover_left = hover.zip(d.active()).and_then(|(h, result)| {
            let data = ChartData::from_samples(&result.raw_stats);
            ChartScale::new(surface, &data).map(|scale| scale.x(h.elapsed) / surface.width * 100.0)
        });
        (d.chart(), surface, hover, hover_left)
    };

    rsx! {
        div {
            style: "{chart_surface_style()}",
            onmounted: move |evt| {
                let mounted_data = evt.data().clone();
                spawn(async move {
                    if let Ok(rect) = mounted_data.get_client_rect().await {
                        element_width.set(rect.width());
                    }
                });
            },
            onmouseleave: move |_| dashboard.write().pointer_leave(),
            onmousemove: move |e| {
                let width = *element_width.read();
                if width > 0.0 {
                    let x = surface.surface_x(e.data().element_coordinates().x, width);
                    dashboard.write().pointer_move(x);
                }
            },

            svg {
                style: "width: 100%; height: auto; pointer-events: none;",
                view_box: "0 0 {surface.width} {surface.height}",
                "preserveAspectRatio": "xMidYMid meet",

                for (i, command) in commands.iter().enumerate() {
                    DrawElement { key: "{i}", command: command.clone() }
                }
            }

            if let Some(point) = hover {
                {
                    let left = hover_left.unwrap_or(50.0);
                    // Keep the readout inside the card on either half
                    let position = if left < 50.0 {
                        format!("left: calc({left:.1}% + 12px);")
                    } else {
                        format!("right: calc({:.1}% + 12px);", 100.0 - left)
                    };
                    let time = format!("Time: {:.1}s", point.elapsed);
                    let cpu = format!("CPU: {:.2}%", point.cpu);
                    let mem = format!("Memory: {:.2} MiB", point.mem);
                    rsx! {
                        div { style: "{hover_tooltip_style()} {position}",
                            div { "{time}" }
                            div { style: "color: {CPU_COLOR};", "{cpu}" }
                            div { style: "color: {MEMORY_COLOR};", "{mem}" }
                        }
                    }
                }
            }
        }
    }
}

/// One chart draw command as an SVG element
#[component]
fn DrawElement(command: DrawCommand) -> Element {
    match command {
        DrawCommand::Clear { width, height } => rsx! {
            rect { x: "0", y: "0", "width": "{width}", "height": "{height}", fill: "{BACKGROUND_COLOR}" }
        },
        DrawCommand::Line { from, to, color, width, dashed } => {
            let dash = if dashed { "4,4" } else { "none" };
            rsx! {
                line {
                    x1: "{from.x}", y1: "{from.y}", x2: "{to.x}", y2: "{to.y}",
                    stroke: "{color}", "stroke-width": "{width}", "stroke-dasharray": "{dash}"
                }
            }
        }
        DrawCommand::Polyline { points, color, width } => {
            let d = line_path(&points);
            rsx! {
                path { d: "{d}", fill: "none", stroke: "{color}", "stroke-width": "{width}" }
            }
        }
        DrawCommand::Circle { center, radius, color } => rsx! {
            circle { cx: "{center.x}", cy: "{center.y}", r: "{radius}", fill: "{color}" }
        },
        DrawCommand::Rect { origin, width, height, color } => rsx! {
            rect { x: "{origin.x}", y: "{origin.y}", "width": "{width}", "height": "{height}", fill: "{color}" }
        },
        DrawCommand::Text { position, text, color, anchor, font_size } => {
            let anchor = anchor_name(anchor);
            rsx! {
                text {
                    x: "{position.x}", y: "{position.y}", fill: "{color}",
                    "font-size": "{font_size}", "text-anchor": "{anchor}",
                    "{text}"
                }
            }
        }
    }
}

/// SVG path through the given points
fn line_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        d.push_str(&format!("{} {:.1} {:.1}", cmd, p.x, p.y));
    }
    d
}

/// Record a result; the caller announces it through [`UpdatedCtx`]
fn persist<S: StateStore>(store: S, result: &BenchmarkResult) -> Result<(), String> {
    let mut history = HistoryStore::new(store);
    let evicted = history
        .record(result)
        .map_err(|e| format!("Failed to save result: {}", e))?;
    for entry in evicted {
        tracing::debug!("History full, dropped {}", entry.id);
    }
    Ok(())
}

async fn submit_benchmark(request: &SubmissionRequest) -> Result<Value, String> {
    let response = Request::post(ENDPOINT)
        .json(request)
        .map_err(|e| format!("Failed to encode request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to reach benchmark service: {}", e))?;

    if !response.ok() {
        return Err(format!(
            "HTTP error: {} {}",
            response.status(),
            response.status_text()
        ));
    }

    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenbench_core::{FormData, MemoryStore};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_line_path() {
        let d = line_path(&[Point::new(50.0, 250.0), Point::new(780.0, 20.0)]);
        assert_eq!(d, "M 50.0 250.0 L 780.0 20.0");
        assert_eq!(line_path(&[]), "");
    }

    #[test]
    fn test_persist_is_visible_through_shared_store() {
        let store = BrowserStore::Memory(Rc::new(RefCell::new(MemoryStore::new())));
        let context = SubmissionContext::new(FormData::default(), None, Utc::now());
        let result = normalize(&serde_json::json!({"results": {}}), &context).unwrap();

        persist(store.clone(), &result).unwrap();

        let history = HistoryStore::new(store);
        assert_eq!(
            history.current().map(|r| r.benchmark_id),
            Some(context.benchmark_id.clone())
        );
        assert_eq!(history.load().len(), 1);
    }
}
