//! Minimalistic styles - no external CSS files
//!
//! Clean, practical design with light/dark theme support. The chart itself
//! always sits on a white card so its colors read the same in both themes.

// ============================================================================
// Layout
// ============================================================================

/// Generate app style based on theme
pub fn app_style(dark: bool) -> String {
    let (bg, fg) = if dark {
        ("#0d1117", "#c9d1d9")
    } else {
        ("#f8fafc", "#1a1a1a")
    };
    format!(
        "min-height: 100vh; \
         display: flex; \
         flex-direction: column; \
         font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif; \
         font-size: 14px; \
         background: {bg}; \
         color: {fg}; \
         line-height: 1.5; \
         margin: 0; \
         padding: 0;"
    )
}

/// Generate header style
pub fn header_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("#161b22", "#30363d")
    } else {
        ("#ffffff", "#d0d7de")
    };
    format!(
        "display: flex; \
         justify-content: space-between; \
         align-items: center; \
         padding: 0.75rem 1rem; \
         background: {bg}; \
         border-bottom: 1px solid {border};"
    )
}

/// Generate title style
pub fn title_style(_dark: bool) -> &'static str {
    "font-size: 1.1rem; \
     font-weight: 600; \
     margin: 0;"
}

/// Form on the left, results on the right; stacks on narrow screens
pub fn layout_style() -> &'static str {
    "display: grid; \
     grid-template-columns: repeat(auto-fit, minmax(340px, 1fr)); \
     gap: 1rem; \
     padding: 1rem; \
     max-width: 1400px; \
     width: 100%; \
     margin: 0 auto; \
     box-sizing: border-box;"
}

/// Card style
pub fn card_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("#161b22", "#30363d")
    } else {
        ("#ffffff", "#d0d7de")
    };
    format!(
        "background: {bg}; \
         border: 1px solid {border}; \
         border-radius: 8px; \
         padding: 1rem; \
         align-self: start;"
    )
}

/// Generate card title style
pub fn card_title_style(dark: bool) -> String {
    let fg = if dark { "#c9d1d9" } else { "#1a1a1a" };
    format!(
        "font-size: 1rem; \
         font-weight: 600; \
         color: {fg}; \
         margin: 0 0 0.75rem 0; \
         display: flex; \
         align-items: center; \
         gap: 0.5rem;"
    )
}

// ============================================================================
// Controls
// ============================================================================

/// Generate theme toggle button style
pub fn toggle_btn_style(dark: bool) -> String {
    let (bg, fg, border) = if dark {
        ("#21262d", "#c9d1d9", "#30363d")
    } else {
        ("#f6f8fa", "#1a1a1a", "#d0d7de")
    };
    format!(
        "background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         padding: 0.35rem 0.75rem; \
         font-family: inherit; \
         font-size: 0.8rem; \
         border-radius: 6px; \
         cursor: pointer;"
    )
}

pub fn label_style(dark: bool) -> String {
    let fg = if dark { "#8b949e" } else { "#57606a" };
    format!(
        "display: block; \
         font-size: 0.8rem; \
         font-weight: 500; \
         color: {fg}; \
         margin: 0.6rem 0 0.2rem 0;"
    )
}

/// Text inputs, selects and textareas
pub fn input_style(dark: bool) -> String {
    let (bg, fg, border) = if dark {
        ("#0d1117", "#c9d1d9", "#30363d")
    } else {
        ("#ffffff", "#1a1a1a", "#d0d7de")
    };
    format!(
        "width: 100%; \
         box-sizing: border-box; \
         background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         border-radius: 6px; \
         padding: 0.4rem 0.6rem; \
         font-family: inherit; \
         font-size: 0.85rem;"
    )
}

pub fn primary_btn_style(disabled: bool) -> String {
    let (bg, cursor) = if disabled {
        ("#8c959f", "not-allowed")
    } else {
        ("#16a34a", "pointer")
    };
    format!(
        "width: 100%; \
         margin-top: 1rem; \
         background: {bg}; \
         color: #ffffff; \
         border: none; \
         border-radius: 6px; \
         padding: 0.6rem; \
         font-family: inherit; \
         font-size: 0.9rem; \
         font-weight: 600; \
         cursor: {cursor};"
    )
}

/// Tab button; the active tab gets an underline
pub fn tab_btn_style(dark: bool, active: bool) -> String {
    let fg = match (dark, active) {
        (_, true) => "#16a34a",
        (true, false) => "#8b949e",
        (false, false) => "#57606a",
    };
    let border = if active { "#16a34a" } else { "transparent" };
    format!(
        "background: none; \
         border: none; \
         border-bottom: 2px solid {border}; \
         color: {fg}; \
         padding: 0.5rem 0.9rem; \
         font-family: inherit; \
         font-size: 0.85rem; \
         font-weight: 500; \
         cursor: pointer;"
    )
}

pub fn tab_bar_style(dark: bool) -> String {
    let border = if dark { "#30363d" } else { "#d0d7de" };
    format!(
        "display: flex; \
         border-bottom: 1px solid {border}; \
         margin-bottom: 1rem;"
    )
}

// ============================================================================
// Content
// ============================================================================

/// Success/failure pill next to the results title
pub fn status_badge_style(success: bool) -> &'static str {
    if success {
        "font-size: 0.75rem; background: #dcfce7; color: #166534; padding: 0.15rem 0.5rem; border-radius: 999px;"
    } else {
        "font-size: 0.75rem; background: #fee2e2; color: #991b1b; padding: 0.15rem 0.5rem; border-radius: 999px;"
    }
}

/// Grid of headline figures
pub fn stats_grid_style() -> &'static str {
    "display: grid; \
     grid-template-columns: repeat(auto-fit, minmax(140px, 1fr)); \
     gap: 0.75rem; \
     margin-bottom: 1rem;"
}

pub fn stat_value_style() -> &'static str {
    "font-size: 1.2rem; \
     font-weight: 600;"
}

/// Track of a horizontal usage bar
pub fn bar_track_style(dark: bool) -> String {
    let bg = if dark { "#21262d" } else { "#e5e7eb" };
    format!(
        "height: 8px; \
         background: {bg}; \
         border-radius: 4px; \
         overflow: hidden; \
         margin-bottom: 0.75rem;"
    )
}

pub fn bar_fill_style(color: &str, percent: f64) -> String {
    format!("height: 100%; width: {percent:.1}%; background: {color};")
}

/// Scrollable log output
pub fn log_style() -> &'static str {
    "background: #0f172a; \
     color: #e2e8f0; \
     padding: 0.75rem; \
     border-radius: 6px; \
     max-height: 24rem; \
     overflow: auto; \
     font-family: 'SF Mono', 'Fira Code', monospace; \
     font-size: 0.8rem; \
     white-space: pre-wrap;"
}

/// White surface the chart is drawn on
pub fn chart_surface_style() -> &'static str {
    "background: #ffffff; \
     border-radius: 8px; \
     position: relative; \
     cursor: crosshair; \
     margin-bottom: 1rem;"
}

/// Metrics table header style
pub fn table_header_style(dark: bool) -> String {
    let fg = if dark { "#6e7681" } else { "#6e7681" };
    format!(
        "text-align: left; \
         padding: 0.4rem 0; \
         font-size: 0.75rem; \
         color: {fg}; \
         font-weight: 500; \
         text-transform: uppercase; \
         letter-spacing: 0.5px;"
    )
}

/// Metrics table row style
pub fn table_row_style(dark: bool) -> String {
    let border = if dark { "#21262d" } else { "#f0f2f4" };
    format!(
        "font-size: 0.85rem; \
         border-top: 1px solid {border};"
    )
}

/// Carbon ranking row; the region of the active result is tinted
pub fn ranking_row_style(dark: bool, current: bool) -> String {
    let bg = match (current, dark) {
        (false, _) => "transparent",
        (true, true) => "#12261e",
        (true, false) => "#f0fdf4",
    };
    format!("{} background: {bg};", table_row_style(dark))
}

/// Hover tooltip style (compact)
pub fn hover_tooltip_style() -> &'static str {
    "position: absolute; \
     top: 8px; \
     background: rgba(255, 255, 255, 0.95); \
     color: #1a1a1a; \
     border: 1px solid #d0d7de; \
     border-radius: 8px; \
     padding: 0.5rem 0.7rem; \
     font-size: 0.75rem; \
     z-index: 100; \
     box-shadow: 0 4px 12px rgba(0,0,0,0.15); \
     pointer-events: none;"
}

/// Generate muted text style
pub fn muted_style(dark: bool) -> String {
    let fg = if dark { "#6e7681" } else { "#6e7681" };
    format!("color: {fg}; font-size: 0.8rem;")
}

/// Generate loading style
pub fn loading_style(_dark: bool) -> &'static str {
    "padding: 3rem 2rem; \
     text-align: center;"
}

/// Generate error style
pub fn error_style(dark: bool) -> String {
    let border = if dark { "#f85149" } else { "#cf222e" };
    format!(
        "display: flex; \
         justify-content: space-between; \
         align-items: center; \
         gap: 1rem; \
         padding: 0.75rem 1rem; \
         border: 1px solid {border}; \
         border-radius: 8px; \
         margin-bottom: 1rem;"
    )
}

/// Generate empty state style
pub fn empty_style(_dark: bool) -> &'static str {
    "padding: 3rem 2rem; \
     text-align: center; \
     opacity: 0.7;"
}
