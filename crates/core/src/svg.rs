//! SVG backend for chart draw commands

use crate::chart::{ChartSurface, DrawCommand, TextAnchor, BACKGROUND_COLOR};
use std::fmt::Write;

/// Render draw commands as a standalone SVG document
pub fn to_svg(surface: &ChartSurface, commands: &[DrawCommand]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = surface.width,
        h = surface.height,
    );
    svg.push('\n');

    for command in commands {
        svg.push_str(&element(command));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

/// One SVG element for a draw command
pub fn element(command: &DrawCommand) -> String {
    match command {
        DrawCommand::Clear { width, height } => format!(
            r#"<rect x="0" y="0" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            width, height, BACKGROUND_COLOR
        ),
        DrawCommand::Line {
            from,
            to,
            color,
            width,
            dashed,
        } => {
            let dash = if *dashed { r#" stroke-dasharray="4,4""# } else { "" };
            format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{}"{}/>"#,
                from.x, from.y, to.x, to.y, color, width, dash
            )
        }
        DrawCommand::Polyline {
            points,
            color,
            width,
        } => {
            let mut coords = String::new();
            for (i, p) in points.iter().enumerate() {
                if i > 0 {
                    coords.push(' ');
                }
                let _ = write!(coords, "{:.1},{:.1}", p.x, p.y);
            }
            format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                coords, color, width
            )
        }
        DrawCommand::Circle {
            center,
            radius,
            color,
        } => format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{}" fill="{}"/>"#,
            center.x, center.y, radius, color
        ),
        DrawCommand::Rect {
            origin,
            width,
            height,
            color,
        } => format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            origin.x, origin.y, width, height, color
        ),
        DrawCommand::Text {
            position,
            text,
            color,
            anchor,
            font_size,
        } => format!(
            r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="{}" text-anchor="{}">{}</text>"#,
            position.x,
            position.y,
            color,
            font_size,
            anchor_name(*anchor),
            escape(text)
        ),
    }
}

pub fn anchor_name(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
