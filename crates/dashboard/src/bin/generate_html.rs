//! Binary to generate the index.html from Rust
//!
//! Run with: cargo run --bin generate_html
//!
//! Generates minimal HTML shell for the Dioxus WASM app.

use std::fs;
use std::path::Path;

const DIST_DIR: &str = "dist";

fn main() -> std::io::Result<()> {
    let dist_path = Path::new(DIST_DIR);
    fs::create_dir_all(dist_path)?;

    let index_path = dist_path.join("index.html");
    fs::write(&index_path, generate_index_html("greenbench"))?;

    println!("Generated: {}", index_path.display());
    Ok(())
}

fn generate_index_html(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{styles}
    </style>
</head>
<body>
    <div id="loading">loading...</div>
    <div id="main"></div>
    <script type="module">
        import init from './greenbench_dashboard.js';
        init().then(() => {{
            document.getElementById('loading').remove();
        }});
    </script>
</body>
</html>"#,
        title = title,
        styles = get_styles(),
    )
}

fn get_styles() -> &'static str {
    r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        html, body { min-height: 100%; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; font-size: 14px; }
        #loading { padding: 2rem; text-align: center; font-family: inherit; }
        #main { min-height: 100vh; }"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_loads_wasm_bundle() {
        let html = generate_index_html("greenbench");
        assert!(html.contains("<title>greenbench</title>"));
        assert!(html.contains("./greenbench_dashboard.js"));
        assert!(html.contains(r#"<div id="main"></div>"#));
    }
}
