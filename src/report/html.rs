//! HTML report page rendering the figure with plotly.js

use crate::error::Result;
use crate::report::figure::{Figure, REPORT_TITLE};
use crate::report::Summary;
use chrono::Local;
use std::io::Write;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub fn write<W: Write>(writer: &mut W, figure: &Figure) -> Result<()> {
    let summary = Summary::from_figure(figure);
    let figure_json = script_safe(&serde_json::to_string(figure)?);
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S");

    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{plotly}"></script>
    <style>
        :root {{
            --bg: #ffffff;
            --border: #d0d7de;
            --text: #1f2328;
            --dim: #656d76;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }}
        .container {{ max-width: 1600px; margin: 0 auto; padding: 1.5rem; }}
        .meta {{
            color: var(--dim);
            font-size: 0.875rem;
            padding-bottom: 0.75rem;
            margin-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }}
        #signal-plot {{ width: 100%; }}
        .footer {{ color: var(--dim); font-size: 0.75rem; margin-top: 1rem; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="meta">{rows} directories &middot; {traces} traces</div>
        <div id="signal-plot"></div>
        <div class="footer">Generated {generated}</div>
    </div>
    <script>
    const figure = {figure_json};
    Plotly.newPlot('signal-plot', figure.data, figure.layout, {{ responsive: true }});
    </script>
</body>
</html>
"#,
        title = html_escape(REPORT_TITLE),
        plotly = PLOTLY_CDN,
        rows = summary.rows,
        traces = summary.traces,
        generated = generated,
        figure_json = figure_json,
    )?;

    Ok(())
}

/// Keep embedded JSON from closing the surrounding `<script>` element
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
