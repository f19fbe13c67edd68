//! The dashboard page.
//!
//! Static HTML; figures are fetched from the chart endpoints and drawn with Plotly.js.

/// Plotly.js bundle loaded by the page.
pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Questions shown above each chart, paired with the div and endpoint that answer them.
pub const SECTIONS: [(&str, &str, &str); 2] = [
    (
        "Did men in the first class have a higher survival rate than children in the third class?",
        "demographic",
        "/api/charts/demographic",
    ),
    (
        "How do family sizes compare on the Titanic as reported by last names vs. calculated based on family size?",
        "families",
        "/api/charts/families",
    ),
];

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;color:#262730}\
h1{font-size:1.6rem;margin-top:2.5rem}.chart{width:100%;height:480px}.error{color:#D62728}";

/// Render the full page.
pub fn index_html() -> String {
    let sections: String = SECTIONS
        .iter()
        .map(|(question, id, _)| {
            format!("<h1>{}</h1>\n<div id=\"{}\" class=\"chart\"></div>\n", question, id)
        })
        .collect();

    let loaders: String = SECTIONS
        .iter()
        .map(|(_, id, endpoint)| format!("draw(\"{}\", \"{}\");\n", id, endpoint))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Titanic EDA</title>
<style>{style}</style>
<script src="{plotly}"></script>
</head>
<body>
{sections}<script>
async function draw(id, endpoint) {{
  const el = document.getElementById(id);
  try {{
    const res = await fetch(endpoint);
    const body = await res.json();
    if (!res.ok) throw new Error(body.error || res.statusText);
    Plotly.newPlot(el, body.data, body.layout, {{ responsive: true }});
  }} catch (err) {{
    el.innerHTML = '<p class="error">' + err.message + '</p>';
  }}
}}
{loaders}</script>
</body>
</html>
"#,
        style = STYLE,
        plotly = PLOTLY_JS_URL,
        sections = sections,
        loaders = loaders,
    )
}
