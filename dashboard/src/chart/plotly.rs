//! Plotly figure output.
//!
//! Produces `{ "data": [...], "layout": {...} }`, ready for `Plotly.newPlot`
//! in the browser. Bar charts are aggregated here so the browser receives one
//! value per bar; histograms ship raw values and let Plotly bin them.

use serde_json::{json, Map, Value};

use super::{aggregate_bars, value_label, ChartKind, ChartRenderer, ChartSpec, TidyTable};
use crate::error::ChartResult;

/// Vertical gap between facet rows, as a fraction of the plot height.
const FACET_GAP: f64 = 0.04;

/// Renders specs as Plotly figure JSON in a white theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyRenderer;

impl ChartRenderer for PlotlyRenderer {
    type Output = Value;

    fn render(&self, spec: &ChartSpec) -> ChartResult<Value> {
        spec.validate()?;

        let facets = match spec.facet_row {
            Some(ref field) => spec.data.distinct(field)?,
            None => vec![Value::Null],
        };
        let colors = match spec.color {
            Some(ref field) => spec.data.distinct(field)?,
            None => vec![Value::Null],
        };

        let mut traces = Vec::new();
        let mut in_legend = vec![false; colors.len()];
        for (facet_idx, facet) in facets.iter().enumerate() {
            let in_facet = subset(&spec.data, spec.facet_row.as_deref(), facet)?;

            for (color_idx, color) in colors.iter().enumerate() {
                let cell = subset(&in_facet, spec.color.as_deref(), color)?;
                if cell.is_empty() {
                    continue;
                }

                let mut trace = match spec.kind {
                    ChartKind::Bar => bar_trace(spec, &cell)?,
                    ChartKind::Histogram => histogram_trace(spec, &cell)?,
                };

                trace.insert("marker".into(), json!({ "color": spec.palette.color(color_idx) }));
                trace.insert("xaxis".into(), json!("x"));
                trace.insert("yaxis".into(), json!(axis_ref(facet_idx)));
                if !color.is_null() {
                    let name = value_label(color);
                    trace.insert("name".into(), json!(name));
                    trace.insert("legendgroup".into(), json!(name));
                    // One legend entry per color, however many facets it spans.
                    trace.insert("showlegend".into(), json!(!in_legend[color_idx]));
                    in_legend[color_idx] = true;
                }

                traces.push(Value::Object(trace));
            }
        }

        Ok(json!({
            "data": traces,
            "layout": layout(spec, &facets),
        }))
    }
}

fn subset(data: &TidyTable, field: Option<&str>, value: &Value) -> ChartResult<TidyTable> {
    match field {
        Some(field) => data.filter_eq(field, value),
        None => Ok(data.clone()),
    }
}

fn bar_trace(spec: &ChartSpec, cell: &TidyTable) -> ChartResult<Map<String, Value>> {
    let bars = aggregate_bars(cell, &spec.x, spec.y.as_deref(), spec.histfunc)?;

    let mut trace = Map::new();
    trace.insert("type".into(), json!("bar"));
    trace.insert("x".into(), json!(bars.iter().map(|b| &b.x).collect::<Vec<_>>()));
    trace.insert("y".into(), json!(bars.iter().map(|b| b.y).collect::<Vec<_>>()));
    trace.insert("hovertemplate".into(), json!(hover_template(spec)));
    Ok(trace)
}

fn histogram_trace(spec: &ChartSpec, cell: &TidyTable) -> ChartResult<Map<String, Value>> {
    let mut trace = Map::new();
    trace.insert("type".into(), json!("histogram"));
    trace.insert("x".into(), json!(cell.column(&spec.x)?));
    trace.insert("histfunc".into(), json!(spec.histfunc.label()));
    trace.insert("bingroup".into(), json!(1));
    Ok(trace)
}

fn hover_template(spec: &ChartSpec) -> String {
    let mut parts = vec![format!("{}=%{{x}}", spec.x)];
    if let Some(ref y) = spec.y {
        parts.push(format!("{} of {}=%{{y}}", spec.histfunc.label(), y));
    }
    parts.join("<br>") + "<extra></extra>"
}

/// `y`, `y2`, `y3`, ... for facet rows top to bottom.
fn axis_ref(facet_idx: usize) -> String {
    if facet_idx == 0 {
        "y".to_string()
    } else {
        format!("y{}", facet_idx + 1)
    }
}

fn axis_key(facet_idx: usize) -> String {
    if facet_idx == 0 {
        "yaxis".to_string()
    } else {
        format!("yaxis{}", facet_idx + 1)
    }
}

/// Paper-coordinate `[bottom, top]` of a facet row; row 0 is the top one.
fn facet_domain(facet_idx: usize, facet_count: usize) -> [f64; 2] {
    let n = facet_count.max(1) as f64;
    // Gaps never take more than half the plot area.
    let gap = if n > 1.0 { FACET_GAP.min(0.5 / (n - 1.0)) } else { 0.0 };
    let height = (1.0 - gap * (n - 1.0)) / n;
    let top = 1.0 - facet_idx as f64 * (height + gap);
    [(top - height).max(0.0), top]
}

fn layout(spec: &ChartSpec, facets: &[Value]) -> Value {
    let y_title = match (spec.kind, &spec.y) {
        (ChartKind::Bar, Some(y)) => format!("{} of {}", spec.histfunc.label(), y),
        _ => spec.histfunc.label().to_string(),
    };

    let mut layout = Map::new();
    layout.insert("title".into(), json!({ "text": spec.title }));
    layout.insert("paper_bgcolor".into(), json!("white"));
    layout.insert("plot_bgcolor".into(), json!("white"));
    layout.insert("barmode".into(), json!("relative"));
    layout.insert("hovermode".into(), json!("closest"));
    if let Some(ref color) = spec.color {
        layout.insert("legend".into(), json!({ "title": { "text": color }, "tracegroupgap": 0 }));
    }

    let bottom = facets.len().saturating_sub(1);
    layout.insert(
        "xaxis".into(),
        json!({
            "anchor": axis_ref(bottom),
            "title": { "text": spec.x },
            "gridcolor": "#EBF0F8",
            "zerolinecolor": "#EBF0F8",
        }),
    );

    let mut annotations = Vec::new();
    for (idx, facet) in facets.iter().enumerate() {
        let domain = facet_domain(idx, facets.len());
        let mut axis = json!({
            "anchor": "x",
            "domain": domain,
            "gridcolor": "#EBF0F8",
            "zerolinecolor": "#EBF0F8",
            "title": { "text": y_title },
        });
        if idx > 0 {
            axis["matches"] = json!("y");
        }
        layout.insert(axis_key(idx), axis);

        if let (Some(field), false) = (&spec.facet_row, facet.is_null()) {
            annotations.push(json!({
                "text": format!("{}={}", field, value_label(facet)),
                "textangle": 90,
                "showarrow": false,
                "xref": "paper",
                "x": 0.98,
                "xanchor": "left",
                "yref": "paper",
                "y": (domain[0] + domain[1]) / 2.0,
                "yanchor": "middle",
            }));
        }
    }
    if !annotations.is_empty() {
        layout.insert("annotations".into(), json!(annotations));
    }

    Value::Object(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{demographic_chart, family_chart, FIRST_CLASS_MALE, LAST_NAMES_GROUP};
    use crate::dataset::fixtures;
    use crate::transform::{family_size, last_names, survival_demographics};

    #[test]
    fn test_bar_figure() {
        let rows = survival_demographics(&fixtures::sample());
        let figure = PlotlyRenderer.render(&demographic_chart(&rows)).unwrap();

        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0]["type"], "bar");
        assert_eq!(traces[0]["x"][0], FIRST_CLASS_MALE);
        assert_eq!(traces[0]["y"][0], 50.0);
        assert_eq!(traces[0]["y"][1], 0.0);
        assert_eq!(traces[0]["marker"]["color"], "#1F77B4");
        assert_eq!(figure["layout"]["yaxis"]["title"]["text"], "avg of survival_percentage");
    }

    #[test]
    fn test_faceted_histogram() {
        let dataset = fixtures::sample();
        let surnames = last_names(&dataset);
        let sizes = family_size(&dataset);
        let figure = PlotlyRenderer.render(&family_chart(&surnames, &sizes)).unwrap();

        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);

        assert_eq!(traces[0]["type"], "histogram");
        assert_eq!(traces[0]["name"], LAST_NAMES_GROUP);
        assert_eq!(traces[0]["yaxis"], "y");
        assert_eq!(traces[0]["x"].as_array().unwrap().len(), 10);

        assert_eq!(traces[1]["yaxis"], "y2");
        assert_eq!(traces[1]["x"].as_array().unwrap().len(), 11);
        assert_ne!(traces[0]["marker"]["color"], traces[1]["marker"]["color"]);

        let layout = &figure["layout"];
        assert_eq!(layout["yaxis2"]["matches"], "y");
        assert_eq!(layout["xaxis"]["anchor"], "y2");
        assert_eq!(layout["annotations"].as_array().unwrap().len(), 2);
        assert_eq!(layout["annotations"][0]["text"], "group=Last_Names");
    }

    #[test]
    fn test_facet_domains_stack_top_down() {
        let top = facet_domain(0, 2);
        let bottom = facet_domain(1, 2);
        assert!((top[1] - 1.0).abs() < 1e-9);
        assert!(bottom[1] < top[0]);
        assert!(bottom[0].abs() < 1e-9);
        assert_eq!(facet_domain(0, 1), [0.0, 1.0]);
    }

    #[test]
    fn test_many_facets_do_not_overlap() {
        let count = 40;
        let domains: Vec<[f64; 2]> = (0..count).map(|idx| facet_domain(idx, count)).collect();

        for domain in &domains {
            assert!(domain[0] < domain[1]);
            assert!(domain[0] >= 0.0);
        }
        for pair in domains.windows(2) {
            assert!(pair[1][1] <= pair[0][0] + 1e-9);
        }
    }

    #[test]
    fn test_invalid_spec_rejected() {
        let spec = ChartSpec::new("t", ChartKind::Histogram, TidyTable::new(["a"]), "b");
        assert!(PlotlyRenderer.render(&spec).is_err());
    }
}
