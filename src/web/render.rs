//! HTML page for `/`: a self-contained document with inline CSS.

use crate::data::labels::{format_currency, format_optional_currency};
use crate::state::{AppContext, Evaluation};

/// Per-request view state. The default value is the plain form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    /// Row pre-selected in the dropdown.
    pub selected: Option<usize>,
    pub evaluation: Option<Evaluation>,
    pub error: Option<String>,
}

impl PageView {
    pub fn result(evaluation: Evaluation) -> Self {
        Self {
            selected: Some(evaluation.index),
            evaluation: Some(evaluation),
            error: None,
        }
    }

    pub fn error(selected: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            selected,
            evaluation: None,
            error: Some(message.into()),
        }
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_page(ctx: &AppContext, view: &PageView) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>House Price Predictor</title>\n");
    html.push_str("<style>\n");
    html.push_str(INLINE_CSS);
    html.push_str("</style>\n</head>\n<body>\n<main class=\"container\">\n");
    html.push_str("<h1>House Price Predictor</h1>\n");
    html.push_str(&format!(
        "<p class=\"subtitle\">Pick one of {} demo rows to compare the model's estimate with the actual sale price.</p>\n",
        ctx.row_count()
    ));

    // Form
    html.push_str("<form method=\"post\" action=\"/\">\n");
    html.push_str("<label for=\"demo_index\">Demo row</label>\n");
    html.push_str("<select id=\"demo_index\" name=\"demo_index\">\n");
    html.push_str("<option value=\"\">Select a row</option>\n");
    for option in ctx.options() {
        let selected = if view.selected == Some(option.index) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>\n",
            option.index,
            escape_html(&option.label)
        ));
    }
    html.push_str("</select>\n<button type=\"submit\">Predict</button>\n</form>\n");

    if let Some(message) = &view.error {
        html.push_str(&format!(
            "<div class=\"error\" role=\"alert\">{}</div>\n",
            escape_html(message)
        ));
    }

    if let Some(evaluation) = &view.evaluation {
        render_result(&mut html, evaluation);
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_result(html: &mut String, evaluation: &Evaluation) {
    html.push_str("<section class=\"result\">\n");
    html.push_str(&format!("<h2>Row {}</h2>\n", evaluation.index));
    html.push_str("<dl>\n");
    html.push_str(&format!(
        "<dt>Predicted price</dt><dd class=\"prediction\">{}</dd>\n",
        format_currency(evaluation.prediction)
    ));
    html.push_str(&format!(
        "<dt>Actual price</dt><dd class=\"actual\">{}</dd>\n",
        format_optional_currency(evaluation.actual)
    ));
    if let Some(diff) = evaluation.difference() {
        html.push_str(&format!(
            "<dt>Difference</dt><dd class=\"difference\">{}</dd>\n",
            format_currency(diff)
        ));
    }
    html.push_str("</dl>\n");

    html.push_str("<table class=\"features\">\n<thead><tr><th>Feature</th><th>Value</th></tr></thead>\n<tbody>\n");
    for (name, value) in &evaluation.features {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(name),
            escape_html(&value.to_string())
        ));
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
}

const INLINE_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f5f6f8; color: #222; margin: 0; }
.container { max-width: 720px; margin: 2rem auto; background: #fff; padding: 1.5rem 2rem; border-radius: 8px; box-shadow: 0 1px 4px rgba(0,0,0,0.08); }
h1 { margin-top: 0; }
.subtitle { color: #666; }
form { display: flex; gap: 0.5rem; align-items: center; flex-wrap: wrap; margin: 1rem 0; }
select { flex: 1; padding: 0.4rem; }
button { padding: 0.45rem 1.2rem; background: #2d6cdf; color: #fff; border: none; border-radius: 4px; cursor: pointer; }
.error { background: #fdecea; color: #a12622; padding: 0.75rem 1rem; border-radius: 4px; }
.result dl { display: grid; grid-template-columns: max-content auto; gap: 0.3rem 1rem; }
.result dt { font-weight: 600; }
.result dd { margin: 0; }
.prediction { color: #2d6cdf; font-weight: 700; }
table.features { border-collapse: collapse; width: 100%; margin-top: 1rem; }
table.features th, table.features td { border-bottom: 1px solid #e3e5e8; padding: 0.35rem 0.5rem; text-align: left; }
"#;
