//! Server-side HTML for the recommendation form.
//!
//! One page serves both states: the bare form (GET /) and the form followed by
//! either a recommendation or an error box (POST /recommend). Every dynamic
//! string goes through [`escape`].

use croprec::{FeatureVector, LoadedModel, Parameter, Recommendation, SliderGroup, SliderSpec};

pub const PAGE_TITLE: &str = "Smart Crop Recommender";

/// What to show under the form.
#[derive(Debug)]
pub enum Outcome<'a> {
    Recommended(&'a Recommendation),
    Failed(&'a str),
}

const STYLE: &str = r#"
body { margin: 0; background-color: #f5f9f4; font-family: system-ui, sans-serif; color: #2d3436; }
.main-container { max-width: 1100px; margin: 20px auto 30px; background-color: white; border-radius: 15px; padding: 30px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
.header-title { color: #2e7d32; text-align: center; font-size: 2.5rem; margin-bottom: 0.5rem; }
.subheader { color: #388E3C; text-align: center; font-size: 1.2rem; margin-bottom: 2rem; }
.columns { display: flex; gap: 40px; flex-wrap: wrap; }
.column { flex: 1; min-width: 300px; }
.slider { margin-bottom: 18px; }
.slider label { display: flex; justify-content: space-between; font-weight: 600; }
.slider input[type=range] { width: 100%; accent-color: #4CAF50; }
.slider .help { color: #636e72; font-size: 0.85rem; }
.actions { text-align: center; margin-top: 20px; }
.actions button { background-color: #4CAF50; color: white; font-weight: bold; padding: 12px 24px; border-radius: 8px; border: none; font-size: 1.1rem; transition: all 0.3s; box-shadow: 0 4px 6px rgba(0,0,0,0.1); cursor: pointer; min-width: 50%; }
.actions button:hover { background-color: #388E3C; transform: scale(1.05); box-shadow: 0 6px 8px rgba(0,0,0,0.15); }
.recommend-box { background: #e8f5e9; border-left: 5px solid #4caf50; padding: 20px; border-radius: 8px; margin-top: 20px; color: #1b5e20; }
.recommend-box .crop { color: #1b5e20; font-weight: 700; }
.error-box { background: #fdecea; border-left: 5px solid #d32f2f; padding: 20px; border-radius: 8px; margin-top: 20px; color: #b71c1c; }
.parameter-box { background: #f1f8e9; padding: 15px; border-radius: 10px; margin-top: 15px; width: 100%; border-collapse: collapse; }
.parameter-box th, .parameter-box td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #dcedc8; }
.divider { border-top: 2px solid #4CAF50; margin: 1.5rem 0; }
.footer { max-width: 1100px; margin: 20px auto; background-color: #2d3436; padding: 15px 30px; border-radius: 10px; color: #f5f6fa; }
.caption { max-width: 1100px; margin: 0 auto 30px; color: #636e72; font-size: 0.85rem; font-style: italic; }
"#;

const INSIGHTS: [(&str, &str); 3] = [
    (
        "Nitrogen (N)",
        "Essential for chlorophyll production and vegetative growth",
    ),
    (
        "Phosphorous (P)",
        "Crucial for root development and energy transfer",
    ),
    (
        "Potassium (K)",
        "Important for water regulation and disease resistance",
    ),
];

/// Render the full page. `features` positions the sliders.
pub fn page(model: &LoadedModel, features: &FeatureVector, outcome: Option<Outcome<'_>>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"));

    html.push_str("<div class=\"main-container\">\n");
    html.push_str(
        "<h1 class=\"header-title\">🌾 Smart Agriculture Crop Recommendation System</h1>\n\
         <p class=\"subheader\">Optimize your farming with AI-powered crop suggestions</p>\n\
         <div class=\"divider\"></div>\n",
    );

    html.push_str("<form method=\"post\" action=\"/recommend\">\n<div class=\"columns\">\n");
    html.push_str(&column("🌱 Soil Composition", SliderGroup::Soil, features));
    html.push_str(&column("🌤️ Climate Conditions", SliderGroup::Climate, features));
    html.push_str(
        "</div>\n<div class=\"actions\"><button type=\"submit\">Get Crop Recommendation</button></div>\n</form>\n",
    );

    match outcome {
        Some(Outcome::Recommended(rec)) => html.push_str(&recommendation(rec)),
        Some(Outcome::Failed(message)) => html.push_str(&format!(
            "<div class=\"error-box\"><strong>Prediction failed:</strong> {}</div>\n",
            escape(message)
        )),
        None => {}
    }

    html.push_str("</div>\n<div class=\"divider\"></div>\n");
    html.push_str(&footer());
    html.push_str(&caption(model));
    html.push_str("</body>\n</html>\n");
    html
}

fn column(title: &str, group: SliderGroup, features: &FeatureVector) -> String {
    let mut html = format!("<div class=\"column\">\n<h3>{title}</h3>\n");
    for parameter in Parameter::FORM_ORDER {
        let spec = parameter.spec();
        if spec.group == group {
            html.push_str(&slider(spec, features.get(parameter)));
        }
    }
    html.push_str("</div>\n");
    html
}

fn slider(spec: &SliderSpec, value: f64) -> String {
    let key = spec.key;
    let shown = spec.format_value(value);
    format!(
        "<div class=\"slider\">\n\
         <label for=\"{key}\">{label} <output id=\"{key}-value\">{shown}</output></label>\n\
         <input type=\"range\" id=\"{key}\" name=\"{key}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{shown}\" \
         oninput=\"document.getElementById('{key}-value').value = this.value\">\n\
         <div class=\"help\">{help}</div>\n\
         </div>\n",
        label = escape(spec.label),
        min = spec.min,
        max = spec.max,
        step = spec.step,
        help = escape(spec.help),
    )
}

fn recommendation(rec: &Recommendation) -> String {
    let mut html = format!(
        "<div class=\"recommend-box\">\n\
         <h2>Recommended Crop: <span class=\"crop\">{}</span></h2>\n\
         <p>Based on your soil and climate parameters, this crop has the optimal growth potential</p>\n\
         </div>\n",
        escape(rec.crop)
    );
    html.push_str("<h3>📊 Input Parameters Summary</h3>\n<table class=\"parameter-box\">\n");
    html.push_str("<thead><tr><th>Parameter</th><th>Value</th></tr></thead>\n<tbody>\n");
    for row in rec.summary.rows() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(row.parameter),
            escape(&row.value)
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn footer() -> String {
    let mut html = String::from("<div class=\"footer\">\n<h3>🌍 Sustainable Agriculture Insights</h3>\n<ul>\n");
    for (nutrient, insight) in INSIGHTS {
        html.push_str(&format!("<li><strong>{nutrient}:</strong> {insight}</li>\n"));
    }
    html.push_str("</ul>\n</div>\n");
    html
}

fn caption(model: &LoadedModel) -> String {
    let metadata = model.metadata();
    let mut text = format!(
        "Model: {} ({} trees) | Trained on comprehensive agricultural dataset",
        escape(&metadata.algorithm),
        metadata.n_trees
    );
    if model.is_best_effort() {
        text.push_str(" | loaded best effort, metadata may be inaccurate");
    }
    format!("<p class=\"caption\">{text}</p>\n")
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
