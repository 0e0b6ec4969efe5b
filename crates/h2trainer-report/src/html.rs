//! HTML review page for a finished session.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use h2trainer_core::session::SessionResult;

use crate::{ensure_parent, html_escape};

/// Generate the review page for a session result.
pub fn generate_html(result: &SessionResult) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>h2trainer results: {}</title>\n",
        html_escape(&result.user_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Hydrogen safety quiz results</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Trainee: <strong>{}</strong> | Category: {} | Shuffled: {} | {}</p>\n",
        html_escape(&result.user_name),
        html_escape(result.category_filter.as_deref().unwrap_or("All")),
        if result.shuffled { "yes" } else { "no" },
        result.completed_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str("</header>\n");

    // Score dashboard
    let verdict_class = if result.passed { "pass" } else { "fail" };
    let verdict = if result.passed { "PASSED" } else { "NOT PASSED" };
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Percent</th><th>Required</th><th>Result</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}/{}</td><td>{}%</td><td>{}%</td><td class=\"{}\">{}</td></tr></tbody>\n",
        result.score, result.total, result.percent, result.threshold_percent, verdict_class, verdict
    ));
    html.push_str("</table>\n");

    // Per-category table
    let breakdown = result.category_breakdown();
    if !breakdown.is_empty() {
        html.push_str("<table class=\"categories\">\n");
        html.push_str("<thead><tr><th>Category</th><th>Correct</th><th>Answered</th></tr></thead>\n<tbody>\n");
        for c in &breakdown {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                html_escape(&c.category),
                c.correct,
                c.answered
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Recommendations
    html.push_str("<section class=\"recommendations\">\n");
    html.push_str("<h2>Recommendations</h2>\n");
    if result.recommendations.is_perfect() {
        html.push_str("<p>Great job, no missed questions. Review the safety tips for reinforcement.</p>\n");
    } else if !result.recommendations.focus.is_empty() {
        html.push_str("<ul>\n");
        for topic in &result.recommendations.focus {
            html.push_str(&format!(
                "<li><strong>{}</strong> ({} missed): revise fundamentals and procedures.",
                html_escape(&topic.category),
                topic.missed
            ));
            if !topic.notes.is_empty() {
                html.push_str("<ul>");
                for note in &topic.notes {
                    html.push_str(&format!("<li>{}</li>", html_escape(note)));
                }
                html.push_str("</ul>");
            }
            html.push_str("</li>\n");
        }
        if let Some(level) = &result.recommendations.toughest_difficulty {
            html.push_str(&format!(
                "<li>Your toughest level: <strong>{}</strong>. Try more practice questions in this difficulty.</li>\n",
                html_escape(level)
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    // Answers
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Answers</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Category</th><th onclick=\"sortTable(2)\">Question</th><th onclick=\"sortTable(3)\">Your answer</th><th onclick=\"sortTable(4)\">Correct answer</th><th>Why</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for (i, a) in result.answers.iter().enumerate() {
        let class = if a.is_correct { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            i + 1,
            html_escape(&a.category),
            html_escape(&a.question),
            html_escape(&a.chosen),
            html_escape(&a.correct_text),
            html_escape(&a.rationale)
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(result).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the review page to a file.
pub fn write_html_report(result: &SessionResult, path: &Path) -> Result<()> {
    let html = generate_html(result);
    ensure_parent(path)?;
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    tracing::info!("HTML report written to {}", path.display());
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
li { margin: 0.25rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = Number(va), nb = Number(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
