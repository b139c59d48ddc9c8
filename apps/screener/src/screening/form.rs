//! HTML pages for the browser flow: the upload form and the results table.

use std::fmt::Write;

use crate::screening::report::RankingReport;

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Resume Screener</title>
<style>
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }
textarea { width: 100%; min-height: 12rem; }
button { margin-top: 1rem; margin-right: 0.5rem; }
</style>
</head>
<body>
<h1>Resume Screener</h1>
<form method="post" action="/rankings" enctype="multipart/form-data">
<label for="job_description">Job description</label>
<textarea id="job_description" name="job_description" required></textarea>
<label for="resumes">Resumes (PDF, DOCX, TXT)</label>
<input id="resumes" type="file" name="resumes" accept=".pdf,.docx,.doc,.txt" multiple required>
<div>
<button type="submit">Rank candidates</button>
<button type="submit" formaction="/api/v1/rankings/csv">Download CSV</button>
</div>
</form>
</body>
</html>
"#;

/// Results page: top candidate, the ranked table, then any files that were skipped.
pub fn render_results(report: &RankingReport) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Ranked Candidates</title>\n</head>\n<body>\n<h1>Ranked Candidates</h1>\n",
    );

    match &report.top_candidate {
        Some(top) => {
            let _ = writeln!(html, "<p>Top candidate: <strong>{}</strong></p>", html_escape(top));
        }
        None => html.push_str("<p>No resumes could be ranked.</p>\n"),
    }

    html.push_str("<table>\n<thead><tr><th>File</th><th>Name</th><th>Skills</th><th>Score</th></tr></thead>\n<tbody>\n");
    for row in &report.rows {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.3}</td></tr>",
            html_escape(&row.file),
            html_escape(row.name.as_deref().unwrap_or("")),
            html_escape(&row.skills),
            row.score
        );
    }
    html.push_str("</tbody>\n</table>\n");

    if !report.failures.is_empty() {
        html.push_str("<h2>Skipped files</h2>\n<ul>\n");
        for failure in &report.failures {
            let _ = writeln!(
                html,
                "<li>{} ({}): {}</li>",
                html_escape(&failure.file),
                failure.kind,
                html_escape(&failure.message)
            );
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<p><a href=\"/\">Screen another batch</a></p>\n</body>\n</html>\n");
    html
}

fn html_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
