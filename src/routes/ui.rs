//! Submission form and confirmation pages, served as inline HTML.

use axum::{response::Html, routing::get, Router};
use uuid::Uuid;

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<String> {
    Html(render_form(None))
}

const PAGE_STYLE: &str = "body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; } \
h1 { margin-bottom: 0.5rem; } \
.card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; } \
label { display: block; margin-top: 0.75rem; font-weight: 600; } \
input { width: 100%; padding: 0.5rem; } \
button { margin-top: 1rem; padding: 0.6rem 1rem; } \
.error { color: #b00020; margin-top: 0.5rem; } \
.ok { color: #1b7f3b; }";

/// The submission form, optionally with a validation message above it.
pub fn render_form(error: Option<&str>) -> String {
    let notice = match error {
        Some(message) => format!("<p class=\"error\">{}</p>", escape(message)),
        None => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>PDF to Drive</title>
  <style>{PAGE_STYLE}</style>
</head>
<body>
  <h1>PDF to Drive</h1>
  <p>Enter a title. A one-page PDF is generated and uploaded to the configured Drive folder.</p>
  {notice}
  <div class="card">
    <form method="post" action="/upload">
      <label for="title">Title</label>
      <input id="title" name="title" placeholder="Invoice 2024-01" />
      <button type="submit">Generate and upload</button>
    </form>
  </div>
</body>
</html>"#
    )
}

/// Confirmation page shown after a submission was accepted.
pub fn render_confirmation(id: Uuid, title: &str) -> String {
    let title = escape(title);
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Upload queued</title>
  <style>{PAGE_STYLE}</style>
</head>
<body>
  <h1>PDF to Drive</h1>
  <div class="card">
    <p class="ok">PDF for &quot;{title}&quot; generated successfully. Upload is in progress.</p>
    <p>Job id: <code>{id}</code></p>
    <p>Poll <a href="/api/jobs/{id}">/api/jobs/{id}</a> for the Drive file id and link.</p>
    <p><a href="/">Submit another title</a></p>
  </div>
</body>
</html>"#
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
