//! HTML pages for the viewer.

use chrono::{DateTime, Utc};

use crate::store::ImageRecord;

const VIEW_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ORIGINAL_NAME}}</title>
<style>
body { margin: 0; font-family: system-ui, sans-serif; background: #111; color: #eee; text-align: center; }
main { padding: 1.5rem; }
img { max-width: 100%; max-height: 80vh; border-radius: 8px; }
p { color: #aaa; }
a { color: #8cf; }
</style>
</head>
<body>
<main>
<img src="{{IMAGE_URL}}" alt="{{ORIGINAL_NAME}}">
<p>This image is deleted in about {{REMAINING_MINUTES}} minute(s), at <time datetime="{{EXPIRES_AT}}">{{EXPIRES_AT}}</time>.</p>
<p><a href="{{IMAGE_URL}}" download="{{ORIGINAL_NAME}}">Download</a></p>
</main>
</body>
</html>
"#;

/// Page served for unknown and expired ids alike.
pub(crate) const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Image not found</title>
</head>
<body style="font-family: system-ui, sans-serif; text-align: center; padding: 3rem;">
<h1>Image not found</h1>
<p>The link is invalid or the image has expired.</p>
</body>
</html>
"#;

/// Renders the viewer page for `record`, served from `image_url`.
pub(crate) fn render_view(record: &ImageRecord, image_url: &str, now: DateTime<Utc>) -> String {
    let remaining_minutes = record.remaining(now).as_secs() / 60;
    let expires_at = record.expires_at.to_rfc3339();

    VIEW_TEMPLATE
        .replace("{{IMAGE_URL}}", &escape_html(image_url))
        .replace("{{ORIGINAL_NAME}}", &escape_html(&record.original_name))
        .replace("{{REMAINING_MINUTES}}", &remaining_minutes.to_string())
        .replace("{{EXPIRES_AT}}", &expires_at)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
