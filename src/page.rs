use crate::models::GridImage;
use crate::pipeline::GRID_COLUMNS;

// ── Static page chrome ───────────────────────────────────────────────────────

const FONT_LINKS: &str = r#"<link rel="preconnect" href="https://fonts.googleapis.com"><link rel="preconnect" href="https://fonts.gstatic.com" crossorigin><link href="https://fonts.googleapis.com/css2?family=Poppins:wght@400;600&display=swap" rel="stylesheet">"#;

const PAGE_STYLE: &str = r#"
body { font-family: 'Poppins', sans-serif; margin: 2rem; }
form { margin-bottom: 2rem; }
input[type=text] { padding: 0.4rem 0.6rem; width: 20rem; }
.grid { display: flex; gap: 1rem; }
.column { flex: 1; min-width: 0; }
.card { margin: 0 0 1rem 0; }
.card img { width: 100%; display: block; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); border-radius: 8px; margin-bottom: 0.25rem; }
.download { font-size: 0.8rem; color: #666; text-decoration: none; }
.download:hover { color: #333; }
"#;

// ── Pages ────────────────────────────────────────────────────────────────────

/// The search page. `term` pre-populates the input on redisplay.
pub fn index_page(term: &str) -> String {
    page(term, None)
}

/// The results page: the same form plus the three-column grid.
pub fn results_page(term: &str, images: &[GridImage]) -> String {
    page(term, Some(images))
}

fn page(term: &str, results: Option<&[GridImage]>) -> String {
    let term = escape_html(term);
    let mut body = String::from("<h1>Image Viewer</h1>");
    body.push_str(&format!(
        r#"<form action="/search" method="get"><label for="term">What photos do you want?</label> <input type="text" id="term" name="term" value="{term}"> <button type="submit">Search</button></form>"#
    ));

    if let Some(images) = results {
        body.push_str(&format!("<h2>Images for '{term}'</h2>"));
        body.push_str(&grid(images));
    }

    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>Image Viewer</title>{FONT_LINKS}<style>{PAGE_STYLE}</style></head><body>{body}</body></html>"#
    )
}

/// The download anchor points at the original remote URL; the bytes are
/// never proxied or re-hosted.
fn grid(images: &[GridImage]) -> String {
    let mut columns: Vec<String> = vec![String::new(); GRID_COLUMNS];
    for image in images {
        let url = escape_html(&image.url);
        columns[image.column].push_str(&format!(
            r#"<figure class="card"><img src="{url}" loading="lazy"><a class="download" href="{url}" download>Download</a></figure>"#
        ));
    }

    let cells: String = columns
        .iter()
        .map(|c| format!(r#"<div class="column">{c}</div>"#))
        .collect();
    format!(r#"<div class="grid">{cells}</div>"#)
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

// ── Tests ────────────────────────────────────────────────────────────────────
