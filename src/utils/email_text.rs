//! Email body cleanup applied before word counting and summarization.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Wrap width for HTML rendering; wide enough that html2text never splits a
/// sentence across lines on our behalf.
const HTML_RENDER_WIDTH: usize = 10_000;

// A doctype, a document or line-break tag, or a closing structural tag. Bare
// `<word ...>` in prose is not enough.
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)<!doctype\s+html|<\s*(html|body)(\s[^>]*=[^>]*)?>|<\s*br\s*/?\s*>|</\s*(html|body|div|p|table|tr|td|span|a|b|i|strong|em|font|ul|ol|li)\s*>",
    )
    .expect("static regex compile")
});

static REPEATED_BREAKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\r\n|\n|\r){2,}").expect("static regex compile"));

#[must_use]
pub fn looks_like_html(body: &str) -> bool {
    HTML_TAG_RE.is_match(body)
}

/// Renders HTML bodies to plain text, collapses runs of line breaks into a
/// single `\n` and trims the result.
#[must_use]
pub fn normalize_email_body(body: &str) -> String {
    let text = if looks_like_html(body) {
        html_to_text(body)
    } else {
        body.to_string()
    };

    REPEATED_BREAKS_RE
        .replace_all(&text, "\n")
        .trim()
        .to_string()
}

fn html_to_text(body: &str) -> String {
    match html2text::from_read(body.as_bytes(), HTML_RENDER_WIDTH) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to render HTML email body, using it verbatim: {}", e);
            body.to_string()
        }
    }
}
