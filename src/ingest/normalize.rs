// src/ingest/normalize.rs
use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static SNIPPET: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.snippet.summary").expect("snippet selector"));

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").unwrap());
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a feed summary fragment.
///
/// If the fragment carries a `<div class="snippet summary">` block, only that
/// block's text is kept, with markup stripped and whitespace runs collapsed
/// to one space. Anything else passes through as plain text. Newlines are
/// always removed (not replaced by spaces) and the result is trimmed.
pub fn normalize(html_fragment: &str) -> String {
    let text = snippet_text(html_fragment).unwrap_or_else(|| html_fragment.to_string());
    strip_newlines(&text).trim().to_string()
}

fn snippet_text(html_fragment: &str) -> Option<String> {
    // Cheap pre-check; parsing every plain-text summary is wasteful.
    if !html_fragment.contains("snippet") {
        return None;
    }
    let doc = Html::parse_fragment(html_fragment);
    let div = doc.select(&SNIPPET).next()?;

    let text: String = div.text().collect();

    // Entity-escaped markup inside the snippet survives the first parse.
    let decoded = html_escape::decode_html_entities(&text);
    let stripped = strip_tags(&decoded);
    Some(RE_WS.replace_all(&stripped, " ").trim().to_string())
}

/// Remove anything that looks like a tag from already-extracted text.
pub(crate) fn strip_tags(s: &str) -> Cow<'_, str> {
    RE_TAGS.replace_all(s, "")
}

fn strip_newlines(s: &str) -> String {
    s.replace(['\r', '\n'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_block_is_extracted() {
        let html = r#"<p>lead</p><div class="snippet summary">  Save big  </div><p>tail</p>"#;
        assert_eq!(normalize(html), "Save big");
    }

    #[test]
    fn escaped_markup_inside_snippet_is_stripped() {
        let html = r#"<div class="snippet summary">Now &lt;b&gt;$19&lt;/b&gt; at Amazon</div>"#;
        assert_eq!(normalize(html), "Now $19 at Amazon");
    }

    #[test]
    fn snippet_word_without_block_passes_through() {
        let s = "a snippet of text\nwith a break";
        assert_eq!(normalize(s), "a snippet of textwith a break");
    }
}
