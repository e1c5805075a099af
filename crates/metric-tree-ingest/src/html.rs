//! Visible text from HTML pages.

use std::sync::OnceLock;

use regex::Regex;

static HIDDEN_BLOCKS: OnceLock<Regex> = OnceLock::new();
static TAGS: OnceLock<Regex> = OnceLock::new();
static NUMERIC_ENTITY: OnceLock<Regex> = OnceLock::new();

fn hidden_blocks() -> &'static Regex {
    HIDDEN_BLOCKS.get_or_init(|| {
        Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>")
            .expect("hidden block regex must compile")
    })
}

fn tags() -> &'static Regex {
    TAGS.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex must compile"))
}

fn numeric_entity() -> &'static Regex {
    NUMERIC_ENTITY.get_or_init(|| {
        Regex::new(r"&#([xX][0-9a-fA-F]{1,6}|[0-9]{1,7});").expect("entity regex must compile")
    })
}

const NAMED_ENTITIES: [(&str, &str); 8] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&mdash;", "—"),
    ("&ndash;", "–"),
    // last so that "&amp;lt;" decodes to "&lt;" and no further
    ("&amp;", "&"),
];

/// Strip markup and return the page text with whitespace collapsed.
///
/// Scripts, styles, and comments are dropped with their content. Every
/// tag becomes a space so adjacent blocks do not run together.
pub fn html_to_text(html: &str) -> String {
    let visible = hidden_blocks().replace_all(html, " ");
    let text = tags().replace_all(&visible, " ");
    let text = decode_entities(&text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    let decoded = numeric_entity().replace_all(text, |caps: &regex::Captures<'_>| {
        let raw = &caps[1];
        let code = match raw.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    NAMED_ENTITIES
        .iter()
        .fold(decoded.into_owned(), |acc, (entity, ch)| acc.replace(entity, ch))
}
