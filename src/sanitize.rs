//! Output filtering for user supplied text.
//!
//! Whitelisted tags survive with only their whitelisted attributes, every
//! other tag is escaped so that it renders as text. Stored values are never
//! rewritten; this runs on the way out.

use regex::Regex;
use std::sync::OnceLock;

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^<>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
    })
}

fn attr_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .unwrap()
    })
}

fn comment_regex() -> &'static Regex {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

fn char_ref_regex() -> &'static Regex {
    static CHAR_REF: OnceLock<Regex> = OnceLock::new();
    CHAR_REF.get_or_init(|| Regex::new(r"&(?:#[xX]([0-9A-Fa-f]+);?|#([0-9]+);?|([A-Za-z]+);)").unwrap())
}

fn allowed_attrs(tag: &str) -> Option<&'static [&'static str]> {
    let attrs: &'static [&'static str] = match tag {
        "a" => &["href", "title", "target"],
        "abbr" => &["title"],
        "blockquote" => &["cite"],
        "img" => &["src", "alt", "title", "width", "height"],
        "b" | "br" | "code" | "del" | "em" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "hr" | "i"
        | "li" | "ol" | "p" | "pre" | "s" | "small" | "span" | "strong" | "sub" | "sup" | "u"
        | "ul" => &[],
        _ => return None,
    };
    Some(attrs)
}

fn escape_text(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr_value(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn decode_named(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "colon" => ':',
        "Tab" => '\t',
        "NewLine" => '\n',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some(c)
}

/// Decodes character references the way a browser does inside an attribute
/// value. Unknown named references are kept verbatim.
fn decode_char_refs(value: &str) -> String {
    char_ref_regex()
        .replace_all(value, |cap: &regex::Captures| {
            let numeric = match (cap.get(1), cap.get(2)) {
                (Some(hex), _) => Some(u32::from_str_radix(hex.as_str(), 16).ok()),
                (None, Some(dec)) => Some(dec.as_str().parse::<u32>().ok()),
                (None, None) => None,
            };
            match numeric {
                Some(code) => code
                    .filter(|c| *c != 0)
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
                    .to_string(),
                None => decode_named(&cap[3])
                    .map(String::from)
                    .unwrap_or_else(|| cap[0].to_string()),
            }
        })
        .into_owned()
}

fn is_unsafe_url(value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    UNSAFE_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme))
}

fn rebuild_tag(closing: bool, name: &str, rest: &str, allowed: &[&str]) -> String {
    if closing {
        return format!("</{}>", name);
    }

    let (attrs, self_closing) = match rest.trim_end().strip_suffix('/') {
        Some(attrs) => (attrs, true),
        None => (rest, false),
    };

    let mut out = format!("<{}", name);
    for cap in attr_regex().captures_iter(attrs) {
        let attr = cap[1].to_ascii_lowercase();
        if !allowed.contains(&attr.as_str()) {
            continue;
        }

        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map(|m| decode_char_refs(m.as_str()));
        match value {
            Some(v) if (attr == "href" || attr == "src") && is_unsafe_url(&v) => continue,
            Some(v) => out.push_str(&format!(" {}=\"{}\"", attr, escape_attr_value(&v))),
            None => out.push_str(&format!(" {}", attr)),
        }
    }
    if self_closing {
        out.push_str(" /");
    }
    out.push('>');
    out
}

/// Neutralises markup in `input` so it can be embedded in an HTML page.
pub fn filter_xss(input: &str) -> String {
    let stripped = comment_regex().replace_all(input, "");
    let input = stripped.as_ref();
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for cap in tag_regex().captures_iter(input) {
        let Some(whole) = cap.get(0) else {
            continue;
        };
        out.push_str(&escape_text(&input[last..whole.start()]));

        let name = &cap[2];
        match allowed_attrs(&name.to_ascii_lowercase()) {
            Some(allowed) => out.push_str(&rebuild_tag(!cap[1].is_empty(), name, &cap[3], allowed)),
            None => out.push_str(&escape_text(whole.as_str())),
        }
        last = whole.end();
    }

    out.push_str(&escape_text(&input[last..]));
    out
}
