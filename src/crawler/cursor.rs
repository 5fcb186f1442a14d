//! Continuation cursor extraction
//!
//! Reads RFC 5988 style `link` headers such as
//! `<https://host/x?page=2>; rel="next", <https://host/x?page=9>; rel="last"`
//! and returns the target of the `next` relation. Matching is purely
//! syntactic; the URL is not validated here.

/// Returns the URL of the `rel="next"` entry, if any
///
/// # Arguments
///
/// * `link_header` - Raw value of the `link` response header, if present
///
/// # Returns
///
/// * `Some(url)` - An entry whose relation is exactly `next`
/// * `None` - No header, an empty header, or no `next` entry
///
/// # Example
///
/// ```
/// use repo_chronicle::crawler::next_url;
///
/// let header = r#"<https://x/p1>; rel="prev", <https://x/p3>; rel="next""#;
/// assert_eq!(next_url(Some(header)), Some("https://x/p3".to_string()));
/// assert_eq!(next_url(None), None);
/// ```
pub fn next_url(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;

    split_unquoted(header, ',').into_iter().find_map(|entry| {
        let (target, params) = parse_entry(entry)?;
        split_unquoted(params, ';')
            .into_iter()
            .any(is_next_relation)
            .then(|| target.to_string())
    })
}

/// Splits on `separator` where it appears outside `<...>` and outside
/// quoted strings
///
/// A quoted string runs to the next unescaped `"`; inside it `<`, `>` and the
/// separator are plain characters.
fn split_unquoted(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_target = false;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if !in_target => in_quotes = true,
            '<' => in_target = true,
            '>' => in_target = false,
            c if c == separator && !in_target => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);

    parts
}

/// `<target>; params` -> (target, params)
fn parse_entry(entry: &str) -> Option<(&str, &str)> {
    let entry = entry.trim();
    let rest = entry.strip_prefix('<')?;
    let end = rest.find('>')?;
    let target = rest[..end].trim();

    if target.is_empty() {
        return None;
    }

    Some((target, &rest[end + 1..]))
}

fn is_next_relation(param: &str) -> bool {
    let Some((key, value)) = param.split_once('=') else {
        return false;
    };

    key.trim().eq_ignore_ascii_case("rel") && value.trim().trim_matches('"') == "next"
}
