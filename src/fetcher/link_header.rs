//! `Link` header parsing for cursor pagination
//!
//! The list endpoints advertise further pages with an RFC 8288 style header:
//!
//! ```text
//! Link: <https://shop/admin/api/2024-01/orders.json?limit=250&page_info=abc>; rel="previous",
//!       <https://shop/admin/api/2024-01/orders.json?limit=250&page_info=def>; rel="next"
//! ```

/// Extract the URL tagged with the given relation
///
/// Targets are read up to their closing `>`, so commas and semicolons inside
/// a URL do not split the entry.
pub fn find_relation(header: &str, relation: &str) -> Option<String> {
    let mut rest = header;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            return None;
        }

        let Some(after_open) = rest.strip_prefix('<') else {
            // Malformed entry: skip its parameters
            rest = &rest[params_end(rest)..];
            continue;
        };
        let close = after_open.find('>')?;
        let url = after_open[..close].trim();

        let tail = &after_open[close + 1..];
        let end = params_end(tail);
        let params = &tail[..end];
        rest = &tail[end..];

        if !url.is_empty() && has_relation(params, relation) {
            return Some(url.to_string());
        }
    }
}

/// Byte offset of the first `,` outside a quoted parameter value
fn params_end(input: &str) -> usize {
    let mut in_quotes = false;
    for (idx, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return idx,
            _ => {}
        }
    }
    input.len()
}

fn has_relation(params: &str, relation: &str) -> bool {
    params.split(';').any(|param| {
        let Some((key, value)) = param.split_once('=') else {
            return false;
        };
        key.trim().eq_ignore_ascii_case("rel")
            && value
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .any(|rel| rel.eq_ignore_ascii_case(relation))
    })
}

/// Extract the `rel="next"` URL
pub fn next_link(header: &str) -> Option<String> {
    find_relation(header, "next")
}
