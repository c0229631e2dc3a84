//! Path templating and URL joining.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([^/:]+)(?:/|$)").expect("placeholder pattern"));

/// Substitute `:name` placeholders in `path` with values from `params`.
///
/// For each parameter, in map order, the first `:key` token followed by `/`
/// or the end of the path is replaced. `:a` never matches inside `:abc`.
/// Parameters missing from the template are ignored and placeholders
/// missing from `params` are left as they are.
///
/// ```
/// use serde_json::json;
/// use typed_route_core::replace_url_params;
///
/// let params = json!({"a": 1, "b": 2});
/// let path = replace_url_params("/something/:a/:b", params.as_object().unwrap());
/// assert_eq!(path, "/something/1/2");
/// ```
pub fn replace_url_params(path: &str, params: &Map<String, Value>) -> String {
    let mut path = path.to_string();
    for (key, value) in params {
        if let Some(range) = find_placeholder(&path, key) {
            path.replace_range(range, &param_to_string(value));
        }
    }
    path
}

/// Byte range of the first `:key` token that ends at `/` or end of path.
fn find_placeholder(path: &str, key: &str) -> Option<Range<usize>> {
    let token = format!(":{key}");
    let mut from = 0;
    while let Some(offset) = path[from..].find(&token) {
        let start = from + offset;
        let end = start + token.len();
        if end == path.len() || path[end..].starts_with('/') {
            return Some(start..end);
        }
        // `:` is one byte, so this stays on a char boundary.
        from = start + 1;
    }
    None
}

/// Placeholders still present in a (possibly partially templated) path.
pub fn unresolved_placeholders(path: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(path)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Join a base URL and a path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}

/// String form of a parameter, header or query value.
pub(crate) fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
