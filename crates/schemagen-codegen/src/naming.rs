//! Identifier normalization
//!
//! Backend field names are dotted and sometimes camel-cased
//! (`database.sslMode.user.defined`). Terraform attribute names are
//! snake_case (`database_ssl_mode`) and Go identifiers are PascalCase with
//! well-known acronyms kept upper-case (`DatabaseSSLMode`).

use once_cell::sync::Lazy;
use regex::Regex;

/// Segments rendered fully upper-case in Go identifiers
pub const ACRONYMS: &[&str] = &["ID", "SSH", "SSL", "DB", "URL", "API", "AWS", "ARN"];

static UI_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.user\.(defined|displayed)$").expect("valid suffix pattern"));

/// Normalize a backend field name into a Terraform attribute name
///
/// Applying it to its own output is a no-op.
pub fn attr_name(backend_name: &str) -> String {
    let stripped = UI_SUFFIX.replace(backend_name, "");
    let underscored = stripped.replace(['.', '-'], "_");
    split_camel(&underscored).to_lowercase()
}

/// Insert `_` at camel-case word boundaries.
///
/// An upper-case run followed by a lower-case letter breaks before the
/// run's last letter, so `SSLMode` becomes `SSL_Mode`.
fn split_camel(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.push(c);
    }

    out
}

/// PascalCase a snake_case or kebab-case identifier, keeping [`ACRONYMS`] upper-case
pub fn pascal(s: &str) -> String {
    s.replace('-', "_")
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let upper = segment.to_uppercase();
            if ACRONYMS.contains(&upper.as_str()) {
                upper
            } else {
                title(segment)
            }
        })
        .collect()
}

/// Upper-case the first character and lower-case the rest
pub fn title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
