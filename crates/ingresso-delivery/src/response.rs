use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Keys a checkout link may appear under, in lookup order.
const LINK_KEYS: [&str; 4] = ["link", "init_point", "sandbox_init_point", "initPoint"];

// Some automation services wrap the checkout object inside a larger text
// field, so the raw body is scanned when the top-level lookup misses.
static EMBEDDED_LINK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?i)"init_point"\s*:\s*"([^"]+)""#,
        r#"(?i)"sandbox_init_point"\s*:\s*"([^"]+)""#,
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

pub fn extract_payment_link(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        let found = LINK_KEYS.iter().find_map(|key| match map.get(*key) {
            Some(Value::String(link)) if !link.trim().is_empty() => Some(link.trim().to_string()),
            _ => None,
        });
        if found.is_some() {
            return found;
        }
    }

    EMBEDDED_LINK_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(trimmed)
            .and_then(|captures| captures.get(1))
            .map(|found| found.as_str().to_string())
    })
}
