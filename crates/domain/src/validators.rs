/// Normalize a raw domain name for trie and cache-key use.
///
/// Lowercases, trims surrounding whitespace and a single trailing dot.
/// Returns `None` when the result is not a plausible DNS name: empty, longer
/// than 253 octets, an empty or oversized label, or a label containing
/// characters outside `[a-z0-9_-]`.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() || trimmed.len() > 253 {
        return None;
    }

    let normalized = trimmed.to_ascii_lowercase();
    for label in normalized.split('.') {
        if label.is_empty() || label.len() > 63 {
            return None;
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
        {
            return None;
        }
    }

    Some(normalized)
}
