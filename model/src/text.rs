//! String helpers shared across the workspace.

/// Uppercases every word character that starts a word (ASCII word boundary).
///
/// `"financial account"` → `"Financial Account"`, `"cross-domain"` →
/// `"Cross-Domain"`. Characters that are already uppercase are left alone.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        let is_word = ch.is_ascii_alphanumeric() || ch == '_';
        if is_word && !in_word {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        in_word = is_word;
    }
    out
}

/// Drops the first `:`-separated namespace segment of a reference.
///
/// `"Schema.org:Action"` → `"Action"`, `"FIBO:FBC:Transaction"` →
/// `"FBC:Transaction"`. A reference without a colon is returned unchanged.
#[must_use]
pub fn short_name(reference: &str) -> &str {
    reference.split_once(':').map_or(reference, |(_, rest)| rest)
}

/// Returns the last `:`-separated segment of a domain path, lowercased.
///
/// `"RBCZ:MIB:Investment"` → `"investment"`.
#[must_use]
pub fn domain_segment(domain_path: &str) -> String {
    domain_path
        .rsplit(':')
        .next()
        .unwrap_or(domain_path)
        .to_lowercase()
}

/// Returns the last `/`-separated segment of a URI.
#[must_use]
pub fn last_uri_segment(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Removes every whitespace character.
#[must_use]
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Replaces each run of whitespace with a single underscore.
#[must_use]
pub fn underscore_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Strips a `window.NAME = ...;` script assignment around a JSON payload.
///
/// Domain bundles were historically shipped as script files assigning the
/// payload to a global. Plain JSON passes through unchanged (trimmed).
#[must_use]
pub fn strip_script_assignment(source: &str) -> &str {
    let trimmed = source.trim();
    let Some(rest) = trimmed.strip_prefix("window.") else {
        return trimmed;
    };
    let Some((_, payload)) = rest.split_once('=') else {
        return trimmed;
    };
    payload.trim().trim_end_matches(';').trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_uppercases_word_starts() {
        assert_eq!(title_case("financial account"), "Financial Account");
        assert_eq!(title_case("cross-domain"), "Cross-Domain");
        assert_eq!(title_case("order123"), "Order123");
        assert_eq!(title_case("fINANCIAL aCCOUNT"), "FINANCIAL ACCOUNT");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn short_name_drops_first_namespace_only() {
        assert_eq!(short_name("Schema.org:Action"), "Action");
        assert_eq!(short_name("FIBO:FBC:Transaction"), "FBC:Transaction");
        assert_eq!(short_name("Plain"), "Plain");
    }

    #[test]
    fn domain_segment_is_last_segment_lowercased() {
        assert_eq!(domain_segment("RBCZ:MIB:Investment"), "investment");
        assert_eq!(domain_segment("Payments"), "payments");
    }

    #[test]
    fn whitespace_helpers() {
        assert_eq!(strip_whitespace("DP EDI\tAUM"), "DPEDIAUM");
        assert_eq!(underscore_whitespace("is a  kind"), "is_a_kind");
        assert_eq!(last_uri_segment("https://x.org/a/b/Currency"), "Currency");
    }

    /// Script-wrapped and bare payloads yield the same JSON text.
    #[test]
    fn script_assignment_is_stripped() {
        assert_eq!(
            strip_script_assignment("window.BKB_LOADED = {\"a\": 1};\n"),
            "{\"a\": 1}"
        );
        assert_eq!(strip_script_assignment("  {\"a\": 1} "), "{\"a\": 1}");
    }
}
