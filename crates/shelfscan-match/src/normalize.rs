//! Text canonicalization for comparison.

/// Canonicalizes text for fuzzy comparison.
///
/// Lower-cases, replaces every character outside `[a-z0-9]` with a space,
/// collapses whitespace runs to a single space, and trims. Total and
/// idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_punctuation_insensitive() {
        assert_eq!(normalize("HOME DEPOT!!"), normalize("home depot"));
        assert_eq!(normalize("Kitchen-Aid  Stand\tMixer"), "kitchen aid stand mixer");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(normalize("  a   b  "), "a b");
        assert_eq!(normalize("\n\n"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent() {
        for s in ["HOME DEPOT!!", "  a   b  ", "weird$$chars##", "åäö 12"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }
}
