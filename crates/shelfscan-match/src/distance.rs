//! Edit-distance strategies.
//!
//! The matcher takes its distance computation through the [`EditDistance`]
//! seam so an optimized implementation can substitute for the built-in one
//! without changing observable behavior. [`DpDistance`] is always available;
//! [`StrsimDistance`] is enabled by the `strsim` feature and returns the
//! same values.

/// Strategy for computing Levenshtein distance between two strings.
pub trait EditDistance: Send + Sync {
    /// Minimum number of single-character insertions, deletions, or
    /// substitutions to transform `a` into `b`.
    fn distance(&self, a: &str, b: &str) -> usize;
}

/// Classic single-row dynamic-programming Levenshtein distance.
///
/// O(len(a) * len(b)) time, O(min(len(a), len(b))) space. Unicode-aware:
/// operates on chars, not bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DpDistance;

impl EditDistance for DpDistance {
    fn distance(&self, a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        if a.is_empty() {
            return b.len();
        }
        if b.is_empty() {
            return a.len();
        }

        // Shorter string on the column axis keeps the row small.
        let (target, source) = if a.len() < b.len() { (&a, &b) } else { (&b, &a) };

        let mut row: Vec<usize> = (0..=target.len()).collect();

        for (i, &sc) in source.iter().enumerate() {
            let mut prev = row[0];
            row[0] = i + 1;

            for (j, &tc) in target.iter().enumerate() {
                let cost = usize::from(sc != tc);
                let substitution = prev + cost;
                let deletion = row[j + 1] + 1;
                let insertion = row[j] + 1;

                prev = row[j + 1];
                row[j + 1] = substitution.min(deletion).min(insertion);
            }
        }

        row[target.len()]
    }
}

/// Optimized edit distance backed by the `strsim` crate.
#[cfg(feature = "strsim")]
#[cfg_attr(docsrs, doc(cfg(feature = "strsim")))]
#[derive(Debug, Clone, Copy, Default)]
pub struct StrsimDistance;

#[cfg(feature = "strsim")]
impl EditDistance for StrsimDistance {
    fn distance(&self, a: &str, b: &str) -> usize {
        strsim::levenshtein(a, b)
    }
}

/// The best edit-distance implementation available in this build.
///
/// Prefers the optimized `strsim` implementation when the feature is
/// enabled, falling back to the built-in DP implementation otherwise.
/// Absence of the optimized path never changes distance values.
pub fn default_distance() -> Box<dyn EditDistance> {
    #[cfg(feature = "strsim")]
    {
        Box::new(StrsimDistance)
    }
    #[cfg(not(feature = "strsim"))]
    {
        Box::new(DpDistance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_cases() {
        let dp = DpDistance;
        assert_eq!(dp.distance("kitten", "sitting"), 3);
        assert_eq!(dp.distance("flaw", "lawn"), 2);
        assert_eq!(dp.distance("same", "same"), 0);
        assert_eq!(dp.distance("", "abc"), 3);
        assert_eq!(dp.distance("abc", ""), 3);
        assert_eq!(dp.distance("", ""), 0);
    }

    #[test]
    fn symmetric() {
        let dp = DpDistance;
        assert_eq!(dp.distance("ground beef", "gruond bef"), dp.distance("gruond bef", "ground beef"));
    }

    #[test]
    fn counts_chars_not_bytes() {
        let dp = DpDistance;
        assert_eq!(dp.distance("café", "cafe"), 1);
    }

    #[cfg(feature = "strsim")]
    #[test]
    fn optimized_path_matches_dp() {
        let dp = DpDistance;
        let fast = StrsimDistance;
        for (a, b) in [
            ("kitten", "sitting"),
            ("ground beef", "gruond bef"),
            ("", "abc"),
            ("café", "cafe"),
            ("stand mixer", "standmixer"),
        ] {
            assert_eq!(dp.distance(a, b), fast.distance(a, b), "{a:?} vs {b:?}");
        }
    }
}
