//! Candidate scoring and selection against an inventory list.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::distance::{EditDistance, default_distance};
use crate::normalize::normalize;

/// An existing inventory item. Read-only input to the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryProduct {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name used for matching.
    pub name: String,
    /// Brand, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InventoryProduct {
    /// Creates a product with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            brand: None,
            notes: None,
        }
    }
}

/// How a candidate was scored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MatchMethod {
    /// The normalized text contains the normalized product name verbatim.
    Substring,
    /// Best window alignment scored by edit distance.
    LevenshteinWindow,
}

/// A scored candidate. Transient: lives only for one matching call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate<'a> {
    /// The candidate product.
    pub product: &'a InventoryProduct,
    /// Composite score. Nominally in `[0, 1]`; the containment bonus can
    /// push it above 1.
    pub score: f64,
    /// How the score was obtained.
    pub method: MatchMethod,
}

/// Tunable matching policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
pub struct MatchConfig {
    /// Minimum composite score to accept a candidate.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "match-threshold",
            env = "SHELFSCAN_MATCH_THRESHOLD",
            default_value = "0.5"
        )
    )]
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Maximum windowed edit distance before a candidate is discarded.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "match-distance-ceiling",
            env = "SHELFSCAN_MATCH_DISTANCE_CEILING",
            default_value = "6"
        )
    )]
    #[serde(default = "default_distance_ceiling")]
    pub distance_ceiling: usize,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_distance_ceiling() -> usize {
    6
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            distance_ceiling: default_distance_ceiling(),
        }
    }
}

/// Scores inventory products against recognized text.
///
/// Candidates are evaluated sequentially in input order and the first seen
/// wins ties, so results are deterministic for a given product list.
pub struct Matcher {
    distance: Box<dyn EditDistance>,
    config: MatchConfig,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl Matcher {
    /// Creates a matcher with the given policy and the best available
    /// edit-distance implementation.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            distance: default_distance(),
            config,
        }
    }

    /// Substitutes the edit-distance strategy.
    pub fn with_distance(mut self, distance: Box<dyn EditDistance>) -> Self {
        self.distance = distance;
        self
    }

    /// Returns the best-scoring candidate if it clears the acceptance
    /// threshold.
    ///
    /// `None` means "no existing item recognized": empty text, no products,
    /// or nothing similar enough. Never an error.
    pub fn best_match<'a>(
        &self,
        products: &'a [InventoryProduct],
        raw_text: &str,
    ) -> Option<MatchCandidate<'a>> {
        let text = normalize(raw_text);
        if text.is_empty() {
            return None;
        }
        let text_chars: Vec<char> = text.chars().collect();

        let mut best: Option<MatchCandidate<'a>> = None;
        for product in products {
            let Some((score, method)) = self.score_product(&text, &text_chars, &product.name)
            else {
                continue;
            };
            // Strict comparison keeps the first-seen candidate on ties.
            if best.as_ref().is_none_or(|current| score > current.score) {
                best = Some(MatchCandidate {
                    product,
                    score,
                    method,
                });
            }
        }

        let accepted = best.filter(|candidate| candidate.score >= self.config.threshold);
        tracing::debug!(
            target: TRACING_TARGET,
            products = products.len(),
            accepted = accepted.is_some(),
            score = accepted.as_ref().map(|c| c.score),
            "evaluated match candidates"
        );
        accepted
    }

    /// Returns all scoreable candidates, best first.
    ///
    /// No threshold is applied; callers that present alternatives filter as
    /// they see fit. The sort is stable, so equal scores keep input order.
    pub fn rank_candidates<'a>(
        &self,
        products: &'a [InventoryProduct],
        raw_text: &str,
    ) -> Vec<MatchCandidate<'a>> {
        let text = normalize(raw_text);
        if text.is_empty() {
            return Vec::new();
        }
        let text_chars: Vec<char> = text.chars().collect();

        let mut candidates: Vec<MatchCandidate<'a>> = products
            .iter()
            .filter_map(|product| {
                self.score_product(&text, &text_chars, &product.name)
                    .map(|(score, method)| MatchCandidate {
                        product,
                        score,
                        method,
                    })
            })
            .collect();
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates
    }

    fn score_product(
        &self,
        text: &str,
        text_chars: &[char],
        product_name: &str,
    ) -> Option<(f64, MatchMethod)> {
        let name = normalize(product_name);
        if name.is_empty() {
            return None;
        }
        let name_len = name.chars().count();

        // An exact containment is never a worse match than a fuzzy one, so
        // the distance computation is skipped entirely.
        let (similarity, method) = if text.contains(&name) {
            (1.0, MatchMethod::Substring)
        } else {
            let distance = self.windowed_distance(text_chars, &name, name_len)?;
            let denominator = name_len.max(distance).max(1) as f64;
            (
                1.0 - distance as f64 / denominator,
                MatchMethod::LevenshteinWindow,
            )
        };

        // Very short names matched inside long unrelated text get
        // down-weighted; exact containment earns a flat bonus.
        let length_factor = (name_len as f64 / text_chars.len().max(1) as f64).min(1.0);
        let bonus = match method {
            MatchMethod::Substring => 0.4,
            MatchMethod::LevenshteinWindow => 0.0,
        };

        Some((similarity * 0.6 + length_factor * 0.2 + bonus, method))
    }

    /// Minimum edit distance between the name and any name-length window of
    /// the text. Discards candidates above the configured ceiling. When the
    /// text is shorter than the name, the whole text is the only window.
    fn windowed_distance(
        &self,
        text_chars: &[char],
        name: &str,
        name_len: usize,
    ) -> Option<usize> {
        let mut min = usize::MAX;

        if text_chars.len() <= name_len {
            min = self.distance.distance(name, &text_chars.iter().collect::<String>());
        } else {
            for window in text_chars.windows(name_len) {
                let window: String = window.iter().collect();
                min = min.min(self.distance.distance(name, &window));
                if min == 0 {
                    break;
                }
            }
        }

        (min <= self.config.distance_ceiling).then_some(min)
    }
}

/// Finds the best-scoring product for the recognized text using default
/// policy and the best available edit-distance implementation.
pub fn find_best_match<'a>(
    products: &'a [InventoryProduct],
    raw_text: &str,
) -> Option<MatchCandidate<'a>> {
    Matcher::default().best_match(products, raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(names: &[&str]) -> Vec<InventoryProduct> {
        names.iter().map(|n| InventoryProduct::new(*n)).collect()
    }

    #[test]
    fn containment_matches_with_substring_method() {
        let inventory = products(&["Ground Beef"]);
        let candidate =
            find_best_match(&inventory, "...Ground beef purchased today at the market...")
                .expect("should match");
        assert_eq!(candidate.method, MatchMethod::Substring);
        assert!(candidate.score >= 0.5);
        assert_eq!(candidate.product.id, inventory[0].id);
    }

    #[test]
    fn unrelated_text_matches_nothing() {
        let inventory = products(&["Espresso Machine"]);
        assert!(find_best_match(&inventory, "quarterly tax filing deadline notice").is_none());
    }

    #[test]
    fn empty_inputs_match_nothing() {
        let inventory = products(&["Ground Beef"]);
        assert!(find_best_match(&inventory, "").is_none());
        assert!(find_best_match(&inventory, "!!! ??? ---").is_none());
        assert!(find_best_match(&[], "ground beef").is_none());
    }

    #[test]
    fn empty_normalized_names_are_skipped() {
        let inventory = products(&["###", "Ground Beef"]);
        let candidate = find_best_match(&inventory, "ground beef").unwrap();
        assert_eq!(candidate.product.id, inventory[1].id);
    }

    #[test]
    fn score_is_monotone_in_edit_distance() {
        let matcher = Matcher::default();
        let inventory = products(&["samsung tv"]);

        // Same text length throughout, increasing damage to the name.
        let texts = ["samsung tv stand", "samsunk tv stand", "samsonk tb stand"];
        let scores: Vec<f64> = texts
            .iter()
            .map(|t| matcher.rank_candidates(&inventory, t)[0].score)
            .collect();

        assert!(scores[0] > scores[1]);
        assert!(scores[1] > scores[2]);
    }

    #[test]
    fn distance_ceiling_discards_dissimilar_candidates() {
        let matcher = Matcher::default();
        let inventory = products(&["abcdefghijklmnop"]);
        // Every window is more than 6 edits away from the name.
        assert!(matcher.rank_candidates(&inventory, "zzzzzzzzzzzzzzzz").is_empty());
    }

    #[test]
    fn first_seen_wins_ties() {
        let inventory = products(&["Stand Mixer", "Stand Mixer"]);
        let candidate = find_best_match(&inventory, "kitchenaid stand mixer").unwrap();
        assert_eq!(candidate.product.id, inventory[0].id);
    }

    #[test]
    fn threshold_is_tunable() {
        let inventory = products(&["stand mixer"]);
        let text = "stand mixxer"; // close, not identical

        let default_matcher = Matcher::default();
        assert!(default_matcher.best_match(&inventory, text).is_some());

        let strict = Matcher::new(MatchConfig {
            threshold: 0.99,
            ..MatchConfig::default()
        });
        assert!(strict.best_match(&inventory, text).is_none());
    }

    #[test]
    fn short_text_still_matches_longer_name() {
        // Normalized text is shorter than the product name; the whole text
        // is evaluated as the single window.
        let inventory = products(&["kitchenaid mixer"]);
        let candidate = find_best_match(&inventory, "kitchenaid mixr").unwrap();
        assert_eq!(candidate.method, MatchMethod::LevenshteinWindow);
        assert!(candidate.score >= 0.5);
    }

    #[test]
    fn rank_orders_best_first() {
        let matcher = Matcher::default();
        let inventory = products(&["cordless drill", "ground beef", "drill bits"]);
        let ranked = matcher.rank_candidates(&inventory, "cordless drill 18v");
        assert!(!ranked.is_empty());
        assert_eq!(ranked[0].product.name, "cordless drill");
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn method_tags_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_value(MatchMethod::LevenshteinWindow).unwrap(),
            serde_json::json!("levenshtein-window")
        );
        let tag: &'static str = MatchMethod::Substring.into();
        assert_eq!(tag, "substring");
    }
}
