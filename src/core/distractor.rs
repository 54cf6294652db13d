//! Distractor sampling for cloze blanks.
//!
//! Wrong-answer candidates come from the bigram distribution of the token
//! preceding the blank, so they are words that plausibly continue the
//! passage. Sampling is weighted and without replacement: a uniform draw is
//! binary-searched against the cumulative array, and a visited bitmap over
//! the immutable distribution marks entries already drawn or excluded.

use std::collections::HashSet;

use rand::Rng;

use crate::core::model::CorpusModel;
use crate::core::types::TokenId;

/// Samples up to `count` distinct distractors from `from`'s outgoing
/// distribution. Skip-puzzle tokens and tokens whose content appears in
/// `excluded` are never returned. Returns fewer than `count` entries when the
/// distribution runs out of viable candidates.
pub fn nominate(
    model: &CorpusModel,
    from: TokenId,
    count: usize,
    excluded: &HashSet<String>,
    rng: &mut impl Rng,
) -> Vec<TokenId> {
    let distribution = &model.token(from).next_tokens;
    if distribution.is_empty() {
        return Vec::new();
    }

    let mut visited = vec![false; distribution.len()];
    let mut remaining = 0;
    for (at, next) in distribution.iter().enumerate() {
        let target = model.token(next.id);
        if target.skip_puzzle || excluded.contains(&target.content) {
            visited[at] = true;
        } else {
            remaining += 1;
        }
    }

    let last = distribution[distribution.len() - 1].cumulative;
    let mut result = Vec::new();
    while result.len() < count && remaining > 0 {
        let target = rng.gen::<f64>() * last;
        let mut at = distribution
            .partition_point(|nt| nt.cumulative < target)
            .min(distribution.len() - 1);
        // the drawn bucket may already be taken; skip forward, wrapping once
        while visited[at] {
            at += 1;
            if at == distribution.len() {
                at = 0;
            }
        }
        visited[at] = true;
        remaining -= 1;
        result.push(distribution[at].id);
    }
    result
}

/// Morphological variants of the correct answer, the answer itself included.
/// These are excluded from the distractor pool so no choice is a trivially
/// recognizable inflection of the answer: plural `s`, `ies`/`y`, `er`/`ing`,
/// and `ation`/`ration` alternations.
pub fn morphological_variants(content: &str) -> HashSet<String> {
    let mut variants = HashSet::new();
    variants.insert(content.to_string());

    if let Some(stem) = content.strip_suffix("ies") {
        variants.insert(stem.to_string());
    } else if let Some(stem) = content.strip_suffix('y') {
        variants.insert(format!("{stem}ies"));
    }

    if let Some(stem) = content.strip_suffix("er") {
        variants.insert(format!("{stem}ing"));
    } else if let Some(stem) = content.strip_suffix("ing") {
        variants.insert(format!("{stem}er"));
    }

    if let Some(stem) = content.strip_suffix('s') {
        variants.insert(stem.to_string());
    } else {
        variants.insert(format!("{content}s"));
    }

    if let Some(stem) = content.strip_suffix("ration") {
        variants.insert(stem.to_string());
    } else if let Some(stem) = content.strip_suffix("ation") {
        variants.insert(stem.to_string());
    } else {
        variants.insert(format!("{content}ation"));
        variants.insert(format!("{content}ration"));
    }

    variants
}
