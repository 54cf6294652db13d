//! The corpus model: token vocabulary, per-token bigram distributions, and
//! the "too common to quiz" classification.
//!
//! Tokens reference their successors by integer id into one vocabulary arena,
//! so the token graph has no ownership cycles. The model is built once per
//! load and never mutated afterwards.

use std::collections::HashMap;

use crate::core::tokenizer::TokenOccurrence;
use crate::core::types::TokenId;

/// Fraction of the vocabulary (by in-degree rank) considered quizzable; the
/// rest are flagged as too highly connected to make good cloze targets.
const COMMON_RANK_FRACTION: f64 = 0.9;

/// One entry of a token's outgoing bigram distribution. Entries are stored
/// with a running cumulative probability so sampling is a single binary
/// search; the last entry's cumulative value is 1.0 within float tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct NextToken {
    pub id: TokenId,
    pub cumulative: f64,
}

/// One vocabulary entry.
#[derive(Debug, Clone)]
pub struct Token {
    pub id: TokenId,
    /// Normalized lowercase content.
    pub content: String,
    /// First-seen original-cased form, used when displaying answer choices.
    pub surface: String,
    /// Outgoing bigram distribution, ascending by cumulative probability.
    /// Empty for tokens never observed before another token.
    pub next_tokens: Vec<NextToken>,
    /// Number of distinct predecessor distributions listing this token.
    pub appear_in_next: usize,
    /// Set for the most connected tokens; they are skipped as quiz targets.
    pub skip_puzzle: bool,
}

/// Immutable-after-build vocabulary plus bigram statistics for one corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusModel {
    tokens: Vec<Token>,
    index: HashMap<String, TokenId>,
}

impl CorpusModel {
    /// Builds the model from every passage's token sequence. Bigram pairs
    /// never cross passage boundaries. An empty corpus yields an empty model.
    pub fn build(passages: &[Vec<TokenOccurrence>]) -> Self {
        let mut tokens: Vec<Token> = Vec::new();
        let mut index: HashMap<String, TokenId> = HashMap::new();

        // vocabulary in first-seen order
        for passage in passages {
            for occ in passage {
                if !index.contains_key(&occ.content) {
                    let id = tokens.len();
                    index.insert(occ.content.clone(), id);
                    tokens.push(Token {
                        id,
                        content: occ.content.clone(),
                        surface: occ.surface.clone(),
                        next_tokens: Vec::new(),
                        appear_in_next: 0,
                        skip_puzzle: false,
                    });
                }
            }
        }

        // successor counts per predecessor
        let mut successors: Vec<HashMap<TokenId, usize>> = vec![HashMap::new(); tokens.len()];
        let mut totals: Vec<usize> = vec![0; tokens.len()];
        for passage in passages {
            for pair in passage.windows(2) {
                let from = index[&pair[0].content];
                let to = index[&pair[1].content];
                *successors[from].entry(to).or_insert(0) += 1;
                totals[from] += 1;
            }
        }

        // cumulative distributions, targets enumerated by ascending id so the
        // built model is deterministic for a given corpus
        for (from, counts) in successors.iter().enumerate() {
            if counts.is_empty() {
                continue;
            }
            let total = totals[from] as f64;
            let mut targets: Vec<(TokenId, usize)> =
                counts.iter().map(|(&to, &n)| (to, n)).collect();
            targets.sort_unstable_by_key(|&(to, _)| to);

            let mut running = 0.0;
            let next_tokens = targets
                .into_iter()
                .map(|(to, n)| {
                    running += n as f64 / total;
                    NextToken {
                        id: to,
                        cumulative: running,
                    }
                })
                .collect();
            tokens[from].next_tokens = next_tokens;
        }

        // in-degree: once per distribution entry, not per raw occurrence
        let mut in_degree = vec![0usize; tokens.len()];
        for token in &tokens {
            for next in &token.next_tokens {
                in_degree[next.id] += 1;
            }
        }
        for (id, degree) in in_degree.into_iter().enumerate() {
            tokens[id].appear_in_next = degree;
        }

        // flag the top 10% most-connected tokens as skip-puzzle
        if !tokens.is_empty() {
            let mut order: Vec<TokenId> = (0..tokens.len()).collect();
            order.sort_unstable_by_key(|&id| (tokens[id].appear_in_next, id));
            let threshold = (tokens.len() as f64 * COMMON_RANK_FRACTION).floor() as usize;
            for &id in &order[threshold..] {
                tokens[id].skip_puzzle = true;
            }
        }

        Self { tokens, index }
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn lookup(&self, content: &str) -> Option<TokenId> {
        self.index.get(content).copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
