//! The study session engine: the built corpus model, the highlight list, and
//! the score ledger state, owned as one value and passed by reference to the
//! CLI. Everything is rebuilt from scratch on load; after the build only
//! scores and selection weights change.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::seq::SliceRandom;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::core::distractor::{morphological_variants, nominate};
use crate::core::model::CorpusModel;
use crate::core::select;
use crate::core::tokenizer::{tokenize, TokenOccurrence};
use crate::core::types::{Score, TokenId};

/// One quiz item built from a corpus passage.
#[derive(Debug, Clone)]
pub struct Highlight {
    /// Content-derived identity: digest of the normalized token sequence.
    /// Editing any token makes this a new item; its old score survives as an
    /// unmatched ledger entry.
    pub id: String,
    /// Trimmed passage text as read from the corpus file.
    pub content: String,
    pub tokens: Vec<TokenId>,
    /// Byte span of each token within `content`.
    pub spans: Vec<(usize, usize)>,
    pub score: Score,
    /// Cumulative selection weight, maintained by `select::assign_weights`.
    pub cumulative: f64,
    /// Position in the corpus file, kept through weight re-sorting.
    pub index: usize,
}

/// One cloze question: the shuffled choice list holds the correct answer
/// exactly once among the sampled distractors.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub choices: Vec<TokenId>,
    pub answer: TokenId,
}

pub struct StudyEngine {
    model: CorpusModel,
    highlights: Vec<Highlight>,
    unmatched: HashMap<String, Score>,
}

impl StudyEngine {
    /// Builds the session state from raw passages and previously persisted
    /// scores. Scores whose id matches no current passage are retained as
    /// unmatched so history survives passage edits.
    pub fn build(passages: Vec<String>, scores: HashMap<String, Score>) -> Self {
        let tokenized: Vec<Vec<TokenOccurrence>> =
            passages.iter().map(|p| tokenize(p)).collect();
        let model = CorpusModel::build(&tokenized);

        let mut highlights: Vec<Highlight> = Vec::with_capacity(passages.len());
        for (index, (content, occurrences)) in
            passages.into_iter().zip(tokenized.iter()).enumerate()
        {
            highlights.push(Highlight {
                id: passage_id(occurrences),
                tokens: occurrences
                    .iter()
                    .map(|occ| model.lookup(&occ.content).unwrap_or_default())
                    .collect(),
                spans: occurrences.iter().map(|occ| (occ.start, occ.end)).collect(),
                content,
                score: Score::default(),
                cumulative: 0.0,
                index,
            });
        }

        // two passages that tokenize identically share an id; the last one
        // claims the score during the merge below
        let mut id_to_index: HashMap<&str, usize> = HashMap::new();
        for (at, h) in highlights.iter().enumerate() {
            if id_to_index.insert(h.id.as_str(), at).is_some() {
                warn!(index = h.index, "duplicate highlight id: {}", h.id);
            }
        }

        let mut unmatched = HashMap::new();
        let mut matched: Vec<(usize, Score)> = Vec::new();
        for (id, score) in scores {
            match id_to_index.get(id.as_str()) {
                Some(&at) => matched.push((at, score)),
                None => {
                    unmatched.insert(id, score);
                }
            }
        }
        for (at, score) in matched {
            highlights[at].score = score;
        }

        select::assign_weights(&mut highlights);

        Self {
            model,
            highlights,
            unmatched,
        }
    }

    pub fn model(&self) -> &CorpusModel {
        &self.model
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn unmatched_scores(&self) -> &HashMap<String, Score> {
        &self.unmatched
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    /// Picks the next highlight to quiz; `None` for an empty corpus. The
    /// returned index stays valid until the next `record_attempt`.
    pub fn pick_highlight(&self, rng: &mut impl Rng) -> Option<usize> {
        select::pick(&self.highlights, rng)
    }

    /// Builds the cloze question for one token position, or `None` when the
    /// position has no viable question (common token, no predecessor, or an
    /// empty distractor pool).
    ///
    /// `prior_wrong` holds the wrong answers already given for this blank in
    /// the current attempt: they are excluded from fresh sampling and reused
    /// as distractors when the pool runs dry.
    pub fn build_puzzle(
        &self,
        highlight: usize,
        position: usize,
        prior_wrong: &[TokenId],
        choice_count: usize,
        rng: &mut impl Rng,
    ) -> Option<Puzzle> {
        let h = &self.highlights[highlight];
        if position == 0 || position >= h.tokens.len() {
            return None;
        }
        let answer = h.tokens[position];
        let token = self.model.token(answer);
        if token.skip_puzzle {
            return None;
        }

        let mut excluded = morphological_variants(&token.content);
        for &id in prior_wrong {
            excluded.insert(self.model.token(id).content.clone());
        }

        let previous = h.tokens[position - 1];
        let wanted = choice_count.saturating_sub(1);
        let mut distractors = nominate(&self.model, previous, wanted, &excluded, rng);

        if distractors.is_empty() {
            // degenerate pool: reuse this blank's earlier wrong answers
            for &id in prior_wrong {
                if id != answer && !distractors.contains(&id) {
                    distractors.push(id);
                    if distractors.len() == wanted {
                        break;
                    }
                }
            }
        }
        if distractors.is_empty() {
            return None;
        }

        let mut choices = distractors;
        choices.push(answer);
        choices.shuffle(rng);
        Some(Puzzle { choices, answer })
    }

    /// Records a finished attempt and refreshes the selection weights. The
    /// weight refresh re-sorts the highlight list, so indices handed out
    /// before this call must be discarded.
    pub fn record_attempt(&mut self, highlight: usize, correct: usize, total: usize) {
        self.highlights[highlight].score.record(correct, total);
        select::assign_weights(&mut self.highlights);
    }
}

/// Digest of the space-joined normalized token sequence, base64-encoded.
fn passage_id(occurrences: &[TokenOccurrence]) -> String {
    let mut hasher = Sha256::new();
    for occ in occurrences {
        hasher.update(occ.content.as_bytes());
        hasher.update(b" ");
    }
    STANDARD.encode(hasher.finalize())
}
