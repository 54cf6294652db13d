//! End-to-end flow: load a corpus from disk, pick a highlight, answer a
//! quiz, persist the ledger, and reload into a fresh session.

use std::collections::HashSet;
use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use cloze_core::persistence;
use cloze_core::StudyEngine;

const CORPUS: &str = "\
The cat chased the red ball.
---
The dog chased the blue ball.
---
The boy kicked the red ball.
";

#[test]
fn full_session_round_trip() {
    let dir = tempdir().unwrap();
    let corpus_path = dir.path().join("highlights.txt");
    let scores_path = dir.path().join("scores.txt");
    fs::write(&corpus_path, CORPUS).unwrap();

    let passages = persistence::load_passages(&corpus_path).unwrap();
    assert_eq!(passages.len(), 3);
    let scores = persistence::load_scores(&scores_path).unwrap();
    assert!(scores.is_empty());

    let mut engine = StudyEngine::build(passages, scores);
    let mut rng = StdRng::seed_from_u64(99);

    // nothing attempted yet, so every highlight is eligible
    let at = engine.pick_highlight(&mut rng).unwrap();
    let picked = engine.highlights()[at].clone();
    assert_eq!(picked.score.count, 0);

    // play through the highlight answering everything correctly
    let mut answered = 0;
    for position in 2..picked.tokens.len() {
        let Some(puzzle) = engine.build_puzzle(at, position, &[], 4, &mut rng) else {
            continue;
        };
        let hits = puzzle.choices.iter().filter(|&&c| c == puzzle.answer).count();
        assert_eq!(hits, 1, "answer must appear exactly once");
        let unique: HashSet<_> = puzzle.choices.iter().collect();
        assert_eq!(unique.len(), puzzle.choices.len(), "choices must be distinct");
        answered += 1;
    }
    assert!(answered > 0, "corpus should produce at least one question");

    engine.record_attempt(at, answered, answered);
    persistence::save_scores(&scores_path, engine.highlights(), engine.unmatched_scores())
        .unwrap();

    // a fresh session sees the recorded score attached to the same passage
    let passages = persistence::load_passages(&corpus_path).unwrap();
    let scores = persistence::load_scores(&scores_path).unwrap();
    assert_eq!(scores.len(), 1);
    let reloaded = StudyEngine::build(passages, scores);
    let again = reloaded
        .highlights()
        .iter()
        .find(|h| h.id == picked.id)
        .unwrap();
    assert_eq!(again.score.count, 1);
    assert!((again.score.sum - 1.0).abs() < 1e-6);

    // attempted passages are no longer eligible while others sit at count 0
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let next = reloaded.pick_highlight(&mut rng).unwrap();
        assert_eq!(reloaded.highlights()[next].score.count, 0);
    }
}

#[test]
fn editing_a_passage_orphans_its_score() {
    let dir = tempdir().unwrap();
    let scores_path = dir.path().join("scores.txt");

    let mut engine = StudyEngine::build(
        vec!["the old wording of this passage".to_string()],
        Default::default(),
    );
    engine.record_attempt(0, 2, 3);
    let old_id = engine.highlights()[0].id.clone();
    persistence::save_scores(&scores_path, engine.highlights(), engine.unmatched_scores())
        .unwrap();

    // the passage was edited before the next session
    let scores = persistence::load_scores(&scores_path).unwrap();
    let edited = StudyEngine::build(vec!["the new wording of this passage".to_string()], scores);
    assert_eq!(edited.highlights()[0].score.count, 0);
    let orphan = edited.unmatched_scores().get(&old_id).unwrap();
    assert_eq!(orphan.count, 1);

    // orphaned history survives the next ledger rewrite
    persistence::save_scores(&scores_path, edited.highlights(), edited.unmatched_scores())
        .unwrap();
    let reloaded = persistence::load_scores(&scores_path).unwrap();
    assert!(reloaded.contains_key(&old_id));
}
