//! Runs automated quiz sessions against the corpus with a randomly guessing
//! player, for watching score and selection drift without a keyboard.
//! Nothing is written back to disk.
//!
//! Usage: quiz_simulator [attempts] [seed]

use std::error::Error;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use cloze_core::config::AppConfig;
use cloze_core::core::engine::Highlight;
use cloze_core::persistence;
use cloze_core::StudyEngine;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let attempts: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    let seed: u64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let config = AppConfig::load_or_default(Path::new("cloze_trainer.json"))?;
    let passages = persistence::load_passages(&config.corpus_path)?;
    let scores = persistence::load_scores(&config.scores_path)?;
    let mut engine = StudyEngine::build(passages, scores);
    let mut rng = StdRng::seed_from_u64(seed);

    for round in 0..attempts {
        let Some(at) = engine.pick_highlight(&mut rng) else {
            println!("corpus is empty");
            return Ok(());
        };
        let highlight = engine.highlights()[at].clone();

        let mut correct = 0usize;
        let mut wrong = 0usize;
        for position in 2..highlight.tokens.len() {
            let Some(puzzle) =
                engine.build_puzzle(at, position, &[], config.choice_count, &mut rng)
            else {
                continue;
            };
            let guess = puzzle.choices[rng.gen_range(0..puzzle.choices.len())];
            if guess == puzzle.answer {
                correct += 1;
            } else {
                wrong += 1;
            }
        }
        engine.record_attempt(at, correct, correct + wrong);
        println!(
            "round {:>3}: {} right, {} wrong  [{}]",
            round + 1,
            correct,
            wrong,
            short_id(&highlight)
        );
    }

    println!();
    println!("{:<10} {:>5} {:>8}", "highlight", "count", "average");
    let mut rows: Vec<&Highlight> = engine.highlights().iter().collect();
    rows.sort_by_key(|h| h.index);
    for h in rows {
        println!(
            "{:<10} {:>5} {:>8.3}",
            short_id(h),
            h.score.count,
            h.score.average()
        );
    }
    Ok(())
}

fn short_id(highlight: &Highlight) -> &str {
    &highlight.id[..8.min(highlight.id.len())]
}
