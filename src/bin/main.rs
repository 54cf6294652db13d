use std::error::Error;
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Stylize;
use crossterm::terminal;
use rand::Rng;
use tracing_subscriber::EnvFilter;

use cloze_core::config::AppConfig;
use cloze_core::core::engine::Highlight;
use cloze_core::core::types::TokenId;
use cloze_core::persistence;
use cloze_core::render::{capitalize_first, wrap_text};
use cloze_core::StudyEngine;

const CONFIG_PATH: &str = "cloze_trainer.json";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load_or_default(Path::new(CONFIG_PATH))?;
    let passages = persistence::load_passages(&config.corpus_path)?;
    let scores = persistence::load_scores(&config.scores_path)?;
    let mut engine = StudyEngine::build(passages, scores);

    // canonicalize the corpus file, keeping the previous version around
    persistence::backup_copy(&config.corpus_path);
    persistence::save_passages(&config.corpus_path, engine.highlights())?;

    let mut rng = rand::thread_rng();
    loop {
        println!();
        println!("  1. Print random card");
        println!("  2. Fill card game");
        println!("  Q. Quit");
        println!();

        match read_key()? {
            '1' => print_random_card(&engine, &config, &mut rng),
            '2' => fill_card(&mut engine, &config, &mut rng)?,
            'q' | 'Q' => return Ok(()),
            _ => {}
        }
    }
}

fn print_random_card(engine: &StudyEngine, config: &AppConfig, rng: &mut impl Rng) {
    match engine.pick_highlight(rng) {
        Some(at) => {
            let highlight = &engine.highlights()[at];
            println!("\n{}\n", wrap_text(&highlight.content, config.wrap_width));
        }
        None => println!("no highlights loaded"),
    }
}

/// One full quiz attempt over a picked highlight. Each blank repeats until
/// answered correctly; `q` abandons the attempt without recording it.
fn fill_card(
    engine: &mut StudyEngine,
    config: &AppConfig,
    rng: &mut impl Rng,
) -> Result<(), Box<dyn Error>> {
    let Some(at) = engine.pick_highlight(rng) else {
        println!("no highlights loaded");
        return Ok(());
    };
    let highlight = engine.highlights()[at].clone();

    let mut correct = 0usize;
    let mut wrong = 0usize;
    let mut last_answered: Option<usize> = None;

    let mut position = 2;
    while position < highlight.tokens.len() {
        if engine.model().token(highlight.tokens[position]).skip_puzzle {
            position += 1;
            continue;
        }

        let mut prior_wrong: Vec<TokenId> = Vec::new();
        loop {
            let Some(puzzle) =
                engine.build_puzzle(at, position, &prior_wrong, config.choice_count, rng)
            else {
                // no viable distractors for this blank
                break;
            };

            print_question(&highlight, position, last_answered, config.wrap_width);
            for (i, &choice) in puzzle.choices.iter().enumerate() {
                let label = capitalize_first(&engine.model().token(choice).surface);
                println!("  {}. {}", i + 1, label);
            }
            println!("  Q. Quit");
            println!();

            // same choice set until a valid key arrives
            let picked = loop {
                let key = read_key()?;
                if key == 'q' || key == 'Q' {
                    return Ok(());
                }
                let digit = key.to_digit(10).map(|d| d as usize);
                if let Some(d) = digit.filter(|&d| d >= 1 && d <= puzzle.choices.len()) {
                    break d;
                }
            };
            let chosen = puzzle.choices[picked - 1];

            if chosen == puzzle.answer {
                println!("{}", "CORRECT!".green());
                correct += 1;
                last_answered = Some(position);
                break;
            }
            let label = capitalize_first(&engine.model().token(chosen).surface);
            println!("{}", format!("WRONG: {label}").red());
            wrong += 1;
            prior_wrong.push(chosen);
        }
        position += 1;
    }

    engine.record_attempt(at, correct, correct + wrong);
    persistence::backup_copy(&config.scores_path);
    persistence::save_scores(
        &config.scores_path,
        engine.highlights(),
        engine.unmatched_scores(),
    )?;

    print_reveal(&highlight, last_answered, config.wrap_width);
    println!("{correct} correct, {wrong} wrong");
    Ok(())
}

/// Shows the passage up to the current blank, the previously answered token
/// in green, and the blank itself as a yellow placeholder.
fn print_question(
    highlight: &Highlight,
    position: usize,
    last_answered: Option<usize>,
    width: usize,
) {
    let content = &highlight.content;
    let (blank_start, _) = highlight.spans[position];

    let mut line = String::from("> ");
    match last_answered {
        Some(last) => {
            let (start, end) = highlight.spans[last];
            line.push_str(&content[..start]);
            line.push_str(&format!("{}", content[start..end].green()));
            line.push_str(&content[end..blank_start]);
        }
        None => line.push_str(&content[..blank_start]),
    }
    line.push_str(&format!("{}", "____?".yellow()));

    println!("\n{}\n", wrap_text(&line, width));
}

fn print_reveal(highlight: &Highlight, last_answered: Option<usize>, width: usize) {
    let content = &highlight.content;
    let text = match last_answered {
        Some(last) => {
            let (start, end) = highlight.spans[last];
            format!(
                "{}{}{}",
                &content[..start],
                content[start..end].green(),
                &content[end..]
            )
        }
        None => content.clone(),
    };
    println!("\n{}\n", wrap_text(&text, width));
}

/// Blocks for one printable keystroke, raw mode on for the duration.
fn read_key() -> std::io::Result<char> {
    terminal::enable_raw_mode()?;
    let key = wait_for_char();
    terminal::disable_raw_mode()?;
    key
}

fn wait_for_char() -> std::io::Result<char> {
    loop {
        if let Event::Key(event) = event::read()? {
            if event.kind == KeyEventKind::Press {
                if let KeyCode::Char(c) = event.code {
                    return Ok(c);
                }
            }
        }
    }
}
