//! Flat-file persistence for the passage corpus and the score ledger.
//!
//! Both files are read fully and rewritten fully; the only transaction is a
//! whole-file replace, done atomically through a temp file in the target
//! directory. The ledger format is one record per line,
//! `<id> <sum> <count>`, sorted lexicographically for determinism.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::engine::Highlight;
use crate::core::types::Score;
use crate::error::{Result, StudyError};

/// Loads the corpus: passages separated by `---` lines, each trimmed, blanks
/// dropped. A missing or unreadable file is fatal.
pub fn load_passages(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| StudyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text
        .split("---")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect())
}

/// Rewrites the corpus in canonical form, passages in original file order.
pub fn save_passages(path: &Path, highlights: &[Highlight]) -> Result<()> {
    let mut order: Vec<&Highlight> = highlights.iter().collect();
    order.sort_by_key(|h| h.index);
    let joined = order
        .iter()
        .map(|h| h.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");
    write_atomic(path, joined.as_bytes())
}

/// Loads the score ledger. A missing file is an empty ledger; malformed
/// lines are skipped rather than failing the load.
pub fn load_scores(path: &Path) -> Result<HashMap<String, Score>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let text = fs::read_to_string(path).map_err(|source| StudyError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut scores = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            debug!("skipping malformed score line: {line}");
            continue;
        }
        let (Ok(sum), Ok(count)) = (fields[1].parse::<f64>(), fields[2].parse::<u32>()) else {
            debug!("skipping unparsable score line: {line}");
            continue;
        };
        scores.insert(fields[0].to_string(), Score::new(sum, count));
    }
    Ok(scores)
}

/// Rewrites the full ledger: one line per attempted highlight plus one line
/// per unmatched (orphaned) score, sorted.
pub fn save_scores(
    path: &Path,
    highlights: &[Highlight],
    unmatched: &HashMap<String, Score>,
) -> Result<()> {
    let mut lines: Vec<String> = highlights
        .iter()
        .filter(|h| h.score.count > 0)
        .map(|h| format!("{} {:.6} {}", h.id, h.score.sum, h.score.count))
        .collect();
    lines.extend(
        unmatched
            .iter()
            .map(|(id, score)| format!("{} {:.6} {}", id, score.sum, score.count)),
    );
    lines.sort();

    let mut joined = lines.join("\n");
    if !joined.is_empty() {
        joined.push('\n');
    }
    write_atomic(path, joined.as_bytes())
}

/// Best-effort copy of the current file to `<name>.bak` before a rewrite.
pub fn backup_copy(path: &Path) {
    if !path.is_file() {
        return;
    }
    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    if let Err(e) = fs::copy(path, Path::new(&backup)) {
        debug!("backup of {} failed: {e}", path.display());
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| StudyError::Write {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_err)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
    temp.write_all(bytes).map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn highlight(id: &str, content: &str, index: usize, score: Score) -> Highlight {
        Highlight {
            id: id.to_string(),
            content: content.to_string(),
            tokens: Vec::new(),
            spans: Vec::new(),
            score,
            cumulative: 0.0,
            index,
        }
    }

    #[test]
    fn passages_split_on_separator_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highlights.txt");
        fs::write(&path, "the cat sat.\n---\nthe cat ran.\n---\n\n").unwrap();
        let passages = load_passages(&path).unwrap();
        assert_eq!(passages, vec!["the cat sat.", "the cat ran."]);
    }

    #[test]
    fn missing_ledger_is_an_empty_ledger() {
        let dir = tempdir().unwrap();
        let scores = load_scores(&dir.path().join("scores.txt")).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn malformed_ledger_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(
            &path,
            "good 1.500000 2\nshort 1\nbad notafloat 3\nworse 1.0 notanint\n",
        )
        .unwrap();
        let scores = load_scores(&path).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("good"), Some(&Score::new(1.5, 2)));
    }

    #[test]
    fn ledger_round_trips_scores_and_unmatched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let highlights = vec![
            highlight("bbb", "two", 1, Score::new(2.5, 2)),
            highlight("aaa", "one", 0, Score::new(0.75, 1)),
            highlight("ccc", "three", 2, Score::default()),
        ];
        let mut unmatched = HashMap::new();
        unmatched.insert("zzz".to_string(), Score::new(4.0, 3));

        save_scores(&path, &highlights, &unmatched).unwrap();
        let reloaded = load_scores(&path).unwrap();

        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.get("aaa"), Some(&Score::new(0.75, 1)));
        assert_eq!(reloaded.get("bbb"), Some(&Score::new(2.5, 2)));
        assert_eq!(reloaded.get("zzz"), Some(&Score::new(4.0, 3)));
        // count 0 is never written
        assert!(!reloaded.contains_key("ccc"));
    }

    #[test]
    fn ledger_lines_are_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let highlights = vec![
            highlight("bbb", "two", 1, Score::new(1.0, 1)),
            highlight("aaa", "one", 0, Score::new(1.0, 1)),
        ];
        save_scores(&path, &highlights, &HashMap::new()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "aaa 1.000000 1\nbbb 1.000000 1\n");
    }

    #[test]
    fn corpus_rewrite_uses_original_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highlights.txt");
        let highlights = vec![
            highlight("b", "second passage", 1, Score::default()),
            highlight("a", "first passage", 0, Score::default()),
        ];
        save_passages(&path, &highlights).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "first passage\n\n---\n\nsecond passage");
    }

    #[test]
    fn backup_copies_the_previous_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(&path, "old contents\n").unwrap();
        backup_copy(&path);
        let backup = fs::read_to_string(dir.path().join("scores.txt.bak")).unwrap();
        assert_eq!(backup, "old contents\n");
    }
}
