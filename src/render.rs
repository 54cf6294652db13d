//! Text helpers shared by the CLI binaries: whitespace flattening, greedy
//! line wrapping, and choice-label capitalization. None of this touches the
//! byte spans tokens index into — flattening maps each of `\n`, `\r`, `\t`
//! to a single space, so offsets into the flattened text stay valid, and
//! wrapping is applied only to text that is about to be printed.

/// Replaces newline-class characters with spaces without changing the byte
/// length of the text.
pub fn flatten_whitespace(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect()
}

/// Greedy word wrap at `width` columns. Words longer than the width get a
/// line of their own.
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in flatten_whitespace(text).split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Uppercases the first character, for displaying answer choices.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattening_preserves_length() {
        let text = "a\nb\tc\rd";
        assert_eq!(flatten_whitespace(text), "a b c d");
        assert_eq!(flatten_whitespace(text).len(), text.len());
    }

    #[test]
    fn wraps_at_width() {
        let wrapped = wrap_text("one two three four five", 9);
        for line in wrapped.lines() {
            assert!(line.len() <= 9);
        }
        assert_eq!(wrapped.replace('\n', " "), "one two three four five");
    }

    #[test]
    fn long_words_get_their_own_line() {
        let wrapped = wrap_text("hi extraordinarily so", 5);
        assert!(wrapped.lines().any(|l| l == "extraordinarily"));
    }

    #[test]
    fn capitalizes_only_the_first_character() {
        assert_eq!(capitalize_first("tower"), "Tower");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("3pm"), "3pm");
    }
}
