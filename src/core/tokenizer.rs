//! Word-level tokenizer for highlight passages.
//!
//! Token content is the normalized lowercase form used for vocabulary lookup
//! and passage identity; the original-cased substring survives as the surface
//! form so the quiz can display answers the way they were written. Every
//! token carries its half-open byte span `[start, end)` in the passage text,
//! which the renderer uses to reveal the passage up to the current blank.

/// One token occurrence inside a single passage.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenOccurrence {
    /// Normalized lowercase content.
    pub content: String,
    /// Exact original substring, original casing included.
    pub surface: String,
    /// Byte offset of the first character, always on a char boundary.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

struct RawToken {
    content: String,
    start: usize,
    end: usize,
}

/// Punctuation that ends a token (besides whitespace).
fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '.' | '"'
                | ','
                | ':'
                | ';'
                | '\''
                | '-'
                | '_'
                | '='
                | '+'
                | '#'
                | '('
                | ')'
                | '['
                | ']'
                | '{'
                | '}'
                | '!'
                | '\u{2018}' // ‘
                | '\u{2019}' // ’
                | '\u{2013}' // –
        )
}

/// Quote-like characters that can form a possessive (`cat's`, `cat’s`).
fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '\u{2018}' | '\u{2019}' | '\u{2013}')
}

/// `,`/`.`/`:` stay inside a token when flanked by digits ("3,500", "10:30").
fn is_digit_join(c: char) -> bool {
    matches!(c, ',' | '.' | ':')
}

fn is_numeric(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_digit() || is_digit_join(c))
}

/// The two-letter time/era units a numeric token absorbs.
fn is_unit(s: &str) -> bool {
    matches!(s, "am" | "pm" | "ad" | "bc")
}

fn is_era(s: &str) -> bool {
    matches!(s, "ad" | "bc")
}

/// A numeric token that already absorbed a unit, e.g. "3pm" or "450bc".
fn is_numeric_with_unit(s: &str) -> bool {
    ["am", "pm", "ad", "bc"]
        .iter()
        .any(|unit| s.strip_suffix(unit).is_some_and(is_numeric))
}

/// Tokenizes one passage. Output order equals input order; spans are strictly
/// increasing and never overlap.
pub fn tokenize(text: &str) -> Vec<TokenOccurrence> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut raw: Vec<RawToken> = Vec::new();
    let mut current: Option<(String, usize)> = None;

    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];

        // '*' is deleted outright and never forms a boundary
        if c == '*' {
            i += 1;
            continue;
        }

        if current.is_some() && is_quote(c) {
            // possessive/contraction: quote + terminal 's' collapses onto the stem
            let next = chars.get(i + 1).map(|&(_, ch)| ch);
            let after = chars.get(i + 2).map(|&(_, ch)| ch);
            if matches!(next, Some('s') | Some('S')) && after.map_or(true, is_separator) {
                if let Some((content, _)) = current.as_mut() {
                    content.push('s');
                }
                i += 2;
                continue;
            }
        }

        if current.is_some() && is_digit_join(c) {
            // one-char look-behind and look-ahead keep "3,500" and "10:30" whole
            let prev_digit = i > 0 && chars[i - 1].1.is_ascii_digit();
            let next_digit = chars.get(i + 1).is_some_and(|&(_, ch)| ch.is_ascii_digit());
            if prev_digit && next_digit {
                if let Some((content, _)) = current.as_mut() {
                    content.push(c);
                }
                i += 1;
                continue;
            }
        }

        if is_separator(c) {
            if let Some((content, start)) = current.take() {
                raw.push(RawToken { content, start, end: pos });
            }
            i += 1;
            continue;
        }

        match current.as_mut() {
            Some((content, _)) => content.extend(c.to_lowercase()),
            None => {
                let mut content = String::new();
                content.extend(c.to_lowercase());
                current = Some((content, pos));
            }
        }
        i += 1;
    }
    if let Some((content, start)) = current.take() {
        raw.push(RawToken {
            content,
            start,
            end: text.len(),
        });
    }

    merge_adjacent(text, raw)
}

/// Second pass: joins raw tokens that belong together across a separator —
/// `don` + `'t`, numeric + `am/pm/ad/bc`, and `www.`-chained URL segments.
fn merge_adjacent(text: &str, raw: Vec<RawToken>) -> Vec<TokenOccurrence> {
    let mut merged: Vec<RawToken> = Vec::new();
    for tok in raw {
        if let Some(last) = merged.last_mut() {
            let gap = &text[last.end..tok.start];

            if gap == "'" && last.content == "don" && tok.content == "t" {
                last.content.push_str("'t");
                last.end = tok.end;
                continue;
            }

            // lazy dot-chaining of URL-like runs
            if gap == "." && last.content.starts_with("www") {
                last.content.push('.');
                last.content.push_str(&tok.content);
                last.end = tok.end;
                continue;
            }

            // "3 pm" and "450 BC" become one token; a trailing era can also
            // attach to a token that already carries a unit ("9 am AD")
            if is_unit(&tok.content)
                && gap.chars().all(char::is_whitespace)
                && (is_numeric(&last.content)
                    || (is_era(&tok.content) && is_numeric_with_unit(&last.content)))
            {
                last.content.push_str(&tok.content);
                last.end = tok.end;
                continue;
            }
        }
        merged.push(tok);
    }

    merged
        .into_iter()
        .map(|t| TokenOccurrence {
            surface: text[t.start..t.end].to_string(),
            content: t.content,
            start: t.start,
            end: t.end,
        })
        .collect()
}
