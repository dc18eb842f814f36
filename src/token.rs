//! Scalar classification and the word-boundary state machine.
//!
//! Mirrors the original mapper's `get_word_type`/`parse_file` pair: an ASCII
//! fast path of code-point range checks, falling back to Unicode category
//! queries for anything above 0x7F.

/// Maximum number of Unicode scalars retained in one token before the rest
/// are silently dropped (the token is truncated, not split).
pub const MAX_WORD_SCALARS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarClass {
    AsciiLower,
    AsciiUpper,
    AsciiDigit,
    AsciiIgnore,
    Hyphen,
    Underscore,
    AlphaLower,
    AlphaUpper,
    Digit,
    Ignore,
}

fn classify(c: char) -> ScalarClass {
    let code = c as u32;

    if code <= 0x7F {
        if (0x61..=0x7A).contains(&code) {
            return ScalarClass::AsciiLower;
        }
        if (0x41..=0x5A).contains(&code) {
            return ScalarClass::AsciiUpper;
        }
        if code <= 0x2C {
            return ScalarClass::AsciiIgnore;
        }
        if (0x30..=0x39).contains(&code) {
            return ScalarClass::AsciiDigit;
        }
        if code == 0x2D {
            return ScalarClass::Hyphen;
        }
        if code == 0x5F {
            return ScalarClass::Underscore;
        }
        return ScalarClass::Ignore;
    }

    if c.is_alphabetic() {
        if c.is_uppercase() {
            ScalarClass::AlphaUpper
        } else {
            ScalarClass::AlphaLower
        }
    } else if c.is_numeric() {
        ScalarClass::Digit
    } else {
        ScalarClass::Ignore
    }
}

fn is_boundary(class: ScalarClass) -> bool {
    matches!(class, ScalarClass::Ignore | ScalarClass::AsciiIgnore)
}

fn fold(c: char, class: ScalarClass) -> char {
    match class {
        ScalarClass::AsciiUpper => (c as u8 + 32) as char,
        ScalarClass::AlphaUpper => c.to_lowercase().next().unwrap_or(c),
        _ => c,
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    InWord,
}

/// Drives the `Idle`/`InWord` state machine over a stream of `char`s,
/// invoking `on_token` with each closed token's scalars (already case-folded).
pub struct Tokenizer {
    state: State,
    buf: Vec<char>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            buf: Vec::with_capacity(MAX_WORD_SCALARS),
        }
    }

    fn close_token(&mut self, on_token: &mut impl FnMut(&[char])) {
        if !self.buf.is_empty() {
            on_token(&self.buf);
            self.buf.clear();
        }
        self.state = State::Idle;
    }

    pub fn push(&mut self, c: char, mut on_token: impl FnMut(&[char])) {
        let class = classify(c);

        if is_boundary(class) {
            self.close_token(&mut on_token);
            return;
        }

        self.state = State::InWord;
        if self.buf.len() < MAX_WORD_SCALARS {
            self.buf.push(fold(c, class));
        }
    }

    /// Closes any token left open at end of document.
    pub fn finish(&mut self, mut on_token: impl FnMut(&[char])) {
        self.close_token(&mut on_token);
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenizes `text` end to end, calling `on_token` with each token's UTF-8
/// bytes (already case-folded, truncated to [`MAX_WORD_SCALARS`]).
pub fn tokenize(text: &str, mut on_token: impl FnMut(&str)) {
    let mut tok = Tokenizer::new();
    let mut scratch = String::with_capacity(MAX_WORD_SCALARS * 2);

    let mut emit = |scalars: &[char]| {
        scratch.clear();
        scratch.extend(scalars.iter());
        on_token(&scratch);
    };

    for c in text.chars() {
        tok.push(c, &mut emit);
    }
    tok.finish(&mut emit);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        let mut out = Vec::new();
        tokenize(text, |t| out.push(t.to_string()));
        out
    }

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        assert_eq!(
            tokens("The cat sat on the mat."),
            vec!["the", "cat", "sat", "on", "the", "mat"]
        );
    }

    #[test]
    fn hyphen_and_underscore_continue_a_word() {
        assert_eq!(tokens("well-known_fact"), vec!["well-known_fact"]);
    }

    #[test]
    fn uppercase_is_folded() {
        assert_eq!(tokens("HELLO World"), vec!["hello", "world"]);
    }

    #[test]
    fn oversized_token_is_truncated_not_split() {
        let long: String = std::iter::repeat('a').take(200).collect();
        let out = tokens(&long);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].chars().count(), MAX_WORD_SCALARS);
    }

    #[test]
    fn non_ascii_uppercase_is_folded() {
        assert_eq!(tokens("CAFÉ"), vec!["café"]);
    }

    #[test]
    fn end_of_document_closes_open_token() {
        assert_eq!(tokens("trailing"), vec!["trailing"]);
    }
}
