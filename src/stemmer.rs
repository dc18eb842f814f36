//! Thin wrapper around the Snowball English stemmer.
//!
//! The stemmer itself is an external collaborator (`rust_stemmers`); this
//! module only adapts its `&str -> Cow<str>` signature to the byte-oriented
//! `put(docid, term)` call sites in [`crate::index`].

use rust_stemmers::{Algorithm, Stemmer as SnowballStemmer};

pub struct Stemmer {
    inner: SnowballStemmer,
}

impl Stemmer {
    pub fn english() -> Self {
        Self {
            inner: SnowballStemmer::create(Algorithm::English),
        }
    }

    pub fn stem(&self, term: &str) -> String {
        self.inner.stem(term).into_owned()
    }
}

impl Default for Stemmer {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_morphological_variants() {
        let s = Stemmer::english();
        assert_eq!(s.stem("running"), s.stem("runs"));
    }
}
