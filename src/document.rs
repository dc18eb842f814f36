//! Document parser (§4.2): validates UTF-8, then streams the valid prefix
//! through the tokenizer and stemmer into the in-memory index.

use crate::index::InMemoryIndex;
use crate::stemmer::Stemmer;
use crate::token::tokenize;

/// Parses one document's bytes under `docid`, feeding stemmed terms into
/// `index`. Invalid UTF-8 is handled by keeping only the longest valid
/// prefix — the bytes from the first invalid sequence onward are dropped.
pub fn parse_document(docid: u32, bytes: &[u8], stemmer: &Stemmer, index: &mut InMemoryIndex) {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let valid_up_to = err.valid_up_to();
            log::warn!(
                "docid {docid}: invalid UTF-8 at byte {valid_up_to}, truncating document"
            );
            std::str::from_utf8(&bytes[..valid_up_to]).unwrap()
        }
    };

    tokenize(text, |term| {
        let stemmed = stemmer.stem(term);
        index.put(docid, &stemmed);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_utf8() {
        let stemmer = Stemmer::english();
        let mut index = InMemoryIndex::new();
        parse_document(1, b"Running cats", &stemmer, &mut index);
        assert!(index.term_count() >= 1);
    }

    #[test]
    fn truncates_at_the_first_invalid_byte() {
        let stemmer = Stemmer::english();
        let mut index = InMemoryIndex::new();
        let mut bytes = b"cat ".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"dog");
        parse_document(1, &bytes, &stemmer, &mut index);

        // "dog" lies past the invalid byte and must never be indexed.
        assert_eq!(index.term_count(), 1);
    }
}
