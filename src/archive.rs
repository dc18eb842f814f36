//! Streaming archive reader.
//!
//! Wraps the `tar` crate (transparently gzip-decoded via `flate2` when the
//! input file name ends in `.gz`) the same way the teacher's
//! `build_bigram`/`build_bigram_stream` binaries pick a plain or
//! gzip-wrapped `BufRead` based on the input extension. Archive members are
//! streamed one at a time; the whole archive is never buffered in memory.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::{IndexError, Result};

/// One document extracted from the archive: its derived docid and body bytes.
pub struct Document {
    pub docid: u32,
    pub bytes: Vec<u8>,
}

enum Inner {
    Plain(Archive<File>),
    Gzip(Archive<GzDecoder<File>>),
}

pub struct ArchiveReader {
    inner: Inner,
}

impl ArchiveReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| IndexError::ArchiveOpen {
            path: path.display().to_string(),
            source,
        })?;

        let inner = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            Inner::Gzip(Archive::new(GzDecoder::new(file)))
        } else {
            Inner::Plain(Archive::new(file))
        };

        Ok(Self { inner })
    }

    /// Streams every member, calling `on_document` with its docid and body.
    /// Read errors on an individual member are logged and the member is
    /// skipped; the archive itself continues.
    pub fn for_each_document(&mut self, mut on_document: impl FnMut(Document)) -> Result<()> {
        match &mut self.inner {
            Inner::Plain(archive) => read_entries(archive, &mut on_document),
            Inner::Gzip(archive) => read_entries(archive, &mut on_document),
        }
    }
}

fn read_entries<R: Read>(
    archive: &mut Archive<R>,
    on_document: &mut impl FnMut(Document),
) -> Result<()> {
    let entries = archive.entries()?;

    for entry in entries {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable archive entry: {err}");
                continue;
            }
        };

        let path = match entry.path() {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(err) => {
                log::warn!("skipping entry with unreadable path: {err}");
                continue;
            }
        };

        let docid = extract_docid(&path);

        let mut bytes = Vec::new();
        if let Err(err) = entry.read_to_end(&mut bytes) {
            log::warn!("skipping {path}: read error mid-document: {err}");
            continue;
        }

        on_document(Document { docid, bytes });
    }

    Ok(())
}

/// Parses the integer suffix of an archive entry path after its 4th byte,
/// `atoi`-style: the longest leading run of ASCII digits, or `0` if none.
pub fn extract_docid(path: &str) -> u32 {
    let tail = if path.len() > 4 { &path[4..] } else { "" };
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trailing_digits_after_fourth_byte() {
        assert_eq!(extract_docid("doc0000001"), 1);
        assert_eq!(extract_docid("doc0000042"), 42);
    }

    #[test]
    fn non_digit_suffix_yields_zero() {
        assert_eq!(extract_docid("docabc"), 0);
    }

    #[test]
    fn short_path_yields_zero() {
        assert_eq!(extract_docid("doc"), 0);
    }

    #[test]
    fn stops_at_first_non_digit() {
        assert_eq!(extract_docid("doc123abc456"), 123);
    }
}
