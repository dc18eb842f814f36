//! Run reader (§4.5): a restartable forward cursor over one run file.
//!
//! Terms are shared via `Rc<[u8]>` across every posting drawn from the same
//! term record, so a [`crate::merge::KWayMerger`] can hold many live readers
//! at once without re-cloning term bytes per posting while still satisfying
//! the "stable until the next term" borrow contract from the wire format.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::rc::Rc;

use crate::error::Result;
use crate::format::{try_read_u32_le, MAX_PLAUSIBLE_TERM_LEN};

const READ_BUFFER_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct Posting {
    pub term: Rc<[u8]>,
    pub docid: u32,
    pub occurrence: u32,
}

pub struct RunReader {
    reader: BufReader<File>,
    path: String,
    current_term: Rc<[u8]>,
    postings: u32,
    current: u32,
    first: bool,
    exhausted: bool,
}

impl RunReader {
    pub fn open(path: &str) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::with_capacity(READ_BUFFER_BYTES, file),
            path: path.to_string(),
            current_term: Rc::from([]),
            postings: 0,
            current: 0,
            first: true,
            exhausted: false,
        })
    }

    /// Returns the next posting, or `None` once the file is exhausted
    /// (cleanly, or because corruption was detected and logged).
    pub fn next(&mut self) -> Result<Option<Posting>> {
        if self.exhausted {
            return Ok(None);
        }

        if self.current == self.postings && !self.advance_to_next_term()? {
            self.exhausted = true;
            return Ok(None);
        }

        let docid = match try_read_u32_le(&mut self.reader)? {
            Some(v) => v,
            None => {
                log::warn!("corrupt run record in {}: truncated docid", self.path);
                self.exhausted = true;
                return Ok(None);
            }
        };
        let occurrence = match try_read_u32_le(&mut self.reader)? {
            Some(v) => v,
            None => {
                log::warn!("corrupt run record in {}: truncated occurrence", self.path);
                self.exhausted = true;
                return Ok(None);
            }
        };

        self.current += 1;
        Ok(Some(Posting {
            term: self.current_term.clone(),
            docid,
            occurrence,
        }))
    }

    /// Reads the next term-record header. Returns `Ok(false)` on clean EOF
    /// or detected corruption (both leave the cursor exhausted).
    fn advance_to_next_term(&mut self) -> Result<bool> {
        if !self.first {
            let has_lf = {
                let buf = self.reader.fill_buf()?;
                !buf.is_empty() && buf[0] == b'\n'
            };
            if has_lf {
                self.reader.consume(1);
            }
        }
        self.first = false;

        let term_len = match try_read_u32_le(&mut self.reader)? {
            None => return Ok(false),
            Some(v) => v,
        };

        if term_len == 0 || term_len > MAX_PLAUSIBLE_TERM_LEN {
            log::warn!(
                "corrupt run record in {}: implausible term length {term_len}",
                self.path
            );
            return Ok(false);
        }

        let mut term_bytes = vec![0u8; term_len as usize];
        if let Err(err) = self.reader.read_exact(&mut term_bytes) {
            log::warn!(
                "corrupt run record in {}: short read on term bytes: {err}",
                self.path
            );
            return Ok(false);
        }

        let postings = match try_read_u32_le(&mut self.reader)? {
            None => {
                log::warn!("corrupt run record in {}: truncated posting count", self.path);
                return Ok(false);
            }
            Some(v) => v,
        };

        self.current_term = Rc::from(term_bytes.into_boxed_slice());
        self.postings = postings;
        self.current = 0;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{backpatch_count, write_lf, write_posting, write_term_header};
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn write_run(records: &[(&[u8], &[(u32, u32)])]) -> NamedTempFile {
        let mut buf = Cursor::new(Vec::new());
        for (term, postings) in records {
            let pos = write_term_header(&mut buf, term).unwrap();
            for (docid, occ) in *postings {
                write_posting(&mut buf, *docid, *occ).unwrap();
            }
            backpatch_count(&mut buf, pos, postings.len() as u32).unwrap();
            write_lf(&mut buf).unwrap();
        }

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&buf.into_inner()).unwrap();
        file
    }

    #[test]
    fn reads_postings_in_order() {
        let file = write_run(&[(b"apple", &[(3, 1), (5, 2)])]);
        let mut reader = RunReader::open(file.path().to_str().unwrap()).unwrap();

        let p1 = reader.next().unwrap().unwrap();
        assert_eq!(&*p1.term, b"apple");
        assert_eq!((p1.docid, p1.occurrence), (3, 1));

        let p2 = reader.next().unwrap().unwrap();
        assert_eq!((p2.docid, p2.occurrence), (5, 2));

        assert!(reader.next().unwrap().is_none());
    }

    #[test]
    fn term_is_shared_across_postings_of_the_same_record() {
        let file = write_run(&[(b"apple", &[(1, 1), (2, 1)])]);
        let mut reader = RunReader::open(file.path().to_str().unwrap()).unwrap();
        let p1 = reader.next().unwrap().unwrap();
        let p2 = reader.next().unwrap().unwrap();
        assert!(Rc::ptr_eq(&p1.term, &p2.term));
    }

    #[test]
    fn tolerates_a_missing_trailing_newline() {
        let mut buf = Cursor::new(Vec::new());
        let pos = write_term_header(&mut buf, b"cat").unwrap();
        write_posting(&mut buf, 1, 1).unwrap();
        backpatch_count(&mut buf, pos, 1).unwrap();
        // deliberately omit the trailing '\n'

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&buf.into_inner()).unwrap();

        let mut reader = RunReader::open(file.path().to_str().unwrap()).unwrap();
        let p = reader.next().unwrap().unwrap();
        assert_eq!(&*p.term, b"cat");
        assert!(reader.next().unwrap().is_none());
    }

    #[test]
    fn implausible_term_length_is_treated_as_exhaustion() {
        let mut buf = Cursor::new(Vec::new());
        crate::format::write_u32_le(&mut buf, 9999).unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&buf.into_inner()).unwrap();

        let mut reader = RunReader::open(file.path().to_str().unwrap()).unwrap();
        assert!(reader.next().unwrap().is_none());
    }

    #[test]
    fn multiple_terms_advance_correctly() {
        let file = write_run(&[(b"apple", &[(1, 1)]), (b"banana", &[(2, 1), (3, 1)])]);
        let mut reader = RunReader::open(file.path().to_str().unwrap()).unwrap();

        let mut seen = Vec::new();
        while let Some(p) = reader.next().unwrap() {
            seen.push((p.term.to_vec(), p.docid));
        }
        assert_eq!(
            seen,
            vec![
                (b"apple".to_vec(), 1),
                (b"banana".to_vec(), 2),
                (b"banana".to_vec(), 3),
            ]
        );
    }
}
