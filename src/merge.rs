//! K-way merger (§4.6): merges postings from several run readers belonging to
//! one shard into a single `(term, docid)`-ascending stream.
//!
//! Selection is a linear scan over the active readers per emission. Fan-in is
//! small (bounded by how many runs a mapper generation produced for a given
//! shard), so a loser tree or binary heap would only add bookkeeping; see
//! DESIGN.md for the tradeoff.

use crate::error::Result;
use crate::run_reader::{Posting, RunReader};

pub struct KWayMerger {
    active: Vec<(RunReader, Posting)>,
}

impl KWayMerger {
    /// Primes each reader with its first posting, dropping any that are
    /// already exhausted (an empty run file is valid, not an error).
    pub fn new(readers: Vec<RunReader>) -> Result<Self> {
        let mut active = Vec::with_capacity(readers.len());
        for mut reader in readers {
            if let Some(posting) = reader.next()? {
                active.push((reader, posting));
            }
        }
        Ok(Self { active })
    }

    fn index_of_min(&self) -> Option<usize> {
        self.active
            .iter()
            .enumerate()
            .min_by(|(_, (_, a)), (_, (_, b))| {
                (&*a.term, a.docid).cmp(&(&*b.term, b.docid))
            })
            .map(|(idx, _)| idx)
    }

    /// Drains the merge, delivering postings in ascending `(term, docid)`
    /// order to `on_posting`, followed by one final `None` so the caller can
    /// flush any pending state.
    pub fn run(mut self, mut on_posting: impl FnMut(Option<&Posting>) -> Result<()>) -> Result<()> {
        while let Some(idx) = self.index_of_min() {
            on_posting(Some(&self.active[idx].1))?;

            let reader = &mut self.active[idx].0;
            match reader.next()? {
                Some(next) => self.active[idx].1 = next,
                None => {
                    self.active.swap_remove(idx);
                }
            }
        }
        on_posting(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{backpatch_count, write_lf, write_posting, write_term_header};
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn run_file(records: &[(&[u8], &[(u32, u32)])]) -> NamedTempFile {
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
    fn merges_two_runs_in_term_then_docid_order() {
        let run_a = run_file(&[(b"apple", &[(1, 1)]), (b"cherry", &[(4, 1)])]);
        let run_b = run_file(&[(b"apple", &[(2, 1)]), (b"banana", &[(3, 1)])]);

        let readers = vec![
            RunReader::open(run_a.path().to_str().unwrap()).unwrap(),
            RunReader::open(run_b.path().to_str().unwrap()).unwrap(),
        ];
        let merger = KWayMerger::new(readers).unwrap();

        let mut seen = Vec::new();
        merger
            .run(|posting| {
                if let Some(p) = posting {
                    seen.push((p.term.to_vec(), p.docid));
                } else {
                    seen.push((b"<end>".to_vec(), 0));
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (b"apple".to_vec(), 1),
                (b"apple".to_vec(), 2),
                (b"banana".to_vec(), 3),
                (b"cherry".to_vec(), 4),
                (b"<end>".to_vec(), 0),
            ]
        );
    }

    #[test]
    fn prefix_terms_sort_shorter_first() {
        let run_a = run_file(&[(b"cats", &[(1, 1)])]);
        let run_b = run_file(&[(b"cat", &[(2, 1)])]);

        let readers = vec![
            RunReader::open(run_a.path().to_str().unwrap()).unwrap(),
            RunReader::open(run_b.path().to_str().unwrap()).unwrap(),
        ];
        let merger = KWayMerger::new(readers).unwrap();

        let mut seen = Vec::new();
        merger
            .run(|posting| {
                if let Some(p) = posting {
                    seen.push(p.term.to_vec());
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, vec![b"cat".to_vec(), b"cats".to_vec()]);
    }

    #[test]
    fn an_empty_run_is_dropped_without_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[]).unwrap();
        let reader = RunReader::open(file.path().to_str().unwrap()).unwrap();
        let merger = KWayMerger::new(vec![reader]).unwrap();

        let mut calls = 0;
        merger
            .run(|_| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 1); // only the terminal None
    }
}
