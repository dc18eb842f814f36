//! Reduce writer (§4.7): collapses the merger's `(term, docid)`-ascending
//! posting stream into one consolidated shard output, aggregating occurrence
//! counts for repeated `(term, docid)` pairs and backpatching each term's
//! posting count once its list is known to be complete.
//!
//! The state machine mirrors the original reducer's `callback()` transition
//! table directly: first call, same-term/same-docid, same-term/different-docid,
//! different-term, and end-of-stream are handled as five distinct arms.

use std::io::{Seek, Write};

use crate::error::Result;
use crate::format::{backpatch_count, write_lf, write_posting, write_term_header};
use crate::run_reader::Posting;

pub struct ReduceWriter<W: Write + Seek> {
    writer: W,
    state: Option<Open>,
}

struct Open {
    term: std::rc::Rc<[u8]>,
    docid: u32,
    occurrence: u32,
    count: u32,
    placeholder_pos: u64,
}

impl<W: Write + Seek> ReduceWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            state: None,
        }
    }

    /// Feeds one posting, or `None` at end-of-stream to flush any pending
    /// term/posting and finalize the file.
    pub fn feed(&mut self, posting: Option<&Posting>) -> Result<()> {
        match posting {
            Some(p) => self.feed_posting(p),
            None => self.finish(),
        }
    }

    fn feed_posting(&mut self, p: &Posting) -> Result<()> {
        match self.state.take() {
            None => {
                let placeholder_pos = write_term_header(&mut self.writer, &p.term)?;
                self.state = Some(Open {
                    term: p.term.clone(),
                    docid: p.docid,
                    occurrence: p.occurrence,
                    count: 1,
                    placeholder_pos,
                });
            }
            Some(mut open) if *open.term == *p.term && open.docid == p.docid => {
                open.occurrence += p.occurrence;
                self.state = Some(open);
            }
            Some(mut open) if *open.term == *p.term => {
                write_posting(&mut self.writer, open.docid, open.occurrence)?;
                open.docid = p.docid;
                open.occurrence = p.occurrence;
                open.count += 1;
                self.state = Some(open);
            }
            Some(open) => {
                write_posting(&mut self.writer, open.docid, open.occurrence)?;
                backpatch_count(&mut self.writer, open.placeholder_pos, open.count)?;
                write_lf(&mut self.writer)?;

                let placeholder_pos = write_term_header(&mut self.writer, &p.term)?;
                self.state = Some(Open {
                    term: p.term.clone(),
                    docid: p.docid,
                    occurrence: p.occurrence,
                    count: 1,
                    placeholder_pos,
                });
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(open) = self.state.take() {
            write_posting(&mut self.writer, open.docid, open.occurrence)?;
            backpatch_count(&mut self.writer, open.placeholder_pos, open.count)?;
            write_lf(&mut self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
