//! Shared binary record primitives for the run/shard wire format (§6.1).
//!
//! Little-endian throughout: `u32 term_length, term bytes, u32 posting_count,
//! N * (u32 docid, u32 occurrence), u8 '\n'`. Both the run flusher and the
//! reduce writer backpatch `posting_count` after writing the postings that
//! follow it, so both go through the same header/backpatch helpers here.

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Placeholder written in place of `posting_count` before it is known.
/// A well-formed, fully-written record never leaves this value in place —
/// finding it during recovery means the writer was killed mid-record.
pub const SENTINEL: u32 = 0xDEAD_C0DE;

/// Corrupt-record guard from §7: term lengths outside `1..=100` indicate a
/// misaligned read, not a legitimately long term.
pub const MAX_PLAUSIBLE_TERM_LEN: u32 = 100;

pub fn write_u32_le<W: Write>(w: &mut W, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Returns `None` on a clean EOF (zero bytes read), `Some(Err)` on a short
/// read (corruption), `Some(Ok(v))` otherwise.
pub fn try_read_u32_le<R: Read>(r: &mut R) -> io::Result<Option<u32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;

    while filled < 4 {
        match r.read(&mut buf[filled..])? {
            0 if filled == 0 => return Ok(None),
            0 => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "short read on u32",
                ))
            }
            n => filled += n,
        }
    }

    Ok(Some(u32::from_le_bytes(buf)))
}

pub fn read_u32_le<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Writes `u32 len, bytes, SENTINEL placeholder` and returns the stream
/// position of the placeholder, to be passed to [`backpatch_count`] once the
/// posting count is known.
pub fn write_term_header<W: Write + Seek>(w: &mut W, term: &[u8]) -> io::Result<u64> {
    write_u32_le(w, term.len() as u32)?;
    w.write_all(term)?;
    let placeholder_pos = w.stream_position()?;
    write_u32_le(w, SENTINEL)?;
    Ok(placeholder_pos)
}

/// Seeks back to `pos`, overwrites the placeholder with `count`, then
/// restores the stream position to the end of the file.
pub fn backpatch_count<W: Write + Seek>(w: &mut W, pos: u64, count: u32) -> io::Result<()> {
    let end = w.stream_position()?;
    w.seek(SeekFrom::Start(pos))?;
    write_u32_le(w, count)?;
    w.seek(SeekFrom::Start(end))?;
    Ok(())
}

pub fn write_posting<W: Write>(w: &mut W, docid: u32, occurrence: u32) -> io::Result<()> {
    write_u32_le(w, docid)?;
    write_u32_le(w, occurrence)
}

pub fn write_lf<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\n")
}
