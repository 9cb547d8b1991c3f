//! Twin-buffer input stream.
//!
//! A byte array of length 2·B with a single forward cursor. While the cursor
//! walks one segment, the other holds either the previous slice of the file
//! or is past-end and NUL-terminated. Crossing a segment boundary refills the
//! segment being entered; a one-slot retract flag suppresses the refill that
//! would otherwise clobber a segment the DFA still has to re-read.
//!
//! End of file is modeled by planting a NUL byte directly after the last real
//! byte, which the lexer treats as the input-ending sentinel.

use std::io::Read;

/// Size of each half of the twin buffer.
pub const SEGMENT_SIZE: usize = 256;

const TOTAL_SIZE: usize = 2 * SEGMENT_SIZE;

/// A twin-buffer byte stream over any reader.
pub struct TwinBuffer<R: Read> {
    reader: R,
    buf: [u8; TOTAL_SIZE],
    /// Cursor pointing at the most recently returned byte
    forward: usize,
    /// Suppresses the next boundary refill after a retract
    retract_flag: bool,
    /// Set once the reader has run dry
    exhausted: bool,
}

impl<R: Read> TwinBuffer<R> {
    /// Create a buffer over the given reader. The first `advance` wraps the
    /// cursor to index 0 and fills the first segment.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: [0u8; TOTAL_SIZE],
            forward: TOTAL_SIZE - 1,
            retract_flag: false,
            exhausted: false,
        }
    }

    /// Position one past the cursor, i.e. where the next lexeme begins.
    pub fn next_pos(&self) -> usize {
        (self.forward + 1) % TOTAL_SIZE
    }

    /// Return the next byte, refilling the segment being entered when the
    /// cursor crosses B−1 → B or 2B−1 → 0. A NUL is returned once the input
    /// is exhausted.
    pub fn advance(&mut self) -> std::io::Result<u8> {
        if self.forward == SEGMENT_SIZE - 1 && !self.retract_flag {
            self.refill(SEGMENT_SIZE)?;
        } else if self.forward == TOTAL_SIZE - 1 && !self.retract_flag {
            self.refill(0)?;
        }
        self.retract_flag = false;
        self.forward = (self.forward + 1) % TOTAL_SIZE;
        Ok(self.buf[self.forward])
    }

    /// Move the cursor back by `count` (1 or 2). If the step lands in the
    /// last slots of either segment, the retract flag is set so the next
    /// advance does not refill over bytes still to be re-read.
    pub fn retract(&mut self, count: usize) {
        debug_assert!(count == 1 || count == 2);
        self.forward = (self.forward + TOTAL_SIZE - count) % TOTAL_SIZE;
        let near_boundary = match count {
            1 => self.forward == SEGMENT_SIZE - 1 || self.forward == TOTAL_SIZE - 1,
            _ => {
                self.forward == SEGMENT_SIZE - 1
                    || self.forward == SEGMENT_SIZE - 2
                    || self.forward == TOTAL_SIZE - 1
                    || self.forward == TOTAL_SIZE - 2
            }
        };
        if near_boundary {
            self.retract_flag = true;
        }
    }

    /// Copy the lexeme between `begin` and the current cursor (inclusive),
    /// handling wrap-around.
    pub fn lexeme(&self, begin: usize) -> String {
        let len = self.lexeme_len(begin);
        let mut out = String::with_capacity(len);
        for i in 0..len {
            out.push(self.buf[(begin + i) % TOTAL_SIZE] as char);
        }
        out
    }

    /// Length of the lexeme between `begin` and the cursor, inclusive.
    pub fn lexeme_len(&self, begin: usize) -> usize {
        if self.forward >= begin {
            self.forward - begin + 1
        } else {
            TOTAL_SIZE - begin + self.forward + 1
        }
    }

    fn refill(&mut self, start: usize) -> std::io::Result<()> {
        if self.exhausted {
            self.buf[start] = 0;
            return Ok(());
        }
        let mut filled = 0;
        while filled < SEGMENT_SIZE {
            let n = self.reader.read(&mut self.buf[start + filled..start + SEGMENT_SIZE])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled < SEGMENT_SIZE {
            self.exhausted = true;
            self.buf[start + filled] = 0;
        }
        Ok(())
    }
}
