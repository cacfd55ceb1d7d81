use std::io::ErrorKind;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::error::{AcquisitionError, Result};
use super::{ByteChunkSource, DEFAULT_CHUNK_SIZE, LF};

// Accumulates chunks from a byte source until a chunk ends in a line feed.
//
// The terminator check only looks at the last byte of the most recent chunk, not at the accumulated
// buffer. A line feed that lands in the middle of a chunk does not end the line.
pub struct LineReader {
    scratch: Vec<u8>,
    capacity: Option<usize>,
    deadline: Option<Duration>,
    idle_backoff: Duration,
}

impl Default for LineReader {
    fn default() -> Self { Self::new(DEFAULT_CHUNK_SIZE) }
}

impl LineReader {

    pub fn new(chunk_size:usize) -> Self {
        Self {
            scratch: vec![0; chunk_size.max(1)],
            capacity: None,
            deadline: None,
            idle_backoff: Duration::from_secs(0),
        }
    }

    /// Refuse lines longer than `capacity` bytes (terminator included).
    pub fn bounded(mut self, capacity:usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Give up with `Timeout` once `deadline` has elapsed without a terminator. Without one the reader
    /// polls forever.
    pub fn with_deadline(mut self, deadline:Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sleep between empty polls instead of spinning.
    pub fn with_idle_backoff(mut self, backoff:Duration) -> Self {
        self.idle_backoff = backoff;
        self
    }

    pub fn chunk_size(&self) -> usize { self.scratch.len() }

    pub fn read_line<S: ByteChunkSource + ?Sized>(&mut self, source:&mut S) -> Result<Vec<u8>> {
        let started = Instant::now();
        let mut line:Vec<u8> = Vec::with_capacity(self.capacity.unwrap_or(0).min(self.scratch.len()));

        loop {
            let n:usize = match source.poll_chunk(&mut self.scratch) {
                Ok(n) => n.min(self.scratch.len()),
                Err(e) if is_idle(e.kind()) => 0,
                Err(e) => return Err(e.into()),
            };

            if n > 0 {
                let chunk = &self.scratch[..n];

                if let Some(capacity) = self.capacity {
                    let needed = line.len() + n;
                    if needed > capacity {
                        return Err(AcquisitionError::BufferOverflow { capacity, needed });
                    }
                }

                line.extend_from_slice(chunk);
                trace!("received {} bytes ({} total)", n, line.len());

                if chunk[n - 1] == LF {
                    debug!("line complete after {} bytes", line.len());
                    return Ok(line);
                }
            } else if self.idle_backoff > Duration::from_secs(0) {
                thread::sleep(self.idle_backoff);
            }

            if let Some(deadline) = self.deadline {
                if started.elapsed() >= deadline {
                    return Err(AcquisitionError::Timeout(deadline));
                }
            }
        }
    }

}

fn is_idle(kind:ErrorKind) -> bool {
    matches!(kind, ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedLink;

    fn reader() -> LineReader {
        LineReader::new(16).with_deadline(Some(Duration::from_millis(200)))
    }

    #[test]
    fn joins_chunks_until_trailing_line_feed() {
        let mut src = ScriptedLink::with_chunks(vec![b"ab".to_vec(), b"cd\n".to_vec()]);
        assert_eq!(reader().read_line(&mut src).unwrap(), b"abcd\n".to_vec());
    }

    #[test]
    fn empty_polls_are_retried() {
        let mut src = ScriptedLink::with_chunks(vec![vec![], b"1,2".to_vec(), vec![], vec![], b",3\n".to_vec()]);
        assert_eq!(reader().read_line(&mut src).unwrap(), b"1,2,3\n".to_vec());
    }

    #[test]
    fn line_feed_inside_a_chunk_does_not_terminate() {
        let mut src = ScriptedLink::with_chunks(vec![b"ab\ncd".to_vec(), b"ef\n".to_vec()]);
        assert_eq!(reader().read_line(&mut src).unwrap(), b"ab\ncdef\n".to_vec());
    }

    #[test]
    fn chunks_are_capped_at_scratch_size() {
        let mut src = ScriptedLink::with_chunks(vec![b"0123456789\n".to_vec()]);
        let mut rdr = LineReader::new(4).with_deadline(Some(Duration::from_millis(200)));
        assert_eq!(rdr.read_line(&mut src).unwrap(), b"0123456789\n".to_vec());
    }

    #[test]
    fn overflow_is_reported_instead_of_written() {
        let mut src = ScriptedLink::with_chunks(vec![b"abc".to_vec(), b"defgh\n".to_vec()]);
        match reader().bounded(6).read_line(&mut src) {
            Err(AcquisitionError::BufferOverflow { capacity, needed }) => {
                assert_eq!(capacity, 6);
                assert_eq!(needed, 9);
            },
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn exact_fit_is_not_an_overflow() {
        let mut src = ScriptedLink::with_chunks(vec![b"abcde\n".to_vec()]);
        assert_eq!(reader().bounded(6).read_line(&mut src).unwrap().len(), 6);
    }

    #[test]
    fn missing_terminator_times_out() {
        let mut src = ScriptedLink::with_chunks(vec![b"no newline".to_vec()]);
        let mut rdr = LineReader::new(16).with_deadline(Some(Duration::from_millis(20)));
        assert!(matches!(rdr.read_line(&mut src), Err(AcquisitionError::Timeout(_))));
    }
}
