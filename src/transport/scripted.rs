use std::collections::{HashMap, VecDeque};
use std::io::{self, Error, ErrorKind};

use super::{ByteChunkSource, CommandSink};

enum Event {
    Data(Vec<u8>),
    Fail(ErrorKind),
}

/// In-memory link for tests and deterministic playback.
///
/// Chunks are handed out one per poll, in order. An empty chunk is a poll that found nothing. Replies
/// registered with `respond` are queued when the matching command is sent, so a `discard_input` before
/// the query does not lose them.
#[derive(Default)]
pub struct ScriptedLink {
    pending: VecDeque<Event>,
    replies: HashMap<String, VecDeque<Vec<Event>>>,
    sent: Vec<String>,
}

impl ScriptedLink {

    pub fn new() -> Self { Self::default() }

    pub fn with_chunks<I: IntoIterator<Item = Vec<u8>>>(chunks:I) -> Self {
        let mut ans = Self::new();
        ans.pending.extend(chunks.into_iter().map(Event::Data));
        ans
    }

    /// Queue `chunks` to arrive after the next `cmd` is sent. Repeated calls for the same command
    /// answer successive sends.
    pub fn respond<I: IntoIterator<Item = Vec<u8>>>(&mut self, cmd:&str, chunks:I) -> &mut Self {
        let events:Vec<Event> = chunks.into_iter().map(Event::Data).collect();
        self.replies.entry(cmd.trim().to_owned()).or_default().push_back(events);
        self
    }

    /// Make the next poll fail with `kind` once the pending chunks ahead of it are consumed.
    pub fn push_error(&mut self, kind:ErrorKind) -> &mut Self {
        self.pending.push_back(Event::Fail(kind));
        self
    }

    /// Commands sent so far, without their line terminators.
    pub fn sent(&self) -> &[String] { &self.sent }

    pub fn is_drained(&self) -> bool { self.pending.is_empty() }

}

impl ByteChunkSource for ScriptedLink {

    fn poll_chunk(&mut self, buf:&mut [u8]) -> io::Result<usize> {
        match self.pending.pop_front() {
            None => Ok(0),
            Some(Event::Fail(kind)) => Err(Error::new(kind, "scripted failure")),
            Some(Event::Data(mut chunk)) => {
                if chunk.len() > buf.len() {
                    let rest = chunk.split_off(buf.len());
                    self.pending.push_front(Event::Data(rest));
                }
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
        }
    }

}

impl CommandSink for ScriptedLink {

    fn send(&mut self, cmd:&[u8]) -> io::Result<()> {
        let text:String = String::from_utf8_lossy(cmd).trim().to_owned();

        if let Some(queue) = self.replies.get_mut(&text) {
            if let Some(events) = queue.pop_front() {
                self.pending.extend(events);
            }
        }

        self.sent.push(text);
        Ok(())
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.pending.clear();
        Ok(())
    }

}
