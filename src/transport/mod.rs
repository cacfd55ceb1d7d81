pub const LF:u8  = 0x0a;
pub const NUL:u8 = 0x00;

// Reference driver polls up to 4095 bytes into a 4096 byte scratch buffer
pub const DEFAULT_CHUNK_SIZE:usize = 4096;

use std::io;

pub mod line_reader;
pub mod scripted;
pub mod serial;

/// Non-blocking byte source. Returns however many bytes are available right now, `Ok(0)` when nothing is.
pub trait ByteChunkSource {
    fn poll_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Write-only text command channel to the instrument.
pub trait CommandSink {
    fn send(&mut self, cmd: &[u8]) -> io::Result<()>;

    /// Drop anything the instrument already sent that nobody asked for.
    fn discard_input(&mut self) -> io::Result<()>;
}

impl<T: ByteChunkSource + ?Sized> ByteChunkSource for &mut T {
    fn poll_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> { (**self).poll_chunk(buf) }
}

impl<T: CommandSink + ?Sized> CommandSink for &mut T {
    fn send(&mut self, cmd: &[u8]) -> io::Result<()> { (**self).send(cmd) }
    fn discard_input(&mut self) -> io::Result<()> { (**self).discard_input() }
}

// A serial port carries both directions
pub trait Link: ByteChunkSource + CommandSink {}

impl<T: ByteChunkSource + CommandSink> Link for T {}
