// Instruments that answer ":waveform:preamble?" and ":waveform:data?" with ASCII lines over a serial port.
// Binary (word/byte) transfer modes are not handled here.

pub mod ascii_scope;

pub use ascii_scope::AsciiScope;
