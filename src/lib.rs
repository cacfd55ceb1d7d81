
// Error type shared by every layer of the acquisition cycle
pub mod error;

// Serial port settings and acquisition parameters, passed explicitly instead of living in globals
pub mod config;

// Byte transport: chunked polling, line framing, the serial port driver and a scripted stand-in for tests
pub mod transport;

// Preamble parsing, ASCII sample decoding and conversion of sample codes to time/voltage pairs
pub mod waveform;

// Instruments built on the layers above
pub mod devices;

// Writing reconstructed waveforms to disk
pub mod export;

pub use error::{AcquisitionError, Result};
