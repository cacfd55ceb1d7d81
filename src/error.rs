use std::io;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AcquisitionError>;

#[derive(Debug, Error)]
pub enum AcquisitionError {
	#[error("preamble incomplete: parsed {fields} of 10 fields")]
	IncompletePreamble { fields: usize },

	#[error("decoded {decoded} samples but preamble declared {expected}")]
	SampleCountMismatch { expected: u32, decoded: usize },

	#[error("no line terminator received within {0:?}")]
	Timeout(Duration),

	#[error("line of at least {needed} bytes does not fit in a {capacity} byte buffer")]
	BufferOverflow { capacity: usize, needed: usize },

	#[error("data block holds more than {capacity} samples")]
	CapacityExceeded { capacity: usize },

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error(transparent)]
	Io(#[from] io::Error),
}

pub(crate) fn config_err(msg: impl Into<String>) -> AcquisitionError { AcquisitionError::Config(msg.into()) }
