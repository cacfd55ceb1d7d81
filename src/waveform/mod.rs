use crate::error::AcquisitionError;

pub mod ascii_decode;
pub mod preamble;

pub use ascii_decode::AsciiDecoder;
pub use preamble::parse_preamble;

/// Sample code as sent by the instrument, before scaling.
pub type RawSample = u64;

/// Scale and offset parameters the instrument reports for one capture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AcquisitionSetup {
	pub format: i32,
	pub kind: i32,
	pub points: u32,
	pub count: u32,
	pub x_increment: f64,
	pub x_origin: f64,
	pub x_reference: f64,
	pub y_increment: f64,
	pub y_origin: f64,
	pub y_reference: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
	pub timestamp: f64,
	pub value: f64,
}

// Scales raw codes into (time, value) pairs. Emits min(raw.len(), setup.points) samples so a short
// data block never reads past what was decoded.
pub fn reconstruct(raw:&[RawSample], setup:&AcquisitionSetup) -> Vec<Sample> {
	let n:usize = raw.len().min(setup.points as usize);

	raw[..n].iter().enumerate().map(|(i, code)| {
		let value:f64     = ((*code as f64) - setup.y_reference) * setup.y_increment + setup.y_origin;
		let timestamp:f64 = ((i as f64) - setup.x_reference) * setup.x_increment + setup.x_origin;
		Sample{ timestamp, value }
	}).collect()
}

/// One finished acquisition cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
	pub setup: AcquisitionSetup,
	pub samples: Vec<Sample>,
	pub decoded_points: usize,
}

impl Waveform {

	pub fn new(setup:AcquisitionSetup, raw:&[RawSample]) -> Self {
		Self{ setup, samples: reconstruct(raw, &setup), decoded_points: raw.len() }
	}

	/// The decoded sample count disagreed with the preamble. Not fatal, the samples that were decoded are kept.
	pub fn count_mismatch(&self) -> Option<AcquisitionError> {
		if self.decoded_points == self.setup.points as usize { return None; }
		Some(AcquisitionError::SampleCountMismatch { expected: self.setup.points, decoded: self.decoded_points })
	}

	pub fn pairs(&self) -> Vec<(f64, f64)> {
		self.samples.iter().map(|s| (s.timestamp, s.value)).collect()
	}

}
