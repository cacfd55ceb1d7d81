use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::error::{config_err, Result};
use crate::transport::DEFAULT_CHUNK_SIZE;
use crate::transport::serial::FrameFormat;

pub const DEFAULT_BAUD_RATE:u32 = 9600;
pub const DEFAULT_HEADER_SIZE:usize = 10;
pub const DEFAULT_PREAMBLE_CAPACITY:usize = 256;
pub const DEFAULT_TX_THROTTLE_MS:u64 = 100;
pub const MAX_CHANNEL:u8 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
	pub serial: SerialConfig,
	pub acquisition: AcquisitionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
	pub port: String,
	pub baud_rate: u32,
	pub mode: String,
	pub poll_timeout_ms: u64,
}

impl Default for SerialConfig {
	fn default() -> Self {
		Self {
			port: "/dev/ttyUSB0".to_owned(),
			baud_rate: DEFAULT_BAUD_RATE,
			mode: "8N1".to_owned(),
			poll_timeout_ms: 10,
		}
	}
}

/// What the sample decoder does with the block header in front of the comma list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
	/// Scan the header like data. Digits run into the first sample, other bytes close empty records.
	Absorb,
	/// Step over the header before scanning.
	Skip,
}

impl Default for HeaderPolicy {
	fn default() -> Self { HeaderPolicy::Absorb }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
	pub channel: u8,
	pub header_size: usize,
	pub header_policy: HeaderPolicy,
	pub chunk_size: usize,
	pub preamble_capacity: usize,
	pub read_deadline_ms: Option<u64>,
	pub tx_throttle_ms: u64,
}

impl Default for AcquisitionConfig {
	fn default() -> Self {
		Self {
			channel: 1,
			header_size: DEFAULT_HEADER_SIZE,
			header_policy: HeaderPolicy::default(),
			chunk_size: DEFAULT_CHUNK_SIZE,
			preamble_capacity: DEFAULT_PREAMBLE_CAPACITY,
			read_deadline_ms: None,
			tx_throttle_ms: DEFAULT_TX_THROTTLE_MS,
		}
	}
}

impl AcquisitionConfig {
	pub fn read_deadline(&self) -> Option<Duration> { self.read_deadline_ms.map(Duration::from_millis) }
	pub fn tx_throttle(&self) -> Duration { Duration::from_millis(self.tx_throttle_ms) }
}

impl ScopeConfig {

	pub fn load<P: AsRef<Path>>(path:P) -> Result<Self> {
		let path = path.as_ref();
		let rdr = BufReader::new(File::open(path)?);
		let cfg:Self = serde_json::from_reader(rdr)
			.map_err(|e| config_err(format!("{}: {}", path.display(), e)))?;

		cfg.validate()?;
		Ok(cfg)
	}

	pub fn validate(&self) -> Result<()> {
		if self.serial.baud_rate == 0 { return Err(config_err("baud_rate must be greater than zero")); }
		FrameFormat::parse(&self.serial.mode)?;

		let acq = &self.acquisition;
		if acq.chunk_size == 0 { return Err(config_err("chunk_size must be greater than zero")); }
		if acq.preamble_capacity == 0 { return Err(config_err("preamble_capacity must be greater than zero")); }
		if acq.channel == 0 || acq.channel > MAX_CHANNEL {
			return Err(config_err(format!("channel must be between 1 and {}", MAX_CHANNEL)));
		}

		Ok(())
	}

}
