use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::AcquisitionConfig;
use crate::error::{AcquisitionError, Result};
use crate::transport::Link;
use crate::transport::line_reader::LineReader;
use crate::waveform::{AcquisitionSetup, AsciiDecoder, RawSample, Waveform};

// Each entry in the comma separated list is at most five digits plus the comma
pub const MAX_CHARS_PER_POINT:usize = 6;

// Room for the terminator and a trailing carriage return
pub const TERMINATOR_SLACK:usize = 2;

pub struct AsciiScope<L: Link> {
	link: L,
	config: AcquisitionConfig,
}

impl<L: Link> AsciiScope<L> {

	pub fn new(link:L, config:AcquisitionConfig) -> Self { Self{ link, config } }

	pub fn config(&self) -> &AcquisitionConfig { &self.config }

	pub fn into_link(self) -> L { self.link }

	/// Select the channel and ASCII transfer mode, throwing away anything already waiting on the line.
	pub fn configure(&mut self) -> Result<()> {
		self.link.discard_input()?;
		self.send(&format!(":waveform:source chan{}", self.config.channel))?;
		self.send(":waveform:format ascii")?;
		Ok(())
	}

	pub fn read_preamble(&mut self) -> Result<AcquisitionSetup> {
		self.send(":waveform:preamble?")?;
		self.settle();

		let line:Vec<u8> = self.reader(self.config.preamble_capacity).read_line(&mut self.link)?;
		info!("Preamble: {}", String::from_utf8_lossy(&line).trim_end());

		AcquisitionSetup::from_preamble(&line)
	}

	/// Fetch and decode the data block for a capture described by `setup`. The returned codes are not
	/// checked against `setup.points`.
	pub fn read_raw_samples(&mut self, setup:&AcquisitionSetup) -> Result<Vec<RawSample>> {
		let points:usize = setup.points as usize;
		let header_size:usize = self.config.header_size;

		self.send(":waveform:data?")?;

		let line_capacity:usize = points.saturating_mul(MAX_CHARS_PER_POINT)
			.saturating_add(header_size)
			.saturating_add(TERMINATOR_SLACK);
		let line:Vec<u8> = self.reader(line_capacity).read_line(&mut self.link)?;
		debug!("data block is {} bytes", line.len());

		// Each header byte can close at most one spurious record
		let decoder = AsciiDecoder::new(self.config.header_policy).bounded(points.saturating_add(header_size));
		decoder.decode(&line, header_size)
	}

	pub fn acquire(&mut self) -> Result<Waveform> {
		self.configure()?;

		let setup:AcquisitionSetup = self.read_preamble()?;
		info!("Reading {} points", setup.points);
		self.settle();

		let raw:Vec<RawSample> = self.read_raw_samples(&setup)?;
		info!("Parsed {} points", raw.len());

		let waveform = Waveform::new(setup, &raw);
		if let Some(mismatch) = waveform.count_mismatch() {
			warn!("{}; keeping {} samples", mismatch, waveform.samples.len());
		}

		Ok(waveform)
	}

	fn reader(&self, capacity:usize) -> LineReader {
		LineReader::new(self.config.chunk_size)
			.bounded(capacity)
			.with_deadline(self.config.read_deadline())
	}

	fn send(&mut self, cmd:&str) -> Result<()> {
		debug!("sending {:?}", cmd);
		let mut line:Vec<u8> = Vec::with_capacity(cmd.len() + 1);
		line.extend_from_slice(cmd.as_bytes());
		line.push(b'\n');
		self.link.send(&line).map_err(AcquisitionError::from)
	}

	// The instrument needs time to answer before polling starts
	fn settle(&self) {
		let t:Duration = self.config.tx_throttle();
		if t > Duration::from_secs(0) { thread::sleep(t); }
	}

}
