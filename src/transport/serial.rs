use std::io::{self, ErrorKind, Read, Write};
use std::time::Duration;

use log::{debug, info};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::config::SerialConfig;
use crate::error::{config_err, Result};
use super::{ByteChunkSource, CommandSink};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFormat {
	pub data_bits: DataBits,
	pub parity: Parity,
	pub stop_bits: StopBits,
}

impl FrameFormat {

	// Mode strings look like "8N1": data bits, parity letter, stop bits
	pub fn parse(mode:&str) -> Result<Self> {
		let bytes = mode.trim().as_bytes();
		if bytes.len() != 3 {
			return Err(config_err(format!("serial mode {:?} should look like \"8N1\"", mode)));
		}

		let data_bits = match bytes[0] {
			b'5' => DataBits::Five,
			b'6' => DataBits::Six,
			b'7' => DataBits::Seven,
			b'8' => DataBits::Eight,
			_    => return Err(config_err(format!("unsupported data bits in serial mode {:?}", mode)))
		};

		let parity = match bytes[1].to_ascii_uppercase() {
			b'N' => Parity::None,
			b'E' => Parity::Even,
			b'O' => Parity::Odd,
			_    => return Err(config_err(format!("unsupported parity in serial mode {:?}", mode)))
		};

		let stop_bits = match bytes[2] {
			b'1' => StopBits::One,
			b'2' => StopBits::Two,
			_    => return Err(config_err(format!("unsupported stop bits in serial mode {:?}", mode)))
		};

		Ok(Self{ data_bits, parity, stop_bits })
	}

}

pub struct SerialLink {
	port: Box<dyn SerialPort>,
}

impl SerialLink {

	pub fn open(cfg:&SerialConfig) -> Result<Self> {
		let frame = FrameFormat::parse(&cfg.mode)?;

		// A short read timeout turns the blocking read into a poll
		let port = serialport::new(cfg.port.as_str(), cfg.baud_rate)
			.data_bits(frame.data_bits)
			.parity(frame.parity)
			.stop_bits(frame.stop_bits)
			.flow_control(FlowControl::None)
			.timeout(Duration::from_millis(cfg.poll_timeout_ms))
			.open()
			.map_err(io::Error::from)?;

		info!("opened {} at {} baud ({})", cfg.port, cfg.baud_rate, cfg.mode);
		Ok(Self{ port })
	}

	pub fn from_port(port:Box<dyn SerialPort>) -> Self { Self{ port } }

}

impl ByteChunkSource for SerialLink {

	fn poll_chunk(&mut self, buf:&mut [u8]) -> io::Result<usize> {
		match self.port.read(buf) {
			Ok(n) => Ok(n),
			Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
			Err(e) => Err(e),
		}
	}

}

impl CommandSink for SerialLink {

	fn send(&mut self, cmd:&[u8]) -> io::Result<()> {
		debug!("tx {:?}", String::from_utf8_lossy(cmd).trim_end());
		self.port.write_all(cmd)?;
		self.port.flush()
	}

	fn discard_input(&mut self) -> io::Result<()> {
		self.port.clear(ClearBuffer::All).map_err(io::Error::from)
	}

}
