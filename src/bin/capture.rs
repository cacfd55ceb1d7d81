use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use rs232scope::config::{HeaderPolicy, ScopeConfig};
use rs232scope::devices::AsciiScope;
use rs232scope::export::{self, format_g};
use rs232scope::transport::serial::SerialLink;

#[derive(Parser)]
#[command(name = "capture", version, about = "Capture one waveform from a serial oscilloscope in ASCII transfer mode")]
struct Cli {
	/// JSON config file; flags below override it
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Serial device, e.g. /dev/ttyUSB0
	#[arg(short, long)]
	port: Option<String>,

	#[arg(short, long)]
	baud: Option<u32>,

	/// Channel to read
	#[arg(long)]
	channel: Option<u8>,

	/// Step over the data block header instead of scanning it as data
	#[arg(long)]
	skip_header: bool,

	/// Give up on a response after this many milliseconds
	#[arg(long)]
	deadline_ms: Option<u64>,

	/// Two column time/value table
	#[arg(short, long, default_value = "output.csv")]
	output: PathBuf,

	/// Also write the samples as a JSON array of pairs
	#[arg(long)]
	json: Option<PathBuf>,

	/// Don't echo samples to stdout
	#[arg(short, long)]
	quiet: bool,

	/// Increase verbosity (-v, -vv, -vvv)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

fn load_config(cli:&Cli) -> Result<ScopeConfig> {
	let mut cfg:ScopeConfig = match &cli.config {
		Some(path) => ScopeConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None       => ScopeConfig::default(),
	};

	if let Some(port) = &cli.port { cfg.serial.port = port.clone(); }
	if let Some(baud) = cli.baud { cfg.serial.baud_rate = baud; }
	if let Some(channel) = cli.channel { cfg.acquisition.channel = channel; }
	if cli.skip_header { cfg.acquisition.header_policy = HeaderPolicy::Skip; }
	if cli.deadline_ms.is_some() { cfg.acquisition.read_deadline_ms = cli.deadline_ms; }

	cfg.validate()?;
	Ok(cfg)
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let log_level = match cli.verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};
	env_logger::Builder::new()
		.filter_level(log_level)
		.format_timestamp(None)
		.init();

	let cfg = load_config(&cli)?;

	let link = SerialLink::open(&cfg.serial).with_context(|| format!("opening {}", cfg.serial.port))?;
	let mut scope = AsciiScope::new(link, cfg.acquisition.clone());

	let waveform = scope.acquire().context("acquiring waveform")?;

	println!("Reading {} points", waveform.setup.points);
	println!("Parsed {} points", waveform.decoded_points);
	if let Some(mismatch) = waveform.count_mismatch() {
		eprintln!("warning: {}", mismatch);
	}

	if !cli.quiet {
		for s in &waveform.samples {
			println!("{}, {}", format_g(s.timestamp), format_g(s.value));
		}
	}

	export::write_csv_file(&cli.output, &waveform.samples)
		.with_context(|| format!("writing {}", cli.output.display()))?;

	if let Some(path) = &cli.json {
		export::write_json_file(path, &waveform.samples)
			.with_context(|| format!("writing {}", path.display()))?;
	}

	Ok(())
}
