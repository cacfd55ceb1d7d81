use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::waveform::Sample;

const G_PRECISION:i32 = 6;

// Formats like printf's "%G": six significant digits, trailing zeros dropped, exponent form with an
// upper case E and at least two exponent digits when the exponent is below -4 or at least 6.
pub fn format_g(x:f64) -> String {
	if x.is_nan() { return "NAN".to_owned(); }
	if x.is_infinite() { return if x > 0.0 { "INF".to_owned() } else { "-INF".to_owned() }; }
	if x == 0.0 { return if x.is_sign_negative() { "-0".to_owned() } else { "0".to_owned() }; }

	// Exponent after rounding to the target precision, which can differ from floor(log10(|x|))
	let sci:String = format!("{:.*e}", (G_PRECISION - 1) as usize, x);
	let (mantissa, exp_str) = match sci.split_once('e') {
		Some(parts) => parts,
		None => return sci,
	};
	let exp:i32 = exp_str.parse().unwrap_or(0);

	if exp < -4 || exp >= G_PRECISION {
		let sign = if exp < 0 { '-' } else { '+' };
		format!("{}E{}{:02}", strip_zeros(mantissa), sign, exp.abs())
	} else {
		let fixed:String = format!("{:.*}", (G_PRECISION - 1 - exp) as usize, x);
		strip_zeros(&fixed).to_owned()
	}
}

fn strip_zeros(s:&str) -> &str {
	if !s.contains('.') { return s; }
	s.trim_end_matches('0').trim_end_matches('.')
}

/// Two columns, one "<time>, <value>" pair per line.
pub fn write_csv<W: Write>(mut w:W, samples:&[Sample]) -> io::Result<()> {
	for s in samples {
		writeln!(w, "{}, {}", format_g(s.timestamp), format_g(s.value))?;
	}
	w.flush()
}

pub fn write_csv_file<P: AsRef<Path>>(path:P, samples:&[Sample]) -> io::Result<()> {
	write_csv(BufWriter::new(File::create(path)?), samples)
}

/// Pretty printed JSON array of [time, value] pairs.
pub fn write_json<W: Write>(mut w:W, samples:&[Sample]) -> io::Result<()> {
	let pairs:Vec<(f64, f64)> = samples.iter().map(|s| (s.timestamp, s.value)).collect();
	serde_json::to_writer_pretty(&mut w, &pairs)?;
	writeln!(w)?;
	w.flush()
}

pub fn write_json_file<P: AsRef<Path>>(path:P, samples:&[Sample]) -> io::Result<()> {
	write_json(BufWriter::new(File::create(path)?), samples)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn general_format_matches_printf() {
		let cases:&[(f64, &str)] = &[
			(0.0, "0"),
			(100.0, "100"),
			(-26.0, "-26"),
			(0.0015, "0.0015"),
			(0.0001, "0.0001"),
			(0.00001, "1E-05"),
			(1e-6, "1E-06"),
			(2e-6, "2E-06"),
			(4e-9, "4E-09"),
			(-1.5e-3, "-0.0015"),
			(123456.0, "123456"),
			(1234567.0, "1.23457E+06"),
			(999999.5, "1E+06"),
			(3.14159265, "3.14159"),
			(0.1 + 0.2, "0.3"),
			(1e100, "1E+100"),
		];

		for (x, expected) in cases {
			assert_eq!(format_g(*x), *expected, "{}", x);
		}
	}

	#[test]
	fn special_values() {
		assert_eq!(format_g(f64::NAN), "NAN");
		assert_eq!(format_g(f64::INFINITY), "INF");
		assert_eq!(format_g(f64::NEG_INFINITY), "-INF");
	}

	#[test]
	fn csv_has_one_pair_per_line() {
		let samples = vec![
			Sample{ timestamp: 0.0, value: 0.0 },
			Sample{ timestamp: 1e-6, value: 100.0 },
			Sample{ timestamp: 2e-6, value: -0.0015 },
		];
		let mut out:Vec<u8> = vec![];
		write_csv(&mut out, &samples).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "0, 0\n1E-06, 100\n2E-06, -0.0015\n");
	}

	#[test]
	fn json_is_an_array_of_pairs() {
		let samples = vec![Sample{ timestamp: 0.5, value: -2.0 }];
		let mut out:Vec<u8> = vec![];
		write_json(&mut out, &samples).unwrap();

		let parsed:Vec<(f64, f64)> = serde_json::from_slice(&out).unwrap();
		assert_eq!(parsed, vec![(0.5, -2.0)]);
	}

	#[test]
	fn csv_file_round_trips_through_disk() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("output.csv");
		write_csv_file(&path, &[Sample{ timestamp: 4e-9, value: 1.5 }]).unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "4E-09, 1.5\n");
	}
}
