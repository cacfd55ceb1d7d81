use std::iter;

use log::warn;

use crate::config::HeaderPolicy;
use crate::error::{AcquisitionError, Result};
use crate::transport::{LF, NUL};
use super::RawSample;

// Decoder for the ASCII waveform block: `header_size` bytes of header, then unsigned decimal
// integers separated by commas, ended by a line feed or NUL.
//
// Every non-digit byte closes the current record, so the record count is not checked against the
// preamble here. With `HeaderPolicy::Absorb` the header goes through the same accumulator as the
// data: header digits run into the first sample, and other header bytes each close a record of
// their own.
#[derive(Debug, Clone, Copy)]
pub struct AsciiDecoder {
    capacity: Option<usize>,
    policy: HeaderPolicy,
}

impl Default for AsciiDecoder {
    fn default() -> Self { Self{ capacity: None, policy: HeaderPolicy::Absorb } }
}

impl AsciiDecoder {

    pub fn new(policy:HeaderPolicy) -> Self { Self{ capacity: None, policy } }

    /// Fail with `CapacityExceeded` instead of emitting more than `capacity` records.
    pub fn bounded(mut self, capacity:usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn decode(&self, data:&[u8], header_size:usize) -> Result<Vec<RawSample>> {
        let body:&[u8] = match self.policy {
            HeaderPolicy::Absorb => data,
            HeaderPolicy::Skip   => &data[header_size.min(data.len())..],
        };

        // Every record needs at least one delimiter byte, so the body bounds the record count. The
        // capacity comes from the instrument and is only checked, never reserved.
        let reserve:usize = (body.len() / 2 + 1).min(self.capacity.unwrap_or(usize::MAX));
        let mut ans:Vec<RawSample> = Vec::with_capacity(reserve);
        let mut accumulator:RawSample = 0;
        let mut clamped:bool = false;

        // Running off the end of the slice counts as the NUL terminator
        for &b in body.iter().chain(iter::once(&NUL)) {
            if b.is_ascii_digit() {
                match accumulator.checked_mul(10).and_then(|a| a.checked_add(RawSample::from(b - b'0'))) {
                    Some(a) => accumulator = a,
                    None => {
                        accumulator = RawSample::MAX;
                        clamped = true;
                    }
                }
                continue;
            }

            if clamped {
                warn!("sample {} does not fit in {} bits, clamped to {}", ans.len(), RawSample::BITS, RawSample::MAX);
                clamped = false;
            }

            if let Some(capacity) = self.capacity {
                if ans.len() >= capacity {
                    return Err(AcquisitionError::CapacityExceeded { capacity });
                }
            }

            ans.push(accumulator);
            accumulator = 0;

            if b == NUL || b == LF {
                break;
            }
        }

        Ok(ans)
    }

}
