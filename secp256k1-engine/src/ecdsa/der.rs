//! ASN.1 DER encoding of ECDSA signatures.
//!
//! ```text
//! ECDSA-Sig-Value ::= SEQUENCE {
//!     r INTEGER,
//!     s INTEGER
//! }
//! ```
//!
//! Parsing is lax in the same way as OpenSSL-era Bitcoin signatures are: the
//! length and structure rules of X.690 are enforced, but integers that are
//! negative or too large for a scalar are accepted and read as zero (which
//! then never verifies). Serialization is always minimal.

use crate::arithmetic::Scalar;
use core::mem::size_of;

/// ASN.1 tag of a constructed SEQUENCE.
const SEQUENCE_TAG: u8 = 0x30;

/// ASN.1 tag of a primitive INTEGER.
const INTEGER_TAG: u8 = 0x02;

/// Largest DER signature: two 33-byte integers plus three tag/length pairs.
pub(crate) const MAX_SIZE: usize = 72;

/// Cursor over DER input.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let (first, rest) = self.bytes.split_first()?;
        self.bytes = rest;
        Some(*first)
    }

    fn read_slice(&mut self, len: usize) -> Option<&'a [u8]> {
        if len > self.bytes.len() {
            return None;
        }
        let (head, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Some(head)
    }

    /// Reads a length: short form, or minimal long form (X.690 8.1.3).
    fn read_len(&mut self) -> Option<usize> {
        let b1 = self.read_byte()?;
        match b1 {
            // reserved (8.1.3.5 c)
            0xFF => None,
            b if b & 0x80 == 0 => Some(b as usize),
            // indefinite length is not DER
            0x80 => None,
            b => {
                let lenleft = (b & 0x7F) as usize;
                if lenleft > self.remaining() || lenleft > size_of::<usize>() {
                    return None;
                }
                let octets = self.read_slice(lenleft)?;
                if octets[0] == 0 {
                    return None;
                }

                let mut len = 0usize;
                for octet in octets {
                    len = (len << 8) | *octet as usize;
                    if len > self.remaining() {
                        return None;
                    }
                }

                // would have fit the short form
                if len < 128 {
                    return None;
                }
                Some(len)
            }
        }
    }

    /// Reads an INTEGER as a scalar.
    ///
    /// Values that are negative or not below the group order decode to zero.
    fn read_integer(&mut self) -> Option<Scalar> {
        if self.read_byte()? != INTEGER_TAG {
            return None;
        }

        let len = self.read_len()?;
        if len == 0 {
            return None;
        }
        let mut int = self.read_slice(len)?;

        match int {
            [0x00, next, ..] if next & 0x80 == 0 => return None,
            [0xFF, next, ..] if next & 0x80 != 0 => return None,
            _ => (),
        }

        let mut overflow = int[0] & 0x80 != 0;
        while let [0, rest @ ..] = int {
            int = rest;
        }
        if int.len() > 32 {
            overflow = true;
        }

        let mut scalar = Scalar::ZERO;
        if !overflow {
            let mut buf = [0u8; 32];
            buf[32 - int.len()..].copy_from_slice(int);
            let (s, high) = Scalar::from_bytes_reduced(&buf);
            if !bool::from(high) {
                scalar = s;
            }
        }
        Some(scalar)
    }
}

/// Parses a DER signature into `(r, s)`.
pub(crate) fn parse(input: &[u8]) -> Option<(Scalar, Scalar)> {
    let mut reader = Reader { bytes: input };

    if reader.read_byte()? != SEQUENCE_TAG {
        return None;
    }
    // the sequence must span exactly the rest of the input
    if reader.read_len()? != reader.remaining() {
        return None;
    }

    let r = reader.read_integer()?;
    let s = reader.read_integer()?;
    if reader.remaining() != 0 {
        return None;
    }

    Some((r, s))
}

/// Writes the minimal DER encoding of `(r, s)` into `out`, returning its
/// length.
pub(crate) fn serialize(r: &Scalar, s: &Scalar, out: &mut [u8; MAX_SIZE]) -> usize {
    let r = minimal_integer(r);
    let s = minimal_integer(s);
    let (r, s) = (r.as_slice(), s.as_slice());

    let body = 4 + r.len() + s.len();
    out[0] = SEQUENCE_TAG;
    out[1] = body as u8;

    let mut pos = 2;
    for int in [r, s] {
        out[pos] = INTEGER_TAG;
        out[pos + 1] = int.len() as u8;
        out[pos + 2..pos + 2 + int.len()].copy_from_slice(int);
        pos += 2 + int.len();
    }

    pos
}

/// Big-endian content octets of a non-negative INTEGER, kept inline.
struct IntegerBytes {
    bytes: [u8; 33],
    start: usize,
}

impl IntegerBytes {
    fn as_slice(&self) -> &[u8] {
        &self.bytes[self.start..]
    }
}

/// Strips leading zeros from `0 || x`, keeping one when the next byte has its
/// high bit set.
fn minimal_integer(x: &Scalar) -> IntegerBytes {
    let mut bytes = [0u8; 33];
    bytes[1..].copy_from_slice(&x.to_bytes());

    let mut start = 0;
    while start < 32 && bytes[start] == 0 && bytes[start + 1] < 0x80 {
        start += 1;
    }
    IntegerBytes { bytes, start }
}
