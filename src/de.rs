//! Decode half of the engine: per-directive readers and the layout walk.
//!
//! Underrun is never an error here. Exhausted reads latch the reader's
//! over-run flag and yield zeroes, so a decode always produces a value;
//! fields past the end of input carry their zero or empty defaults and the
//! consumer surface reports the flag.

use crate::{
    bits::{Position, Reader},
    Decodable, Error, Layout,
};

/// Lengths above this produced by a variable-length callback yield an empty
/// array without advancing the reader.
pub const VARIABLE_LENGTH_LIMIT: usize = 10_240;

/// Specialisation nesting bound.
pub const MAX_SPECIALISE_DEPTH: usize = 8;

/// Decodes the declared fields of `T` in ascending order.
pub fn decode_fields<T>(input: &mut Reader<'_>) -> Result<T, Error>
where
    T: Layout + Default,
{
    let mut value = T::default();
    for field in T::SPEC.fields {
        (field.read)(&mut value, input)?;
    }
    Ok(value)
}

/// Subtype selected by a specialiser method, carrying the decode that
/// replaces the base value.
pub struct Specialised<O> {
    decode: for<'a, 'b> fn(&'a mut Reader<'b>) -> Result<O, Error>,
}

impl<O> Specialised<O> {
    /// Re-decode the bytes as `U` and wrap its output into `O`.
    pub fn to<U>() -> Self
    where
        U: Decodable,
        O: From<U::Output>,
    {
        fn run<U, O>(input: &mut Reader<'_>) -> Result<O, Error>
        where
            U: Decodable,
            O: From<U::Output>,
        {
            U::decode(input).map(O::from)
        }
        Self { decode: run::<U, O> }
    }
}

/// Rewinds to `mark` and decodes the chosen subtype in place of the base.
pub fn redecode<O>(
    input: &mut Reader<'_>,
    mark: Position,
    chosen: Specialised<O>,
) -> Result<O, Error> {
    input.reset_to(mark);
    input.enter_specialised()?;
    let value = (chosen.decode)(input);
    input.leave_specialised();
    value
}

pub fn read_uint_be(input: &mut Reader<'_>, bytes: usize) -> u64 {
    let mut v = 0;
    for _ in 0..bytes {
        v = (v << 8) | u64::from(input.next_byte());
    }
    v
}

pub fn read_uint_le(input: &mut Reader<'_>, bytes: usize) -> u64 {
    let mut v = 0;
    for shift in 0..bytes {
        v |= u64::from(input.next_byte()) << (8 * shift);
    }
    v
}

/// Accumulates whole bytes while more than eight bits remain, then the
/// sub-byte remainder, MSB first.
pub fn read_bits(input: &mut Reader<'_>, bits: usize) -> u64 {
    let mut v = 0;
    let mut left = bits;
    while left > 8 {
        v = (v << 8) | u64::from(input.next_byte());
        left -= 8;
    }
    (v << left) | u64::from(input.next_bits(left))
}

pub fn read_bytes(input: &mut Reader<'_>, len: usize) -> Vec<u8> {
    (0..len).map(|_| input.next_byte()).collect()
}

/// One character per byte; bytes outside the ASCII range decode to U+FFFD.
pub fn read_ascii(input: &mut Reader<'_>, len: usize) -> String {
    read_bytes(input, len)
        .into_iter()
        .map(|b| {
            if b.is_ascii() {
                b as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

/// Variable-length bytes. A zero or over-limit length yields an empty array
/// and leaves the reader untouched.
pub fn read_bytes_var(input: &mut Reader<'_>, len: usize) -> Vec<u8> {
    if len == 0 || len > VARIABLE_LENGTH_LIMIT {
        return Vec::new();
    }
    read_bytes(input, len)
}

/// Bytes until and including `stop`, or until the end of the region.
pub fn read_terminated(input: &mut Reader<'_>, stop: u8) -> Vec<u8> {
    let mut out = Vec::new();
    while input.remaining() > 0 {
        let b = input.next_byte();
        out.push(b);
        if b == stop {
            break;
        }
    }
    out
}

pub fn read_tail(input: &mut Reader<'_>) -> Vec<u8> {
    let len = input.remaining();
    read_bytes(input, len)
}

pub fn read_children<T>(input: &mut Reader<'_>, count: usize) -> Result<Vec<T::Output>, Error>
where
    T: Decodable,
{
    let mut out = Vec::with_capacity(count.min(VARIABLE_LENGTH_LIMIT));
    for _ in 0..count {
        out.push(T::decode(input)?);
    }
    Ok(out)
}
