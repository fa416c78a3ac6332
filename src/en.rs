//! Encode half of the engine: per-directive writers and the layout walk.

use crate::{bits::Writer, Encodable, Error, Layout};

/// Encodes the declared fields of `value` in ascending order.
pub fn encode_fields<T>(value: &T, out: &mut Writer) -> Result<(), Error>
where
    T: Layout,
{
    for field in T::SPEC.fields {
        (field.write)(value, out)?;
    }
    Ok(())
}

/// Emits fixed-value bytes in declared order.
pub fn write_fixed(out: &mut Writer, fixed: &[u8]) {
    for &b in fixed {
        out.push_byte(b);
    }
}

/// Emits fixed-value bytes low byte first.
pub fn write_fixed_le(out: &mut Writer, fixed: &[u8]) {
    for &b in fixed.iter().rev() {
        out.push_byte(b);
    }
}

/// Exactly `len` bytes: zero-padded at the front when short, truncated from
/// the front when long.
pub fn write_padded(out: &mut Writer, data: &[u8], len: usize) {
    if data.len() >= len {
        for &b in &data[data.len() - len..] {
            out.push_byte(b);
        }
    } else {
        for _ in 0..len - data.len() {
            out.push_byte(0);
        }
        for &b in data {
            out.push_byte(b);
        }
    }
}

/// One byte per character; characters outside the ASCII range encode as `?`.
pub fn write_ascii(out: &mut Writer, text: &str, len: usize) {
    let data: Vec<u8> = text
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect();
    write_padded(out, &data, len);
}

/// Writes a variable-length array; the callback result must agree with the
/// supplied length.
pub fn write_var(
    out: &mut Writer,
    field: &'static str,
    data: &[u8],
    declared: usize,
) -> Result<(), Error> {
    if data.len() != declared {
        return Err(Error::LengthMismatch {
            field,
            expected: declared,
            actual: data.len(),
        });
    }
    for &b in data {
        out.push_byte(b);
    }
    Ok(())
}

/// Writes the array and guarantees it ends in `stop`.
pub fn write_terminated(out: &mut Writer, data: &[u8], stop: u8) {
    for &b in data {
        out.push_byte(b);
    }
    if data.last() != Some(&stop) {
        out.push_byte(stop);
    }
}

pub fn write_tail(out: &mut Writer, data: &[u8]) {
    for &b in data {
        out.push_byte(b);
    }
}

/// Encodes a repeated child sequence after checking the declared count.
pub fn write_children<T>(
    out: &mut Writer,
    field: &'static str,
    items: &[T],
    declared: usize,
) -> Result<(), Error>
where
    T: Encodable,
{
    if items.len() != declared {
        return Err(Error::CountMismatch {
            field,
            expected: declared,
            actual: items.len(),
        });
    }
    for item in items {
        item.encode(out)?;
    }
    Ok(())
}
