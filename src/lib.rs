//! # bitframe
//!
//! Declarative, bit-accurate binary codec. Struct fields carry
//! `#[frame(...)]` annotations giving their wire form and order;
//! `#[derive(Frame)]` validates the layout at compile time and materialises
//! it as a [`StructSpec`] constant, which the encode, decode and describe
//! walks traverse over a stateful bit [`Reader`]/[`Writer`].
//!
//! ```
//! use bitframe::Frame;
//!
//! #[derive(Clone, Debug, Default, PartialEq, Frame)]
//! struct Header {
//!     #[frame(order = 0, be = 2, fixed = [0x7F, 0x80])]
//!     marker: u16,
//!     #[frame(order = 1, be = 3)]
//!     length: u32,
//! }
//!
//! let bytes = bitframe::to_bytes(&Header { marker: 0, length: 0x123456 }).unwrap();
//! assert_eq!(bytes, [0x7F, 0x80, 0x12, 0x34, 0x56]);
//!
//! let decoded = bitframe::from_bytes::<Header>(&bytes).unwrap();
//! assert!(decoded.complete);
//! assert_eq!(decoded.value.length, 0x123456);
//! ```

mod bits;
pub mod de;
pub mod describe;
pub mod en;
mod error;
mod imp;
mod layout;

pub use self::{
    bits::{Position, Reader, Writer},
    de::{Specialised, MAX_SPECIALISE_DEPTH, VARIABLE_LENGTH_LIMIT},
    describe::describe,
    error::Error,
    layout::{Directive, FieldSpec, StructSpec},
};
use auto_impl::auto_impl;
#[cfg(feature = "derive")]
pub use bitframe_derive::*;
use derive_more::Deref;

/// Compile-time layout of an annotated struct; see [`StructSpec`].
pub trait Layout: Sized + 'static {
    const SPEC: StructSpec<Self>;
}

/// Writes a value's wire form.
#[auto_impl(&, Box, Arc)]
pub trait Encodable {
    fn encode(&self, out: &mut Writer) -> Result<(), Error>;
}

/// Reads a value's wire form.
///
/// `Output` is `Self` unless the layout declares a specialiser, in which
/// case it is the declared output union: the base's fields decode first,
/// the specialiser method picks a subtype, and the reader rewinds so the
/// subtype re-decodes the same bytes.
pub trait Decodable: Sized {
    type Output;

    fn decode(input: &mut Reader<'_>) -> Result<Self::Output, Error>;
}

/// Renders a value into the describer tree; see [`describe`].
pub trait Describable {
    fn describe_into(&self, out: &mut String, depth: usize);
}

/// Unsigned integer usable as a field value.
pub trait WireUint: Copy + Default {
    /// Hex digits the describer prints for this width.
    const HEX_DIGITS: usize;

    fn from_wire(v: u64) -> Self;
    fn to_wire(self) -> u64;
}

/// Byte container usable as a byte-array field value.
///
/// Conversion from the wire is fallible: a bounded container rejects input
/// beyond its capacity with [`Error::Overflow`] rather than losing bytes.
pub trait WireBytes: Default {
    fn from_wire(bytes: Vec<u8>) -> Result<Self, Error>;
    fn as_wire(&self) -> &[u8];
}

/// Decode result: the value plus whether the input covered every field.
#[derive(Clone, Copy, Debug, Deref, PartialEq, Eq)]
pub struct Decoded<T> {
    #[deref]
    pub value: T,
    /// False when the decoder ran past the end of the region; the value is
    /// still populated, with zero or empty defaults past the end.
    pub complete: bool,
}

impl<T> Decoded<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

pub fn to_bytes<T>(value: &T) -> Result<Vec<u8>, Error>
where
    T: Encodable,
{
    let mut out = Writer::new();
    value.encode(&mut out)?;
    Ok(out.finish())
}

pub fn from_bytes<T>(data: &[u8]) -> Result<Decoded<T::Output>, Error>
where
    T: Decodable,
{
    from_bytes_at::<T>(data, 0, data.len())
}

/// Decodes from the region `data[start..start + length]`.
pub fn from_bytes_at<T>(
    data: &[u8],
    start: usize,
    length: usize,
) -> Result<Decoded<T::Output>, Error>
where
    T: Decodable,
{
    let mut input = Reader::with_region(data, start, length);
    let value = T::decode(&mut input)?;
    Ok(Decoded {
        value,
        complete: !input.over_run(),
    })
}
