//! Layout metadata: the ordered wire directives of an annotated struct.
//!
//! `#[derive(Frame)]` materialises one [`StructSpec`] constant per type,
//! fields sorted ascending by their `order` annotation. The decode, encode
//! and describe walks all traverse this model; the generated function
//! pointers are the typed stand-in for reflective field access.

use core::fmt;

use crate::{
    bits::{Reader, Writer},
    Error,
};

/// Wire form of a single field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Unsigned integer, high byte first.
    UintBe { bytes: usize },
    /// Unsigned integer, low byte first.
    UintLe { bytes: usize },
    /// Unsigned integer packed into `bits` bits, continuing at the current
    /// bit offset.
    Bits { bits: usize },
    /// Exactly `len` raw bytes.
    Bytes { len: usize },
    /// Exactly `len` bytes of ASCII text.
    Ascii { len: usize },
    /// Bytes whose count comes from the named zero-argument method of the
    /// containing value.
    BytesVar { source: &'static str },
    /// Bytes until and including `stop`, or until the end of the region.
    Terminated { stop: u8 },
    /// All bytes to the end of the region; must be the final field.
    Tail,
    /// A nested structure with its own layout.
    Child,
    /// Exactly `count` nested structures.
    Repeat { count: usize },
    /// Nested structures whose count comes from the named method.
    RepeatVar { source: &'static str },
}

/// One field of a [`StructSpec`]: the directive plus the generated
/// accessors that move the field between the value and the wire.
pub struct FieldSpec<T: ?Sized> {
    pub name: &'static str,
    /// Sole source of wire-position truth within the containing struct.
    pub order: u32,
    pub directive: Directive,
    /// Declared bytes emitted on encode in place of the in-memory value.
    /// Never validated on decode; the incoming bytes are surfaced as-is.
    pub fixed: Option<&'static [u8]>,
    pub read: fn(&mut T, &mut Reader<'_>) -> Result<(), Error>,
    pub write: fn(&T, &mut Writer) -> Result<(), Error>,
    pub render: fn(&T, &mut String, usize),
}

/// Ordered layout of an annotated struct.
pub struct StructSpec<T: ?Sized + 'static> {
    pub name: &'static str,
    /// Method consulted after the declared fields decode, if any.
    pub specialise_with: Option<&'static str>,
    /// Ascending by `order`.
    pub fields: &'static [FieldSpec<T>],
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("directive", &self.directive)
            .field("fixed", &self.fixed)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Debug for StructSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructSpec")
            .field("name", &self.name)
            .field("specialise_with", &self.specialise_with)
            .field("fields", &self.fields)
            .finish()
    }
}
