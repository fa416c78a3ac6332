//! Trait impls for the value types fields may declare: unsigned integers
//! and byte containers.

use arrayvec::ArrayVec;
use bytes::Bytes;

use crate::{Error, WireBytes, WireUint};

impl WireUint for u8 {
    const HEX_DIGITS: usize = 2;

    fn from_wire(v: u64) -> Self {
        v as u8
    }

    fn to_wire(self) -> u64 {
        self.into()
    }
}

impl WireUint for u16 {
    const HEX_DIGITS: usize = 4;

    fn from_wire(v: u64) -> Self {
        v as u16
    }

    fn to_wire(self) -> u64 {
        self.into()
    }
}

impl WireUint for u32 {
    const HEX_DIGITS: usize = 8;

    fn from_wire(v: u64) -> Self {
        v as u32
    }

    fn to_wire(self) -> u64 {
        self.into()
    }
}

impl WireUint for u64 {
    const HEX_DIGITS: usize = 16;

    fn from_wire(v: u64) -> Self {
        v
    }

    fn to_wire(self) -> u64 {
        self
    }
}

impl WireBytes for Vec<u8> {
    fn from_wire(bytes: Vec<u8>) -> Result<Self, Error> {
        Ok(bytes)
    }

    fn as_wire(&self) -> &[u8] {
        self
    }
}

impl WireBytes for Bytes {
    fn from_wire(bytes: Vec<u8>) -> Result<Self, Error> {
        Ok(Bytes::from(bytes))
    }

    fn as_wire(&self) -> &[u8] {
        self
    }
}

impl<const CAP: usize> WireBytes for ArrayVec<u8, CAP> {
    fn from_wire(bytes: Vec<u8>) -> Result<Self, Error> {
        let mut out = Self::new();
        out.try_extend_from_slice(&bytes).map_err(|_| Error::Overflow)?;
        Ok(out)
    }

    fn as_wire(&self) -> &[u8] {
        self
    }
}
