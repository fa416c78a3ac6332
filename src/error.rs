#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("length callback for `{field}` returned {expected}, but {actual} bytes were supplied")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("repeater `{field}` declares {expected} elements, but {actual} were supplied")]
    CountMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("specialisation nested deeper than {} levels", crate::de::MAX_SPECIALISE_DEPTH)]
    SpecialiseDepth,
    #[error("byte array exceeds its container capacity")]
    Overflow,
}
