use crate::error::ValidationError;

/// A `u64` guaranteed to be >= 1 at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(u64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(ValidationError::ValueTooSmall { min: 1 }.to_string());
        }
        Ok(Self(value))
    }
}

/// A `usize` guaranteed to be >= 1 at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(usize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(ValidationError::ValueTooSmall { min: 1 }.to_string());
        }
        Ok(Self(value))
    }
}
