use std::{
    fmt,
    ops::{Add, AddAssign, Sub},
};

/// SI prefixes used when rendering byte counts, in ascending powers of 1000.
const PREFIXES: [&str; 6] = ["k", "M", "G", "T", "P", "E"];

/// A non-negative number of bytes.
///
/// Formats like `10 B` below one kilobyte and with one decimal and an SI prefix above it, so
/// 5,000,000 renders as `5.0 MB`.
///
/// # Example
/// ```
/// # use randstream::ByteCount;
/// assert_eq!(ByteCount::new(5_000_000).to_string(), "5.0 MB");
/// assert_eq!(ByteCount::new(10).to_string(), "10 B");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteCount(u64);

impl ByteCount {
    pub const ZERO: ByteCount = ByteCount(0);

    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Subtracts `other`, stopping at zero.
    pub const fn saturating_sub(self, other: ByteCount) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<u64> for ByteCount {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

impl From<ByteCount> for u64 {
    fn from(count: ByteCount) -> Self {
        count.0
    }
}

impl Add for ByteCount {
    type Output = ByteCount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for ByteCount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for ByteCount {
    type Output = ByteCount;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for ByteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1000 {
            return write!(f, "{} B", self.0);
        }
        let mut value = self.0 as f64 / 1000.0;
        let mut prefix = 0;
        while value >= 1000.0 && prefix + 1 < PREFIXES.len() {
            value /= 1000.0;
            prefix += 1;
        }
        write!(f, "{value:.1} {}B", PREFIXES[prefix])
    }
}
