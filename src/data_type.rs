use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    generator::{BinaryGenerator, TextGenerator, ZeroGenerator},
    Error, Generator,
};

/// The kind of content a stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Zero-filled data, not random at all.
    Zero,
    /// Uniformly distributed bytes.
    Binary,
    /// English-looking ASCII paragraphs.
    Text,
    /// Reserved for Unicode text; no generator exists yet.
    Utf8Text,
    /// Content from a caller-supplied [`Generator`].
    Custom,
}

impl DataType {
    /// Returns the built-in generator for this type.
    ///
    /// `Utf8Text` and `Custom` have no built-in generator and fail with
    /// [`Error::UnsupportedType`].
    pub fn generator(self) -> Result<Arc<dyn Generator>, Error> {
        match self {
            DataType::Zero => Ok(Arc::new(ZeroGenerator::default())),
            DataType::Binary => Ok(Arc::new(BinaryGenerator::default())),
            DataType::Text => Ok(Arc::new(TextGenerator::default())),
            DataType::Utf8Text | DataType::Custom => Err(Error::UnsupportedType(self)),
        }
    }

    fn name(self) -> &'static str {
        match self {
            DataType::Zero => "zero",
            DataType::Binary => "binary",
            DataType::Text => "text",
            DataType::Utf8Text => "utf8-text",
            DataType::Custom => "custom",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(DataType::Zero),
            "binary" => Ok(DataType::Binary),
            "text" => Ok(DataType::Text),
            "utf8-text" => Ok(DataType::Utf8Text),
            "custom" => Ok(DataType::Custom),
            other => Err(Error::UnknownType(other.to_owned())),
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(DataType::Zero),
            1 => Ok(DataType::Binary),
            2 => Ok(DataType::Text),
            3 => Ok(DataType::Utf8Text),
            u8::MAX => Ok(DataType::Custom),
            other => Err(Error::UnknownType(other.to_string())),
        }
    }
}

impl From<DataType> for u8 {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Zero => 0,
            DataType::Binary => 1,
            DataType::Text => 2,
            DataType::Utf8Text => 3,
            DataType::Custom => u8::MAX,
        }
    }
}
