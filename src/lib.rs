//! Reproducible pseudo-random byte streams for testing I/O code.
//!
//! A [`Producer`] yields a stream determined entirely by a [`DataType`], a seed and a size. A
//! [`Consumer`] built from the same three values regenerates the stream as bytes are written to
//! it and reports the first byte that differs, a stream that is too long, or one that is cut
//! short. Neither side ever holds more than one generated chunk, so streams of many gigabytes
//! are verified in bounded memory.
//!
//! The byte content does not depend on how the stream is read or written: any split into reads
//! or writes yields and accepts the same bytes. Producers deliberately return short reads
//! (see [`Jitter`]) so that code under test has to handle them.
//!
//! # Example
//! ```
//! use std::io::Read;
//! use randstream::{DataType, Producer};
//!
//! let producer = Producer::new(DataType::Text, 42, 100_000)?;
//! let mut text = Vec::new();
//! (&producer).read_to_end(&mut text)?;
//!
//! let consumer = producer.verifier();
//! consumer.verify(&text)?;
//! consumer.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Content from a custom [`Generator`] is paired with [`Producer::with_generator`] and
//! [`Consumer::with_generator`].

mod config;
mod consumer;
mod data_type;
mod error;
mod file;
mod generator;
mod pending;
mod producer;
#[cfg(feature = "rand")]
mod rand_support;
mod rng;
mod unit;

#[cfg(test)]
mod bench;

pub use config::{AfterFailure, Jitter};
pub use consumer::Consumer;
pub use data_type::DataType;
pub use error::{EmptyChunk, Error, GenerateError, Result, VerifyError};
pub use file::{create_file, create_temp_file};
pub use generator::{BinaryGenerator, Generator, TextGenerator, ZeroGenerator};
pub use producer::Producer;
pub use rng::{Random, RandomRange, Rng, Source};
pub use unit::ByteCount;
