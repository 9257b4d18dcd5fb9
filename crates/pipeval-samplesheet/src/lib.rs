//! # pipeval-samplesheet: Samplesheet Channels
//!
//! Resolves the samplesheet bound to a pipeline parameter, converts it into
//! records through a [`SamplesheetConverter`], and hands the records out on
//! a `tokio` channel terminated by [`SampleEvent::Stop`].
//!
//! [`JsonSamplesheetConverter`] is the bundled converter for JSON and YAML
//! samplesheets.

pub mod channel;
pub mod convert;
pub mod error;

pub use channel::{from_samplesheet, SampleEvent, SamplesheetBinding, SamplesheetConverter};
pub use convert::JsonSamplesheetConverter;
pub use error::ConverterError;
