//! folio core library
//!
//! Turns a profile text into one batched GraphQL query and turns the aliased
//! response back into ordered data for rendering. Nothing here performs I/O
//! except [`Settings`] loading.

pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod response;
pub mod settings;

pub use config::{
    Config, ContributionRef, CreationCategory, CreationRef, Identity, ParseOptions, ProjectRef,
    Section, SectionKind,
};
pub use data::{ContributionRecord, Data, ProjectRecord, UserRecord};
pub use error::{CoreError, Result};
pub use query::QueryBuilder;
pub use response::{Expected, ResponseDecoder};
pub use settings::Settings;
