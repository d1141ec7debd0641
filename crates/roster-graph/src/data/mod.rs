//! Data model for Roster

pub mod decode;
pub mod entities;
pub mod errors;

pub use decode::{decode_activity, decode_person};
pub use entities::{ActivityRecord, GraphRecord, PersonRecord, UserRecord};
pub use errors::{DecodeError, DirectoryError, FetchError, StoreError};
