pub mod domain;
pub mod error;
pub mod registration;

pub use domain::*;
pub use error::CoreError;
pub use registration::{register_each, BulkResult, Inserted, ParticipantStore, RegistrationMeta};
