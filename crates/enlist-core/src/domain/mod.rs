pub mod email;
pub mod ids;
pub mod participant;

pub use email::{is_valid_email, normalize_email, EmailAddress};
pub use ids::ParticipantId;
pub use participant::{normalize_source, Participant};
