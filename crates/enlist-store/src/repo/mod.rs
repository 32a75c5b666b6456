pub mod participants;

pub use participants::ParticipantsRepo;
