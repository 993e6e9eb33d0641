// Service exports
pub mod matching;

pub use matching::{MatchError, MatchingClient};
