pub mod episode;
pub mod platform;

pub use episode::{Episode, EpisodeSequence, Extraction, ExtractionOutcome, WorkInfo};
pub use platform::{MenuChoice, Platform};
