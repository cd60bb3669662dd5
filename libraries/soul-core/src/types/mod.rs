mod audio;
mod ids;
pub mod replay_gain;
mod track;

pub use audio::SampleRate;
pub use ids::TrackId;
pub use replay_gain::{db_to_ratio, ratio_to_db, ReplayGain};
pub use track::Track;
