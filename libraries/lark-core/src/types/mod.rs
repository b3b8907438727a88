mod ids;
mod lyric;
mod playback_mode;
mod timer;
mod track;

pub use ids::TrackId;
pub use lyric::Lyric;
pub use playback_mode::{PlaybackMode, RepeatFlag, TransportFlags};
pub use timer::TimerState;
pub use track::{RawTrack, Track};
