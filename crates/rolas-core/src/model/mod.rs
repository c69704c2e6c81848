pub mod album;
pub mod ids;
pub mod performer;
pub mod track;

pub use album::Album;
pub use ids::{AlbumId, PerformerId, TrackId};
pub use performer::{Performer, PerformerType};
pub use track::{NewTrack, TrackView};
