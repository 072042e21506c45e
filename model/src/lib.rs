pub mod event;
pub mod event_model;
pub mod game_info;
pub mod player;
pub mod role;

pub use event::{Event, EventKind, Phase};
pub use event_model::EventModel;
pub use game_info::{GameMetadata, Winner};
pub use player::{Player, PlayerId, PlayerStatus};
pub use role::{Role, RoleSource};
