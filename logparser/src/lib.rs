pub mod context;
pub mod error;
pub mod extractors;
pub mod parser;
pub mod phrases;
pub mod projector;

pub use error::ParseError;
pub use parser::{parse, LogParser};
pub use phrases::PhraseTable;
pub use projector::{state_at_event, PlayerSnapshot, StateProjector};
