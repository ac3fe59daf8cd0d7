mod game;
mod ids;
mod progress;
mod record;

pub use game::{GameType, ParseGameTypeError};
pub use ids::{ParseSessionIdError, RecordId, SessionId};
pub use progress::{Details, ProgressError, ProgressSnapshot};
pub use record::SessionRecord;
