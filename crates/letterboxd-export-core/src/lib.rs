pub mod driver;
pub mod error;
pub mod ids;
pub mod mapper;
pub mod resolver;
pub mod watched_after;

pub use driver::{export_watched, ExportOutcome};
pub use error::ExportError;
pub use ids::ExternalIds;
pub use mapper::map_row;
pub use resolver::{resolve_session, selectable_accounts};
pub use watched_after::{WatchedAfter, WatchedAfterParseError};
