pub mod account;
pub mod export_row;
pub mod movie;

pub use account::AccountIdentity;
pub use export_row::{ExportRow, EXPORT_HEADER};
pub use movie::{Guid, WatchedMovie};
