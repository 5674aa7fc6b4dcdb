mod client;
mod error;
mod traits;

pub use client::{PlexHttpClient, SectionInfo, SharedUser};
pub use error::PlexError;
pub use traits::MovieLibrary;
