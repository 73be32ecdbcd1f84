// Export modules for use in tests
pub mod catalog;
pub mod eye_protection;
pub mod input;
pub mod navigation;
pub mod paths;
pub mod session;
pub mod settings;
pub mod source;
pub mod theme;
pub mod visibility;

pub mod test_utils;

// Re-export the session surface
pub use session::{Command, Effect, SessionState, ViewMode, ViewingSession, Viewport};
pub use source::{DocumentId, DocumentSource, PageSource, SourceError};
