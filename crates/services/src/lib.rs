#![forbid(unsafe_code)]

pub mod content;
pub mod error;
pub mod outbox;
pub mod session;

pub use devenglish_core::Clock;

pub use content::{EmbeddedCatalog, PhraseSource};
pub use error::{ContentError, SessionError};
pub use outbox::SaveOutbox;
pub use session::{ProgressView, SessionController, SessionState};
