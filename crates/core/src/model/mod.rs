mod credentials;
mod level;
mod phrase;
mod profile;

pub use credentials::{
    Credentials, CredentialsDraft, MIN_PASSWORD_LEN, Signup, SignupDraft, ValidationError,
};
pub use level::{LEVEL_COUNT, LevelId, ParseLevelError};
pub use phrase::Phrase;
pub use profile::{DeclaredCategory, ProfileError, ProfileStatus, UserProfile};
