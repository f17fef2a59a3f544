use thiserror::Error;

use crate::model::profile::DeclaredCategory;

/// Minimum accepted password length. Passwords are length-checked only,
/// never hashed; cryptographic treatment is out of scope.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("a category must be selected")]
    CategoryNotSelected,
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Raw login input as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct CredentialsDraft {
    pub username: String,
    pub password: String,
}

impl CredentialsDraft {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Validate the draft into usable credentials.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the username is empty or the password is
    /// shorter than [`MIN_PASSWORD_LEN`].
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(Credentials {
            username: self.username,
            password: self.password,
        })
    }
}

/// Validated signup input: credentials plus a declared category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    credentials: Credentials,
    declared_category: DeclaredCategory,
}

impl Signup {
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn declared_category(&self) -> DeclaredCategory {
        self.declared_category
    }
}

/// Raw signup input as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct SignupDraft {
    pub username: String,
    pub password: String,
    pub declared_category: DeclaredCategory,
}

impl SignupDraft {
    /// Validate the draft into a finalized signup.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the same credential rules as login, plus
    /// `CategoryNotSelected` when the declared category is still unset.
    pub fn validate(self) -> Result<Signup, ValidationError> {
        let credentials = CredentialsDraft {
            username: self.username,
            password: self.password,
        }
        .validate()?;
        if self.declared_category == DeclaredCategory::Unset {
            return Err(ValidationError::CategoryNotSelected);
        }
        Ok(Signup {
            credentials,
            declared_category: self.declared_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_username_and_minimum_password() {
        assert_eq!(
            CredentialsDraft::new("", "12345678").validate(),
            Err(ValidationError::EmptyUsername)
        );
        assert_eq!(
            CredentialsDraft::new("ana", "1234567").validate(),
            Err(ValidationError::PasswordTooShort)
        );
        let creds = CredentialsDraft::new("ana", "12345678").validate().unwrap();
        assert_eq!(creds.username(), "ana");
    }

    #[test]
    fn signup_requires_a_declared_category() {
        let draft = SignupDraft {
            username: "ana".into(),
            password: "12345678".into(),
            declared_category: DeclaredCategory::Unset,
        };
        assert_eq!(draft.validate(), Err(ValidationError::CategoryNotSelected));

        let draft = SignupDraft {
            username: "ana".into(),
            password: "12345678".into(),
            declared_category: DeclaredCategory::Feminine,
        };
        let signup = draft.validate().unwrap();
        assert_eq!(signup.declared_category(), DeclaredCategory::Feminine);
    }

    #[test]
    fn password_length_counts_characters_not_bytes() {
        // 8 multi-byte characters must pass.
        let creds = CredentialsDraft::new("ana", "çãéíóúàê").validate();
        assert!(creds.is_ok());
    }
}
