//! Authentication error types.
//!
//! Each variant is one reason the identity service rejected a request. The
//! `Display` text is technical; [`AuthError::friendly_message`] gives the
//! message shown to the user.

use miette::Diagnostic;
use thiserror::Error;

/// Identity service rejections.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already in use: {email}")]
    #[diagnostic(code(whack::auth::email_already_in_use))]
    EmailAlreadyInUse { email: String },

    #[error("Invalid email address: {email}")]
    #[diagnostic(code(whack::auth::invalid_email))]
    InvalidEmail { email: String },

    #[error("Password too weak (minimum {min_len} characters)")]
    #[diagnostic(code(whack::auth::weak_password))]
    WeakPassword { min_len: usize },

    #[error("No identity for {identifier}")]
    #[diagnostic(code(whack::auth::user_not_found))]
    UserNotFound { identifier: String },

    #[error("Wrong password")]
    #[diagnostic(code(whack::auth::wrong_password))]
    WrongPassword,

    #[error("Invalid credential")]
    #[diagnostic(code(whack::auth::invalid_credential))]
    InvalidCredential,

    #[error("Too many failed attempts")]
    #[diagnostic(
        code(whack::auth::too_many_requests),
        help("Wait a moment before trying again.")
    )]
    TooManyRequests,

    #[error("No profile with username {username}")]
    #[diagnostic(code(whack::auth::username_not_found))]
    UsernameNotFound { username: String },

    #[error("Identity backend error: {message}")]
    #[diagnostic(code(whack::auth::backend))]
    Backend { message: String },
}

impl AuthError {
    /// Map an external identity service error code (`auth/...`) to an error.
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/email-already-in-use" => AuthError::EmailAlreadyInUse {
                email: String::new(),
            },
            "auth/invalid-email" => AuthError::InvalidEmail {
                email: String::new(),
            },
            "auth/weak-password" => AuthError::WeakPassword { min_len: 6 },
            "auth/user-not-found" => AuthError::UserNotFound {
                identifier: String::new(),
            },
            "auth/wrong-password" => AuthError::WrongPassword,
            "auth/invalid-credential" => AuthError::InvalidCredential,
            "auth/too-many-requests" => AuthError::TooManyRequests,
            other => AuthError::Backend {
                message: other.to_string(),
            },
        }
    }

    /// External code of this error, the inverse of [`AuthError::from_code`].
    pub fn external_code(&self) -> &str {
        match self {
            AuthError::EmailAlreadyInUse { .. } => "auth/email-already-in-use",
            AuthError::InvalidEmail { .. } => "auth/invalid-email",
            AuthError::WeakPassword { .. } => "auth/weak-password",
            AuthError::UserNotFound { .. } => "auth/user-not-found",
            AuthError::WrongPassword => "auth/wrong-password",
            AuthError::InvalidCredential => "auth/invalid-credential",
            AuthError::TooManyRequests => "auth/too-many-requests",
            AuthError::UsernameNotFound { .. } => "auth/username-not-found",
            AuthError::Backend { message } => message,
        }
    }

    /// Message shown to the user.
    pub fn friendly_message(&self) -> String {
        let message = match self {
            AuthError::WeakPassword { min_len } => {
                return format!("Password should be at least {} characters.", min_len);
            }
            AuthError::EmailAlreadyInUse { .. } => {
                "This email is already registered. Try signing in!"
            }
            AuthError::InvalidEmail { .. } => "Please enter a valid email address.",
            AuthError::UserNotFound { .. } => "No account found with this email or username.",
            AuthError::WrongPassword => "Incorrect password. Try again!",
            AuthError::InvalidCredential => {
                "Invalid email/username or password. Please try again!"
            }
            AuthError::TooManyRequests => "Too many attempts. Please wait a moment.",
            AuthError::UsernameNotFound { .. } => "No account found with this username.",
            AuthError::Backend { .. } => "Something went wrong. Please try again.",
        };
        message.to_string()
    }
}

/// Result type for identity operations.
pub type AuthResult<T> = Result<T, AuthError>;
