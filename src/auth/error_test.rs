//! Tests for authentication error mapping.

use crate::auth::AuthError;

#[test]
fn known_codes_map_to_friendly_messages() {
    let cases = [
        (
            "auth/email-already-in-use",
            "This email is already registered. Try signing in!",
        ),
        ("auth/invalid-email", "Please enter a valid email address."),
        ("auth/weak-password", "Password should be at least 6 characters."),
        (
            "auth/user-not-found",
            "No account found with this email or username.",
        ),
        ("auth/wrong-password", "Incorrect password. Try again!"),
        (
            "auth/invalid-credential",
            "Invalid email/username or password. Please try again!",
        ),
        (
            "auth/too-many-requests",
            "Too many attempts. Please wait a moment.",
        ),
    ];

    for (code, message) in cases {
        let err = AuthError::from_code(code);
        assert_eq!(err.friendly_message(), message, "code {}", code);
        assert_eq!(err.external_code(), code);
    }
}

#[test]
fn unknown_code_falls_back_to_generic_message() {
    let err = AuthError::from_code("auth/network-request-failed");

    assert_eq!(
        err,
        AuthError::Backend {
            message: "auth/network-request-failed".to_string()
        }
    );
    assert_eq!(
        err.friendly_message(),
        "Something went wrong. Please try again."
    );
}

#[test]
fn username_not_found_message() {
    let err = AuthError::UsernameNotFound {
        username: "ghost".to_string(),
    };

    assert_eq!(err.friendly_message(), "No account found with this username.");
    assert_eq!(err.to_string(), "No profile with username ghost");
}

#[test]
fn display_is_technical() {
    let err = AuthError::WeakPassword { min_len: 6 };
    assert_eq!(
        err.to_string(),
        "Password too weak (minimum 6 characters)"
    );
}

#[test]
fn weak_password_message_uses_configured_minimum() {
    let err = AuthError::WeakPassword { min_len: 10 };

    assert_eq!(
        err.friendly_message(),
        "Password should be at least 10 characters."
    );
}

#[test]
fn external_code_round_trips_through_from_code() {
    let err = AuthError::TooManyRequests;

    assert_eq!(AuthError::from_code(err.external_code()), err);
}
