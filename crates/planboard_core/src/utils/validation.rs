//! Input validation rules shared by auth and entity drafts.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static URL_SCHEME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*):(?P<rest>\S+)$").expect("valid url regex")
});

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Basic `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Absolute URL check: a scheme plus a non-empty remainder, and a host for
/// hierarchical web schemes.
pub fn is_valid_url(url: &str) -> bool {
    let Some(captures) = URL_SCHEME_RE.captures(url) else {
        return false;
    };
    let scheme = captures["scheme"].to_ascii_lowercase();
    let rest = &captures["rest"];
    match scheme.as_str() {
        "http" | "https" | "ftp" | "ws" | "wss" => rest
            .strip_prefix("//")
            .and_then(|after| after.split(['/', '?', '#']).next())
            .is_some_and(|host| !host.is_empty()),
        _ => true,
    }
}

/// Password strength assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0..=5; one point each for length >= 6, length >= 8, an uppercase
    /// letter, a digit and a symbol.
    pub score: u8,
    pub is_valid: bool,
    /// Human-readable hints for missing criteria.
    pub feedback: Vec<&'static str>,
}

/// Scores a password. Valid when the score reaches 2.
pub fn validate_password(password: &str) -> PasswordStrength {
    let mut strength = PasswordStrength {
        score: 0,
        is_valid: false,
        feedback: Vec::new(),
    };

    if password.is_empty() {
        strength.feedback.push("password is required");
        return strength;
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LEN {
        strength
            .feedback
            .push("password must be at least 6 characters long");
    } else {
        strength.score += 1;
    }
    if length >= 8 {
        strength.score += 1;
    }

    if password.chars().any(|c| c.is_ascii_uppercase()) {
        strength.score += 1;
    } else {
        strength
            .feedback
            .push("consider adding at least one uppercase letter");
    }

    if password.chars().any(|c| c.is_ascii_digit()) {
        strength.score += 1;
    } else {
        strength.feedback.push("consider adding at least one digit");
    }

    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        strength.score += 1;
    } else {
        strength.feedback.push("consider adding at least one symbol");
    }

    strength.is_valid = strength.score >= 2;
    strength
}
