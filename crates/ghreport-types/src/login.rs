use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// GitHub caps logins at 39 characters.
pub const MAX_LOGIN_LEN: usize = 39;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid login {login:?}: {reason}")]
pub struct InvalidLogin {
    pub login: String,
    pub reason: &'static str,
}

fn login_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("login pattern is a valid regex")
    })
}

/// Checks that `login` is safe to place in a URL path segment and a file name.
pub fn validate_login(login: &str) -> Result<&str, InvalidLogin> {
    let reject = |reason| InvalidLogin {
        login: login.to_string(),
        reason,
    };

    if login.is_empty() {
        return Err(reject("login is empty"));
    }
    if login.len() > MAX_LOGIN_LEN {
        return Err(reject("login is longer than 39 characters"));
    }
    if !login_pattern().is_match(login) {
        return Err(reject(
            "only ASCII letters, digits, '-' and '_' are allowed, starting with a letter or digit",
        ));
    }
    Ok(login)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_github_style_logins() {
        for login in ["octocat", "ArthurLOliveira", "a", "rust-lang", "some_user-2"] {
            assert_eq!(validate_login(login), Ok(login));
        }
    }

    #[test]
    fn test_rejects_path_traversal_and_separators() {
        for login in ["../etc", "..", "a/b", "a\\b", ".hidden", "-dash", "name.txt", "a b"] {
            assert!(validate_login(login).is_err(), "{login:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_empty_and_overlong() {
        assert_eq!(validate_login("").unwrap_err().reason, "login is empty");
        let long = "a".repeat(MAX_LOGIN_LEN + 1);
        assert!(validate_login(&long).is_err());
        assert!(validate_login(&long[..MAX_LOGIN_LEN]).is_ok());
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert!(validate_login("usuário").is_err());
    }
}
