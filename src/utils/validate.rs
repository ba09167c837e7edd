//! 注册与登录输入校验

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s").expect("Invalid whitespace regex"));

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// 登录与注册都要求用户名和密码非空（已去除首尾空白）
pub fn validate_credentials_present(username: &str, password: &str) -> Result<(), &'static str> {
    if username.is_empty() || password.is_empty() {
        return Err("Please provide both username and password");
    }
    Ok(())
}

pub fn validate_username_length(username: &str) -> Result<(), &'static str> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err("Username must be at least 3 characters long");
    }
    Ok(())
}

pub fn validate_username_spaces(username: &str) -> Result<(), &'static str> {
    if WHITESPACE_RE.is_match(username) {
        return Err("Username cannot contain spaces");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_required() {
        assert!(validate_credentials_present("", "secret").is_err());
        assert!(validate_credentials_present("alice", "").is_err());
        assert!(validate_credentials_present("alice", "secret").is_ok());
    }

    #[test]
    fn test_username_rules() {
        assert_eq!(
            validate_username_length("ab"),
            Err("Username must be at least 3 characters long")
        );
        assert_eq!(
            validate_username_spaces("john doe"),
            Err("Username cannot contain spaces")
        );
        assert!(validate_username_length("abc").is_ok());
        assert!(validate_username_spaces("Mary_Jane").is_ok());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
