//! Input validation utilities
//!
//! Local checks that run before any network call. The rules here are the
//! client-side gate only; the server remains authoritative and may still
//! reject what passes.

/// Validate login fields
pub fn validate_login(username: &str, password: &str) -> Result<(), String> {
    if username.is_empty() || password.is_empty() {
        return Err("Please enter both username and password.".to_string());
    }

    Ok(())
}

/// Validate signup fields
pub fn validate_signup(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), String> {
    if username.is_empty() || email.is_empty() || password.is_empty() || confirm_password.is_empty()
    {
        return Err("All fields are required.".to_string());
    }

    if password != confirm_password {
        return Err("Passwords do not match.".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters long.".to_string());
    }

    Ok(())
}

/// Validate comment content
pub fn validate_comment(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Comment cannot be empty.".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login() {
        assert!(validate_login("alice", "secret").is_ok());
        assert!(validate_login("", "secret").is_err());
        assert!(validate_login("alice", "").is_err());
        assert!(validate_login("", "").is_err());
    }

    #[test]
    fn test_validate_signup_requires_all_fields() {
        assert!(validate_signup("alice", "a@example.com", "secret1", "secret1").is_ok());
        assert!(validate_signup("", "a@example.com", "secret1", "secret1").is_err());
        assert!(validate_signup("alice", "", "secret1", "secret1").is_err());
        assert!(validate_signup("alice", "a@example.com", "", "").is_err());
    }

    #[test]
    fn test_validate_signup_password_rules() {
        assert_eq!(
            validate_signup("alice", "a@example.com", "secret1", "secret2"),
            Err("Passwords do not match.".to_string())
        );
        assert_eq!(
            validate_signup("alice", "a@example.com", "abc", "abc"),
            Err("Password must be at least 6 characters long.".to_string())
        );
    }

    #[test]
    fn test_validate_comment() {
        assert!(validate_comment("nice video").is_ok());
        assert!(validate_comment("").is_err());
        assert!(validate_comment("   \t\n").is_err());
    }
}
