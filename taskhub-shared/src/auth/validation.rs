/// Profile field validation
///
/// Shared by sign-up and profile-update handlers. Rules are checked in
/// order and the first violation is reported, so a response always names a
/// single offending field.

use thiserror::Error;

/// A profile field that failed validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name must be at least 2 characters long")]
    NameTooShort,

    #[error("Name must contain only alphabets and spaces")]
    NameNotAlphabetic,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Mobile number must be 10 digits")]
    InvalidMobile,

    #[error("Gender must be 'male', 'female', or 'other'")]
    InvalidGender,
}

/// Validates a display name (≥2 chars, alphabetic and spaces only)
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < 2 {
        return Err(ValidationError::NameTooShort);
    }

    if !name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(ValidationError::NameNotAlphabetic);
    }

    Ok(())
}

/// Validates an email address
///
/// Well-formedness only: one `@` separating a non-empty local part from a
/// domain with at least one dot and an alphabetic TLD of length ≥2.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let (local, domain) = email.split_once('@').ok_or(ValidationError::InvalidEmail)?;

    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }

    let (host, tld) = domain.rsplit_once('.').ok_or(ValidationError::InvalidEmail)?;

    if host.is_empty() || tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validates a mobile number (exactly 10 ASCII digits)
pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidMobile);
    }

    Ok(())
}

/// Validates a gender value, returning the lower-cased canonical form
pub fn validate_gender(gender: &str) -> Result<String, ValidationError> {
    let normalized = gender.to_lowercase();

    match normalized.as_str() {
        "male" | "female" | "other" => Ok(normalized),
        _ => Err(ValidationError::InvalidGender),
    }
}

/// Validates a full profile, reporting the first violated rule
///
/// Returns the case-normalized gender on success; all other fields are
/// stored as given.
pub fn validate_profile(
    name: &str,
    email: &str,
    mobile: &str,
    gender: &str,
) -> Result<String, ValidationError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_mobile(mobile)?;
    validate_gender(gender)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Jo").is_ok());
        assert!(validate_name("Ada Lovelace").is_ok());

        assert_eq!(validate_name("A"), Err(ValidationError::NameTooShort));
        assert_eq!(validate_name(""), Err(ValidationError::NameTooShort));
        assert_eq!(validate_name("R2D2"), Err(ValidationError::NameNotAlphabetic));
        assert_eq!(validate_name("Ada_L"), Err(ValidationError::NameNotAlphabetic));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());

        assert_eq!(validate_email("no-at-sign"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("@example.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("user@nodot"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("user@host.1x"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("user@.c"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210").is_ok());

        assert_eq!(validate_mobile("123456789"), Err(ValidationError::InvalidMobile));
        assert_eq!(validate_mobile("12345678901"), Err(ValidationError::InvalidMobile));
        assert_eq!(validate_mobile("987654321x"), Err(ValidationError::InvalidMobile));
    }

    #[test]
    fn test_validate_gender_normalizes_case() {
        assert_eq!(validate_gender("male").unwrap(), "male");
        assert_eq!(validate_gender("Female").unwrap(), "female");
        assert_eq!(validate_gender("OTHER").unwrap(), "other");

        assert_eq!(validate_gender("unknown"), Err(ValidationError::InvalidGender));
        assert_eq!(validate_gender(""), Err(ValidationError::InvalidGender));
    }

    #[test]
    fn test_validate_profile_reports_first_violation() {
        // Name is checked before the (also invalid) mobile number
        assert_eq!(
            validate_profile("X", "a@x.com", "123", "male"),
            Err(ValidationError::NameTooShort)
        );

        assert_eq!(
            validate_profile("Ada", "a@x.com", "123", "male"),
            Err(ValidationError::InvalidMobile)
        );

        assert_eq!(
            validate_profile("Ada", "a@x.com", "9876543210", "Male").unwrap(),
            "male"
        );
    }
}
