//! Validation helpers for DTOs.

use validator::ValidationError;

/// Teams bring three or four members to the hunt.
const MIN_MEMBERS: usize = 3;
const MAX_MEMBERS: usize = 4;

/// Validates the team member list: 3 to 4 entries, none blank.
///
/// # Examples
///
/// ```ignore
/// validate_members(&["Ada", "Lin", "Sam"])        // Ok
/// validate_members(&["Ada", "Lin"])               // Err - too few
/// validate_members(&["Ada", "Lin", "Sam", " "])   // Err - blank entry
/// ```
pub fn validate_members(members: &Vec<String>) -> Result<(), ValidationError> {
    if !(MIN_MEMBERS..=MAX_MEMBERS).contains(&members.len()) {
        let mut err = ValidationError::new("member_count");
        err.message = Some(
            format!(
                "Teams must have {MIN_MEMBERS} to {MAX_MEMBERS} members (got {})",
                members.len()
            )
            .into(),
        );
        return Err(err);
    }

    if members.iter().any(|member| member.trim().is_empty()) {
        let mut err = ValidationError::new("member_blank");
        err.message = Some("Member names must not be blank".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_validate_members_valid() {
        assert!(validate_members(&names(&["Ada", "Lin", "Sam"])).is_ok());
        assert!(validate_members(&names(&["Ada", "Lin", "Sam", "Noor"])).is_ok());
    }

    #[test]
    fn test_validate_members_invalid_count() {
        assert!(validate_members(&names(&["Ada", "Lin"])).is_err()); // too few
        assert!(validate_members(&names(&["A", "B", "C", "D", "E"])).is_err()); // too many
        assert!(validate_members(&names(&[])).is_err()); // empty
    }

    #[test]
    fn test_validate_members_blank_entries() {
        assert!(validate_members(&names(&["Ada", "Lin", ""])).is_err());
        assert!(validate_members(&names(&["Ada", "Lin", "   "])).is_err());
    }
}
