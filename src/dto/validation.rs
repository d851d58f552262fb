//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::config::RULE_CODES;

/// Validates that a foul rule code is one of the codes in the rule book.
///
/// # Examples
///
/// ```ignore
/// validate_rule_code("G26-1") // Ok
/// validate_rule_code("g26")   // Err - codes are case sensitive
/// validate_rule_code("G99")   // Err - not in the rule book
/// ```
pub fn validate_rule_code(rule: &str) -> Result<(), ValidationError> {
    if rule.is_empty() {
        let mut err = ValidationError::new("rule_code_empty");
        err.message = Some("Rule code must not be empty".into());
        return Err(err);
    }

    if !RULE_CODES.contains(&rule) {
        let mut err = ValidationError::new("rule_code_unknown");
        err.message = Some(format!("Unknown rule code '{rule}'").into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a team number is a real team, not an empty station marker.
pub fn validate_team_id(team_id: u32) -> Result<(), ValidationError> {
    if team_id == 0 {
        let mut err = ValidationError::new("team_id_zero");
        err.message = Some("Team number must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}
