// src/utils/company.rs

use crate::models::user::{ROLE_ADMIN, ROLE_STAFF};

/// Display name that always receives the admin role.
const ADMIN_DISPLAY_NAME: &str = "AlphaOmega";

/// Canonical form of a company code: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Checks a user-entered code against the configured list.
pub fn is_valid_code(code: &str, valid_codes: &[String]) -> bool {
    let code = normalize_code(code);
    !code.is_empty() && valid_codes.iter().any(|valid| *valid == code)
}

/// Picks the role for a signing-in user.
pub fn role_for(email: &str, name: &str, admin_emails: &[String]) -> &'static str {
    let email = email.trim().to_lowercase();
    if name.trim() == ADMIN_DISPLAY_NAME || admin_emails.iter().any(|admin| *admin == email) {
        ROLE_ADMIN
    } else {
        ROLE_STAFF
    }
}
