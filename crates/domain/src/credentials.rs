//! Generated login ids and temporary passwords for new accounts.

use rand::Rng;

pub const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789@#$%";

pub const DEFAULT_PASSWORD_LENGTH: usize = 8;

pub fn generate_password(rng: &mut impl Rng, length: usize) -> String {
    (0..length)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}

/// Sequence number of a generated login email: `sup042@{domain}` → `42`.
///
/// `None` for emails that are not exactly `{prefix}{digits}@{domain}`, such
/// as explicit addresses that merely share the prefix (`support@...`).
pub fn login_number(prefix: &str, domain: &str, email: &str) -> Option<u32> {
    let email = email.to_lowercase();
    let local = email.strip_suffix(&format!("@{}", domain.to_lowercase()))?;
    let digits = local.strip_prefix(&prefix.to_lowercase())?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Next login id for `prefix`, one past the numerically highest existing one.
///
/// `SUP007` and `SUP012` → `SUP013`. Starts at `001` when none exist.
pub fn next_login_id<'a>(
    prefix: &str,
    domain: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> String {
    let next = existing
        .into_iter()
        .filter_map(|email| login_number(prefix, domain, email))
        .max()
        .map_or(1, |n| n + 1);

    format!("{}{:03}", prefix.to_uppercase(), next)
}

/// Email address the identity platform knows a login id by. Always lowercase.
pub fn login_email(login_id: &str, domain: &str) -> String {
    format!("{login_id}@{domain}").to_lowercase()
}
