//! Replacement values for secrets redacted on download.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of generated secrets.
pub const SECRET_LENGTH: usize = 40;

/// A fresh alphanumeric secret.
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect()
}
