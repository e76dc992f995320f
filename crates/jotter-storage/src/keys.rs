//! Object key derivation for uploads.

use rand::distr::{Alphanumeric, SampleString};

const RANDOM_SUFFIX_LEN: usize = 8;

/// Derive the object key a file will be stored under.
///
/// Format: `{epoch_millis}_{8 random alphanumeric chars}{extension}`, where
/// the extension is everything from the last `.` of the original name (dot
/// included), or empty when the name has no dot. The key is derived fresh
/// on every call, so simultaneous uploads of identically named files do not
/// collide. The rest of the original name is deliberately not reused.
pub fn derive_object_key(file_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = Alphanumeric.sample_string(&mut rand::rng(), RANDOM_SUFFIX_LEN);
    format!("{}_{}{}", millis, suffix, file_extension(file_name))
}

/// Extension segment of a file name, dot included. Empty when absent.
fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[idx..],
        None => "",
    }
}
