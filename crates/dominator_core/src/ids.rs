use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const RANDOM_FRAGMENT_LEN: usize = 12;

/// Returns a fresh identifier: base-36 milliseconds followed by random hex.
///
/// Falls back to a bare random UUID when the system clock reads before the
/// Unix epoch.
pub fn new_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => format!(
            "{}{}",
            to_base36(elapsed.as_millis()),
            &random[..RANDOM_FRAGMENT_LEN]
        ),
        Err(_) => random,
    }
}

/// Generates identifiers until one is not reported as taken.
pub fn unique_id<F>(taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let candidate = new_id();
        if !taken(&candidate) {
            return candidate;
        }
    }
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
