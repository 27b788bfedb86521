use std::time::{SystemTime, UNIX_EPOCH};

use hex::encode as hex_encode;
use hmac::{Hmac, Mac};
use indexmap::IndexMap;
use sha2::Sha256;

/// Milliseconds since the Unix epoch, the timestamp unit every Binance
/// endpoint expects.
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_millis() as u64
}

/// Builds a `key=value&key=value` query string preserving insertion order,
/// matching the order fields were pushed onto the builder.
pub fn build_request(parameters: &IndexMap<&'static str, String>) -> String {
    parameters
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signs a query string with HMAC-SHA256 over the secret key, Binance's
/// signing convention for every signed REST call.
pub fn sign_query(secret_key: &str, query: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(query.as_bytes());
    hex_encode(mac.finalize().into_bytes())
}

/// Snaps `value` down to the nearest multiple of `step`, floor toward zero.
///
/// Step sizes from `exchangeInfo` are not always round decimals, so this
/// works in the same float domain as the inputs rather than assuming a
/// fixed decimal-place count.
pub fn snap_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    let steps = (value / step).floor();
    round_dp(steps * step, decimal_places(step))
}

/// Number of decimal places implied by a step size like `0.001`.
pub(crate) fn decimal_places(step: f64) -> u32 {
    if step <= 0.0 {
        return 0;
    }
    let s = format!("{:.10}", step);
    let trimmed = s.trim_end_matches('0');
    match trimmed.split_once('.') {
        Some((_, frac)) => frac.len() as u32,
        None => 0,
    }
}

/// Rounds `value` to `dp` decimal places, correcting float noise left over
/// from dividing and multiplying by a step size.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}

/// A short random suffix for client-assigned order identifiers.
pub fn generate_random_uid(len: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_down_to_step() {
        assert_eq!(snap_to_step(250.35, 0.1), 250.3);
        assert_eq!(snap_to_step(0.19199, 0.001), 0.191);
    }

    #[test]
    fn builds_ordered_query_string() {
        let mut params = IndexMap::new();
        params.insert("symbol", "BTCUSDT".to_string());
        params.insert("side", "BUY".to_string());
        assert_eq!(build_request(&params), "symbol=BTCUSDT&side=BUY");
    }

    #[test]
    fn sign_query_is_deterministic_for_the_same_key_and_query() {
        let a = sign_query("secret", "symbol=BTCUSDT&timestamp=1");
        let b = sign_query("secret", "symbol=BTCUSDT&timestamp=1");
        assert_eq!(a, b);
        let c = sign_query("secret", "symbol=ETHUSDT&timestamp=1");
        assert_ne!(a, c);
    }

    #[test]
    fn generated_uids_do_not_collide_across_a_small_batch() {
        let ids: std::collections::HashSet<String> =
            (0..200).map(|_| generate_random_uid(12)).collect();
        assert_eq!(ids.len(), 200);
    }
}
