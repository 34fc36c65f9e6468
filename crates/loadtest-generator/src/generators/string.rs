//! String generator: `prefix + base + suffix`.
//!
//! `base` is a `mode[:arg]` token:
//! - `random[:n]` - `n` alphanumeric characters (default 10)
//! - `uuid` - a random UUID
//! - anything else - used verbatim

use super::meta_str;
use super::uuid::random_uuid;
use loadtest_core::GeneratedValue;
use rand::Rng;
use serde_json::{Map, Value};

/// Characters drawn by `random` bases.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length used by `random` when no valid length is given.
pub const DEFAULT_RANDOM_LENGTH: usize = 10;

/// Generate a string from `prefix`, `base` and `suffix` parameters.
pub fn generate_string<R: Rng>(meta: &Map<String, Value>, rng: &mut R) -> GeneratedValue {
    let prefix = meta_str(meta, "prefix").unwrap_or_default();
    let suffix = meta_str(meta, "suffix").unwrap_or_default();
    let base = meta_str(meta, "base").unwrap_or_default();

    GeneratedValue::String(format!("{prefix}{}{suffix}", expand_base(base, rng)))
}

fn expand_base<R: Rng>(base: &str, rng: &mut R) -> String {
    let mut params = base.split(':');
    match params.next() {
        Some("random") => {
            let length = params
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(DEFAULT_RANDOM_LENGTH);
            random_alphanumeric(rng, length)
        }
        Some("uuid") => random_uuid(rng).hyphenated().to_string(),
        _ => base.to_string(),
    }
}

/// Draw `length` characters from [`ALPHABET`].
pub fn random_alphanumeric<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn meta(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn generate(value: Value) -> String {
        let mut rng = StdRng::seed_from_u64(42);
        generate_string(&meta(value), &mut rng)
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_random_with_length() {
        let s = generate(json!({"prefix": "user_", "base": "random:5", "suffix": "@example.com"}));

        let middle = s
            .strip_prefix("user_")
            .and_then(|s| s.strip_suffix("@example.com"))
            .expect("prefix and suffix should be kept");
        assert_eq!(middle.len(), 5);
        assert!(middle.bytes().all(|c| ALPHABET.contains(&c)));
    }

    #[test]
    fn test_random_default_length() {
        assert_eq!(generate(json!({"base": "random"})).len(), DEFAULT_RANDOM_LENGTH);
        assert_eq!(
            generate(json!({"base": "random:abc"})).len(),
            DEFAULT_RANDOM_LENGTH
        );
    }

    #[test]
    fn test_uuid_base() {
        let s = generate(json!({"prefix": "id-", "base": "uuid"}));
        assert!(s.starts_with("id-"));
        assert!(uuid::Uuid::parse_str(&s[3..]).is_ok());
    }

    #[test]
    fn test_verbatim_base() {
        assert_eq!(
            generate(json!({"prefix": "<", "base": "fixed:value", "suffix": ">"})),
            "<fixed:value>"
        );
        assert_eq!(generate(json!({})), "");
    }
}
