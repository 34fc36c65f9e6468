//! UUID value generator.

use loadtest_core::GeneratedValue;
use rand::Rng;
use uuid::Uuid;

/// Generate a random UUID v4 using the provided RNG.
pub fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    // Generate 16 random bytes
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    // Set version (4) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

/// Generate a UUID in canonical hyphenated form.
pub fn generate_uuid<R: Rng>(rng: &mut R) -> GeneratedValue {
    GeneratedValue::String(random_uuid(rng).hyphenated().to_string())
}
