use rand::Rng;

/// Length of every generated short code.
pub const CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random 6-character alphanumeric identifier.
///
/// `thread_rng` is a CSPRNG, so codes are not predictable from earlier ones.
/// Uniqueness within a store is NOT guaranteed here — callers that insert
/// must handle collisions themselves (see `LinkStore::create`).
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
