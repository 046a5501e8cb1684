use rand::RngCore;
use rand::rngs::OsRng;

/// Random bytes per token: 256 bits of entropy.
pub const TOKEN_BYTES: usize = 32;

/// Generates an opaque session token as lowercase hex (64 characters),
/// drawn from the operating system CSPRNG.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = generate_session_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_session_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
