//! Random tokens, PINs and payment references.

use rand::Rng;

/// Opaque hex token for email verification and set-password links.
pub fn generate_hex_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().r#gen();
    hex::encode(bytes)
}

/// Six-digit PIN for the forgot-password flow. Always zero-padded.
pub fn generate_reset_pin() -> String {
    let pin: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", pin)
}

/// Payment reference in the format the gateway and the webhook both key on:
/// `TWP_TF` followed by eleven digits.
pub fn generate_payment_reference() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..11).map(|_| rng.gen_range(0..10).to_string()).collect();
    format!("TWP_TF{}", digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_token_is_64_chars() {
        let token = generate_hex_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn reset_pin_is_six_digits() {
        for _ in 0..100 {
            let pin = generate_reset_pin();
            assert_eq!(pin.len(), 6);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn payment_reference_has_expected_shape() {
        let reference = generate_payment_reference();
        assert!(reference.starts_with("TWP_TF"));
        assert_eq!(reference.len(), 17);
        assert!(reference[6..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn tokens_are_not_repeated() {
        assert_ne!(generate_hex_token(), generate_hex_token());
    }
}
