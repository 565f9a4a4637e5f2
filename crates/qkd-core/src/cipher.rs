//! Repeating-key XOR over binary-digit strings.
//!
//! Consumes a sifted key: each `'0'`/`'1'` character of the message is XORed
//! with `key[i % key.len()]`. Encryption and decryption are the same map.

use crate::basis::{Bit, validate_bits};
use crate::error::{QkdError, QkdResult};

/// Encrypt a `'0'`/`'1'` message with a cycled bit key.
pub fn encrypt(message: &str, key: &[Bit]) -> QkdResult<String> {
    xor_with_key(message, key)
}

/// Decrypt a `'0'`/`'1'` ciphertext with a cycled bit key.
pub fn decrypt(ciphertext: &str, key: &[Bit]) -> QkdResult<String> {
    xor_with_key(ciphertext, key)
}

fn xor_with_key(text: &str, key: &[Bit]) -> QkdResult<String> {
    if key.is_empty() {
        return Err(QkdError::EmptyKey);
    }
    validate_bits(key)?;

    text.chars()
        .enumerate()
        .map(|(index, symbol)| {
            let bit = match symbol {
                '0' => 0,
                '1' => 1,
                _ => return Err(QkdError::InvalidMessageSymbol { index, symbol }),
            };
            Ok(if bit ^ key[index % key.len()] == 0 { '0' } else { '1' })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_cycles_key() {
        assert_eq!(encrypt("1101011011", &[1, 0, 1]).unwrap(), "0110000000");
    }

    #[test]
    fn test_round_trip() {
        let key = [0, 1, 1, 0, 1];
        let ciphertext = encrypt("1101011011", &key).unwrap();
        assert_eq!(decrypt(&ciphertext, &key).unwrap(), "1101011011");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(encrypt("", &[1]).unwrap(), "");
        assert_eq!(encrypt("101", &[]).unwrap_err(), QkdError::EmptyKey);
    }

    #[test]
    fn test_rejects_non_binary() {
        let err = encrypt("10a1", &[1]).unwrap_err();
        assert_eq!(
            err,
            QkdError::InvalidMessageSymbol {
                index: 2,
                symbol: 'a'
            }
        );
        let err = encrypt("101", &[1, 5]).unwrap_err();
        assert_eq!(err, QkdError::InvalidBit { index: 1, value: 5 });
    }
}
