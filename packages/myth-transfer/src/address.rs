//! Ethereum-style account addresses for Mythos
//!
//! Mythos (and other Frontier-based parachains) use 20-byte accounts derived the
//! Ethereum way: the last 20 bytes of keccak-256 over the uncompressed public key.
//! Addresses are displayed with EIP-55 mixed-case checksums.
//! See: https://eips.ethereum.org/EIPS/eip-55

use crate::error::TransferError;
use k256::ecdsa::VerifyingKey;
use parity_scale_codec::{Decode, Encode};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// 20-byte account id, SCALE encoded as a plain byte array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub struct AccountId20(pub [u8; 20]);

impl AccountId20 {
    /// Derive the account from a SEC1 public key (33-byte compressed or 65-byte uncompressed)
    pub fn from_public_key(public_key: &[u8]) -> Result<Self, TransferError> {
        let key = VerifyingKey::from_sec1_bytes(public_key)
            .map_err(|e| TransferError::InvalidAddress(format!("Invalid public key: {}", e)))?;
        Ok(Self::from_verifying_key(&key))
    }

    pub(crate) fn from_verifying_key(key: &VerifyingKey) -> Self {
        let uncompressed = key.to_encoded_point(false);
        // Skip the 0x04 SEC1 tag
        let hash = keccak256(&uncompressed.as_bytes()[1..]);
        let mut account = [0u8; 20];
        account.copy_from_slice(&hash[12..]);
        AccountId20(account)
    }

    /// EIP-55 checksummed hex with `0x` prefix
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let shift = if i % 2 == 0 { 4 } else { 0 };
            let nibble = (hash[i / 2] >> shift) & 0x0f;
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl AsRef<[u8]> for AccountId20 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AccountId20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for AccountId20 {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

/// Parse an account from hex
///
/// Accepts a 20-byte H160 address, or a 33/65-byte secp256k1 public key which is
/// mapped to its account. Mixed-case H160 input must carry a valid EIP-55 checksum.
pub fn parse_address(address: &str) -> Result<AccountId20, TransferError> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(digits)
        .map_err(|e| TransferError::InvalidAddress(format!("Invalid hex '{}': {}", address, e)))?;

    match bytes.len() {
        20 => {
            let mut raw = [0u8; 20];
            raw.copy_from_slice(&bytes);
            let account = AccountId20(raw);

            if is_mixed_case(digits) && account.to_checksum()[2..] != *digits {
                return Err(TransferError::InvalidAddress(format!(
                    "Checksum mismatch for {}",
                    address
                )));
            }
            Ok(account)
        }
        33 | 65 => AccountId20::from_public_key(&bytes),
        n => Err(TransferError::InvalidAddress(format!(
            "Expected a 20-byte account or a 33/65-byte public key, got {} bytes",
            n
        ))),
    }
}

/// Validate an account address
pub fn validate_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Keccak256::digest(data));
    hash
}

fn is_mixed_case(digits: &str) -> bool {
    digits.chars().any(|c| c.is_ascii_uppercase()) && digits.chars().any(|c| c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ALITH_PUBKEY: &str = "0x02509540919faacf9ab52146c9aa40db68172d83777250b28e4679176e49ccdd9f";
    const BALTATHAR_PUBKEY: &str =
        "0x033bc19e36ff1673910575b6727a974a9abd80c9a875d41ab3e2648dbfb9e4b518";

    #[rstest]
    #[case("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")]
    #[case("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359")]
    #[case("0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB")]
    #[case("0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb")]
    fn test_eip55_checksum(#[case] address: &str) {
        let account = parse_address(&address.to_lowercase()).unwrap();
        assert_eq!(account.to_checksum(), address);
        assert_eq!(parse_address(address).unwrap(), account);
    }

    #[rstest]
    #[case(ALITH_PUBKEY, "0xf24ff3a9cf04c71dbc94d0b566f7a27b94566cac")]
    #[case(BALTATHAR_PUBKEY, "0x3cd0a705a2dc65e5b1e1205896baa2be8a07c6e0")]
    fn test_public_key_to_account(#[case] public_key: &str, #[case] expected: &str) {
        let account = parse_address(public_key).unwrap();
        assert_eq!(account.to_string().to_lowercase(), expected);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let err = parse_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap_err();
        assert!(matches!(err, TransferError::InvalidAddress(_)));
    }

    #[rstest]
    #[case("")]
    #[case("0x1234")]
    #[case("not-an-address")]
    #[case("0x033bc19e36ff1673910575b6727a974a9abd80c9a875d41ab3e2648dbfb9e4b5")]
    fn test_malformed_addresses(#[case] input: &str) {
        assert!(!validate_address(input));
    }

    #[test]
    fn test_scale_encoding_is_raw_bytes() {
        let account = AccountId20([7u8; 20]);
        assert_eq!(account.encode(), vec![7u8; 20]);
        let decoded = AccountId20::decode(&mut &[7u8; 20][..]).unwrap();
        assert_eq!(decoded, account);
    }
}
