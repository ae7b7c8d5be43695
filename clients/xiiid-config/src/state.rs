use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use anchor_lang::Discriminator;
use solana_sdk::pubkey::Pubkey;

use crate::error::DecodeError;

const DISCRIMINATOR_LEN: usize = 8;

/// Decode an Anchor account: 8-byte discriminator, then the borsh body.
/// Trailing bytes are ignored, matching Anchor's own loader; string-bearing
/// accounts are allocated at their maximum size and padded with zeros.
pub fn decode_account<T>(data: &[u8]) -> Result<T, DecodeError>
where
    T: AnchorDeserialize + Discriminator,
{
    if data.len() < DISCRIMINATOR_LEN {
        return Err(DecodeError::TooShort {
            expected: DISCRIMINATOR_LEN,
            actual: data.len(),
        });
    }

    let mut expected = [0u8; DISCRIMINATOR_LEN];
    expected.copy_from_slice(T::DISCRIMINATOR);
    let mut actual = [0u8; DISCRIMINATOR_LEN];
    actual.copy_from_slice(&data[..DISCRIMINATOR_LEN]);
    if actual != expected {
        return Err(DecodeError::DiscriminatorMismatch { expected, actual });
    }

    let mut body = &data[DISCRIMINATOR_LEN..];
    T::deserialize(&mut body).map_err(|err| DecodeError::Malformed(err.to_string()))
}

/// Global configuration account stored at the `config` PDA.
///
/// Layout:
/// - Bytes 0-7: discriminator (`sha256("account:Config")[..8]`)
/// - Bytes 8-39: owner who initialized the config
/// - Bytes 40-71: token mint
/// - Bytes 72-87: supply cap (u128, little endian)
/// - Byte 88: canonical bump of the config PDA
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRecord {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub cap: u128,
    pub bump: u8,
}

impl Discriminator for ConfigRecord {
    const DISCRIMINATOR: &'static [u8] = &[0x9b, 0x0c, 0xaa, 0xe0, 0x1e, 0xfa, 0xcc, 0x82];
}

impl ConfigRecord {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        32 + // mint
        16 + // cap
        1; // bump

    /// Fixed-size record, so short data is rejected before borsh sees it.
    pub fn try_from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < Self::LEN {
            return Err(DecodeError::TooShort {
                expected: Self::LEN,
                actual: data.len(),
            });
        }
        decode_account(data)
    }
}

/// A class created by `create_class`.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassAccount {
    pub class_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub topic: String,
    pub difficulty: String,
    pub reward: u64,
    pub question_count: u32,
    pub time_limit: u32,
    pub is_private: bool,
    pub creator: Pubkey,
    pub completion_count: u64,
    pub bump: u8,
}

impl Discriminator for ClassAccount {
    const DISCRIMINATOR: &'static [u8] = &[0x69, 0x2c, 0x7d, 0xf1, 0x95, 0x0a, 0x84, 0x83];
}

/// One student's completion of a class, written by the config owner.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletionAccount {
    pub class_result_id: String,
    pub title: String,
    pub student: Pubkey,
    pub score: u32,
    pub bump: u8,
}

impl Discriminator for CompletionAccount {
    const DISCRIMINATOR: &'static [u8] = &[0x65, 0x4c, 0x22, 0x56, 0xa7, 0x10, 0x51, 0xba];
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportAccount {
    pub report_id: String,
    pub question_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub user: Pubkey,
    pub bump: u8,
}

impl Discriminator for ReportAccount {
    const DISCRIMINATOR: &'static [u8] = &[0x48, 0xeb, 0x43, 0xdd, 0xd2, 0x15, 0xf1, 0xb0];
}

/// `sha256("<namespace>:<name>")[..8]`, the Anchor sighash.
#[cfg(test)]
pub(crate) fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}
