use solana_sdk::{pubkey::Pubkey, signer::SignerError, transaction::TransactionError};
use thiserror::Error;

/// No bump in 0..=255 produced an off-curve address for the seeds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no valid bump found for seed {seed:?} under program {program_id}")]
pub struct DerivationError {
    pub seed: &'static [u8],
    pub program_id: Pubkey,
}

/// Failures at the RPC boundary. Nothing here is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Network failure, timeout or malformed response.
    #[error("rpc transport error: {0}")]
    Transport(String),

    /// The cluster accepted the request but the transaction failed,
    /// e.g. the config account is already in use.
    #[error("transaction failed: {0}")]
    TransactionFailed(TransactionError),
}

/// The fetched account bytes do not match the `Config` layout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("account data too small: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("account discriminator mismatch: expected {expected:?}, got {actual:?}")]
    DiscriminatorMismatch { expected: [u8; 8], actual: [u8; 8] },

    /// The body after the discriminator is not valid borsh for the type.
    #[error("malformed account body: {0}")]
    Malformed(String),
}

/// Post-condition failure after a nominally successful write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("config account {0} does not exist")]
    AccountMissing(Pubkey),

    #[error("config account is owned by {actual}, expected program {expected}")]
    WrongProgramOwner { expected: Pubkey, actual: Pubkey },

    #[error("owner mismatch: expected {expected}, got {actual}")]
    OwnerMismatch { expected: Pubkey, actual: Pubkey },

    #[error("mint mismatch: expected {expected}, got {actual}")]
    MintMismatch { expected: Pubkey, actual: Pubkey },

    #[error("cap mismatch: expected {expected}, got {actual}")]
    CapMismatch { expected: u128, actual: u128 },

    #[error("bump mismatch: expected {expected}, got {actual}")]
    BumpMismatch { expected: u8, actual: u8 },

    /// The signer is not the owner recorded in the config account.
    #[error("signer {signer} is not the config owner {owner}")]
    NotConfigOwner { owner: Pubkey, signer: Pubkey },
}

#[derive(Debug, Error)]
pub enum InitializerError {
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// A required signer's keypair is not available to this client.
    #[error("failed to sign transaction: {0}")]
    Signing(#[from] SignerError),

    #[error("{field} is {actual} bytes, at most {max} fit in the account")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("failed to build mint instruction: {0}")]
    MintSetup(String),

    #[error("failed to read keypair from {path}: {reason}")]
    Keypair { path: String, reason: String },
}

pub type Result<T, E = InitializerError> = std::result::Result<T, E>;
