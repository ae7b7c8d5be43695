//! Client for the `xiiid-token-solana` program's one-time config setup.
//!
//! Derives the `config` PDA, sends `initialize_config(cap)` and reads the
//! account back to check that owner, mint, cap and bump landed as sent.
//! [`ClassroomClient`] drives the owner-gated class instructions once the
//! config exists.

pub mod classroom;
pub mod config;
pub mod error;
pub mod initializer;
pub mod instruction;
pub mod ledger;
pub mod mint;
pub mod pda;
pub mod state;

pub use classroom::ClassroomClient;
pub use config::InitializerConfig;
pub use error::{
    DecodeError, DerivationError, InitializerError, Result, RpcError, VerificationError,
};
pub use initializer::{fetch_config, verify_record, ConfigInitializer, ExpectedConfig, InitializeOutcome};
pub use ledger::{fetch_program_account, sign_and_send, Ledger};
pub use mint::MintSource;
pub use pda::{
    derive_class_address, derive_completion_address, derive_config_address,
    derive_report_address, ConfigAddress, CONFIG_SEED,
};
pub use state::{ClassAccount, CompletionAccount, ConfigRecord, ReportAccount};
