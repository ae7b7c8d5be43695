use log::{debug, info};
use solana_program::program_pack::Pack;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use spl_token::state::Mint;

use crate::error::{Result, VerificationError};
use crate::instruction::{initialize_config, InitializeConfigAccounts};
use crate::ledger::{fetch_owned_account, sign_and_send, Ledger};
use crate::mint::{create_mint_instructions, new_mint_keypair, MintSource};
use crate::pda::{derive_config_address, ConfigAddress};
use crate::state::ConfigRecord;

/// Values the config account is expected to hold after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedConfig {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub cap: u128,
}

/// Result of a full derive → submit → verify run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeOutcome {
    pub signature: Signature,
    pub config: ConfigAddress,
    pub mint: Pubkey,
    pub record: ConfigRecord,
}

/// Initializes the program's config PDA and checks what landed on chain.
///
/// The payer signs every transaction and is recorded as the config owner.
pub struct ConfigInitializer<L> {
    ledger: L,
    payer: Keypair,
    program_id: Pubkey,
}

impl<L: Ledger> ConfigInitializer<L> {
    pub fn new(ledger: L, payer: Keypair, program_id: Pubkey) -> Self {
        Self {
            ledger,
            payer,
            program_id,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn owner(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn derive_config_address(&self) -> Result<ConfigAddress> {
        Ok(derive_config_address(&self.program_id)?)
    }

    /// Return the mint to record, creating it first when asked to.
    pub fn resolve_mint(&self, source: MintSource) -> Result<Pubkey> {
        let decimals = match source {
            MintSource::Existing(mint) => {
                debug!("Using existing mint {}", mint);
                return Ok(mint);
            }
            MintSource::Create { decimals } => decimals,
        };

        let (mint_keypair, mint) = new_mint_keypair();
        let lamports = self.ledger.minimum_balance_for_rent_exemption(Mint::LEN)?;
        let instructions =
            create_mint_instructions(&self.payer.pubkey(), &mint, lamports, decimals)?;

        let signature = self.send(&instructions, &[&self.payer, &mint_keypair])?;
        info!(
            "Created mint {} ({} decimals) tx: {}",
            mint, decimals, signature
        );
        Ok(mint)
    }

    /// Send the single `initialize_config` transaction.
    pub fn submit_initialize(
        &self,
        config: &ConfigAddress,
        mint: &Pubkey,
        owner: &Pubkey,
        cap: u128,
    ) -> Result<Signature> {
        let accounts = InitializeConfigAccounts::new(config.address, *mint, *owner);
        let ix = initialize_config(&self.program_id, &accounts, cap);
        debug!("initialize_config accounts: {:?} cap: {}", accounts, cap);

        let signature = self.send(&[ix], &[&self.payer])?;
        info!("initialize_config tx: {}", signature);
        Ok(signature)
    }

    /// Read and decode the config account without checking its contents.
    pub fn fetch_config(&self, config: &ConfigAddress) -> Result<ConfigRecord> {
        fetch_config(&self.ledger, &self.program_id, config)
    }

    /// Fetch the config account and compare it field by field.
    pub fn fetch_and_verify(
        &self,
        config: &ConfigAddress,
        expected: &ExpectedConfig,
    ) -> Result<ConfigRecord> {
        let record = self.fetch_config(config)?;
        verify_record(&record, expected, config.bump)?;
        debug!("Config {} verified: {:?}", config.address, record);
        Ok(record)
    }

    /// derive → resolve mint → submit → fetch → verify.
    pub fn run(&self, mint_source: MintSource, cap: u128) -> Result<InitializeOutcome> {
        let config = self.derive_config_address()?;
        info!("programId: {}", self.program_id);
        info!("configPda: {} (bump {})", config.address, config.bump);

        let mint = self.resolve_mint(mint_source)?;
        let owner = self.owner();
        let signature = self.submit_initialize(&config, &mint, &owner, cap)?;

        let expected = ExpectedConfig { owner, mint, cap };
        let record = self.fetch_and_verify(&config, &expected)?;

        Ok(InitializeOutcome {
            signature,
            config,
            mint,
            record,
        })
    }

    fn send(&self, instructions: &[Instruction], signers: &[&Keypair]) -> Result<Signature> {
        sign_and_send(&self.ledger, &self.payer, instructions, signers)
    }
}

/// Read the config account of `program_id`. Read-only, so no keypair is needed.
pub fn fetch_config<L: Ledger + ?Sized>(
    ledger: &L,
    program_id: &Pubkey,
    config: &ConfigAddress,
) -> Result<ConfigRecord> {
    let account = fetch_owned_account(ledger, program_id, &config.address)?;
    Ok(ConfigRecord::try_from_bytes(&account.data)?)
}

/// Compare a decoded record with what was submitted. The first divergent
/// field is reported.
pub fn verify_record(
    record: &ConfigRecord,
    expected: &ExpectedConfig,
    expected_bump: u8,
) -> Result<(), VerificationError> {
    if record.owner != expected.owner {
        return Err(VerificationError::OwnerMismatch {
            expected: expected.owner,
            actual: record.owner,
        });
    }
    if record.mint != expected.mint {
        return Err(VerificationError::MintMismatch {
            expected: expected.mint,
            actual: record.mint,
        });
    }
    if record.cap != expected.cap {
        return Err(VerificationError::CapMismatch {
            expected: expected.cap,
            actual: record.cap,
        });
    }
    if record.bump != expected_bump {
        return Err(VerificationError::BumpMismatch {
            expected: expected_bump,
            actual: record.bump,
        });
    }
    Ok(())
}
