use solana_program::program_pack::Pack;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use solana_system_interface::instruction as system_instruction;
use spl_token::state::Mint;

use crate::error::{InitializerError, Result};

/// Decimals of a freshly created mint.
pub const MINT_DECIMALS: u8 = 9;

/// Where the config's token mint comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintSource {
    /// A mint that already exists on the cluster.
    Existing(Pubkey),
    /// Create a new mint; the payer becomes mint authority, no freeze authority.
    Create { decimals: u8 },
}

impl MintSource {
    pub fn create() -> Self {
        MintSource::Create {
            decimals: MINT_DECIMALS,
        }
    }
}

/// Instructions that allocate `mint` under the token program and initialize it.
pub fn create_mint_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    lamports: u64,
    decimals: u8,
) -> Result<Vec<Instruction>> {
    let create = system_instruction::create_account(
        payer,
        mint,
        lamports,
        Mint::LEN as u64,
        &spl_token::id(),
    );
    let initialize = spl_token::instruction::initialize_mint2(
        &spl_token::id(),
        mint,
        payer,
        None,
        decimals,
    )
    .map_err(|err| InitializerError::MintSetup(err.to_string()))?;

    Ok(vec![create, initialize])
}

/// Fresh keypair for a mint about to be created.
pub fn new_mint_keypair() -> (Keypair, Pubkey) {
    let keypair = Keypair::new();
    let pubkey = keypair.pubkey();
    (keypair, pubkey)
}
