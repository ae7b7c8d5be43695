use anchor_lang::prelude::AnchorDeserialize;
use anchor_lang::Discriminator;
use solana_client::{client_error::ClientError, rpc_client::RpcClient};
use solana_sdk::{
    account::Account,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::error::{Result, RpcError, VerificationError};
use crate::state::decode_account;

/// The calls the initializer makes against a cluster.
///
/// Every method is a blocking round-trip; implementations surface failures
/// as [`RpcError`] and never retry.
pub trait Ledger {
    fn latest_blockhash(&self) -> Result<Hash, RpcError>;

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, RpcError>;

    /// Submit a signed transaction and wait for confirmation.
    fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, RpcError>;

    /// `Ok(None)` when the account does not exist.
    fn account(&self, address: &Pubkey) -> Result<Option<Account>, RpcError>;
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        match err.get_transaction_error() {
            Some(tx_err) => RpcError::TransactionFailed(tx_err),
            None => RpcError::Transport(err.to_string()),
        }
    }
}

impl Ledger for RpcClient {
    fn latest_blockhash(&self) -> Result<Hash, RpcError> {
        Ok(self.get_latest_blockhash()?)
    }

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, RpcError> {
        Ok(self.get_minimum_balance_for_rent_exemption(data_len)?)
    }

    fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        Ok(self.send_and_confirm_transaction(transaction)?)
    }

    fn account(&self, address: &Pubkey) -> Result<Option<Account>, RpcError> {
        Ok(self
            .get_account_with_commitment(address, self.commitment())?
            .value)
    }
}

impl<L: Ledger + ?Sized> Ledger for &L {
    fn latest_blockhash(&self) -> Result<Hash, RpcError> {
        (**self).latest_blockhash()
    }

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, RpcError> {
        (**self).minimum_balance_for_rent_exemption(data_len)
    }

    fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        (**self).send_and_confirm(transaction)
    }

    fn account(&self, address: &Pubkey) -> Result<Option<Account>, RpcError> {
        (**self).account(address)
    }
}

/// Sign `instructions` with `payer` as fee payer plus any extra signers,
/// then submit and wait for confirmation.
pub fn sign_and_send<L: Ledger + ?Sized>(
    ledger: &L,
    payer: &Keypair,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<Signature> {
    let blockhash = ledger.latest_blockhash()?;
    let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
    transaction.try_sign(signers, blockhash)?;
    Ok(ledger.send_and_confirm(&transaction)?)
}

/// Fetch an account that must exist and belong to `program_id`.
pub fn fetch_owned_account<L: Ledger + ?Sized>(
    ledger: &L,
    program_id: &Pubkey,
    address: &Pubkey,
) -> Result<Account> {
    let account = ledger
        .account(address)?
        .ok_or(VerificationError::AccountMissing(*address))?;

    if account.owner != *program_id {
        return Err(VerificationError::WrongProgramOwner {
            expected: *program_id,
            actual: account.owner,
        }
        .into());
    }
    Ok(account)
}

/// [`fetch_owned_account`] followed by Anchor decoding. Needs no signer.
pub fn fetch_program_account<T, L>(ledger: &L, program_id: &Pubkey, address: &Pubkey) -> Result<T>
where
    T: AnchorDeserialize + Discriminator,
    L: Ledger + ?Sized,
{
    let account = fetch_owned_account(ledger, program_id, address)?;
    Ok(decode_account(&account.data)?)
}
