use solana_sdk::pubkey::Pubkey;

use crate::error::DerivationError;

/// Seed of the singleton config account: `seeds = [b"config"]`.
pub const CONFIG_SEED: &[u8] = b"config";
/// `seeds = [b"class", class_id]`
pub const CLASS_SEED: &[u8] = b"class";
/// `seeds = [b"completion", class, student]`
pub const COMPLETION_SEED: &[u8] = b"completion";
/// `seeds = [b"report", class, report_id, user]`
pub const REPORT_SEED: &[u8] = b"report";

/// The config PDA together with the canonical bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Derive the config PDA for `program_id`.
///
/// Bumps are tried from 255 downwards and the first one whose
/// `sha256(seeds || bump || program_id || "ProgramDerivedAddress")` lands
/// off the ed25519 curve wins, so any client using the standard scheme gets
/// the same bytes.
pub fn derive_config_address(program_id: &Pubkey) -> Result<ConfigAddress, DerivationError> {
    let (address, bump) = find(CONFIG_SEED, &[], program_id)?;
    Ok(ConfigAddress { address, bump })
}

/// Class PDA. A seed holds at most 32 bytes, so longer class ids fail here.
pub fn derive_class_address(
    program_id: &Pubkey,
    class_id: &str,
) -> Result<(Pubkey, u8), DerivationError> {
    find(CLASS_SEED, &[class_id.as_bytes()], program_id)
}

pub fn derive_completion_address(
    program_id: &Pubkey,
    class: &Pubkey,
    student: &Pubkey,
) -> Result<(Pubkey, u8), DerivationError> {
    find(COMPLETION_SEED, &[class.as_ref(), student.as_ref()], program_id)
}

pub fn derive_report_address(
    program_id: &Pubkey,
    class: &Pubkey,
    report_id: &str,
    user: &Pubkey,
) -> Result<(Pubkey, u8), DerivationError> {
    find(
        REPORT_SEED,
        &[class.as_ref(), report_id.as_bytes(), user.as_ref()],
        program_id,
    )
}

fn find(
    prefix: &'static [u8],
    rest: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), DerivationError> {
    let mut seeds = Vec::with_capacity(rest.len() + 1);
    seeds.push(prefix);
    seeds.extend_from_slice(rest);

    Pubkey::try_find_program_address(&seeds, program_id).ok_or(DerivationError {
        seed: prefix,
        program_id: *program_id,
    })
}
