use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use anchor_lang::{Discriminator, InstructionData};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use solana_system_interface::program as system_program;

use crate::error::InitializerError;

// Field limits the program sizes its accounts for.
pub const MAX_CLASS_ID: usize = 64;
pub const MAX_TITLE: usize = 128;
pub const MAX_DESC: usize = 256;
pub const MAX_CATEGORY: usize = 64;
pub const MAX_TOPIC: usize = 64;
pub const MAX_DIFFICULTY: usize = 32;
pub const MAX_QUESTION_ID: usize = 64;
pub const MAX_PRIORITY: usize = 32;
pub const MAX_CLASS_RESULT_ID: usize = 64;
pub const MAX_REPORT_ID: usize = 64;

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), InitializerError> {
    if value.len() > max {
        return Err(InitializerError::FieldTooLong {
            field,
            max,
            actual: value.len(),
        });
    }
    Ok(())
}

/// Parse instruction data produced by [`InstructionData::data`].
pub fn try_from_instruction_data<T>(data: &[u8]) -> Option<T>
where
    T: Discriminator + AnchorDeserialize,
{
    let body = data.strip_prefix(T::DISCRIMINATOR)?;
    T::try_from_slice(body).ok()
}

// ---------------------------------------------------------------------------
// initialize_config
// ---------------------------------------------------------------------------

/// Arguments of `initialize_config(cap: u128)`.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializeConfigArgs {
    pub cap: u128,
}

impl Discriminator for InitializeConfigArgs {
    // sha256("global:initialize_config")[..8]
    const DISCRIMINATOR: &'static [u8] = &[0xd0, 0x7f, 0x15, 0x01, 0xc2, 0xbe, 0xc4, 0x46];
}

impl InstructionData for InitializeConfigArgs {}

impl InitializeConfigArgs {
    pub fn try_from_instruction_data(data: &[u8]) -> Option<Self> {
        try_from_instruction_data(data)
    }
}

/// Accounts of `initialize_config`, in the order the program declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializeConfigAccounts {
    /// Config PDA, created by the instruction.
    pub config: Pubkey,
    pub mint: Pubkey,
    /// Signer recorded as config owner; pays for the account.
    pub owner: Pubkey,
    pub system_program: Pubkey,
}

impl InitializeConfigAccounts {
    pub fn new(config: Pubkey, mint: Pubkey, owner: Pubkey) -> Self {
        Self {
            config,
            mint,
            owner,
            system_program: system_program::ID,
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.config, false),
            AccountMeta::new_readonly(self.mint, false),
            AccountMeta::new(self.owner, true),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

pub fn initialize_config(
    program_id: &Pubkey,
    accounts: &InitializeConfigAccounts,
    cap: u128,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: InitializeConfigArgs { cap }.data(),
    }
}

// ---------------------------------------------------------------------------
// create_class
// ---------------------------------------------------------------------------

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateClassArgs {
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
    pub creator_address: Pubkey,
}

impl Discriminator for CreateClassArgs {
    // sha256("global:create_class")[..8]
    const DISCRIMINATOR: &'static [u8] = &[0x22, 0x8a, 0xe4, 0x95, 0x42, 0x27, 0x6a, 0xb7];
}

impl InstructionData for CreateClassArgs {}

impl CreateClassArgs {
    /// Reject strings the class account has no room for.
    pub fn validate(&self) -> Result<(), InitializerError> {
        check_len("class_id", &self.class_id, MAX_CLASS_ID)?;
        check_len("title", &self.title, MAX_TITLE)?;
        check_len("description", &self.description, MAX_DESC)?;
        check_len("category", &self.category, MAX_CATEGORY)?;
        check_len("topic", &self.topic, MAX_TOPIC)?;
        check_len("difficulty", &self.difficulty, MAX_DIFFICULTY)
    }
}

/// Accounts of `create_class`. Anyone may pay for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateClassAccounts {
    pub class: Pubkey,
    pub payer: Pubkey,
    pub system_program: Pubkey,
}

impl CreateClassAccounts {
    pub fn new(class: Pubkey, payer: Pubkey) -> Self {
        Self {
            class,
            payer,
            system_program: system_program::ID,
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.class, false),
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

pub fn create_class(
    program_id: &Pubkey,
    accounts: &CreateClassAccounts,
    args: &CreateClassArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: args.data(),
    }
}

// ---------------------------------------------------------------------------
// complete_class
// ---------------------------------------------------------------------------

/// Arguments of `complete_class(class_result_id, title, score)`; borsh lays
/// the three parameters out back to back, same as this struct.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompleteClassArgs {
    pub class_result_id: String,
    pub title: String,
    pub score: u32,
}

impl Discriminator for CompleteClassArgs {
    // sha256("global:complete_class")[..8]
    const DISCRIMINATOR: &'static [u8] = &[0xbb, 0x56, 0x54, 0x6e, 0xef, 0xdc, 0x39, 0x92];
}

impl InstructionData for CompleteClassArgs {}

impl CompleteClassArgs {
    pub fn validate(&self) -> Result<(), InitializerError> {
        check_len("class_result_id", &self.class_result_id, MAX_CLASS_RESULT_ID)?;
        check_len("title", &self.title, MAX_TITLE)
    }
}

/// Accounts of `complete_class`. `owner` must equal `config.owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteClassAccounts {
    pub config: Pubkey,
    pub owner: Pubkey,
    pub class: Pubkey,
    pub completion: Pubkey,
    pub student: Pubkey,
    pub system_program: Pubkey,
}

impl CompleteClassAccounts {
    pub fn new(
        config: Pubkey,
        owner: Pubkey,
        class: Pubkey,
        completion: Pubkey,
        student: Pubkey,
    ) -> Self {
        Self {
            config,
            owner,
            class,
            completion,
            student,
            system_program: system_program::ID,
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.config, false),
            AccountMeta::new(self.owner, true),
            AccountMeta::new_readonly(self.class, false),
            AccountMeta::new(self.completion, false),
            AccountMeta::new_readonly(self.student, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

pub fn complete_class(
    program_id: &Pubkey,
    accounts: &CompleteClassAccounts,
    args: &CompleteClassArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: args.data(),
    }
}

// ---------------------------------------------------------------------------
// report_bug
// ---------------------------------------------------------------------------

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportBugArgs {
    pub report_id: String,
    pub question_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub user_address: Pubkey,
}

impl Discriminator for ReportBugArgs {
    // sha256("global:report_bug")[..8]
    const DISCRIMINATOR: &'static [u8] = &[0x44, 0x82, 0x90, 0x0f, 0xb6, 0x4e, 0x82, 0x4e];
}

impl InstructionData for ReportBugArgs {}

impl ReportBugArgs {
    pub fn validate(&self) -> Result<(), InitializerError> {
        check_len("report_id", &self.report_id, MAX_REPORT_ID)?;
        check_len("question_id", &self.question_id, MAX_QUESTION_ID)?;
        check_len("title", &self.title, MAX_TITLE)?;
        check_len("description", &self.description, MAX_DESC)?;
        check_len("category", &self.category, MAX_CATEGORY)?;
        check_len("priority", &self.priority, MAX_PRIORITY)
    }
}

/// Accounts of `report_bug`. `owner` must equal `config.owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportBugAccounts {
    pub config: Pubkey,
    pub owner: Pubkey,
    pub class: Pubkey,
    pub report: Pubkey,
    pub system_program: Pubkey,
}

impl ReportBugAccounts {
    pub fn new(config: Pubkey, owner: Pubkey, class: Pubkey, report: Pubkey) -> Self {
        Self {
            config,
            owner,
            class,
            report,
            system_program: system_program::ID,
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.config, false),
            AccountMeta::new(self.owner, true),
            AccountMeta::new_readonly(self.class, false),
            AccountMeta::new(self.report, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

pub fn report_bug(
    program_id: &Pubkey,
    accounts: &ReportBugAccounts,
    args: &ReportBugArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: args.data(),
    }
}
