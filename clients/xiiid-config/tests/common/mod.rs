#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anchor_lang::{prelude::AnchorSerialize, Discriminator};
use solana_program::{program_option::COption, program_pack::Pack};
use solana_sdk::{
    account::Account,
    hash::Hash,
    instruction::InstructionError,
    pubkey,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use solana_system_interface::program as system_program;
use spl_token::{instruction::TokenInstruction, state::Mint};
use xiiid_config::{
    derive_class_address, derive_completion_address, derive_config_address,
    derive_report_address,
    instruction::{
        try_from_instruction_data, CompleteClassArgs, CreateClassArgs, InitializeConfigArgs,
        ReportBugArgs,
    },
    state::decode_account,
    ClassAccount, CompletionAccount, ConfigRecord, Ledger, ReportAccount, RpcError,
};

pub const PROGRAM_ID: Pubkey = pubkey!("J6fKvYJvvaZ1RvYYBMy7L7jpUaLkWUzzZXKEfr5UfBrr");
pub const FIXED_MINT: Pubkey = pubkey!("5Cb6V6EJyvEbfGBXZ9MmUqiNS3KrVnjudnBBL3KJLqu2");

/// SystemError::AccountAlreadyInUse
pub const ACCOUNT_ALREADY_IN_USE: u32 = 0;
/// Anchor ConstraintSeeds
pub const CONSTRAINT_SEEDS: u32 = 2006;
/// Anchor ConstraintAddress, raised by `address = config.owner`.
pub const CONSTRAINT_ADDRESS: u32 = 2012;
/// Anchor AccountOwnedByWrongProgram
pub const ACCOUNT_OWNED_BY_WRONG_PROGRAM: u32 = 3007;
/// Anchor AccountNotInitialized
pub const ACCOUNT_NOT_INITIALIZED: u32 = 3012;
/// Program-defined rejection used when `reject_zero_cap` is on.
pub const INVALID_CAP: u32 = 6000;

pub fn rent_exempt(data_len: usize) -> u64 {
    (128 + data_len as u64) * 3_480 * 2
}

/// Anchor account bytes: discriminator, then the borsh body.
pub fn encode_account<T: AnchorSerialize + Discriminator>(value: &T) -> Vec<u8> {
    let mut data = T::DISCRIMINATOR.to_vec();
    value.serialize(&mut data).unwrap();
    data
}

fn program_account(owner: Pubkey, data: Vec<u8>) -> Account {
    Account {
        lamports: rent_exempt(data.len()),
        data,
        owner,
        executable: false,
        rent_epoch: 0,
    }
}

/// In-memory cluster that runs the instructions the client emits: system
/// `CreateAccount`, token `InitializeMint2` and the program's
/// `initialize_config`, `create_class`, `complete_class` and `report_bug`.
/// Transactions apply atomically.
pub struct MockLedger {
    program_id: Pubkey,
    blockhash: Hash,
    accounts: RefCell<HashMap<Pubkey, Account>>,
    offline: Cell<bool>,
    reject_zero_cap: bool,
    sent: Cell<usize>,
}

impl MockLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            blockhash: Hash::new_unique(),
            accounts: RefCell::new(HashMap::new()),
            offline: Cell::new(false),
            reject_zero_cap: false,
            sent: Cell::new(0),
        }
    }

    /// Seed an initialized mint owned by the token program.
    pub fn with_mint(self, mint: Pubkey, authority: Pubkey) -> Self {
        let state = Mint {
            mint_authority: COption::Some(authority),
            supply: 0,
            decimals: 9,
            is_initialized: true,
            freeze_authority: COption::None,
        };
        let mut data = vec![0u8; Mint::LEN];
        Mint::pack(state, &mut data).unwrap();
        self.set_account(
            mint,
            Account {
                lamports: rent_exempt(Mint::LEN),
                data,
                owner: spl_token::id(),
                executable: false,
                rent_epoch: 0,
            },
        );
        self
    }

    pub fn rejecting_zero_cap(mut self) -> Self {
        self.reject_zero_cap = true;
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.accounts.borrow_mut().insert(address, account);
    }

    pub fn get(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.borrow().get(address).cloned()
    }

    pub fn mint_state(&self, address: &Pubkey) -> Mint {
        let account = self.get(address).expect("mint account exists");
        Mint::unpack(&account.data).expect("valid mint")
    }

    pub fn transactions_sent(&self) -> usize {
        self.sent.get()
    }

    fn check_online(&self) -> Result<(), RpcError> {
        if self.offline.get() {
            return Err(RpcError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn execute(&self, tx: &Transaction) -> Result<(), TransactionError> {
        tx.verify()?;
        if tx.message.recent_blockhash != self.blockhash {
            return Err(TransactionError::BlockhashNotFound);
        }

        let mut accounts = self.accounts.borrow().clone();
        for (index, ix) in tx.message.instructions.iter().enumerate() {
            let keys: Vec<Pubkey> = ix
                .accounts
                .iter()
                .map(|&i| tx.message.account_keys[i as usize])
                .collect();
            let signers: Vec<bool> = ix
                .accounts
                .iter()
                .map(|&i| tx.message.is_signer(i as usize))
                .collect();
            let program_id = tx.message.account_keys[ix.program_id_index as usize];

            let result = if program_id == system_program::ID {
                create_account(&mut accounts, &keys, &signers, &ix.data)
            } else if program_id == spl_token::id() {
                initialize_mint2(&mut accounts, &keys, &ix.data)
            } else if program_id == self.program_id {
                self.dispatch(&mut accounts, &keys, &signers, &ix.data)
            } else {
                Err(InstructionError::UnsupportedProgramId)
            };
            result.map_err(|err| TransactionError::InstructionError(index as u8, err))?;
        }

        *self.accounts.borrow_mut() = accounts;
        Ok(())
    }

    fn dispatch(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        signers: &[bool],
        data: &[u8],
    ) -> Result<(), InstructionError> {
        if data.starts_with(InitializeConfigArgs::DISCRIMINATOR) {
            self.initialize_config(accounts, keys, signers, data)
        } else if data.starts_with(CreateClassArgs::DISCRIMINATOR) {
            self.create_class(accounts, keys, signers, data)
        } else if data.starts_with(CompleteClassArgs::DISCRIMINATOR) {
            self.complete_class(accounts, keys, signers, data)
        } else if data.starts_with(ReportBugArgs::DISCRIMINATOR) {
            self.report_bug(accounts, keys, signers, data)
        } else {
            Err(InstructionError::InvalidInstructionData)
        }
    }

    fn initialize_config(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        signers: &[bool],
        data: &[u8],
    ) -> Result<(), InstructionError> {
        let args = InitializeConfigArgs::try_from_instruction_data(data)
            .ok_or(InstructionError::InvalidInstructionData)?;
        let [config, mint, owner, system] = keys else {
            return Err(InstructionError::NotEnoughAccountKeys);
        };
        if !signers[2] {
            return Err(InstructionError::MissingRequiredSignature);
        }
        if *system != system_program::ID {
            return Err(InstructionError::IncorrectProgramId);
        }

        let derived = derive_config_address(&self.program_id)
            .map_err(|_| InstructionError::InvalidSeeds)?;
        if *config != derived.address {
            return Err(InstructionError::Custom(CONSTRAINT_SEEDS));
        }

        match accounts.get(mint) {
            None => return Err(InstructionError::Custom(ACCOUNT_NOT_INITIALIZED)),
            Some(account) if account.owner != spl_token::id() => {
                return Err(InstructionError::Custom(ACCOUNT_OWNED_BY_WRONG_PROGRAM))
            }
            Some(_) => {}
        }

        if accounts.contains_key(config) {
            return Err(InstructionError::Custom(ACCOUNT_ALREADY_IN_USE));
        }
        if self.reject_zero_cap && args.cap == 0 {
            return Err(InstructionError::Custom(INVALID_CAP));
        }

        let record = ConfigRecord {
            owner: *owner,
            mint: *mint,
            cap: args.cap,
            bump: derived.bump,
        };
        accounts.insert(*config, program_account(self.program_id, encode_account(&record)));
        Ok(())
    }

    fn create_class(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        signers: &[bool],
        data: &[u8],
    ) -> Result<(), InstructionError> {
        let args: CreateClassArgs =
            try_from_instruction_data(data).ok_or(InstructionError::InvalidInstructionData)?;
        let [class, _payer, system] = keys else {
            return Err(InstructionError::NotEnoughAccountKeys);
        };
        if !signers[1] {
            return Err(InstructionError::MissingRequiredSignature);
        }
        if *system != system_program::ID {
            return Err(InstructionError::IncorrectProgramId);
        }

        let (derived, bump) = derive_class_address(&self.program_id, &args.class_id)
            .map_err(|_| InstructionError::InvalidSeeds)?;
        if *class != derived {
            return Err(InstructionError::Custom(CONSTRAINT_SEEDS));
        }
        if accounts.contains_key(class) {
            return Err(InstructionError::Custom(ACCOUNT_ALREADY_IN_USE));
        }

        let record = ClassAccount {
            class_id: args.class_id,
            title: args.title,
            description: args.description,
            category: args.category,
            topic: args.topic,
            difficulty: args.difficulty,
            reward: args.reward,
            question_count: args.question_count,
            time_limit: args.time_limit,
            is_private: args.is_private,
            creator: args.creator_address,
            completion_count: 0,
            bump,
        };
        accounts.insert(*class, program_account(self.program_id, encode_account(&record)));
        Ok(())
    }

    fn complete_class(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        signers: &[bool],
        data: &[u8],
    ) -> Result<(), InstructionError> {
        let args: CompleteClassArgs =
            try_from_instruction_data(data).ok_or(InstructionError::InvalidInstructionData)?;
        let [config, owner, class, completion, student, _system] = keys else {
            return Err(InstructionError::NotEnoughAccountKeys);
        };
        self.check_owner_gate(accounts, config, owner, signers[1], class)?;

        let (derived, bump) = derive_completion_address(&self.program_id, class, student)
            .map_err(|_| InstructionError::InvalidSeeds)?;
        if *completion != derived {
            return Err(InstructionError::Custom(CONSTRAINT_SEEDS));
        }
        if accounts.contains_key(completion) {
            return Err(InstructionError::Custom(ACCOUNT_ALREADY_IN_USE));
        }

        let record = CompletionAccount {
            class_result_id: args.class_result_id,
            title: args.title,
            student: *student,
            score: args.score,
            bump,
        };
        accounts.insert(*completion, program_account(self.program_id, encode_account(&record)));
        Ok(())
    }

    fn report_bug(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        signers: &[bool],
        data: &[u8],
    ) -> Result<(), InstructionError> {
        let args: ReportBugArgs =
            try_from_instruction_data(data).ok_or(InstructionError::InvalidInstructionData)?;
        let [config, owner, class, report, _system] = keys else {
            return Err(InstructionError::NotEnoughAccountKeys);
        };
        self.check_owner_gate(accounts, config, owner, signers[1], class)?;

        let (derived, bump) =
            derive_report_address(&self.program_id, class, &args.report_id, &args.user_address)
                .map_err(|_| InstructionError::InvalidSeeds)?;
        if *report != derived {
            return Err(InstructionError::Custom(CONSTRAINT_SEEDS));
        }
        if accounts.contains_key(report) {
            return Err(InstructionError::Custom(ACCOUNT_ALREADY_IN_USE));
        }

        let record = ReportAccount {
            report_id: args.report_id,
            question_id: args.question_id,
            title: args.title,
            description: args.description,
            category: args.category,
            priority: args.priority,
            user: args.user_address,
            bump,
        };
        accounts.insert(*report, program_account(self.program_id, encode_account(&record)));
        Ok(())
    }

    // `seeds = [b"config"]`, `address = config.owner` and an existing class,
    // checked in the order the program declares its accounts.
    fn check_owner_gate(
        &self,
        accounts: &HashMap<Pubkey, Account>,
        config: &Pubkey,
        owner: &Pubkey,
        owner_signed: bool,
        class: &Pubkey,
    ) -> Result<(), InstructionError> {
        let derived = derive_config_address(&self.program_id)
            .map_err(|_| InstructionError::InvalidSeeds)?;
        if *config != derived.address {
            return Err(InstructionError::Custom(CONSTRAINT_SEEDS));
        }
        let stored = accounts
            .get(config)
            .ok_or(InstructionError::Custom(ACCOUNT_NOT_INITIALIZED))?;
        let record = ConfigRecord::try_from_bytes(&stored.data)
            .map_err(|_| InstructionError::InvalidAccountData)?;

        if !owner_signed {
            return Err(InstructionError::MissingRequiredSignature);
        }
        if *owner != record.owner {
            return Err(InstructionError::Custom(CONSTRAINT_ADDRESS));
        }

        match accounts.get(class) {
            None => Err(InstructionError::Custom(ACCOUNT_NOT_INITIALIZED)),
            Some(account) if account.owner != self.program_id => {
                Err(InstructionError::Custom(ACCOUNT_OWNED_BY_WRONG_PROGRAM))
            }
            Some(account) => decode_account::<ClassAccount>(&account.data)
                .map(|_| ())
                .map_err(|_| InstructionError::InvalidAccountData),
        }
    }
}

// SystemInstruction::CreateAccount: u32 tag 0, lamports, space, owner.
fn create_account(
    accounts: &mut HashMap<Pubkey, Account>,
    keys: &[Pubkey],
    signers: &[bool],
    data: &[u8],
) -> Result<(), InstructionError> {
    if data.len() != 52 || data[..4] != [0, 0, 0, 0] {
        return Err(InstructionError::InvalidInstructionData);
    }
    let [_, to] = keys else {
        return Err(InstructionError::NotEnoughAccountKeys);
    };
    if !signers.iter().all(|s| *s) {
        return Err(InstructionError::MissingRequiredSignature);
    }
    if accounts.contains_key(to) {
        return Err(InstructionError::Custom(ACCOUNT_ALREADY_IN_USE));
    }

    let lamports = u64::from_le_bytes(data[4..12].try_into().unwrap());
    let space = u64::from_le_bytes(data[12..20].try_into().unwrap());
    let owner = Pubkey::new_from_array(data[20..52].try_into().unwrap());
    accounts.insert(
        *to,
        Account {
            lamports,
            data: vec![0u8; space as usize],
            owner,
            executable: false,
            rent_epoch: 0,
        },
    );
    Ok(())
}

fn initialize_mint2(
    accounts: &mut HashMap<Pubkey, Account>,
    keys: &[Pubkey],
    data: &[u8],
) -> Result<(), InstructionError> {
    let TokenInstruction::InitializeMint2 {
        decimals,
        mint_authority,
        freeze_authority,
    } = TokenInstruction::unpack(data).map_err(|_| InstructionError::InvalidInstructionData)?
    else {
        return Err(InstructionError::InvalidInstructionData);
    };
    let mint = keys.first().ok_or(InstructionError::NotEnoughAccountKeys)?;
    let account = accounts
        .get_mut(mint)
        .ok_or(InstructionError::UninitializedAccount)?;
    if account.owner != spl_token::id() {
        return Err(InstructionError::IncorrectProgramId);
    }

    let state = Mint {
        mint_authority: COption::Some(mint_authority),
        supply: 0,
        decimals,
        is_initialized: true,
        freeze_authority,
    };
    Mint::pack(state, &mut account.data).map_err(|_| InstructionError::InvalidAccountData)
}

impl Ledger for MockLedger {
    fn latest_blockhash(&self) -> Result<Hash, RpcError> {
        self.check_online()?;
        Ok(self.blockhash)
    }

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, RpcError> {
        self.check_online()?;
        Ok(rent_exempt(data_len))
    }

    fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        self.check_online()?;
        self.sent.set(self.sent.get() + 1);
        self.execute(transaction)
            .map_err(RpcError::TransactionFailed)?;
        Ok(transaction.signatures[0])
    }

    fn account(&self, address: &Pubkey) -> Result<Option<Account>, RpcError> {
        self.check_online()?;
        Ok(self.get(address))
    }
}
