use log::{debug, info};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};

use crate::error::{Result, VerificationError};
use crate::initializer::fetch_config;
use crate::instruction::{
    complete_class, create_class, report_bug, CompleteClassAccounts, CompleteClassArgs,
    CreateClassAccounts, CreateClassArgs, ReportBugAccounts, ReportBugArgs,
};
use crate::ledger::{fetch_program_account, sign_and_send, Ledger};
use crate::pda::{
    derive_class_address, derive_completion_address, derive_config_address, derive_report_address,
};
use crate::state::{ClassAccount, CompletionAccount, ReportAccount};

/// Sends the class instructions of an initialized program.
///
/// `complete_class` and `report_bug` are restricted to the config owner.
/// The client checks the payer against the stored owner before sending, so
/// a wrong keypair fails without paying a fee.
pub struct ClassroomClient<L> {
    ledger: L,
    payer: Keypair,
    program_id: Pubkey,
}

impl<L: Ledger> ClassroomClient<L> {
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

    /// Create the class PDA for `args.class_id`. Returns its address.
    pub fn create_class(&self, args: &CreateClassArgs) -> Result<(Pubkey, Signature)> {
        args.validate()?;
        let (class, _) = derive_class_address(&self.program_id, &args.class_id)?;

        let accounts = CreateClassAccounts::new(class, self.payer.pubkey());
        let ix = create_class(&self.program_id, &accounts, args);
        debug!("create_class {} at {}", args.class_id, class);

        let signature = sign_and_send(&self.ledger, &self.payer, &[ix], &[&self.payer])?;
        info!("create_class tx: {}", signature);
        Ok((class, signature))
    }

    /// Record `student`'s result for `class`. Returns the completion address.
    pub fn complete_class(
        &self,
        class: &Pubkey,
        student: &Pubkey,
        args: &CompleteClassArgs,
    ) -> Result<(Pubkey, Signature)> {
        args.validate()?;
        let config = self.require_config_owner()?;
        let (completion, _) = derive_completion_address(&self.program_id, class, student)?;

        let accounts =
            CompleteClassAccounts::new(config, self.payer.pubkey(), *class, completion, *student);
        let ix = complete_class(&self.program_id, &accounts, args);

        let signature = sign_and_send(&self.ledger, &self.payer, &[ix], &[&self.payer])?;
        info!("complete_class tx: {} (student {})", signature, student);
        Ok((completion, signature))
    }

    /// File a report against `class` on behalf of `args.user_address`.
    pub fn report_bug(&self, class: &Pubkey, args: &ReportBugArgs) -> Result<(Pubkey, Signature)> {
        args.validate()?;
        let config = self.require_config_owner()?;
        let (report, _) =
            derive_report_address(&self.program_id, class, &args.report_id, &args.user_address)?;

        let accounts = ReportBugAccounts::new(config, self.payer.pubkey(), *class, report);
        let ix = report_bug(&self.program_id, &accounts, args);

        let signature = sign_and_send(&self.ledger, &self.payer, &[ix], &[&self.payer])?;
        info!("report_bug tx: {} (report {})", signature, args.report_id);
        Ok((report, signature))
    }

    pub fn fetch_class(&self, class: &Pubkey) -> Result<ClassAccount> {
        fetch_program_account(&self.ledger, &self.program_id, class)
    }

    pub fn fetch_completion(&self, completion: &Pubkey) -> Result<CompletionAccount> {
        fetch_program_account(&self.ledger, &self.program_id, completion)
    }

    pub fn fetch_report(&self, report: &Pubkey) -> Result<ReportAccount> {
        fetch_program_account(&self.ledger, &self.program_id, report)
    }

    // Returns the config PDA once the payer is confirmed as its owner.
    fn require_config_owner(&self) -> Result<Pubkey> {
        let config = derive_config_address(&self.program_id)?;
        let record = fetch_config(&self.ledger, &self.program_id, &config)?;
        if record.owner != self.payer.pubkey() {
            return Err(VerificationError::NotConfigOwner {
                owner: record.owner,
                signer: self.payer.pubkey(),
            }
            .into());
        }
        Ok(config.address)
    }
}
