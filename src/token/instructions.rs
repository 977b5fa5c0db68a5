//! Mint instruction planning and ordering validation
//!
//! A Token-2022 mint with extensions has to be assembled in one transaction
//! in a fixed order:
//! 1. `create_account` sized for the base mint plus every extension
//! 2. one initialize instruction per extension
//! 3. `initialize_mint`
//!
//! The program refuses to initialize an extension on an already
//! initialized mint, so the order is checked before anything is sent.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction, system_program};
use spl_token_2022::{
    extension::ExtensionType,
    instruction::{self as token_instruction, TokenInstruction},
    state::Mint,
};

use crate::errors::DemoError;

/// Extensions enabled on the walkthrough mint
pub const MINT_EXTENSIONS: [ExtensionType; 1] = [ExtensionType::PermanentDelegate];

/// Plan of instructions with the extensions it sizes the mint for
#[derive(Debug, Clone)]
pub struct InstructionPlan {
    /// The ordered list of instructions for the transaction
    pub instructions: Vec<Instruction>,

    /// Extensions the mint account was sized for
    pub extensions: Vec<ExtensionType>,
}

impl InstructionPlan {
    pub fn new(instructions: Vec<Instruction>, extensions: Vec<ExtensionType>) -> Self {
        Self {
            instructions,
            extensions,
        }
    }
}

/// Inputs for [`plan_mint_instructions`]
#[derive(Debug, Clone)]
pub struct MintPlanParams {
    pub payer: Pubkey,
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    pub permanent_delegate: Pubkey,
    pub decimals: u8,
    /// Account size, from [`mint_account_len`]
    pub space: usize,
    /// Rent-exempt balance for `space`
    pub lamports: u64,
}

/// Size of a mint account carrying `extensions`
pub fn mint_account_len(extensions: &[ExtensionType]) -> Result<usize, DemoError> {
    ExtensionType::try_calculate_account_len::<Mint>(extensions)
        .map_err(|e| DemoError::instruction_failed("mint_account_len", e))
}

/// Build the create / extension / initialize sequence for a mint with a
/// permanent delegate. No freeze authority is set.
pub fn plan_mint_instructions(params: &MintPlanParams) -> Result<InstructionPlan, DemoError> {
    let program_id = spl_token_2022::id();
    let mut instructions = Vec::with_capacity(3);

    instructions.push(system_instruction::create_account(
        &params.payer,
        &params.mint,
        params.lamports,
        params.space as u64,
        &program_id,
    ));

    instructions.push(
        token_instruction::initialize_permanent_delegate(
            &program_id,
            &params.mint,
            &params.permanent_delegate,
        )
        .map_err(|e| DemoError::instruction_failed("initialize_permanent_delegate", e))?,
    );

    instructions.push(
        token_instruction::initialize_mint(
            &program_id,
            &params.mint,
            &params.mint_authority,
            None,
            params.decimals,
        )
        .map_err(|e| DemoError::instruction_failed("initialize_mint", e))?,
    );

    sanity_check_mint_ix_order(&instructions)?;

    Ok(InstructionPlan::new(instructions, MINT_EXTENSIONS.to_vec()))
}

/// Validate the mint creation order.
///
/// # Errors
///
/// Returns `DemoError::InvalidInstructionOrder` if:
/// - Instruction list is empty
/// - The first instruction is not a system program instruction
/// - The permanent delegate or mint initialization is missing or duplicated
/// - The mint is initialized before its extension
pub fn sanity_check_mint_ix_order(instructions: &[Instruction]) -> Result<(), DemoError> {
    let first = instructions
        .first()
        .ok_or_else(|| DemoError::invalid_order("Instruction list is empty"))?;
    if first.program_id != system_program::id() {
        return Err(DemoError::invalid_order(
            "create_account must be the first instruction",
        ));
    }

    let token_program = spl_token_2022::id();
    let mut extension_init = None;
    let mut mint_init = None;

    for (index, ix) in instructions.iter().enumerate().skip(1) {
        if ix.program_id != token_program {
            continue;
        }
        match TokenInstruction::unpack(&ix.data) {
            Ok(TokenInstruction::InitializePermanentDelegate { .. }) => {
                if extension_init.replace(index).is_some() {
                    return Err(DemoError::invalid_order(
                        "Multiple InitializePermanentDelegate instructions",
                    ));
                }
            }
            Ok(TokenInstruction::InitializeMint { .. })
            | Ok(TokenInstruction::InitializeMint2 { .. }) => {
                if mint_init.replace(index).is_some() {
                    return Err(DemoError::invalid_order("Multiple InitializeMint instructions"));
                }
            }
            _ => {}
        }
    }

    match (extension_init, mint_init) {
        (Some(ext), Some(mint)) if ext < mint => Ok(()),
        (Some(ext), Some(mint)) => Err(DemoError::invalid_order(format!(
            "InitializePermanentDelegate at index {} must precede InitializeMint at index {}",
            ext, mint
        ))),
        (None, _) => Err(DemoError::invalid_order("Missing InitializePermanentDelegate")),
        (_, None) => Err(DemoError::invalid_order("Missing InitializeMint")),
    }
}
