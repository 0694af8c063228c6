//! Low-level Anchor instruction builders.
//!
//! Each function constructs a [`solana_sdk::instruction::Instruction`] ready
//! for signing and submission.  Account order mirrors the Anchor
//! `#[derive(Accounts)]` structs in the on-chain program exactly; nested
//! account structs are flattened in place and an omitted optional account is
//! passed as the program id.
//!
//! Anchor instruction discriminators: `sha256("global:{name}")[..8]`.
//! Anchor account discriminators:    `sha256("account:{TypeName}")[..8]`.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey,
    pubkey::Pubkey,
    system_program, sysvar,
};

// ─── Well-known program IDs ───────────────────────────────────────────────────

pub const SPL_TOKEN_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const ATA_PROGRAM_ID: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
pub const SPL_TOKEN_SWAP_PROGRAM_ID: Pubkey = pubkey!("SwapsVeCiPHMUAtzQWZw7RjsKjgCjhwU55QGu4U1Szw");
pub const WHIRLPOOL_PROGRAM_ID: Pubkey = pubkey!("whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc");

// ─── PDA seeds (mirrors programs/drip/src/constants.rs) ──────────────────────

pub const VAULT_SEED:        &[u8] = b"drip-v1";
pub const VAULT_PERIOD_SEED: &[u8] = b"vault_period";
pub const POSITION_SEED:     &[u8] = b"user_position";

// ─── PDA derivation helpers ───────────────────────────────────────────────────

/// Derive the vault PDA for a (token A, token B, proto config) triple.
pub fn derive_vault(
    token_a_mint: &Pubkey,
    token_b_mint: &Pubkey,
    proto_config: &Pubkey,
    program_id:   &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_SEED, token_a_mint.as_ref(), token_b_mint.as_ref(), proto_config.as_ref()],
        program_id,
    )
}

/// Derive a vault period PDA. The period id is seeded as its decimal string.
pub fn derive_vault_period(vault: &Pubkey, period_id: u64, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_PERIOD_SEED, vault.as_ref(), period_id.to_string().as_bytes()],
        program_id,
    )
}

/// Derive the position PDA owned by a position token mint.
pub fn derive_position(position_mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POSITION_SEED, position_mint.as_ref()], program_id)
}

/// Derive the Associated Token Account for a wallet + mint.
pub fn derive_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), SPL_TOKEN_ID.as_ref(), mint.as_ref()],
        &ATA_PROGRAM_ID,
    )
    .0
}

/// Derive the Metaplex metadata account of a mint.
pub fn derive_metadata(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[b"metadata", TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .0
}

// ─── Discriminator ────────────────────────────────────────────────────────────

pub(crate) fn disc(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let h = solana_sdk::hash::hash(preimage.as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&h.to_bytes()[..8]);
    out
}

fn optional(account: Option<Pubkey>, program_id: &Pubkey, writable: bool) -> AccountMeta {
    match account {
        Some(key) if writable => AccountMeta::new(key, false),
        Some(key) => AccountMeta::new_readonly(key, false),
        None => AccountMeta::new_readonly(*program_id, false),
    }
}

fn push_pubkeys(data: &mut Vec<u8>, keys: &[Pubkey]) {
    data.extend_from_slice(&(keys.len() as u32).to_le_bytes());
    for key in keys {
        data.extend_from_slice(key.as_ref());
    }
}

// ─── Setup ────────────────────────────────────────────────────────────────────

/// Build the `init_vault_proto_config` instruction.
///
/// `proto_config` must be a fresh keypair and sign the transaction.
#[allow(clippy::too_many_arguments)]
pub fn init_vault_proto_config_ix(
    program_id:                  &Pubkey,
    creator:                     &Pubkey,
    proto_config:                &Pubkey,
    granularity:                 i64,
    token_a_drip_trigger_spread: u16,
    token_b_withdrawal_spread:   u16,
    token_b_referral_spread:     u16,
    admin:                       &Pubkey,
) -> Instruction {
    let mut data = disc("init_vault_proto_config").to_vec();
    data.extend_from_slice(&granularity.to_le_bytes());
    data.extend_from_slice(&token_a_drip_trigger_spread.to_le_bytes());
    data.extend_from_slice(&token_b_withdrawal_spread.to_le_bytes());
    data.extend_from_slice(&token_b_referral_spread.to_le_bytes());
    data.extend_from_slice(admin.as_ref());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*creator,      true),   // mut + signer
            AccountMeta::new(*proto_config, true),   // mut + signer (init)
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data,
    }
}

/// Build the `init_vault` instruction. The vault's token accounts are the
/// vault PDA's associated token accounts. `admin` must be the proto config's.
#[allow(clippy::too_many_arguments)]
pub fn init_vault_ix(
    program_id:              &Pubkey,
    admin:                   &Pubkey,
    proto_config:            &Pubkey,
    token_a_mint:            &Pubkey,
    token_b_mint:            &Pubkey,
    treasury_token_b:        &Pubkey,
    whitelisted_swaps:       &[Pubkey],
    max_slippage_bps:        u16,
    max_price_deviation_bps: u16,
) -> Instruction {
    let (vault, _) = derive_vault(token_a_mint, token_b_mint, proto_config, program_id);

    let mut data = disc("init_vault").to_vec();
    push_pubkeys(&mut data, whitelisted_swaps);
    data.extend_from_slice(&max_slippage_bps.to_le_bytes());
    data.extend_from_slice(&max_price_deviation_bps.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin,                          true),   // mut + signer
            AccountMeta::new(vault,                           false),  // mut PDA (init)
            AccountMeta::new_readonly(*proto_config,          false),
            AccountMeta::new_readonly(*token_a_mint,          false),
            AccountMeta::new_readonly(*token_b_mint,          false),
            AccountMeta::new(derive_ata(&vault, token_a_mint), false), // mut ATA (init)
            AccountMeta::new(derive_ata(&vault, token_b_mint), false), // mut ATA (init)
            AccountMeta::new_readonly(*treasury_token_b,      false),
            AccountMeta::new_readonly(SPL_TOKEN_ID,           false),
            AccountMeta::new_readonly(ATA_PROGRAM_ID,         false),
            AccountMeta::new_readonly(system_program::ID,     false),
            AccountMeta::new_readonly(sysvar::rent::ID,       false),
        ],
        data,
    }
}

/// Build the `init_vault_period` instruction. Permissionless.
pub fn init_vault_period_ix(
    program_id: &Pubkey,
    payer:      &Pubkey,
    vault:      &Pubkey,
    period_id:  u64,
) -> Instruction {
    let (vault_period, _) = derive_vault_period(vault, period_id, program_id);

    let mut data = disc("init_vault_period").to_vec();
    data.extend_from_slice(&period_id.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer,              true),   // mut + signer
            AccountMeta::new_readonly(*vault,     false),
            AccountMeta::new(vault_period,        false),  // mut PDA (init)
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data,
    }
}

/// Price accounts referenced by an oracle config.
#[derive(Debug, Clone, Copy)]
pub struct OracleConfigAccounts {
    pub token_a_mint:  Pubkey,
    pub token_a_price: Pubkey,
    pub token_b_mint:  Pubkey,
    pub token_b_price: Pubkey,
}

fn oracle_config_data(name: &str, enabled: bool, source: u8, update_authority: &Pubkey) -> Vec<u8> {
    let mut data = disc(name).to_vec();
    data.push(enabled as u8);
    data.push(source);
    data.extend_from_slice(update_authority.as_ref());
    data
}

/// Build the `init_oracle_config` instruction. `oracle_config` must be a
/// fresh keypair and sign the transaction.
pub fn init_oracle_config_ix(
    program_id:       &Pubkey,
    creator:          &Pubkey,
    oracle_config:    &Pubkey,
    prices:           &OracleConfigAccounts,
    enabled:          bool,
    source:           u8,
    update_authority: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*creator,       true),   // mut + signer
            AccountMeta::new(*oracle_config, true),   // mut + signer (init)
            AccountMeta::new_readonly(prices.token_a_mint,  false),
            AccountMeta::new_readonly(prices.token_a_price, false),
            AccountMeta::new_readonly(prices.token_b_mint,  false),
            AccountMeta::new_readonly(prices.token_b_price, false),
            AccountMeta::new_readonly(system_program::ID,   false),
        ],
        data: oracle_config_data("init_oracle_config", enabled, source, update_authority),
    }
}

/// Build the `update_oracle_config` instruction, signed by the current
/// update authority.
pub fn update_oracle_config_ix(
    program_id:           &Pubkey,
    update_authority:     &Pubkey,
    oracle_config:        &Pubkey,
    prices:               &OracleConfigAccounts,
    enabled:              bool,
    source:               u8,
    new_update_authority: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*update_authority, true), // signer
            AccountMeta::new(*oracle_config,             false), // mut
            AccountMeta::new_readonly(prices.token_a_mint,  false),
            AccountMeta::new_readonly(prices.token_a_price, false),
            AccountMeta::new_readonly(prices.token_b_mint,  false),
            AccountMeta::new_readonly(prices.token_b_price, false),
        ],
        data: oracle_config_data("update_oracle_config", enabled, source, new_update_authority),
    }
}

// ─── Positions ────────────────────────────────────────────────────────────────

/// Accounts of a deposit, keyed off the vault and a fresh position mint.
#[derive(Debug, Clone, Copy)]
pub struct DepositAccounts {
    pub depositor:      Pubkey,
    pub vault:          Pubkey,
    pub token_a_mint:   Pubkey,
    /// Vault period at which the position expires
    pub vault_period_end: Pubkey,
    /// Fresh keypair; must sign the transaction
    pub position_mint:  Pubkey,
    /// Token B account credited with part of future withdrawal fees
    pub referrer:       Option<Pubkey>,
}

/// Build `deposit`, or `deposit_with_metadata` when `with_metadata` is set.
pub fn deposit_ix(
    program_id:            &Pubkey,
    accounts:              &DepositAccounts,
    token_a_deposit_amount: u64,
    number_of_swaps:       u64,
    with_metadata:         bool,
) -> Instruction {
    let (position, _) = derive_position(&accounts.position_mint, program_id);
    let name = if with_metadata { "deposit_with_metadata" } else { "deposit" };

    let mut data = disc(name).to_vec();
    data.extend_from_slice(&token_a_deposit_amount.to_le_bytes());
    data.extend_from_slice(&number_of_swaps.to_le_bytes());

    let mut metas = vec![
        AccountMeta::new(accounts.depositor,        true),   // mut + signer
        AccountMeta::new(accounts.vault,            false),  // mut
        AccountMeta::new(accounts.vault_period_end, false),  // mut
        AccountMeta::new(derive_ata(&accounts.vault, &accounts.token_a_mint), false), // mut
        AccountMeta::new(derive_ata(&accounts.depositor, &accounts.token_a_mint), false), // mut
        AccountMeta::new(accounts.position_mint,    true),   // mut + signer (init)
        AccountMeta::new(position,                  false),  // mut PDA (init)
        AccountMeta::new(derive_ata(&accounts.depositor, &accounts.position_mint), false), // mut ATA (init)
        optional(accounts.referrer, program_id, false),
        AccountMeta::new_readonly(SPL_TOKEN_ID,       false),
        AccountMeta::new_readonly(ATA_PROGRAM_ID,     false),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new_readonly(sysvar::rent::ID,   false),
    ];
    if with_metadata {
        metas.push(AccountMeta::new(derive_metadata(&accounts.position_mint), false)); // mut
        metas.push(AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false));
    }

    Instruction { program_id: *program_id, accounts: metas, data }
}

/// Accounts shared by `withdraw_b` and `close_position`.
#[derive(Debug, Clone, Copy)]
pub struct WithdrawAccounts {
    /// Signer: the holder, or the proto config admin closing for them
    pub withdrawer:       Pubkey,
    /// Owner of the position token; payouts go to its token accounts
    pub holder:           Pubkey,
    pub vault:            Pubkey,
    pub proto_config:     Pubkey,
    pub token_a_mint:     Pubkey,
    pub token_b_mint:     Pubkey,
    pub treasury_token_b: Pubkey,
    pub position_mint:    Pubkey,
    /// Window start: the position's `drip_period_id_before_deposit`
    pub vault_period_i:   Pubkey,
    /// Window end: min(vault last drip period, position expiry)
    pub vault_period_j:   Pubkey,
    pub referrer:         Option<Pubkey>,
}

fn withdraw_metas(program_id: &Pubkey, a: &WithdrawAccounts) -> Vec<AccountMeta> {
    let (position, _) = derive_position(&a.position_mint, program_id);
    vec![
        AccountMeta::new(a.withdrawer,              true),   // signer, mut (rent of the closed token account)
        AccountMeta::new(a.vault,                   false),  // mut
        AccountMeta::new_readonly(a.proto_config,   false),
        AccountMeta::new_readonly(a.vault_period_i, false),
        AccountMeta::new_readonly(a.vault_period_j, false),
        AccountMeta::new(position,                  false),  // mut
        AccountMeta::new(derive_ata(&a.holder, &a.position_mint),     false), // mut
        AccountMeta::new(derive_ata(&a.vault, &a.token_b_mint),       false), // mut
        AccountMeta::new(a.treasury_token_b,        false),  // mut
        AccountMeta::new(derive_ata(&a.holder, &a.token_b_mint),      false), // mut
        optional(a.referrer, program_id, true),
        AccountMeta::new_readonly(SPL_TOKEN_ID, false),
    ]
}

/// Build the `withdraw_b` instruction.
pub fn withdraw_b_ix(program_id: &Pubkey, accounts: &WithdrawAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: withdraw_metas(program_id, accounts),
        data: disc("withdraw_b").to_vec(),
    }
}

/// Build the `close_position` instruction. When the withdrawer holds the
/// position token it is burned and its account closed; the proto config
/// admin may instead close on the holder's behalf.
pub fn close_position_ix(
    program_id:          &Pubkey,
    accounts:            &WithdrawAccounts,
    vault_period_expiry: &Pubkey,
) -> Instruction {
    let mut metas = withdraw_metas(program_id, accounts);
    metas.extend([
        AccountMeta::new(*vault_period_expiry, false), // mut
        AccountMeta::new(derive_ata(&accounts.vault, &accounts.token_a_mint), false),      // mut
        AccountMeta::new(derive_ata(&accounts.holder, &accounts.token_a_mint), false),     // mut
        AccountMeta::new(accounts.position_mint, false), // mut (burn)
    ]);
    Instruction { program_id: *program_id, accounts: metas, data: disc("close_position").to_vec() }
}

// ─── Drip ─────────────────────────────────────────────────────────────────────

/// Accounts every drip needs, whatever the venue.
#[derive(Debug, Clone, Copy)]
pub struct DripAccounts {
    pub trigger:             Pubkey,
    pub vault:               Pubkey,
    pub proto_config:        Pubkey,
    pub token_a_mint:        Pubkey,
    pub token_b_mint:        Pubkey,
    pub last_vault_period:   Pubkey,
    pub current_vault_period: Pubkey,
    /// Receives the trigger spread, in token A
    pub drip_fee_token_a:    Pubkey,
    /// Required when the vault references an oracle config
    pub oracle_config:       Option<Pubkey>,
}

fn drip_common_metas(a: &DripAccounts) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(a.trigger,           true),   // signer
        AccountMeta::new(a.vault,                      false),  // mut
        AccountMeta::new_readonly(a.proto_config,      false),
        AccountMeta::new_readonly(a.last_vault_period, false),
        AccountMeta::new(a.current_vault_period,       false),  // mut
        AccountMeta::new(derive_ata(&a.vault, &a.token_a_mint), false), // mut
        AccountMeta::new(derive_ata(&a.vault, &a.token_b_mint), false), // mut
        AccountMeta::new(a.drip_fee_token_a,           false),  // mut
        AccountMeta::new_readonly(SPL_TOKEN_ID,        false),
    ]
}

/// SPL token-swap pool accounts, with the reserves in vault orientation.
#[derive(Debug, Clone, Copy)]
pub struct SplTokenSwapAccounts {
    pub swap:                 Pubkey,
    pub swap_token_mint:      Pubkey,
    pub swap_token_a_account: Pubkey,
    pub swap_token_b_account: Pubkey,
    pub swap_fee_account:     Pubkey,
    pub swap_authority:       Pubkey,
}

/// Build the `drip_spl_token_swap` instruction.
pub fn drip_spl_token_swap_ix(
    program_id: &Pubkey,
    accounts:   &DripAccounts,
    pool:       &SplTokenSwapAccounts,
) -> Instruction {
    let mut metas = drip_common_metas(accounts);
    metas.extend([
        AccountMeta::new_readonly(pool.swap,           false),
        AccountMeta::new(pool.swap_token_mint,         false),  // mut
        AccountMeta::new(pool.swap_token_a_account,    false),  // mut
        AccountMeta::new(pool.swap_token_b_account,    false),  // mut
        AccountMeta::new(pool.swap_fee_account,        false),  // mut
        AccountMeta::new_readonly(pool.swap_authority, false),
        AccountMeta::new_readonly(SPL_TOKEN_SWAP_PROGRAM_ID, false),
        optional(accounts.oracle_config, program_id, false),
    ]);
    Instruction { program_id: *program_id, accounts: metas, data: disc("drip_spl_token_swap").to_vec() }
}

/// Whirlpool accounts for one exact-input swap.
#[derive(Debug, Clone, Copy)]
pub struct WhirlpoolAccounts {
    pub whirlpool:     Pubkey,
    pub token_vault_a: Pubkey,
    pub token_vault_b: Pubkey,
    pub tick_arrays:   [Pubkey; 3],
    pub oracle:        Pubkey,
}

/// Build the `drip_orca_whirlpool` instruction.
pub fn drip_orca_whirlpool_ix(
    program_id: &Pubkey,
    accounts:   &DripAccounts,
    pool:       &WhirlpoolAccounts,
) -> Instruction {
    let mut metas = drip_common_metas(accounts);
    metas.extend([
        AccountMeta::new(pool.whirlpool,      false),  // mut
        AccountMeta::new(pool.token_vault_a,  false),  // mut
        AccountMeta::new(pool.token_vault_b,  false),  // mut
        AccountMeta::new(pool.tick_arrays[0], false),  // mut
        AccountMeta::new(pool.tick_arrays[1], false),  // mut
        AccountMeta::new(pool.tick_arrays[2], false),  // mut
        AccountMeta::new(pool.oracle,         false),  // mut
        AccountMeta::new_readonly(WHIRLPOOL_PROGRAM_ID, false),
        optional(accounts.oracle_config, program_id, false),
    ]);
    Instruction { program_id: *program_id, accounts: metas, data: disc("drip_orca_whirlpool").to_vec() }
}

// ─── Admin ────────────────────────────────────────────────────────────────────

fn vault_admin_metas(admin: &Pubkey, vault: &Pubkey, proto_config: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*admin,                 true),   // mut + signer
        AccountMeta::new(*vault,                 false),  // mut
        AccountMeta::new_readonly(*proto_config, false),
    ]
}

/// Build `set_vault_swap_whitelist`. An empty list lifts the restriction.
pub fn set_vault_swap_whitelist_ix(
    program_id:        &Pubkey,
    admin:             &Pubkey,
    vault:             &Pubkey,
    proto_config:      &Pubkey,
    whitelisted_swaps: &[Pubkey],
) -> Instruction {
    let mut data = disc("set_vault_swap_whitelist").to_vec();
    push_pubkeys(&mut data, whitelisted_swaps);
    Instruction { program_id: *program_id, accounts: vault_admin_metas(admin, vault, proto_config), data }
}

/// Build `set_vault_max_slippage_bps`.
pub fn set_vault_max_slippage_bps_ix(
    program_id:   &Pubkey,
    admin:        &Pubkey,
    vault:        &Pubkey,
    proto_config: &Pubkey,
    bps:          u16,
) -> Instruction {
    let mut data = disc("set_vault_max_slippage_bps").to_vec();
    data.extend_from_slice(&bps.to_le_bytes());
    Instruction { program_id: *program_id, accounts: vault_admin_metas(admin, vault, proto_config), data }
}

/// Build `set_vault_max_price_deviation_bps`.
pub fn set_vault_max_price_deviation_bps_ix(
    program_id:   &Pubkey,
    admin:        &Pubkey,
    vault:        &Pubkey,
    proto_config: &Pubkey,
    bps:          u16,
) -> Instruction {
    let mut data = disc("set_vault_max_price_deviation_bps").to_vec();
    data.extend_from_slice(&bps.to_le_bytes());
    Instruction { program_id: *program_id, accounts: vault_admin_metas(admin, vault, proto_config), data }
}

/// Build `set_vault_oracle_config`; `None` detaches the current config.
pub fn set_vault_oracle_config_ix(
    program_id:    &Pubkey,
    admin:         &Pubkey,
    vault:         &Pubkey,
    proto_config:  &Pubkey,
    oracle_config: Option<Pubkey>,
) -> Instruction {
    let mut metas = vault_admin_metas(admin, vault, proto_config);
    metas.push(optional(oracle_config, program_id, false));
    Instruction { program_id: *program_id, accounts: metas, data: disc("set_vault_oracle_config").to_vec() }
}

/// Build `admin_withdraw`: sweep one vault token account to the admin's ATA.
pub fn admin_withdraw_ix(
    program_id:   &Pubkey,
    admin:        &Pubkey,
    vault:        &Pubkey,
    proto_config: &Pubkey,
    mint:         &Pubkey,
) -> Instruction {
    let mut metas = vault_admin_metas(admin, vault, proto_config);
    metas.extend([
        AccountMeta::new(derive_ata(vault, mint), false), // mut
        AccountMeta::new(derive_ata(admin, mint), false), // mut
        AccountMeta::new_readonly(SPL_TOKEN_ID,   false),
    ]);
    Instruction { program_id: *program_id, accounts: metas, data: disc("admin_withdraw").to_vec() }
}

/// Build `close_vault`. Residual balances go to the admin's ATAs.
pub fn close_vault_ix(
    program_id:   &Pubkey,
    admin:        &Pubkey,
    vault:        &Pubkey,
    proto_config: &Pubkey,
    token_a_mint: &Pubkey,
    token_b_mint: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin,                          true),   // mut + signer
            AccountMeta::new(*vault,                          false),  // mut (close)
            AccountMeta::new_readonly(*proto_config,          false),
            AccountMeta::new(derive_ata(vault, token_a_mint), false),  // mut (close)
            AccountMeta::new(derive_ata(vault, token_b_mint), false),  // mut (close)
            AccountMeta::new(derive_ata(admin, token_a_mint), false),  // mut
            AccountMeta::new(derive_ata(admin, token_b_mint), false),  // mut
            AccountMeta::new_readonly(SPL_TOKEN_ID,           false),
        ],
        data: disc("close_vault").to_vec(),
    }
}

/// Build `close_vault_period`.
pub fn close_vault_period_ix(
    program_id:   &Pubkey,
    admin:        &Pubkey,
    vault:        &Pubkey,
    proto_config: &Pubkey,
    vault_period: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin,                 true),   // mut + signer
            AccountMeta::new_readonly(*vault,        false),
            AccountMeta::new_readonly(*proto_config, false),
            AccountMeta::new(*vault_period,          false),  // mut (close)
        ],
        data: disc("close_vault_period").to_vec(),
    }
}

/// Build `close_vault_proto_config`.
pub fn close_vault_proto_config_ix(
    program_id:   &Pubkey,
    admin:        &Pubkey,
    proto_config: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin,        true),   // mut + signer
            AccountMeta::new(*proto_config, false),  // mut (close)
        ],
        data: disc("close_vault_proto_config").to_vec(),
    }
}
