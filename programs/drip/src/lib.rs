/// Drip: dollar-cost-averaging vaults for SPL tokens.
///
/// Depositors commit token A to a vault for a number of periods; each period
/// anyone may trigger a drip that swaps the vault's pooled slice of token A
/// into token B through a whitelisted venue, and positions withdraw their
/// share of token B priced off the vault's cumulative TWAP.
///
/// 19 instructions:
///   init_vault_proto_config    create a schedule/fee template
///   init_vault                 create a vault for a token pair (admin)
///   init_vault_period          create the next period ledger entry
///   init_oracle_config         create an external price reference
///   update_oracle_config       replace an oracle config (update authority)
///   deposit                    open a position, mint its token
///   deposit_with_metadata      deposit + Metaplex metadata on the token
///   drip_spl_token_swap        drip through an SPL token-swap pool
///   drip_orca_whirlpool        drip through an Orca whirlpool
///   withdraw_b                 withdraw earned token B
///   close_position             settle, refund undripped token A, burn token (holder or admin)
///   set_vault_swap_whitelist   replace the venue whitelist (admin)
///   set_vault_max_slippage_bps          (admin)
///   set_vault_max_price_deviation_bps   (admin)
///   set_vault_oracle_config    attach or detach an oracle config (admin)
///   admin_withdraw             emergency sweep of a vault token account
///   close_vault                tear down a drained vault (admin)
///   close_vault_period         reclaim a period's rent (admin)
///   close_vault_proto_config   reclaim a proto config's rent (admin)

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;
pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("dripTrkvSyQKvkyWg7oi4jmeEGMA5scSYowHArJ9Vwk");

#[program]
pub mod drip {
    use super::*;

    // ─── Setup ────────────────────────────────────────────────────────────────

    /// Create an immutable granularity + spread template.
    pub fn init_vault_proto_config(
        ctx: Context<InitVaultProtoConfig>,
        params: InitVaultProtoConfigParams,
    ) -> Result<()> {
        init_vault_proto_config::handler(ctx, params)
    }

    /// Create the vault for (token A, token B, proto config). Admin only.
    pub fn init_vault(ctx: Context<InitializeVault>, params: InitializeVaultParams) -> Result<()> {
        init_vault::handler(ctx, params)
    }

    /// Create a period ledger entry. Permissionless.
    pub fn init_vault_period(
        ctx: Context<InitializeVaultPeriod>,
        params: InitVaultPeriodParams,
    ) -> Result<()> {
        init_vault_period::handler(ctx, params)
    }

    pub fn init_oracle_config(ctx: Context<InitOracleConfig>, params: OracleConfigParams) -> Result<()> {
        init_oracle_config::handler(ctx, params)
    }

    pub fn update_oracle_config(
        ctx: Context<UpdateOracleConfig>,
        params: OracleConfigParams,
    ) -> Result<()> {
        update_oracle_config::handler(ctx, params)
    }

    // ─── Positions ────────────────────────────────────────────────────────────

    /// Open a position and mint its single ownership token.
    pub fn deposit(ctx: Context<Deposit>, params: DepositParams) -> Result<()> {
        deposit::handler(ctx, params)
    }

    /// Same as `deposit`, with a Metaplex metadata account on the token.
    pub fn deposit_with_metadata(ctx: Context<DepositWithMetadata>, params: DepositParams) -> Result<()> {
        deposit_with_metadata::handler(ctx, params)
    }

    /// Withdraw token B earned so far, less the withdrawal fee.
    pub fn withdraw_b(ctx: Context<WithdrawB>) -> Result<()> {
        withdraw_b::handler(ctx)
    }

    /// Final settlement: pay out token B, refund undripped token A, burn
    /// the position token.
    pub fn close_position(ctx: Context<ClosePosition>) -> Result<()> {
        close_position::handler(ctx)
    }

    // ─── Drip ─────────────────────────────────────────────────────────────────

    /// Advance the vault one period through an SPL token-swap pool.
    pub fn drip_spl_token_swap(ctx: Context<DripSplTokenSwap>) -> Result<()> {
        drip_spl_token_swap::handler(ctx)
    }

    /// Advance the vault one period through an Orca whirlpool.
    pub fn drip_orca_whirlpool(ctx: Context<DripOrcaWhirlpool>) -> Result<()> {
        drip_orca_whirlpool::handler(ctx)
    }

    // ─── Admin ────────────────────────────────────────────────────────────────

    pub fn set_vault_swap_whitelist(
        ctx: Context<SetVaultSwapWhitelist>,
        params: SetVaultSwapWhitelistParams,
    ) -> Result<()> {
        set_vault_swap_whitelist::handler(ctx, params)
    }

    pub fn set_vault_max_slippage_bps(ctx: Context<SetVaultMaxSlippageBps>, max_slippage_bps: u16) -> Result<()> {
        set_vault_max_slippage_bps::handler(ctx, max_slippage_bps)
    }

    pub fn set_vault_max_price_deviation_bps(
        ctx: Context<SetVaultMaxPriceDeviationBps>,
        max_price_deviation_bps: u16,
    ) -> Result<()> {
        set_vault_max_price_deviation_bps::handler(ctx, max_price_deviation_bps)
    }

    /// Attach an oracle config, or detach when none is passed.
    pub fn set_vault_oracle_config(ctx: Context<SetVaultOracleConfig>) -> Result<()> {
        set_vault_oracle_config::handler(ctx)
    }

    /// Sweep one vault token account to the admin. Skips all accounting.
    pub fn admin_withdraw(ctx: Context<AdminWithdraw>) -> Result<()> {
        admin_withdraw::handler(ctx)
    }

    pub fn close_vault(ctx: Context<CloseVault>) -> Result<()> {
        close_vault::handler(ctx)
    }

    pub fn close_vault_period(ctx: Context<CloseVaultPeriod>) -> Result<()> {
        close_vault_period::handler(ctx)
    }

    pub fn close_vault_proto_config(ctx: Context<CloseVaultProtoConfig>) -> Result<()> {
        close_vault_proto_config::handler(ctx)
    }
}
