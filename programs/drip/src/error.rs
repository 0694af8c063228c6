use anchor_lang::prelude::*;

#[error_code]
pub enum DripError {
    // ── Configuration ────────────────────────────────────────────────────────
    #[msg("Granularity must be greater than zero")]
    InvalidGranularity,
    #[msg("Spread must be >= 0 and < 5000 bps")]
    InvalidSpread,
    #[msg("A vault whitelist holds at most 5 swaps")]
    InvalidNumSwaps,
    #[msg("Unsupported oracle source")]
    InvalidOracleSource,
    #[msg("Max slippage must be between 1 and 9999 bps")]
    InvalidVaultMaxSlippage,
    #[msg("Max price deviation must be between 1 and 9999 bps")]
    InvalidVaultMaxPriceDeviation,
    #[msg("Token mint does not match vault")]
    InvalidMint,

    // ── Authorization ────────────────────────────────────────────────────────
    #[msg("Signer is not the proto config admin")]
    SignerIsNotAdmin,
    #[msg("Only the proto config admin can create vaults")]
    OnlyAdminCanInitVault,
    #[msg("Signer is not the oracle config update authority")]
    SignerIsNotOracleUpdateAuthority,
    #[msg("Token account owner does not match signer")]
    InvalidOwner,

    // ── Sequencing ───────────────────────────────────────────────────────────
    #[msg("Vault period does not match the expected period id")]
    InvalidVaultPeriod,
    #[msg("Drip already triggered for the current period")]
    DuplicateDrip,
    #[msg("Cannot create a vault period at or before the last drip period")]
    CannotInitializeVaultPeriodLessThanVaultCurrentPeriod,
    #[msg("Account does not belong to this vault")]
    InvalidVaultReference,
    #[msg("Vault does not reference this proto config")]
    InvalidVaultProtoConfigReference,

    // ── State ────────────────────────────────────────────────────────────────
    #[msg("Position is already closed")]
    PositionAlreadyClosed,
    #[msg("Vault drip amount must be zero")]
    VaultDripAmountNotZero,
    #[msg("Oracle config does not match the vault")]
    InvalidOracleConfig,
    #[msg("Token account is not the vault's token account")]
    IncorrectVaultTokenAccount,
    #[msg("Referrer does not match the position")]
    InvalidReferrer,

    // ── Economic ─────────────────────────────────────────────────────────────
    #[msg("Periodic drip amount is zero")]
    PeriodicDripAmountIsZero,
    #[msg("Number of swaps must be greater than zero")]
    NumSwapsIsZero,
    #[msg("Deposit amount must be greater than zero")]
    DepositAmountIsZero,
    #[msg("Withdrawable amount is zero")]
    WithdrawableAmountIsZero,
    #[msg("Swap is not whitelisted for this vault")]
    InvalidSwapAccount,
    #[msg("Swap did not consume the expected token A amount or returned nothing")]
    IncompleteSwap,
    #[msg("Drip is disabled while an enabled oracle config is attached")]
    DripOracleNotSupported,
    #[msg("Position token account does not hold the position token")]
    PositionBalanceIsZero,

    // ── External account decoding ────────────────────────────────────────────
    #[msg("Price account is not a valid oracle price record")]
    InvalidOracleAccount,
    #[msg("Swap account state could not be decoded")]
    InvalidSwapState,
    #[msg("Swap authority is not the pool's authority")]
    InvalidSwapAuthorityAccount,
    #[msg("Swap fee account is not the pool's fee account")]
    InvalidSwapFeeAccount,
    #[msg("Oracle price is not currently trading")]
    OracleIsOffline,

    #[msg("Math overflow")]
    MathOverflow,
}
