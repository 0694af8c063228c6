use anchor_lang::prelude::*;

/// PDA seeds
pub const VAULT_SEED: &[u8] = b"drip-v1";
pub const VAULT_PERIOD_SEED: &[u8] = b"vault_period";
pub const POSITION_SEED: &[u8] = b"user_position";

/// Denominator for basis-point math (u128 to avoid up-cast noise)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Every spread on a proto config must stay strictly below 50 %
pub const MAX_SPREAD_BPS: u16 = 5_000;

/// Upper bound (exclusive) for slippage and price-deviation guards
pub const MAX_GUARD_BPS: u16 = 10_000;

/// Capacity of a vault's swap whitelist
pub const MAX_WHITELISTED_SWAPS: usize = 5;

/// Q64.64 fixed-point shift used by prices and the TWAP accumulator
pub const Q64_SHIFT: u32 = 64;

// ─── Oracle sources ───────────────────────────────────────────────────────────

/// Pyth price feed. The only source accepted today.
pub const ORACLE_SOURCE_PYTH: u8 = 0;

// ─── Position token metadata ──────────────────────────────────────────────────

pub const POSITION_TOKEN_NAME: &str = "Drip Position";
pub const POSITION_TOKEN_SYMBOL: &str = "DP";
pub const POSITION_TOKEN_URI_PREFIX: &str = "https://api.drip.dcaf.so/v1/drip/position/";

// ─── External swap venues ─────────────────────────────────────────────────────

pub const SPL_TOKEN_SWAP_PROGRAM_ID: Pubkey =
    anchor_lang::pubkey!("SwapsVeCiPHMUAtzQWZw7RjsKjgCjhwU55QGu4U1Szw");
pub const WHIRLPOOL_PROGRAM_ID: Pubkey =
    anchor_lang::pubkey!("whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc");

/// Bounds the whirlpool program accepts for `sqrt_price_limit`
pub const WHIRLPOOL_MIN_SQRT_PRICE: u128 = 4_295_048_016;
pub const WHIRLPOOL_MAX_SQRT_PRICE: u128 = 79_226_673_515_401_279_992_447_579_055;
