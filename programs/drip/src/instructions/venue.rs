use anchor_lang::prelude::*;
use solana_program::hash::hash;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke_signed,
};
use orca_whirlpools_client::Whirlpool;
use spl_token_swap::state::{SwapState, SwapVersion};
use crate::{constants::*, error::DripError, state::Vault};

/// Venues a drip can route through, one per drip instruction.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapVenueKind {
    /// Constant-product pool of the SPL token-swap program
    SplTokenSwap,
    /// Concentrated-liquidity Orca whirlpool
    OrcaWhirlpool,
}

/// Vault-side accounts every venue needs: the signing vault PDA and its
/// token A (source) and token B (destination) accounts.
pub struct VaultLegs<'info> {
    pub authority: AccountInfo<'info>,
    pub token_a_account: AccountInfo<'info>,
    pub token_b_account: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
}

/// Contract a drip needs from an external swap venue.
pub trait SwapVenue<'info> {
    const KIND: SwapVenueKind;

    /// Address matched against the vault's swap whitelist.
    fn whitelist_key(&self) -> Pubkey;

    /// Sell exactly `amount_in` token A for token B, bounded by the vault's
    /// `max_slippage_bps`. The vault PDA signs with `signer`.
    fn swap(
        &self,
        legs: &VaultLegs<'info>,
        vault: &Vault,
        amount_in: u64,
        signer: &[&[&[u8]]],
    ) -> Result<()>;
}

// ─── SPL token-swap (constant product) ────────────────────────────────────────

pub struct SplTokenSwapVenue<'info> {
    pub program: AccountInfo<'info>,
    pub swap: AccountInfo<'info>,
    pub swap_authority: AccountInfo<'info>,
    /// Pool reserve holding the vault's token A mint
    pub swap_token_a_account: AccountInfo<'info>,
    /// Pool reserve holding the vault's token B mint
    pub swap_token_b_account: AccountInfo<'info>,
    pub swap_token_mint: AccountInfo<'info>,
    pub swap_fee_account: AccountInfo<'info>,
    pub reserve_a: u64,
    pub reserve_b: u64,
}

/// SPL token-swap `Swap` instruction tag
const TOKEN_SWAP_SWAP_TAG: u8 = 1;

impl SplTokenSwapVenue<'_> {
    fn pool_keys(&self) -> TokenSwapKeys {
        TokenSwapKeys {
            swap: self.swap.key(),
            authority: self.swap_authority.key(),
            reserve_a: self.swap_token_a_account.key(),
            reserve_b: self.swap_token_b_account.key(),
            pool_mint: self.swap_token_mint.key(),
            fee_account: self.swap_fee_account.key(),
        }
    }
}

/// Pool accounts a drip passes alongside an SPL token-swap pool.
#[derive(Debug, Clone, Copy)]
pub struct TokenSwapKeys {
    pub swap: Pubkey,
    pub authority: Pubkey,
    /// Reserve holding the vault's token A mint
    pub reserve_a: Pubkey,
    /// Reserve holding the vault's token B mint
    pub reserve_b: Pubkey,
    pub pool_mint: Pubkey,
    pub fee_account: Pubkey,
}

/// What a drip relies on from an SPL token-swap pool account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSwapPool {
    pub bump_seed: u8,
    pub token_a_account: Pubkey,
    pub token_b_account: Pubkey,
    pub pool_mint: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub pool_fee_account: Pubkey,
}

impl TokenSwapPool {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let state = SwapVersion::unpack(data).map_err(|_| error!(DripError::InvalidSwapState))?;
        require!(state.is_initialized(), DripError::InvalidSwapState);
        Ok(Self {
            bump_seed: state.bump_seed(),
            token_a_account: Pubkey::new_from_array(state.token_a_account().to_bytes()),
            token_b_account: Pubkey::new_from_array(state.token_b_account().to_bytes()),
            pool_mint: Pubkey::new_from_array(state.pool_mint().to_bytes()),
            token_a_mint: Pubkey::new_from_array(state.token_a_mint().to_bytes()),
            token_b_mint: Pubkey::new_from_array(state.token_b_mint().to_bytes()),
            pool_fee_account: Pubkey::new_from_array(state.pool_fee_account().to_bytes()),
        })
    }

    /// The authority must be the pool's PDA, and the reserves, pool mint and
    /// fee account must be the ones the pool records for the vault's pair.
    pub fn check(&self, keys: &TokenSwapKeys, vault: &Vault) -> Result<()> {
        let authority = Pubkey::create_program_address(
            &[keys.swap.as_ref(), &[self.bump_seed]],
            &SPL_TOKEN_SWAP_PROGRAM_ID,
        )
        .map_err(|_| error!(DripError::InvalidSwapAuthorityAccount))?;
        require_keys_eq!(keys.authority, authority, DripError::InvalidSwapAuthorityAccount);

        let same = self.token_a_account == keys.reserve_a && self.token_b_account == keys.reserve_b;
        let flipped = self.token_a_account == keys.reserve_b && self.token_b_account == keys.reserve_a;
        require!(same || flipped, DripError::InvalidSwapAccount);

        let (mint_a, mint_b) = if same {
            (self.token_a_mint, self.token_b_mint)
        } else {
            (self.token_b_mint, self.token_a_mint)
        };
        require!(
            mint_a == vault.token_a_mint && mint_b == vault.token_b_mint,
            DripError::InvalidMint
        );

        require_keys_eq!(keys.pool_mint, self.pool_mint, DripError::InvalidSwapAccount);
        require_keys_eq!(keys.fee_account, self.pool_fee_account, DripError::InvalidSwapFeeAccount);
        Ok(())
    }
}

impl<'info> SwapVenue<'info> for SplTokenSwapVenue<'info> {
    const KIND: SwapVenueKind = SwapVenueKind::SplTokenSwap;

    fn whitelist_key(&self) -> Pubkey {
        self.swap.key()
    }

    fn swap(
        &self,
        legs: &VaultLegs<'info>,
        vault: &Vault,
        amount_in: u64,
        signer: &[&[&[u8]]],
    ) -> Result<()> {
        TokenSwapPool::decode(&self.swap.try_borrow_data()?)?.check(&self.pool_keys(), vault)?;

        let minimum_amount_out = constant_product_min_out(
            self.reserve_a,
            self.reserve_b,
            amount_in,
            vault.max_slippage_bps,
        )?;

        let mut data = Vec::with_capacity(17);
        data.push(TOKEN_SWAP_SWAP_TAG);
        data.extend_from_slice(&amount_in.to_le_bytes());
        data.extend_from_slice(&minimum_amount_out.to_le_bytes());

        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new_readonly(self.swap.key(), false),
                AccountMeta::new_readonly(self.swap_authority.key(), false),
                AccountMeta::new_readonly(legs.authority.key(), true),   // user transfer authority
                AccountMeta::new(legs.token_a_account.key(), false),     // source
                AccountMeta::new(self.swap_token_a_account.key(), false),
                AccountMeta::new(self.swap_token_b_account.key(), false),
                AccountMeta::new(legs.token_b_account.key(), false),     // destination
                AccountMeta::new(self.swap_token_mint.key(), false),
                AccountMeta::new(self.swap_fee_account.key(), false),
                AccountMeta::new_readonly(legs.token_program.key(), false),
            ],
            data,
        };

        invoke_signed(
            &ix,
            &[
                self.swap.clone(),
                self.swap_authority.clone(),
                legs.authority.clone(),
                legs.token_a_account.clone(),
                self.swap_token_a_account.clone(),
                self.swap_token_b_account.clone(),
                legs.token_b_account.clone(),
                self.swap_token_mint.clone(),
                self.swap_fee_account.clone(),
                legs.token_program.clone(),
                self.program.clone(),
            ],
            signer,
        )?;

        msg!("SplTokenSwap: in={} min_out={}", amount_in, minimum_amount_out);
        Ok(())
    }
}

/// Constant-product expectation `y * dx / (x + dx)`, less the slippage bound.
pub fn constant_product_min_out(
    reserve_in: u64,
    reserve_out: u64,
    amount_in: u64,
    max_slippage_bps: u16,
) -> Result<u64> {
    require!(reserve_in > 0 && reserve_out > 0, DripError::InvalidSwapState);
    let amount_in = amount_in as u128;
    let expected = (reserve_out as u128)
        .checked_mul(amount_in)
        .ok_or(DripError::MathOverflow)?
        / (reserve_in as u128)
            .checked_add(amount_in)
            .ok_or(DripError::MathOverflow)?;
    let keep_bps = BPS_DENOMINATOR
        .checked_sub(max_slippage_bps as u128)
        .ok_or(DripError::InvalidVaultMaxSlippage)?;
    Ok((expected * keep_bps / BPS_DENOMINATOR) as u64) // expected < reserve_out
}

// ─── Orca whirlpool (concentrated liquidity) ──────────────────────────────────

pub struct WhirlpoolVenue<'info> {
    pub program: AccountInfo<'info>,
    pub whirlpool: AccountInfo<'info>,
    pub token_vault_a: AccountInfo<'info>,
    pub token_vault_b: AccountInfo<'info>,
    pub tick_array_0: AccountInfo<'info>,
    pub tick_array_1: AccountInfo<'info>,
    pub tick_array_2: AccountInfo<'info>,
    pub oracle: AccountInfo<'info>,
}

impl<'info> WhirlpoolVenue<'info> {
    /// Decode the pool and make sure it trades the vault's pair through the
    /// supplied token vaults.
    fn load(&self, vault: &Vault) -> Result<WhirlpoolState> {
        require_keys_eq!(*self.whirlpool.owner, WHIRLPOOL_PROGRAM_ID, DripError::InvalidSwapAccount);
        let state = WhirlpoolState::decode(&self.whirlpool.try_borrow_data()?)?;

        let same_orientation =
            state.token_mint_a == vault.token_a_mint && state.token_mint_b == vault.token_b_mint;
        let flipped =
            state.token_mint_a == vault.token_b_mint && state.token_mint_b == vault.token_a_mint;
        require!(same_orientation || flipped, DripError::InvalidMint);
        require_keys_eq!(self.token_vault_a.key(), state.token_vault_a, DripError::InvalidSwapAccount);
        require_keys_eq!(self.token_vault_b.key(), state.token_vault_b, DripError::InvalidSwapAccount);
        Ok(state)
    }
}

impl<'info> SwapVenue<'info> for WhirlpoolVenue<'info> {
    const KIND: SwapVenueKind = SwapVenueKind::OrcaWhirlpool;

    fn whitelist_key(&self) -> Pubkey {
        self.whirlpool.key()
    }

    fn swap(
        &self,
        legs: &VaultLegs<'info>,
        vault: &Vault,
        amount_in: u64,
        signer: &[&[&[u8]]],
    ) -> Result<()> {
        let state = self.load(vault)?;
        // Pool orientation decides which side the vault sells from
        let a_to_b = state.token_mint_a == vault.token_a_mint;
        let sqrt_price_limit = sqrt_price_limit(state.sqrt_price, vault.max_slippage_bps, a_to_b)?;
        let (owner_account_a, owner_account_b) = if a_to_b {
            (&legs.token_a_account, &legs.token_b_account)
        } else {
            (&legs.token_b_account, &legs.token_a_account)
        };

        let mut data = hash(b"global:swap").to_bytes()[..8].to_vec();
        data.extend_from_slice(&amount_in.to_le_bytes());
        data.extend_from_slice(&0u64.to_le_bytes()); // other_amount_threshold
        data.extend_from_slice(&sqrt_price_limit.to_le_bytes());
        data.push(true as u8); // amount_specified_is_input
        data.push(a_to_b as u8);

        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new_readonly(legs.token_program.key(), false),
                AccountMeta::new_readonly(legs.authority.key(), true),
                AccountMeta::new(self.whirlpool.key(), false),
                AccountMeta::new(owner_account_a.key(), false),
                AccountMeta::new(self.token_vault_a.key(), false),
                AccountMeta::new(owner_account_b.key(), false),
                AccountMeta::new(self.token_vault_b.key(), false),
                AccountMeta::new(self.tick_array_0.key(), false),
                AccountMeta::new(self.tick_array_1.key(), false),
                AccountMeta::new(self.tick_array_2.key(), false),
                AccountMeta::new(self.oracle.key(), false),
            ],
            data,
        };

        invoke_signed(
            &ix,
            &[
                legs.token_program.clone(),
                legs.authority.clone(),
                self.whirlpool.clone(),
                owner_account_a.clone(),
                self.token_vault_a.clone(),
                owner_account_b.clone(),
                self.token_vault_b.clone(),
                self.tick_array_0.clone(),
                self.tick_array_1.clone(),
                self.tick_array_2.clone(),
                self.oracle.clone(),
                self.program.clone(),
            ],
            signer,
        )?;

        msg!(
            "Whirlpool: in={} a_to_b={} sqrt_price={} limit={}",
            amount_in, a_to_b, state.sqrt_price, sqrt_price_limit
        );
        Ok(())
    }
}

/// The part of a whirlpool account a drip reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhirlpoolState {
    pub sqrt_price: u128,
    pub token_mint_a: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_vault_b: Pubkey,
}

impl WhirlpoolState {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let pool = Whirlpool::from_bytes(data).map_err(|_| error!(DripError::InvalidSwapState))?;
        Ok(Self {
            sqrt_price: pool.sqrt_price,
            token_mint_a: Pubkey::new_from_array(pool.token_mint_a.to_bytes()),
            token_vault_a: Pubkey::new_from_array(pool.token_vault_a.to_bytes()),
            token_mint_b: Pubkey::new_from_array(pool.token_mint_b.to_bytes()),
            token_vault_b: Pubkey::new_from_array(pool.token_vault_b.to_bytes()),
        })
    }
}

/// Furthest sqrt price the swap may push the pool to:
/// `sqrt_price * sqrt(1 ∓ bps / 10_000)`, four decimal digits of precision,
/// clamped to the range the whirlpool program accepts.
pub fn sqrt_price_limit(sqrt_price: u128, max_slippage_bps: u16, a_to_b: bool) -> Result<u128> {
    let bps = max_slippage_bps as u128;
    let ratio = if a_to_b {
        BPS_DENOMINATOR.checked_sub(bps).ok_or(DripError::InvalidVaultMaxSlippage)?
    } else {
        BPS_DENOMINATOR + bps
    };
    let factor = isqrt(ratio * BPS_DENOMINATOR);
    let limit = sqrt_price
        .checked_mul(factor)
        .ok_or(DripError::MathOverflow)?
        / BPS_DENOMINATOR;
    Ok(limit.clamp(WHIRLPOOL_MIN_SQRT_PRICE, WHIRLPOOL_MAX_SQRT_PRICE))
}

/// Integer square root (Babylonian method).
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (x + 1) >> 1;
    while y < x {
        x = y;
        y = (y + n / y) >> 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;
    use test_case::test_case;

    #[test]
    fn min_out_applies_slippage_to_expectation() {
        assert_eq!(constant_product_min_out(1_000_000, 2_000_000, 1_000, 100).unwrap(), 1_978);
        assert_eq!(constant_product_min_out(1_000_000, 2_000_000, 1_000, 1).unwrap(), 1_997);
        assert!(constant_product_min_out(0, 2_000_000, 1_000, 100).is_err());
    }

    #[test]
    fn sqrt_limit_moves_against_the_trade() {
        let price = 1_000u128 << 64;
        let down = sqrt_price_limit(price, 1_000, true).unwrap();
        let up = sqrt_price_limit(price, 1_000, false).unwrap();
        assert_eq!(down, price * 9_486 / 10_000);
        assert_eq!(up, price * 10_488 / 10_000);
        assert!(down < price && price < up);
    }

    #[test]
    fn sqrt_limit_is_clamped() {
        assert_eq!(sqrt_price_limit(5_000_000_000, 9_999, true).unwrap(), WHIRLPOOL_MIN_SQRT_PRICE);
        assert_eq!(
            sqrt_price_limit(WHIRLPOOL_MAX_SQRT_PRICE, 9_999, false).unwrap(),
            WHIRLPOOL_MAX_SQRT_PRICE
        );
    }

    #[test_case(0, 0; "zero")]
    #[test_case(90_000_000, 9_486; "selling side factor")]
    #[test_case(110_000_000, 10_488; "buying side factor")]
    #[test_case(100_000_000, 10_000; "perfect square")]
    fn isqrt_floors(n: u128, expected: u128) {
        assert_eq!(isqrt(n), expected);
    }

    #[test]
    fn decodes_whirlpool_account() {
        // Anchor layout: discriminator, config, bump, spacing, fee tier seed,
        // fee rates, liquidity, then the fields below
        let mut data = vec![0u8; 653];
        let mint_a = Pubkey::new_unique();
        let vault_b = Pubkey::new_unique();
        data[65..81].copy_from_slice(&(7u128 << 64).to_le_bytes());
        data[101..133].copy_from_slice(mint_a.as_ref());
        data[213..245].copy_from_slice(vault_b.as_ref());

        let state = WhirlpoolState::decode(&data).unwrap();
        assert_eq!(state.sqrt_price, 7u128 << 64);
        assert_eq!(state.token_mint_a, mint_a);
        assert_eq!(state.token_vault_b, vault_b);

        assert!(WhirlpoolState::decode(&data[..200]).is_err());
    }

    fn token_swap_fixture() -> (TokenSwapPool, TokenSwapKeys, Vault) {
        let swap = Pubkey::new_unique();
        let (authority, bump_seed) =
            Pubkey::find_program_address(&[swap.as_ref()], &SPL_TOKEN_SWAP_PROGRAM_ID);
        let vault = Vault {
            token_a_mint: Pubkey::new_unique(),
            token_b_mint: Pubkey::new_unique(),
            ..Vault::default()
        };
        let pool = TokenSwapPool {
            bump_seed,
            token_a_account: Pubkey::new_unique(),
            token_b_account: Pubkey::new_unique(),
            pool_mint: Pubkey::new_unique(),
            token_a_mint: vault.token_a_mint,
            token_b_mint: vault.token_b_mint,
            pool_fee_account: Pubkey::new_unique(),
        };
        let keys = TokenSwapKeys {
            swap,
            authority,
            reserve_a: pool.token_a_account,
            reserve_b: pool.token_b_account,
            pool_mint: pool.pool_mint,
            fee_account: pool.pool_fee_account,
        };
        (pool, keys, vault)
    }

    #[test]
    fn token_swap_pool_accepts_its_own_accounts() {
        let (pool, keys, vault) = token_swap_fixture();
        pool.check(&keys, &vault).unwrap();
    }

    #[test]
    fn token_swap_pool_accepts_flipped_orientation() {
        let (mut pool, keys, vault) = token_swap_fixture();
        std::mem::swap(&mut pool.token_a_account, &mut pool.token_b_account);
        std::mem::swap(&mut pool.token_a_mint, &mut pool.token_b_mint);
        pool.check(&keys, &vault).unwrap();
    }

    #[test]
    fn token_swap_pool_rejects_foreign_authority() {
        let (pool, mut keys, vault) = token_swap_fixture();
        keys.authority = Pubkey::new_unique();
        assert_eq!(
            pool.check(&keys, &vault).unwrap_err(),
            Error::from(DripError::InvalidSwapAuthorityAccount)
        );
    }

    #[test]
    fn token_swap_pool_rejects_substituted_accounts() {
        let (pool, keys, vault) = token_swap_fixture();

        let mut reserve = keys;
        reserve.reserve_b = Pubkey::new_unique();
        assert_eq!(pool.check(&reserve, &vault).unwrap_err(), Error::from(DripError::InvalidSwapAccount));

        let mut pool_mint = keys;
        pool_mint.pool_mint = Pubkey::new_unique();
        assert_eq!(pool.check(&pool_mint, &vault).unwrap_err(), Error::from(DripError::InvalidSwapAccount));

        let mut fee = keys;
        fee.fee_account = Pubkey::new_unique();
        assert_eq!(pool.check(&fee, &vault).unwrap_err(), Error::from(DripError::InvalidSwapFeeAccount));

        let other_pair = Vault { token_b_mint: Pubkey::new_unique(), ..vault };
        assert_eq!(pool.check(&keys, &other_pair).unwrap_err(), Error::from(DripError::InvalidMint));
    }

    #[test]
    fn token_swap_pool_rejects_garbage() {
        assert_eq!(
            TokenSwapPool::decode(&[1u8; 16]).unwrap_err(),
            Error::from(DripError::InvalidSwapState)
        );
        assert_eq!(
            TokenSwapPool::decode(&[]).unwrap_err(),
            Error::from(DripError::InvalidSwapState)
        );
    }
}
