use anchor_lang::prelude::*;
use crate::{
    constants::*,
    error::DripError,
    instructions::drip_math::drip_activation_timestamp,
    state::{OracleConfig, VaultPeriod},
};

// ─── Vault ────────────────────────────────────────────────────────────────────
// One vault per (token A, token B, proto config). The vault PDA owns both
// token accounts and signs every transfer out of them.
#[account]
#[derive(Default)]
pub struct Vault {
    pub proto_config: Pubkey,               // 32
    pub token_a_mint: Pubkey,               // 32
    pub token_b_mint: Pubkey,               // 32
    pub token_a_account: Pubkey,            // 32
    pub token_b_account: Pubkey,            // 32
    pub treasury_token_b_account: Pubkey,   // 32
    pub oracle_config: Option<Pubkey>,      // 1 + 32
    /// Venue addresses a drip may swap through; `None` is an empty slot
    pub whitelisted_swaps: [Option<Pubkey>; MAX_WHITELISTED_SWAPS], // 5 * 33
    /// Set while at least one whitelist slot is filled
    pub limit_swaps: bool,                  // 1
    pub max_slippage_bps: u16,              // 2
    pub max_price_deviation_bps: u16,       // 2
    pub last_drip_period: u64,              // 8
    /// Sum of periodic drip amounts over all active positions
    pub drip_amount: u64,                   // 8
    pub drip_activation_timestamp: i64,     // 8
    pub bump: u8,                           // 1
}

impl Vault {
    // 8 discriminator + 32*6 + 33 + 165 + 1+2+2+8+8+8+1 = 428
    pub const LEN: usize = 428;

    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        proto_config: Pubkey,
        token_a_mint: Pubkey,
        token_b_mint: Pubkey,
        token_a_account: Pubkey,
        token_b_account: Pubkey,
        treasury_token_b_account: Pubkey,
        whitelisted_swaps: &[Pubkey],
        max_slippage_bps: u16,
        max_price_deviation_bps: u16,
        granularity: u64,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        self.proto_config = proto_config;
        self.token_a_mint = token_a_mint;
        self.token_b_mint = token_b_mint;
        self.token_a_account = token_a_account;
        self.token_b_account = token_b_account;
        self.treasury_token_b_account = treasury_token_b_account;
        self.oracle_config = None;
        self.set_whitelisted_swaps(whitelisted_swaps)?;
        self.set_max_slippage_bps(max_slippage_bps)?;
        // 0 leaves the price-deviation guard unset until an oracle is attached
        require!(
            max_price_deviation_bps < MAX_GUARD_BPS,
            DripError::InvalidVaultMaxPriceDeviation
        );
        self.max_price_deviation_bps = max_price_deviation_bps;
        self.last_drip_period = 0;
        self.drip_amount = 0;
        self.drip_activation_timestamp = drip_activation_timestamp(now, granularity, false)?;
        self.bump = bump;
        Ok(())
    }

    /// Replace the whole whitelist. Default keys are treated as empty slots.
    pub fn set_whitelisted_swaps(&mut self, swaps: &[Pubkey]) -> Result<()> {
        require!(swaps.len() <= MAX_WHITELISTED_SWAPS, DripError::InvalidNumSwaps);
        let mut slots = [None; MAX_WHITELISTED_SWAPS];
        for (slot, swap) in slots.iter_mut().zip(swaps) {
            if *swap != Pubkey::default() {
                *slot = Some(*swap);
            }
        }
        self.limit_swaps = slots.iter().any(Option::is_some);
        self.whitelisted_swaps = slots;
        Ok(())
    }

    pub fn is_whitelisted(&self, swap: &Pubkey) -> bool {
        !self.limit_swaps || self.whitelisted_swaps.iter().flatten().any(|s| s == swap)
    }

    pub fn set_max_slippage_bps(&mut self, bps: u16) -> Result<()> {
        require!(bps > 0 && bps < MAX_GUARD_BPS, DripError::InvalidVaultMaxSlippage);
        self.max_slippage_bps = bps;
        Ok(())
    }

    pub fn set_max_price_deviation_bps(&mut self, bps: u16) -> Result<()> {
        require!(bps > 0 && bps < MAX_GUARD_BPS, DripError::InvalidVaultMaxPriceDeviation);
        self.max_price_deviation_bps = bps;
        Ok(())
    }

    pub fn increase_drip_amount(&mut self, amount: u64) -> Result<()> {
        self.drip_amount = self
            .drip_amount
            .checked_add(amount)
            .ok_or(DripError::MathOverflow)?;
        Ok(())
    }

    pub fn decrease_drip_amount(&mut self, amount: u64) -> Result<()> {
        self.drip_amount = self
            .drip_amount
            .checked_sub(amount)
            .ok_or(DripError::MathOverflow)?;
        Ok(())
    }

    /// A vault period may be created ahead of time, never behind the vault.
    /// Period 0 is the only id allowed while no drip has happened yet.
    pub fn check_new_period(&self, period_id: u64) -> Result<()> {
        require!(
            period_id > self.last_drip_period || (period_id == 0 && self.last_drip_period == 0),
            DripError::CannotInitializeVaultPeriodLessThanVaultCurrentPeriod
        );
        Ok(())
    }

    /// Every precondition of a drip, in the order they are reported.
    ///
    /// `oracle` is the oracle config supplied with the drip, if any, as
    /// `(address, config)`.
    #[allow(clippy::too_many_arguments)]
    pub fn check_drip(
        &self,
        vault_key: &Pubkey,
        last_period: &VaultPeriod,
        current_period: &VaultPeriod,
        swap: &Pubkey,
        oracle: Option<(&Pubkey, &OracleConfig)>,
        now: i64,
    ) -> Result<()> {
        require_keys_eq!(last_period.vault, *vault_key, DripError::InvalidVaultReference);
        require_keys_eq!(current_period.vault, *vault_key, DripError::InvalidVaultReference);

        // An already-stamped period can only be a replay of a committed drip
        require!(current_period.drip_timestamp == 0, DripError::DuplicateDrip);

        require!(
            last_period.period_id == self.last_drip_period,
            DripError::InvalidVaultPeriod
        );
        require!(
            Some(current_period.period_id) == self.last_drip_period.checked_add(1),
            DripError::InvalidVaultPeriod
        );

        require!(self.drip_amount > 0, DripError::PeriodicDripAmountIsZero);
        require!(self.is_whitelisted(swap), DripError::InvalidSwapAccount);
        require!(now >= self.drip_activation_timestamp, DripError::DuplicateDrip);

        if let Some(expected) = self.oracle_config {
            match oracle {
                Some((key, config)) if *key == expected => {
                    // TODO: compare the venue price against the oracle using
                    // max_price_deviation_bps instead of refusing outright.
                    require!(!config.enabled, DripError::DripOracleNotSupported);
                }
                _ => return err!(DripError::InvalidOracleConfig),
            }
        }
        Ok(())
    }

    /// Advance the vault into `current_period`. Positions whose window ends
    /// at that period stop contributing to the pooled drip amount.
    pub fn process_drip(
        &mut self,
        current_period: &VaultPeriod,
        granularity: u64,
        now: i64,
    ) -> Result<()> {
        self.decrease_drip_amount(current_period.dar)?;
        self.last_drip_period = current_period.period_id;
        self.drip_activation_timestamp = drip_activation_timestamp(now, granularity, true)?;
        Ok(())
    }

    pub fn signer(&self) -> VaultSigner {
        VaultSigner {
            token_a_mint: self.token_a_mint,
            token_b_mint: self.token_b_mint,
            proto_config: self.proto_config,
            bump: [self.bump],
        }
    }
}

/// Owned copy of the vault PDA seeds, so CPIs can sign while the vault
/// account itself stays mutably borrowed.
pub struct VaultSigner {
    token_a_mint: Pubkey,
    token_b_mint: Pubkey,
    proto_config: Pubkey,
    bump: [u8; 1],
}

impl VaultSigner {
    pub fn seeds(&self) -> [&[u8]; 5] {
        [
            VAULT_SEED,
            self.token_a_mint.as_ref(),
            self.token_b_mint.as_ref(),
            self.proto_config.as_ref(),
            &self.bump,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    fn vault_with(drip_amount: u64, last_drip_period: u64) -> (Pubkey, Vault) {
        let vault = Vault {
            drip_amount,
            last_drip_period,
            max_slippage_bps: 1_000,
            max_price_deviation_bps: 1_000,
            ..Vault::default()
        };
        (Pubkey::new_unique(), vault)
    }

    fn period(vault: &Pubkey, period_id: u64) -> VaultPeriod {
        VaultPeriod { vault: *vault, period_id, ..VaultPeriod::default() }
    }

    fn check(vault_key: &Pubkey, vault: &Vault, last: u64, current: u64) -> Result<()> {
        vault.check_drip(
            vault_key,
            &period(vault_key, last),
            &period(vault_key, current),
            &Pubkey::new_unique(),
            None,
            0,
        )
    }

    #[test]
    fn accepts_next_period_pair() {
        let (key, vault) = vault_with(100, 3);
        check(&key, &vault, 3, 4).unwrap();
    }

    #[test]
    fn rejects_out_of_sequence_pairs() {
        let (key, vault) = vault_with(100, 3);
        let expected = Error::from(DripError::InvalidVaultPeriod);
        assert_eq!(check(&key, &vault, 2, 3).unwrap_err(), expected);
        assert_eq!(check(&key, &vault, 3, 5).unwrap_err(), expected);
        assert_eq!(check(&key, &vault, 4, 3).unwrap_err(), expected);
    }

    #[test]
    fn rejects_foreign_periods() {
        let (key, vault) = vault_with(100, 0);
        let other = Pubkey::new_unique();
        let err = vault
            .check_drip(&key, &period(&other, 0), &period(&key, 1), &key, None, 0)
            .unwrap_err();
        assert_eq!(err, Error::from(DripError::InvalidVaultReference));
    }

    #[test]
    fn stamped_period_is_duplicate() {
        let (key, vault) = vault_with(100, 0);
        let mut current = period(&key, 1);
        current.drip_timestamp = 42;
        let err = vault
            .check_drip(&key, &period(&key, 0), &current, &key, None, 100)
            .unwrap_err();
        assert_eq!(err, Error::from(DripError::DuplicateDrip));
    }

    #[test]
    fn drip_waits_for_activation() {
        let (key, mut vault) = vault_with(100, 0);
        vault.drip_activation_timestamp = 120;
        let at = |now| {
            vault.check_drip(&key, &period(&key, 0), &period(&key, 1), &key, None, now)
        };
        assert_eq!(at(119).unwrap_err(), Error::from(DripError::DuplicateDrip));
        at(120).unwrap();
    }

    #[test]
    fn empty_vault_cannot_drip() {
        let (key, vault) = vault_with(0, 0);
        let err = check(&key, &vault, 0, 1).unwrap_err();
        assert_eq!(err, Error::from(DripError::PeriodicDripAmountIsZero));
    }

    #[test]
    fn empty_vault_reports_zero_amount_before_activation() {
        let (key, mut vault) = vault_with(0, 4);
        vault.drip_activation_timestamp = 100;
        let err = vault
            .check_drip(&key, &period(&key, 4), &period(&key, 5), &key, None, 99)
            .unwrap_err();
        assert_eq!(err, Error::from(DripError::PeriodicDripAmountIsZero));
    }

    #[test]
    fn whitelist_is_checked_before_activation() {
        let (key, mut vault) = vault_with(100, 0);
        vault.drip_activation_timestamp = 100;
        vault.set_whitelisted_swaps(&[Pubkey::new_unique()]).unwrap();
        let err = vault
            .check_drip(&key, &period(&key, 0), &period(&key, 1), &Pubkey::new_unique(), None, 99)
            .unwrap_err();
        assert_eq!(err, Error::from(DripError::InvalidSwapAccount));
    }

    #[test]
    fn init_accepts_unset_price_deviation() {
        let mut vault = Vault::default();
        let init = |vault: &mut Vault, deviation: u16| {
            vault.init(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                &[],
                100,
                deviation,
                60,
                1_000,
                255,
            )
        };
        init(&mut vault, 0).unwrap();
        assert_eq!(vault.max_price_deviation_bps, 0);
        assert_eq!(vault.drip_activation_timestamp, 960);
        assert_eq!(
            init(&mut vault, 10_000).unwrap_err(),
            Error::from(DripError::InvalidVaultMaxPriceDeviation)
        );
    }

    #[test]
    fn whitelist_limits_venues() {
        let (key, mut vault) = vault_with(100, 0);
        let allowed = Pubkey::new_unique();
        vault.set_whitelisted_swaps(&[Pubkey::default(), allowed]).unwrap();
        assert!(vault.limit_swaps);
        assert_eq!(vault.whitelisted_swaps[0], None);

        let drip = |swap: &Pubkey| {
            vault.check_drip(&key, &period(&key, 0), &period(&key, 1), swap, None, 0)
        };
        drip(&allowed).unwrap();
        assert_eq!(
            drip(&Pubkey::new_unique()).unwrap_err(),
            Error::from(DripError::InvalidSwapAccount)
        );
        // an unset slot never matches the default key
        assert_eq!(
            drip(&Pubkey::default()).unwrap_err(),
            Error::from(DripError::InvalidSwapAccount)
        );
    }

    #[test]
    fn clearing_whitelist_lifts_limit() {
        let (_, mut vault) = vault_with(0, 0);
        vault.set_whitelisted_swaps(&[Pubkey::new_unique()]).unwrap();
        vault.set_whitelisted_swaps(&[]).unwrap();
        assert!(!vault.limit_swaps);
        assert!(vault.is_whitelisted(&Pubkey::new_unique()));

        let err = vault.set_whitelisted_swaps(&[Pubkey::new_unique(); 6]).unwrap_err();
        assert_eq!(err, Error::from(DripError::InvalidNumSwaps));
    }

    #[test]
    fn attached_oracle_blocks_drip_while_enabled() {
        let (key, mut vault) = vault_with(100, 0);
        let oracle_key = Pubkey::new_unique();
        vault.oracle_config = Some(oracle_key);
        let mut oracle = OracleConfig { enabled: true, ..OracleConfig::default() };

        let drip = |oracle: Option<(&Pubkey, &OracleConfig)>, vault: &Vault| {
            vault.check_drip(&key, &period(&key, 0), &period(&key, 1), &key, oracle, 0)
        };
        assert_eq!(
            drip(Some((&oracle_key, &oracle)), &vault).unwrap_err(),
            Error::from(DripError::DripOracleNotSupported)
        );
        assert_eq!(
            drip(None, &vault).unwrap_err(),
            Error::from(DripError::InvalidOracleConfig)
        );
        assert_eq!(
            drip(Some((&Pubkey::new_unique(), &oracle)), &vault).unwrap_err(),
            Error::from(DripError::InvalidOracleConfig)
        );

        oracle.enabled = false;
        drip(Some((&oracle_key, &oracle)), &vault).unwrap();

        vault.oracle_config = None;
        drip(None, &vault).unwrap();
    }

    #[test]
    fn process_drip_retires_expiring_amount() {
        let (key, mut vault) = vault_with(300, 0);
        let mut current = period(&key, 1);
        current.dar = 100;
        vault.process_drip(&current, 60, 1_000).unwrap();
        assert_eq!(vault.drip_amount, 200);
        assert_eq!(vault.last_drip_period, 1);
        assert_eq!(vault.drip_activation_timestamp, 1_020);
    }

    #[test]
    fn guard_rails_bounds_and_idempotence() {
        let (_, mut vault) = vault_with(0, 0);
        vault.set_max_slippage_bps(250).unwrap();
        vault.set_max_slippage_bps(250).unwrap();
        assert_eq!(vault.max_slippage_bps, 250);
        assert_eq!(
            vault.set_max_slippage_bps(10_000).unwrap_err(),
            Error::from(DripError::InvalidVaultMaxSlippage)
        );
        assert_eq!(
            vault.set_max_price_deviation_bps(0).unwrap_err(),
            Error::from(DripError::InvalidVaultMaxPriceDeviation)
        );
    }

    #[test]
    fn new_periods_never_go_backwards() {
        let (_, mut vault) = vault_with(0, 0);
        vault.check_new_period(0).unwrap();
        vault.check_new_period(7).unwrap();

        vault.last_drip_period = 3;
        vault.check_new_period(4).unwrap();
        for id in [0, 3] {
            assert_eq!(
                vault.check_new_period(id).unwrap_err(),
                Error::from(DripError::CannotInitializeVaultPeriodLessThanVaultCurrentPeriod)
            );
        }
    }
}
