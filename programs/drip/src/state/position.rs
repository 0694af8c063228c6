use anchor_lang::prelude::*;
use crate::{
    error::DripError,
    instructions::drip_math::{periodic_drip_amount, withdraw_token_a_amount, withdraw_token_b_amount},
    state::VaultPeriod,
};

// ─── Position ─────────────────────────────────────────────────────────────────
// A depositor's DCA commitment. Whoever holds the single token of
// `position_authority` controls the position.
#[account]
#[derive(Default, Debug)]
pub struct Position {
    pub vault: Pubkey,                       // 32
    /// Mint of the position token (supply 1, authority revoked)
    pub position_authority: Pubkey,          // 32
    /// Token B account credited with part of future withdrawal fees
    pub referrer: Option<Pubkey>,            // 1 + 32
    pub deposited_token_a_amount: u64,       // 8
    /// Gross token B released so far (fees included)
    pub withdrawn_token_b_amount: u64,       // 8
    pub deposit_timestamp: i64,              // 8
    /// Vault's last drip period at deposit time: the window start
    pub drip_period_id_before_deposit: u64,  // 8
    pub number_of_swaps: u64,                // 8
    pub periodic_drip_amount: u64,           // 8
    pub is_closed: bool,                     // 1
    pub bump: u8,                            // 1
}

impl Position {
    // 8 discriminator + 32+32+33+8*6+1+1 = 155
    pub const LEN: usize = 155;

    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        vault: Pubkey,
        position_authority: Pubkey,
        referrer: Option<Pubkey>,
        deposited_token_a_amount: u64,
        last_drip_period: u64,
        number_of_swaps: u64,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        require!(number_of_swaps > 0, DripError::NumSwapsIsZero);
        require!(deposited_token_a_amount > 0, DripError::DepositAmountIsZero);
        let periodic = periodic_drip_amount(deposited_token_a_amount, number_of_swaps)?;
        require!(periodic > 0, DripError::PeriodicDripAmountIsZero);

        self.vault = vault;
        self.position_authority = position_authority;
        self.referrer = referrer;
        self.deposited_token_a_amount = deposited_token_a_amount;
        self.withdrawn_token_b_amount = 0;
        self.deposit_timestamp = now;
        self.drip_period_id_before_deposit = last_drip_period;
        self.number_of_swaps = number_of_swaps;
        self.periodic_drip_amount = periodic;
        self.is_closed = false;
        self.bump = bump;
        Ok(())
    }

    /// Period id at which this position's last swap happens.
    pub fn expiry_period_id(&self) -> Result<u64> {
        self.drip_period_id_before_deposit
            .checked_add(self.number_of_swaps)
            .ok_or_else(|| error!(DripError::MathOverflow))
    }

    /// `period` must be this position's expiry period in its own vault.
    pub fn check_expiry_period(&self, period: &VaultPeriod) -> Result<()> {
        require_keys_eq!(period.vault, self.vault, DripError::InvalidVaultReference);
        require!(
            period.period_id == self.expiry_period_id()?,
            DripError::InvalidVaultPeriod
        );
        Ok(())
    }

    /// The only `(i, j)` window a withdrawal may use right now.
    pub fn withdrawal_window(&self, last_drip_period: u64) -> Result<(u64, u64)> {
        let end = self.expiry_period_id()?.min(last_drip_period);
        Ok((self.drip_period_id_before_deposit, end))
    }

    /// Reject closed positions and any period pair other than the
    /// position's current window, before funds move.
    pub fn check_withdrawal(
        &self,
        vault_key: &Pubkey,
        last_drip_period: u64,
        period_i: &VaultPeriod,
        period_j: &VaultPeriod,
    ) -> Result<()> {
        require!(!self.is_closed, DripError::PositionAlreadyClosed);
        require_keys_eq!(self.vault, *vault_key, DripError::InvalidVaultReference);
        require_keys_eq!(period_i.vault, *vault_key, DripError::InvalidVaultReference);
        require_keys_eq!(period_j.vault, *vault_key, DripError::InvalidVaultReference);

        let (i, j) = self.withdrawal_window(last_drip_period)?;
        require!(period_i.period_id == i, DripError::InvalidVaultPeriod);
        require!(period_j.period_id == j, DripError::InvalidVaultPeriod);
        Ok(())
    }

    /// Token B earned over `(i, j)` that has not been paid out yet.
    pub fn withdrawable_token_b(
        &self,
        period_i: &VaultPeriod,
        period_j: &VaultPeriod,
        drip_trigger_spread: u16,
    ) -> Result<u64> {
        let earned = withdraw_token_b_amount(
            period_i.period_id,
            period_j.period_id,
            period_i.twap,
            period_j.twap,
            self.periodic_drip_amount,
            drip_trigger_spread,
        )?;
        // Rounding can leave earned a unit short of a previous payout
        Ok(earned.saturating_sub(self.withdrawn_token_b_amount))
    }

    /// Token A that was never dripped, given the window ends at `period_id_j`.
    pub fn refundable_token_a(&self, period_id_j: u64) -> Result<u64> {
        withdraw_token_a_amount(
            self.drip_period_id_before_deposit,
            period_id_j,
            self.number_of_swaps,
            self.periodic_drip_amount,
        )
    }

    pub fn record_withdrawal(&mut self, gross_token_b: u64) -> Result<()> {
        self.withdrawn_token_b_amount = self
            .withdrawn_token_b_amount
            .checked_add(gross_token_b)
            .ok_or(DripError::MathOverflow)?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        require!(!self.is_closed, DripError::PositionAlreadyClosed);
        self.is_closed = true;
        Ok(())
    }
}
