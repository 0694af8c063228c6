use anchor_lang::prelude::*;
use crate::{
    error::DripError,
    instructions::drip_math::{compute_price, next_twap},
};

// ─── VaultPeriod ──────────────────────────────────────────────────────────────
// One record per period index. `twap` is cumulative: the average price over
// periods (i, j] is (twap_j − twap_i) / (j − i).
#[account]
#[derive(Default)]
pub struct VaultPeriod {
    pub vault: Pubkey,        // 32
    pub period_id: u64,       // 8
    /// Drip amount that retires once this period is dripped
    pub dar: u64,             // 8
    /// Cumulative Q64.64 price, token B per token A
    pub twap: u128,           // 16
    /// Zero until the drip producing this period executes
    pub drip_timestamp: i64,  // 8
    pub bump: u8,             // 1
}

impl VaultPeriod {
    // 8 discriminator + 32+8+8+16+8+1 = 81
    pub const LEN: usize = 81;

    pub fn init(&mut self, vault: Pubkey, period_id: u64, bump: u8) {
        self.vault = vault;
        self.period_id = period_id;
        self.dar = 0;
        self.twap = 0;
        self.drip_timestamp = 0;
        self.bump = bump;
    }

    pub fn increase_dar(&mut self, amount: u64) -> Result<()> {
        self.dar = self.dar.checked_add(amount).ok_or(DripError::MathOverflow)?;
        Ok(())
    }

    pub fn decrease_dar(&mut self, amount: u64) -> Result<()> {
        self.dar = self.dar.checked_sub(amount).ok_or(DripError::MathOverflow)?;
        Ok(())
    }

    /// Fold a completed swap into the series: `twap = previous + b / a`.
    pub fn record_drip(
        &mut self,
        previous_twap: u128,
        swapped_token_a: u64,
        received_token_b: u64,
        now: i64,
    ) -> Result<()> {
        let price = compute_price(swapped_token_a, received_token_b)?;
        self.twap = next_twap(previous_twap, price)?;
        self.drip_timestamp = now;
        Ok(())
    }
}
