use anchor_lang::prelude::*;
use crate::{constants::*, error::DripError};

// ─── VaultProtoConfig ─────────────────────────────────────────────────────────
// Schedule and fee template shared by every vault created against it.
// Never mutated after init.
#[account]
#[derive(Default)]
pub struct VaultProtoConfig {
    /// Period length in seconds
    pub granularity: u64,                  // 8
    /// Paid to whoever triggers a drip, in token A
    pub token_a_drip_trigger_spread: u16,  // 2
    /// Withdrawal fee kept by the treasury, in token B
    pub token_b_withdrawal_spread: u16,    // 2
    /// Share of the withdrawal fee redirected to a position's referrer
    pub token_b_referral_spread: u16,      // 2
    pub admin: Pubkey,                     // 32
}

impl VaultProtoConfig {
    // 8 discriminator + 8+2+2+2+32 = 54
    pub const LEN: usize = 54;

    /// Validate and store the template. Signed granularity inputs are
    /// accepted and stored as their absolute value.
    pub fn init(
        &mut self,
        granularity: i64,
        token_a_drip_trigger_spread: u16,
        token_b_withdrawal_spread: u16,
        token_b_referral_spread: u16,
        admin: Pubkey,
    ) -> Result<()> {
        let granularity = granularity.unsigned_abs();
        require!(granularity > 0, DripError::InvalidGranularity);
        for spread in [
            token_a_drip_trigger_spread,
            token_b_withdrawal_spread,
            token_b_referral_spread,
        ] {
            require!(spread < MAX_SPREAD_BPS, DripError::InvalidSpread);
        }

        self.granularity = granularity;
        self.token_a_drip_trigger_spread = token_a_drip_trigger_spread;
        self.token_b_withdrawal_spread = token_b_withdrawal_spread;
        self.token_b_referral_spread = token_b_referral_spread;
        self.admin = admin;
        Ok(())
    }
}
