//! Coin-to-currency conversion.
//!
//! A withdrawal validates the request, reads the ledger once to lock the
//! tier's conversion rate, and hands a `PENDING` reservation to the ledger
//! service, which debits the coins and stores the reservation in one write.
//! Payout itself is a manual workflow downstream of the reservation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::application::ledger::SquadLedgerService;
use crate::domain::error::LedgerError;
use crate::domain::{
    ReservationId, SquadId, WithdrawalRequest, WithdrawalReservation, WithdrawalStatus,
};
use crate::error::Result;
use crate::port::outbound::store::LedgerStore;

/// Withdrawal entry point for squad leaders.
pub struct ConversionService<S> {
    ledger: Arc<SquadLedgerService<S>>,
}

impl<S: LedgerStore> ConversionService<S> {
    pub fn new(ledger: Arc<SquadLedgerService<S>>) -> Self {
        Self { ledger }
    }

    /// Reserve coins for a payout at the squad's current conversion rate.
    ///
    /// The rate is taken from the tier read at request time, even if a
    /// concurrent outcome moves the squad before the debit lands.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] for a malformed request and
    /// [`LedgerError::InsufficientBalance`] when the balance is too small.
    /// Neither mutates the ledger.
    pub async fn request_withdrawal(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalReservation> {
        request.validate()?;

        let ledger = self.ledger.ledger(&request.squad_id).await?;
        if ledger.is_archived() {
            return Err(LedgerError::SquadArchived(request.squad_id.clone()).into());
        }
        if request.requested_coins > ledger.current_bounty_coins {
            warn!(
                squad_id = %request.squad_id,
                requested = request.requested_coins,
                available = ledger.current_bounty_coins,
                "Withdrawal exceeds balance"
            );
            return Err(LedgerError::InsufficientBalance {
                requested: request.requested_coins,
                available: ledger.current_bounty_coins,
            }
            .into());
        }

        let catalog = self.ledger.catalog();
        let conversion_rate = catalog.config_for(ledger.tier)?.conversion_rate;
        let currency_amount = catalog.currency_for(ledger.tier, request.requested_coins)?;

        let reservation = WithdrawalReservation {
            id: ReservationId::new(),
            squad_id: request.squad_id.clone(),
            tier: ledger.tier,
            coins: request.requested_coins,
            conversion_rate,
            currency_amount,
            payout_details: request.payout_details.clone(),
            status: WithdrawalStatus::Pending,
            requested_at: Utc::now(),
        };
        self.ledger.spend_with_reservation(&reservation).await?;

        info!(
            squad_id = %reservation.squad_id,
            reservation_id = %reservation.id,
            tier = %reservation.tier,
            rate = %reservation.conversion_rate,
            "Payout handed off"
        );
        Ok(reservation)
    }

    /// Reservations for a squad, oldest first.
    ///
    /// # Errors
    /// Returns [`LedgerError::SquadNotFound`] if no ledger exists.
    pub async fn withdrawals(&self, squad_id: &SquadId) -> Result<Vec<WithdrawalReservation>> {
        self.ledger.withdrawals(squad_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemoryLedgerStore;
    use crate::application::ledger::LedgerPolicy;
    use crate::domain::{DivisionCatalog, DivisionTier, SquadLedger};
    use crate::port::outbound::notifier::NullNotifier;
    use rust_decimal_macros::dec;

    async fn service_with(tier: DivisionTier, coins: u64) -> ConversionService<MemoryLedgerStore> {
        let store = Arc::new(MemoryLedgerStore::new());
        let mut ledger = SquadLedger::new(SquadId::new("alpha"), Utc::now());
        ledger.tier = tier;
        ledger.current_bounty_coins = coins;
        store.insert(&ledger).await.unwrap();

        let ledger = SquadLedgerService::new(
            store,
            Arc::new(DivisionCatalog::default()),
            Arc::new(NullNotifier),
            LedgerPolicy::default(),
        );
        ConversionService::new(Arc::new(ledger))
    }

    fn request(coins: u64) -> WithdrawalRequest {
        WithdrawalRequest {
            squad_id: SquadId::new("alpha"),
            requested_coins: coins,
            payout_details: "iban:DE00".into(),
        }
    }

    #[tokio::test]
    async fn reserves_at_current_tier_rate() {
        let service = service_with(DivisionTier::Gold, 400).await;

        let reservation = service.request_withdrawal(&request(100)).await.unwrap();
        assert_eq!(reservation.tier, DivisionTier::Gold);
        assert_eq!(reservation.conversion_rate, dec!(1.50));
        assert_eq!(reservation.currency_amount, dec!(3.00));
        assert_eq!(reservation.status, WithdrawalStatus::Pending);

        let stored = service.withdrawals(&SquadId::new("alpha")).await.unwrap();
        assert_eq!(stored, vec![reservation]);
    }

    #[tokio::test]
    async fn rejects_zero_amount() {
        let service = service_with(DivisionTier::Gold, 400).await;
        let err = service.request_withdrawal(&request(0)).await.unwrap_err();
        assert!(matches!(err.as_ledger(), Some(LedgerError::Validation { .. })));
    }

    #[tokio::test]
    async fn rejects_overdraw() {
        let service = service_with(DivisionTier::Silver, 10).await;
        let err = service.request_withdrawal(&request(11)).await.unwrap_err();
        assert!(matches!(
            err.as_ledger(),
            Some(LedgerError::InsufficientBalance { .. })
        ));
        assert!(service.withdrawals(&SquadId::new("alpha")).await.unwrap().is_empty());
    }
}
