//! Per-tier standings with an invalidation-driven cache.
//!
//! Standings are rebuilt from the ledger store on a miss and served from the
//! cache until a committed event for that tier invalidates it. Each tier
//! carries a generation counter so a rebuild that raced with an invalidation
//! is discarded instead of caching stale data.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::domain::{DivisionTier, LedgerSnapshot};
use crate::error::Result;
use crate::port::outbound::store::LedgerStore;

/// Thread-safe standings cache keyed by tier.
#[derive(Debug, Default)]
pub struct LeaderboardCache {
    generations: DashMap<DivisionTier, u64>,
    standings: DashMap<DivisionTier, Vec<LedgerSnapshot>>,
}

impl LeaderboardCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation of a tier. Read before rebuilding.
    #[must_use]
    pub fn generation(&self, tier: DivisionTier) -> u64 {
        self.generations.get(&tier).map_or(0, |g| *g.value())
    }

    /// Cached standings for a tier.
    #[must_use]
    pub fn get(&self, tier: DivisionTier) -> Option<Vec<LedgerSnapshot>> {
        self.standings.get(&tier).map(|s| s.value().clone())
    }

    /// Store a rebuild if no invalidation happened since `generation`.
    pub fn fill(&self, tier: DivisionTier, generation: u64, standings: Vec<LedgerSnapshot>) -> bool {
        let current = self.generations.entry(tier).or_insert(0);
        if *current != generation {
            return false;
        }
        self.standings.insert(tier, standings);
        true
    }

    /// Drop a tier's standings.
    pub fn invalidate(&self, tier: DivisionTier) {
        let mut generation = self.generations.entry(tier).or_insert(0);
        *generation += 1;
        self.standings.remove(&tier);
        debug!(tier = %tier, generation = *generation, "Leaderboard invalidated");
    }
}

/// Read side for leaderboards and division display.
pub struct StandingsService<S> {
    store: Arc<S>,
    cache: Arc<LeaderboardCache>,
}

impl<S: LedgerStore> StandingsService<S> {
    pub fn new(store: Arc<S>, cache: Arc<LeaderboardCache>) -> Self {
        Self { store, cache }
    }

    /// Active squads ordered by tier (highest first), then coins.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read on a cache miss.
    pub async fn standings(&self, tier: Option<DivisionTier>) -> Result<Vec<LedgerSnapshot>> {
        let tiers: Vec<DivisionTier> = match tier {
            Some(tier) => vec![tier],
            None => DivisionTier::ALL.iter().rev().copied().collect(),
        };

        let mut cached = Vec::with_capacity(tiers.len());
        let mut missing = Vec::new();
        for tier in &tiers {
            match self.cache.get(*tier) {
                Some(standings) => cached.push((*tier, standings)),
                None => missing.push((*tier, self.cache.generation(*tier))),
            }
        }

        if !missing.is_empty() {
            let ledgers = self.store.list(false).await?;
            for (tier, generation) in missing {
                let mut standings: Vec<LedgerSnapshot> = ledgers
                    .iter()
                    .filter(|l| l.tier == tier)
                    .map(|l| l.snapshot())
                    .collect();
                standings.sort_by(|a, b| {
                    b.current_bounty_coins
                        .cmp(&a.current_bounty_coins)
                        .then_with(|| a.squad_id.cmp(&b.squad_id))
                });
                self.cache.fill(tier, generation, standings.clone());
                cached.push((tier, standings));
            }
        }

        cached.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(cached.into_iter().flat_map(|(_, s)| s).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemoryLedgerStore;
    use crate::domain::{SquadId, SquadLedger};
    use chrono::Utc;

    fn snapshot(id: &str, coins: u64) -> LedgerSnapshot {
        LedgerSnapshot {
            squad_id: SquadId::new(id),
            tier: DivisionTier::Gold,
            current_bounty_coins: coins,
            protection_charges: 0,
            consecutive_unprotected_losses: 0,
        }
    }

    #[test]
    fn fill_is_discarded_after_invalidation() {
        let cache = LeaderboardCache::new();
        let seen = cache.generation(DivisionTier::Gold);
        cache.invalidate(DivisionTier::Gold);
        assert!(!cache.fill(DivisionTier::Gold, seen, vec![snapshot("a", 1)]));
        assert!(cache.get(DivisionTier::Gold).is_none());

        let seen = cache.generation(DivisionTier::Gold);
        assert!(cache.fill(DivisionTier::Gold, seen, vec![snapshot("a", 1)]));
        assert_eq!(cache.get(DivisionTier::Gold).unwrap().len(), 1);
    }

    #[test]
    fn invalidate_only_touches_one_tier() {
        let cache = LeaderboardCache::new();
        cache.fill(DivisionTier::Gold, 0, vec![snapshot("a", 1)]);
        cache.fill(DivisionTier::Silver, 0, vec![]);
        cache.invalidate(DivisionTier::Silver);
        assert!(cache.get(DivisionTier::Gold).is_some());
        assert!(cache.get(DivisionTier::Silver).is_none());
    }

    #[tokio::test]
    async fn standings_order_by_tier_then_coins() {
        let store = Arc::new(MemoryLedgerStore::new());
        for (id, tier, coins) in [
            ("s1", DivisionTier::Silver, 120),
            ("g1", DivisionTier::Gold, 300),
            ("g2", DivisionTier::Gold, 450),
            ("d1", DivisionTier::Diamond, 10),
        ] {
            let mut ledger = SquadLedger::new(SquadId::new(id), Utc::now());
            ledger.tier = tier;
            ledger.current_bounty_coins = coins;
            store.insert(&ledger).await.unwrap();
        }

        let service = StandingsService::new(store, Arc::new(LeaderboardCache::new()));
        let ids: Vec<String> = service
            .standings(None)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.squad_id.to_string())
            .collect();
        assert_eq!(ids, vec!["d1", "g2", "g1", "s1"]);

        let gold = service.standings(Some(DivisionTier::Gold)).await.unwrap();
        assert_eq!(gold.len(), 2);
    }

    #[tokio::test]
    async fn standings_served_from_cache_until_invalidated() {
        let store = Arc::new(MemoryLedgerStore::new());
        let cache = Arc::new(LeaderboardCache::new());
        let service = StandingsService::new(store.clone(), cache.clone());

        assert!(service.standings(Some(DivisionTier::Silver)).await.unwrap().is_empty());

        store
            .insert(&SquadLedger::new(SquadId::new("late"), Utc::now()))
            .await
            .unwrap();
        // Still the cached empty list.
        assert!(service.standings(Some(DivisionTier::Silver)).await.unwrap().is_empty());

        cache.invalidate(DivisionTier::Silver);
        assert_eq!(service.standings(Some(DivisionTier::Silver)).await.unwrap().len(), 1);
    }
}
