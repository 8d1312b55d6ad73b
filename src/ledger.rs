//! Auction Ledger
//!
//! Owns auction records in a [`Store`](crate::persistence::Store) and enforces the `Open -> Closed`
//! lifecycle. Every operation is a plain read-modify-write against the
//! store: two requests racing on the same auction can overwrite each
//! other's record (last write wins).
use crate::auction::{Amount, Auction, AuctionId, Bid, Identity, LedgerError};
use crate::caller::CallerIdentity;
use crate::persistence::{Key, SharedStore, Value};
use anyhow::format_err;
use std::sync::Arc;
use tracing::{debug, info};

pub type SharedLedger = Arc<AuctionLedger>;

pub struct AuctionLedger {
    store: SharedStore,
}

impl AuctionLedger {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn new_shared(store: SharedStore) -> SharedLedger {
        Arc::new(Self::new(store))
    }

    pub fn create_auction(
        &self,
        caller: &dyn CallerIdentity,
        item: impl Into<String>,
        minimum_bid: Amount,
    ) -> Result<AuctionId, LedgerError> {
        let auction_id = self.next_auction_id()?;
        let next_auction_id = auction_id
            .checked_add(1)
            .ok_or_else(|| LedgerError::Store(format_err!("auction ids exhausted")))?;
        let auction = Auction::new(caller.caller(), item, minimum_bid);
        debug!(auction_id, seller = %auction.seller, item = %auction.item, minimum_bid, "creating auction");

        self.save(auction_id, auction)?;
        self.store
            .set(Key::NextAuctionId, Value::NextAuctionId(next_auction_id))
            .map_err(LedgerError::Store)?;

        info!(auction_id, "auction created");
        Ok(auction_id)
    }

    pub fn place_bid(
        &self,
        caller: &dyn CallerIdentity,
        auction_id: AuctionId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let bidder = caller.caller();
        debug!(auction_id, %bidder, amount, "placing bid");

        let auction = self.load(auction_id)?.with_bid(auction_id, Bid { bidder, amount })?;
        self.save(auction_id, auction)
    }

    /// Close the auction and return the winning bidder, if any
    ///
    /// Anyone may close an auction; only cancelling is restricted to the seller.
    pub fn close_auction(
        &self,
        caller: &dyn CallerIdentity,
        auction_id: AuctionId,
    ) -> Result<Option<Identity>, LedgerError> {
        debug!(auction_id, caller = %caller.caller(), "closing auction");

        let auction = self.load(auction_id)?.close(auction_id)?;
        let winner = auction.winner.clone();
        self.save(auction_id, auction)?;

        info!(auction_id, winner = ?winner, "auction closed");
        Ok(winner)
    }

    pub fn cancel_auction(
        &self,
        caller: &dyn CallerIdentity,
        auction_id: AuctionId,
    ) -> Result<(), LedgerError> {
        let caller = caller.caller();
        debug!(auction_id, %caller, "cancelling auction");

        let auction = self.load(auction_id)?.cancel(auction_id, &caller)?;
        self.save(auction_id, auction)?;

        info!(auction_id, "auction cancelled");
        Ok(())
    }

    pub fn auction(&self, auction_id: AuctionId) -> Result<Auction, LedgerError> {
        self.load(auction_id)
    }

    fn next_auction_id(&self) -> Result<AuctionId, LedgerError> {
        self.store
            .get(&Key::NextAuctionId)
            .and_then(|value| value.map(Value::into_next_auction_id).transpose())
            .map(|id| id.unwrap_or(0))
            .map_err(LedgerError::Store)
    }

    fn load(&self, auction_id: AuctionId) -> Result<Auction, LedgerError> {
        self.store
            .get(&Key::Auction(auction_id))
            .and_then(|value| value.map(Value::into_auction).transpose())
            .map_err(LedgerError::Store)?
            .ok_or(LedgerError::NotFound(auction_id))
    }

    fn save(&self, auction_id: AuctionId, auction: Auction) -> Result<(), LedgerError> {
        self.store
            .set(Key::Auction(auction_id), Value::Auction(auction))
            .map_err(LedgerError::Store)
    }
}
