use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type AuctionId = u64;
pub type Amount = u64;

/// An opaque, comparable identity of a party acting on the ledger
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("auction does not exist: {0}")]
    NotFound(AuctionId),
    #[error("auction {auction_id} is {status}")]
    InvalidState {
        auction_id: AuctionId,
        status: AuctionStatus,
    },
    #[error("bid of {amount} must be higher than the minimum bid of {minimum_bid}")]
    InvalidBid { amount: Amount, minimum_bid: Amount },
    #[error("only the seller can cancel auction {auction_id}")]
    Unauthorized { auction_id: AuctionId, caller: Identity },
    #[error("store failure")]
    Store(#[source] anyhow::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: Identity,
    pub amount: Amount,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionStatus {
    Open,
    Closed,
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuctionStatus::Open => "open",
            AuctionStatus::Closed => "closed",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub seller: Identity,
    pub item: String,
    pub minimum_bid: Amount,
    /// In arrival order
    pub bids: Vec<Bid>,
    pub status: AuctionStatus,
    /// Set when the auction is closed with at least one winning bid
    #[serde(default)]
    pub winner: Option<Identity>,
}

impl Auction {
    pub fn new(seller: Identity, item: impl Into<String>, minimum_bid: Amount) -> Self {
        Self {
            seller,
            item: item.into(),
            minimum_bid,
            bids: vec![],
            status: AuctionStatus::Open,
            winner: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == AuctionStatus::Open
    }

    fn ensure_open(&self, auction_id: AuctionId) -> Result<(), LedgerError> {
        if !self.is_open() {
            return Err(LedgerError::InvalidState {
                auction_id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Append a bid, returning the updated record
    ///
    /// Bids are only checked against `minimum_bid`, never against earlier bids.
    pub fn with_bid(self, auction_id: AuctionId, bid: Bid) -> Result<Self, LedgerError> {
        self.ensure_open(auction_id)?;
        if bid.amount <= self.minimum_bid {
            return Err(LedgerError::InvalidBid {
                amount: bid.amount,
                minimum_bid: self.minimum_bid,
            });
        }

        let mut bids = self.bids;
        bids.push(bid);
        Ok(Self { bids, ..self })
    }

    /// The first bid carrying the maximum amount, if any amount exceeds 0
    pub fn highest_bid(&self) -> Option<&Bid> {
        let mut highest: Option<&Bid> = None;
        for bid in &self.bids {
            if bid.amount > highest.map(|h| h.amount).unwrap_or(0) {
                highest = Some(bid);
            }
        }
        highest
    }

    pub fn close(self, auction_id: AuctionId) -> Result<Self, LedgerError> {
        self.ensure_open(auction_id)?;
        let winner = self.highest_bid().map(|bid| bid.bidder.clone());
        Ok(Self {
            status: AuctionStatus::Closed,
            winner,
            ..self
        })
    }

    pub fn cancel(self, auction_id: AuctionId, caller: &Identity) -> Result<Self, LedgerError> {
        self.ensure_open(auction_id)?;
        if *caller != self.seller {
            return Err(LedgerError::Unauthorized {
                auction_id,
                caller: caller.clone(),
            });
        }
        Ok(Self {
            status: AuctionStatus::Closed,
            ..self
        })
    }
}
