//! Key-value persistence for the ledger
//!
//! The ledger keeps exactly two kinds of entries: the next-id counter
//! and one record per auction. Stores only promise single-key atomicity;
//! there are no transactions spanning a `get` and the following `set`.
pub mod in_memory;
pub mod postgres;

pub use self::{in_memory::InMemoryStore, postgres::PostgresStore};

use crate::auction::{Auction, AuctionId};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const NEXT_AUCTION_ID_KEY: &str = "auctionId";

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    NextAuctionId,
    Auction(AuctionId),
}

impl Key {
    /// The textual key used by backends that store strings
    pub fn to_storage_key(self) -> String {
        match self {
            Key::NextAuctionId => NEXT_AUCTION_ID_KEY.to_owned(),
            Key::Auction(id) => id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    NextAuctionId(AuctionId),
    Auction(Auction),
}

impl Value {
    pub fn into_next_auction_id(self) -> Result<AuctionId> {
        match self {
            Value::NextAuctionId(id) => Ok(id),
            other => bail!("expected the next auction id, found {other:?}"),
        }
    }

    pub fn into_auction(self) -> Result<Auction> {
        match self {
            Value::Auction(auction) => Ok(auction),
            other => bail!("expected an auction, found {other:?}"),
        }
    }
}

/// An external key-value store holding all ledger state
pub trait Store {
    fn get(&self, key: &Key) -> Result<Option<Value>>;
    fn set(&self, key: Key, value: Value) -> Result<()>;
}

pub type SharedStore = Arc<dyn Store + Send + Sync + 'static>;
