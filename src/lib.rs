pub mod auction;
pub mod caller;
pub mod config;
pub mod ledger;
pub mod persistence;
pub mod service;

pub use self::{
    auction::{Amount, Auction, AuctionId, AuctionStatus, Bid, Identity, LedgerError},
    caller::CallerIdentity,
    ledger::AuctionLedger,
};
