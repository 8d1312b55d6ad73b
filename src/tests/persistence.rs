use crate::{
    auction::{Auction, Identity},
    persistence::{InMemoryStore, Key, Store, Value},
};
use anyhow::Result;

#[test]
fn in_memory_store_sanity_check() -> Result<()> {
    let store = InMemoryStore::new();
    assert!(store.is_empty());
    assert_eq!(store.get(&Key::NextAuctionId)?, None);

    store.set(Key::NextAuctionId, Value::NextAuctionId(1))?;
    store.set(Key::NextAuctionId, Value::NextAuctionId(2))?;
    let auction = Auction::new(Identity::new("seller"), "Vase", 100);
    store.set(Key::Auction(0), Value::Auction(auction.clone()))?;

    assert_eq!(store.len(), 2);
    assert_eq!(
        store.get(&Key::NextAuctionId)?,
        Some(Value::NextAuctionId(2))
    );
    assert_eq!(store.get(&Key::Auction(0))?, Some(Value::Auction(auction)));
    assert_eq!(store.get(&Key::Auction(1))?, None);
    Ok(())
}

#[test]
fn storage_keys() {
    assert_eq!(Key::NextAuctionId.to_storage_key(), "auctionId");
    assert_eq!(Key::Auction(17).to_storage_key(), "17");
}

#[test]
fn values_have_a_stable_json_layout() -> Result<()> {
    let auction = Auction::new(Identity::new("seller"), "Vase", 100);
    let json = serde_json::to_value(Value::Auction(auction))?;

    assert_eq!(
        json,
        serde_json::json!({
            "Auction": {
                "seller": "seller",
                "item": "Vase",
                "minimum_bid": 100,
                "bids": [],
                "status": "Open",
                "winner": null,
            }
        })
    );
    assert_eq!(
        serde_json::from_str::<Value>(r#"{"NextAuctionId":3}"#)?,
        Value::NextAuctionId(3)
    );
    Ok(())
}

#[test]
fn records_without_a_winner_field_still_load() -> Result<()> {
    let value: Value = serde_json::from_str(
        r#"{"Auction":{"seller":"s","item":"Lamp","minimum_bid":5,"bids":[{"bidder":"b","amount":6}],"status":"Closed"}}"#,
    )?;
    let auction = value.into_auction()?;

    assert_eq!(auction.winner, None);
    assert_eq!(auction.bids[0].bidder, Identity::new("b"));
    Ok(())
}

#[test]
fn value_accessors_reject_the_wrong_shape() {
    assert!(Value::NextAuctionId(1).into_auction().is_err());
    assert!(Value::Auction(Auction::new(Identity::new("s"), "x", 0))
        .into_next_auction_id()
        .is_err());
}
