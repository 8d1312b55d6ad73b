//! HTTP surface of the ledger
//!
//! Each route maps onto one ledger operation. The caller identity is
//! whatever the host put into the `x-caller` header.
use crate::{
    auction::{Amount, Auction, AuctionId, Identity, LedgerError},
    ledger::{AuctionLedger, SharedLedger},
};
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{future::Future, net::SocketAddr};
use thiserror::Error;
use tracing::{error, info, warn};

pub const CALLER_HEADER: &str = "x-caller";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("missing x-caller header")]
    MissingCaller,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Body(#[from] JsonRejection),
    #[error("ledger task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCaller => StatusCode::UNAUTHORIZED,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Ledger(LedgerError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Ledger(LedgerError::InvalidState { .. }) => StatusCode::CONFLICT,
            ApiError::Ledger(LedgerError::InvalidBid { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Ledger(LedgerError::Unauthorized { .. }) => StatusCode::FORBIDDEN,
            ApiError::Ledger(LedgerError::Store(_)) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// The identity of the party making the request
pub struct Caller(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| Caller(Identity::new(value)))
            .ok_or(ApiError::MissingCaller)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateAuction {
    pub item: String,
    pub minimum_bid: Amount,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AuctionCreated {
    pub auction_id: AuctionId,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PlaceBid {
    pub amount: Amount,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AuctionClosed {
    pub winner: Option<Identity>,
}

/// Run a ledger call on the blocking pool; stores are synchronous
async fn with_ledger<T, F>(ledger: SharedLedger, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AuctionLedger) -> Result<T, LedgerError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || f(&ledger)).await??)
}

async fn create_auction(
    State(ledger): State<SharedLedger>,
    Caller(caller): Caller,
    req: Result<Json<CreateAuction>, JsonRejection>,
) -> Result<(StatusCode, Json<AuctionCreated>), ApiError> {
    let Json(req) = req?;
    let auction_id = with_ledger(ledger, move |ledger| {
        ledger.create_auction(&caller, req.item, req.minimum_bid)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(AuctionCreated { auction_id })))
}

async fn get_auction(
    State(ledger): State<SharedLedger>,
    Path(auction_id): Path<AuctionId>,
) -> Result<Json<Auction>, ApiError> {
    Ok(Json(
        with_ledger(ledger, move |ledger| ledger.auction(auction_id)).await?,
    ))
}

async fn place_bid(
    State(ledger): State<SharedLedger>,
    Caller(caller): Caller,
    Path(auction_id): Path<AuctionId>,
    req: Result<Json<PlaceBid>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = req?;
    with_ledger(ledger, move |ledger| {
        ledger.place_bid(&caller, auction_id, req.amount)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn close_auction(
    State(ledger): State<SharedLedger>,
    Caller(caller): Caller,
    Path(auction_id): Path<AuctionId>,
) -> Result<Json<AuctionClosed>, ApiError> {
    let winner = with_ledger(ledger, move |ledger| {
        ledger.close_auction(&caller, auction_id)
    })
    .await?;
    Ok(Json(AuctionClosed { winner }))
}

async fn cancel_auction(
    State(ledger): State<SharedLedger>,
    Caller(caller): Caller,
    Path(auction_id): Path<AuctionId>,
) -> Result<StatusCode, ApiError> {
    with_ledger(ledger, move |ledger| {
        ledger.cancel_auction(&caller, auction_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(ledger: SharedLedger) -> Router {
    Router::new()
        .route("/auctions", post(create_auction))
        .route("/auctions/:auction_id", get(get_auction))
        .route("/auctions/:auction_id/bids", post(place_bid))
        .route("/auctions/:auction_id/close", post(close_auction))
        .route("/auctions/:auction_id/cancel", post(cancel_auction))
        .with_state(ledger)
}

pub async fn serve(
    listen: SocketAddr,
    ledger: SharedLedger,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    info!(%listen, "serving ledger");
    axum::Server::try_bind(&listen)?
        .serve(router(ledger).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("ledger stopped");
    Ok(())
}
