//! Bid intake and bid query: guarded create/read plumbing around the `bids`
//! table. The hiring coordinator (`crate::hiring`) owns all status changes.

use std::collections::HashMap;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::authorization::is_owner;
use crate::db::bids as bid_db;
use crate::db::gigs as gig_db;
use crate::db::users as user_db;
use crate::models::bids::{BidDetails, SubmitBid};
use crate::models::gigs::Status;
use crate::models::users;

#[derive(Debug, Error)]
pub enum BidError {
    #[error("Gig {0} not found")]
    GigNotFound(Uuid),
    #[error("Only the gig owner can view these bids")]
    NotOwner,
    #[error("Gig is not open for bidding")]
    GigNotOpen,
    #[error("You cannot bid on your own gig")]
    OwnBid,
    #[error("You have already bid on this gig")]
    DuplicateBid,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Record a new bid from `acting_user` against an open gig.
///
/// Duplicate prevention does not rely on a prior read: the unique index on
/// (gig_id, freelancer_id) makes the second of two racing submissions fail
/// at insert time, which maps to `DuplicateBid`.
pub async fn submit_bid(
    db: &DatabaseConnection,
    acting_user: &users::Model,
    input: SubmitBid,
) -> Result<BidDetails, BidError> {
    if input.message.trim().is_empty() {
        return Err(BidError::InvalidInput("Message must not be empty"));
    }
    if !input.price.is_finite() || input.price < 0.0 {
        return Err(BidError::InvalidInput("Price must be a non-negative number"));
    }

    let gig = gig_db::get_gig_by_id(db, input.gig_id)
        .await?
        .ok_or(BidError::GigNotFound(input.gig_id))?;

    if gig.status != Status::Open {
        return Err(BidError::GigNotOpen);
    }
    if is_owner(&gig, acting_user.id) {
        return Err(BidError::OwnBid);
    }

    let bid = bid_db::insert_bid(db, gig.id, acting_user.id, input.message, input.price)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => BidError::DuplicateBid,
            _ => BidError::Db(e),
        })?;

    Ok(BidDetails::resolve(bid, gig.title, Some(acting_user)))
}

/// List all bids on a gig, newest first, with freelancer display fields.
/// Only the gig's owner may look.
pub async fn list_bids(
    db: &DatabaseConnection,
    acting_user: Uuid,
    gig_id: Uuid,
) -> Result<Vec<BidDetails>, BidError> {
    let gig = gig_db::get_gig_by_id(db, gig_id)
        .await?
        .ok_or(BidError::GigNotFound(gig_id))?;

    if !is_owner(&gig, acting_user) {
        return Err(BidError::NotOwner);
    }

    let bids = bid_db::get_bids_for_gig(db, gig_id).await?;

    // One batched lookup for all freelancer display fields.
    let mut freelancer_ids: Vec<Uuid> = bids.iter().map(|b| b.freelancer_id).collect();
    freelancer_ids.sort_unstable();
    freelancer_ids.dedup();

    let freelancers = user_db::get_users_by_ids(db, freelancer_ids).await?;
    let by_id: HashMap<Uuid, &users::Model> = freelancers.iter().map(|u| (u.id, u)).collect();

    Ok(bids
        .into_iter()
        .map(|bid| {
            let freelancer = by_id.get(&bid.freelancer_id).copied();
            BidDetails::resolve(bid, gig.title.clone(), freelancer)
        })
        .collect())
}
