//! The hiring coordinator: moves a gig from `open` to `assigned`, fans the
//! outcome out to every bid on the gig, and notifies the winner.
//!
//! This is the only code path that spans both entities, and the only one
//! that must stay correct when two hire attempts race on the same gig.

use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::authorization::is_owner;
use crate::db::bids as bid_db;
use crate::db::gigs as gig_db;
use crate::db::users as user_db;
use crate::models::bids::{self, BidDetails};
use crate::models::gigs;
use crate::notify::protocol::ServerEvent;
use crate::notify::server::NotificationServer;

/// Everything that can go wrong while hiring. Each precondition gets its own
/// variant so the handler can map them to distinct status codes.
#[derive(Debug, Error)]
pub enum HireError {
    #[error("Bid {0} not found")]
    BidNotFound(Uuid),
    #[error("Gig {0} not found")]
    GigNotFound(Uuid),
    #[error("Only the gig owner can hire for this gig")]
    NotOwner,
    #[error("Gig is already assigned")]
    GigNotOpen,
    #[error("Bid is already processed")]
    BidNotPending,
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Run the ordered precondition checks against a fresh read of the aggregate.
/// No side effects; returns the rows so the caller can reuse them.
async fn check_preconditions(
    db: &DatabaseConnection,
    acting_user: Uuid,
    bid_id: Uuid,
) -> Result<(bids::Model, gigs::Model), HireError> {
    let bid = bid_db::get_bid_by_id(db, bid_id)
        .await?
        .ok_or(HireError::BidNotFound(bid_id))?;

    let gig = gig_db::get_gig_by_id(db, bid.gig_id)
        .await?
        .ok_or(HireError::GigNotFound(bid.gig_id))?;

    if !is_owner(&gig, acting_user) {
        return Err(HireError::NotOwner);
    }
    if gig.status != gigs::Status::Open {
        return Err(HireError::GigNotOpen);
    }
    if bid.status != bids::Status::Pending {
        return Err(HireError::BidNotPending);
    }

    Ok((bid, gig))
}

/// Hire the freelancer behind `bid_id` on behalf of `acting_user`.
///
/// On success the gig is `assigned`, the chosen bid is `hired`, and every
/// sibling bid is `rejected` — all committed as one transaction. The
/// transaction's first write is a conditional update on the gig's status, so
/// of two racing hire attempts exactly one can commit; the loser re-reads
/// the aggregate once and surfaces the error the fresh state produces
/// (normally `GigNotOpen`).
///
/// The winner notification runs after commit and is fire-and-forget: the
/// hire is already durable, so an empty delivery is logged, never returned.
pub async fn hire(
    db: &DatabaseConnection,
    notifications: &NotificationServer,
    acting_user: Uuid,
    bid_id: Uuid,
) -> Result<BidDetails, HireError> {
    let (bid, gig) = check_preconditions(db, acting_user, bid_id).await?;

    let txn = db.begin().await?;

    if !gig_db::assign_gig_if_open(&txn, gig.id).await? {
        // A concurrent hire committed between our read and this write.
        txn.rollback().await?;
        return match check_preconditions(db, acting_user, bid_id).await {
            Ok(_) => Err(HireError::GigNotOpen),
            Err(e) => Err(e),
        };
    }

    bid_db::mark_bid_hired(&txn, bid.id).await?;
    bid_db::reject_sibling_bids(&txn, gig.id, bid.id).await?;

    txn.commit().await?;

    // The state transition is durable from here on. Resolve display fields
    // and notify the winner; neither step may fail the hire.
    let freelancer = user_db::get_user_by_id(db, bid.freelancer_id)
        .await
        .ok()
        .flatten();

    let event = ServerEvent::hired(gig.id, &gig.title, bid.id, bid.price);
    let delivered = notifications.emit_to_user(bid.freelancer_id, event).await;
    if delivered == 0 {
        tracing::warn!(
            freelancer_id = %bid.freelancer_id,
            gig_id = %gig.id,
            "hired notification not delivered: no live connection"
        );
    } else {
        tracing::info!(
            freelancer_id = %bid.freelancer_id,
            gig_id = %gig.id,
            delivered,
            "hired notification delivered"
        );
    }

    let hired = bids::Model {
        status: bids::Status::Hired,
        ..bid
    };
    Ok(BidDetails::resolve(hired, gig.title, freelancer.as_ref()))
}
