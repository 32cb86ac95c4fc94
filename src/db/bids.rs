use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::bids::{self, Status};

/// Insert a new bid in `pending` state.
///
/// A unique index on (gig_id, freelancer_id) backs this insert: a duplicate
/// submission — even a concurrent one — fails with a unique-constraint
/// violation instead of creating a second row.
pub async fn insert_bid(
    db: &DatabaseConnection,
    gig_id: Uuid,
    freelancer_id: Uuid,
    message: String,
    price: f64,
) -> Result<bids::Model, DbErr> {
    let new_bid = bids::ActiveModel {
        id: Set(Uuid::new_v4()),
        gig_id: Set(gig_id),
        freelancer_id: Set(freelancer_id),
        message: Set(message),
        price: Set(price),
        status: Set(Status::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_bid.insert(db).await
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Fetch all bids for a gig, newest first.
pub async fn get_bids_for_gig(
    db: &DatabaseConnection,
    gig_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::GigId.eq(gig_id))
        .order_by_desc(bids::Column::CreatedAt)
        .all(db)
        .await
}

/// Mark the chosen bid as hired.
pub async fn mark_bid_hired<C: ConnectionTrait>(db: &C, bid_id: Uuid) -> Result<u64, DbErr> {
    let result = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(Status::Hired))
        .filter(bids::Column::Id.eq(bid_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Mark every other bid on the gig as rejected.
pub async fn reject_sibling_bids<C: ConnectionTrait>(
    db: &C,
    gig_id: Uuid,
    hired_bid_id: Uuid,
) -> Result<u64, DbErr> {
    let result = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(Status::Rejected))
        .filter(bids::Column::GigId.eq(gig_id))
        .filter(bids::Column::Id.ne(hired_bid_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
