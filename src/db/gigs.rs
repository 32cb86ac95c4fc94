use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::gigs::{self, CreateGig, Status};

/// Insert a new gig into the database. New gigs always start `open`.
pub async fn insert_gig(
    db: &DatabaseConnection,
    input: CreateGig,
    user_id: Uuid,
) -> Result<gigs::Model, DbErr> {
    let new_gig = gigs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        budget: Set(input.budget),
        status: Set(Status::Open),
        user_id: Set(user_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_gig.insert(db).await
}

/// Fetch all open gigs, newest first, with an optional case-insensitive
/// title filter.
pub async fn list_open_gigs(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<gigs::Model>, DbErr> {
    let mut query = gigs::Entity::find().filter(gigs::Column::Status.eq(Status::Open));

    if let Some(term) = search {
        if !term.is_empty() {
            // ILIKE: "landing" must match "Landing page".
            query = query.filter(
                Expr::col((gigs::Entity, gigs::Column::Title)).ilike(format!("%{term}%")),
            );
        }
    }

    query
        .order_by_desc(gigs::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch a single gig by ID.
pub async fn get_gig_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<gigs::Model>, DbErr> {
    gigs::Entity::find_by_id(id).one(db).await
}

/// Flip a gig from `open` to `assigned`, but only if it is still `open`.
///
/// The status predicate in the WHERE clause is what serializes concurrent
/// hire attempts: the first committer matches the row, everyone else gets
/// `rows_affected == 0` and must re-read.
pub async fn assign_gig_if_open<C: ConnectionTrait>(db: &C, gig_id: Uuid) -> Result<bool, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::Status, Expr::value(Status::Assigned))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::Status.eq(Status::Open))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
