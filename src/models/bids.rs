use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bid status stored as a lowercase string in the database.
///
/// Every bid starts as `Pending`. `Hired` and `Rejected` are terminal: the
/// hiring coordinator is the only code that moves a bid out of `Pending`,
/// and for any gig at most one bid ever becomes `Hired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "hired")]
    Hired,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// SeaORM entity for the `bids` table.
///
/// (gig_id, freelancer_id) carries a unique index — duplicate submissions
/// are rejected by the database, not by a prior read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub gig_id: Uuid,
    pub freelancer_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub status: Status,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gigs::Entity",
        from = "Column::GigId",
        to = "super::gigs::Column::Id"
    )]
    Gig,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FreelancerId",
        to = "super::users::Column::Id"
    )]
    Freelancer,
}

impl Related<super::gigs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gig.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/bids.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBid {
    pub gig_id: Uuid,
    pub message: String,
    pub price: f64,
}

/// A bid with its display fields resolved (freelancer name/email, gig title).
#[derive(Debug, Clone, Serialize)]
pub struct BidDetails {
    pub id: Uuid,
    pub gig_id: Uuid,
    pub freelancer_id: Uuid,
    pub message: String,
    pub price: f64,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub freelancer_name: Option<String>,
    pub freelancer_email: Option<String>,
    pub gig_title: String,
}

impl BidDetails {
    /// Combine a bid row with its gig and (optionally resolved) freelancer.
    pub fn resolve(
        bid: Model,
        gig_title: String,
        freelancer: Option<&super::users::Model>,
    ) -> Self {
        Self {
            id: bid.id,
            gig_id: bid.gig_id,
            freelancer_id: bid.freelancer_id,
            message: bid.message,
            price: bid.price,
            status: bid.status,
            created_at: bid.created_at,
            freelancer_name: freelancer.and_then(|u| u.display_name.clone()),
            freelancer_email: freelancer.map(|u| u.email.clone()),
            gig_title,
        }
    }
}
