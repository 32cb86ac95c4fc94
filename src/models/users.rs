use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Roles {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "freelancer")]
    Freelancer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: Option<String>,
    pub auth_provider: String,
    pub role: Roles,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::gigs::Entity")]
    Gigs,
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
}

impl Related<super::gigs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gigs.def()
    }
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used internally by the auth middleware to create a user from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateUserFromAuth {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub auth_provider: String,
    pub role: Roles,
}

/// A safe user representation for API responses (never leaks internal fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Roles,
    pub created_at: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            display_name: m.display_name,
            role: m.role,
            created_at: m.created_at,
        }
    }
}
