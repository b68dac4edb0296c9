//! `SeaORM` Entity for users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub status: String,
    pub agent_profile_id: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::agent_profiles::Entity",
        from = "Column::AgentProfileId",
        to = "super::agent_profiles::Column::Id"
    )]
    AgentProfiles,
}

impl Related<super::agent_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AgentProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns true when the stored role is owner.
    pub fn is_owner(&self) -> bool {
        self.role == brilink_core::auth::UserRole::Owner.as_str()
    }

    /// Returns true when the account may log in.
    pub fn is_active(&self) -> bool {
        self.status == brilink_core::auth::AccountStatus::Active.as_str()
    }
}
