//! `SeaORM` Entity for agent_profiles table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agent_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub owner_id: Option<i64>,
    pub agent_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub total_balance: Decimal,
    pub logo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::edc_machines::Entity")]
    EdcMachines,
}

impl Related<super::edc_machines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EdcMachines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns true when `user_id` controls this agent, either as its user or
    /// as the owner who created it.
    pub fn is_controlled_by(&self, user_id: i64) -> bool {
        self.user_id == user_id || self.owner_id == Some(user_id)
    }
}
