//! `SeaORM` Entity for edc_machines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "edc_machines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub agent_profile_id: Option<i64>,
    pub name: String,
    pub bank_name: String,
    pub account_number: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub saldo: Decimal,
    pub status: String,
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
