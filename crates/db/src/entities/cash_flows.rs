//! `SeaORM` Entity for cash_flows table.

use brilink_core::cashflow::CashFlowType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_flows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub agent_profile_id: Option<i64>,
    pub user_id: i64,
    #[sea_orm(column_name = "type")]
    pub flow_type: String,
    pub source: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub description: Option<String>,
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
    /// Parsed flow type. Unknown stored values yield `None`.
    pub fn kind(&self) -> Option<CashFlowType> {
        self.flow_type.parse().ok()
    }
}
