//! `SeaORM` Entity for services table.

use brilink_core::posting::ServiceCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub requires_target: bool,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_fees::Entity")]
    ServiceFees,
}

impl Related<super::service_fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceFees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Resolves the free-text category into a [`ServiceCategory`].
    pub fn service_category(&self) -> ServiceCategory {
        ServiceCategory::parse(self.category.as_deref())
    }
}
