use sea_orm::entity::prelude::*;

/// A category of leave (vacation, sick, special privilege, ...) that credits
/// are tracked against.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub leave_type_name: String,
    pub description: Option<String>,
    pub requires_document: bool,
    pub max_days: Option<i32>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::leave_balance::Entity")]
    LeaveBalance,
    #[sea_orm(has_many = "super::leave_application::Entity")]
    LeaveApplication,
}

impl Related<super::leave_balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveBalance.def()
    }
}

impl Related<super::leave_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveApplication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
