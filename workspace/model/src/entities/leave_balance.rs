use sea_orm::entity::prelude::*;

/// The credit ledger row for one (personnel, leave type, year) triple.
///
/// `used_credits` moves only when a leave application is approved;
/// `total_credits` moves only through balance initialization or a recorded
/// leave adjustment. Remaining credits are `total + earned - used`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub personnel_id: i32,
    pub leave_type_id: i32,
    pub year: i32,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub total_credits: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub used_credits: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub earned_credits: Decimal,
    pub last_updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::personnel::Entity",
        from = "Column::PersonnelId",
        to = "super::personnel::Column::Id"
    )]
    Personnel,
    #[sea_orm(
        belongs_to = "super::leave_type::Entity",
        from = "Column::LeaveTypeId",
        to = "super::leave_type::Column::Id"
    )]
    LeaveType,
}

impl Related<super::personnel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Personnel.def()
    }
}

impl Related<super::leave_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
