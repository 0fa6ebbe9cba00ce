use sea_orm::entity::prelude::*;

/// Direction of a manual credit adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum AdjustmentType {
    #[sea_orm(string_value = "increase")]
    Increase,
    #[sea_orm(string_value = "decrease")]
    Decrease,
}

impl AdjustmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentType::Increase => "increase",
            AdjustmentType::Decrease => "decrease",
        }
    }
}

impl std::str::FromStr for AdjustmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(AdjustmentType::Increase),
            "decrease" => Ok(AdjustmentType::Decrease),
            other => Err(format!("unknown adjustment type: {other}")),
        }
    }
}

/// Audit record of a manual change to a leave balance's total credits.
/// Written in the same transaction as the balance update, carrying the
/// before/after totals so the ledger can be replayed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_adjustments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub personnel_id: i32,
    pub leave_type_id: i32,
    pub year: i32,
    pub adjustment_type: AdjustmentType,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub adjustment_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub previous_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub new_balance: Decimal,
    pub reason: String,
    pub created_by: i32,
    pub created_at: DateTime,
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,
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
