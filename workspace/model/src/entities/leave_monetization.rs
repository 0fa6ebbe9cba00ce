use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum MonetizationStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl MonetizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonetizationStatus::Pending => "Pending",
            MonetizationStatus::Approved => "Approved",
            MonetizationStatus::Rejected => "Rejected",
        }
    }
}

impl std::str::FromStr for MonetizationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(MonetizationStatus::Pending),
            "Approved" => Ok(MonetizationStatus::Approved),
            "Rejected" => Ok(MonetizationStatus::Rejected),
            other => Err(format!("unknown monetization status: {other}")),
        }
    }
}

/// A request to convert unused leave days to cash. The payout amount is set
/// by the approver.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_monetizations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub personnel_id: i32,
    pub leave_type_id: i32,
    pub days_to_monetize: i32,
    pub status: MonetizationStatus,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub amount: Option<Decimal>,
    pub request_date: DateTime,
    pub approved_by: Option<i32>,
    pub approval_date: Option<DateTime>,
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
