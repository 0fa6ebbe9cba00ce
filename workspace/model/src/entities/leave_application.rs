use sea_orm::entity::prelude::*;

/// Workflow state of a leave application. Only Pending applications may be
/// edited, cancelled, approved or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum LeaveStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }
}

impl std::str::FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(LeaveStatus::Pending),
            "Approved" => Ok(LeaveStatus::Approved),
            "Rejected" => Ok(LeaveStatus::Rejected),
            other => Err(format!("unknown leave status: {other}")),
        }
    }
}

/// A request to consume leave credits over a date range.
///
/// `total_days` is the inclusive span between `start_date` and `end_date`
/// and is the amount debited from the balance ledger on approval.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub personnel_id: i32,
    pub leave_type_id: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub total_days: i32,
    pub reason: Option<String>,
    pub supporting_document: Option<String>,
    pub status: LeaveStatus,
    pub request_date: DateTime,
    pub approved_by: Option<i32>,
    pub approval_date: Option<DateTime>,
    pub approval_comments: Option<String>,
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
        from = "Column::ApprovedBy",
        to = "super::user::Column::Id"
    )]
    Approver,
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
