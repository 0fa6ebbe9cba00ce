use sea_orm::entity::prelude::*;

/// The HR profile of an employee, one-to-one with a login account.
///
/// The `gsis_number` through `tin_number` block holds the Philippine government
/// membership IDs exposed by the membership-data endpoints.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "personnel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub civil_status: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub department_id: Option<i32>,
    pub designation: Option<String>,
    pub employment_type: String,
    pub date_hired: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub salary: Decimal,
    pub gsis_number: Option<String>,
    pub pagibig_number: Option<String>,
    pub philhealth_number: Option<String>,
    pub sss_number: Option<String>,
    pub tin_number: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    #[sea_orm(has_many = "super::employment_history::Entity")]
    EmploymentHistory,
    #[sea_orm(has_many = "super::leave_balance::Entity")]
    LeaveBalance,
    #[sea_orm(has_many = "super::leave_application::Entity")]
    LeaveApplication,
    #[sea_orm(has_many = "super::employee_document::Entity")]
    EmployeeDocument,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::employment_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmploymentHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
