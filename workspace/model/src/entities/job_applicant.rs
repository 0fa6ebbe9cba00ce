use sea_orm::entity::prelude::*;

/// An external candidate's portal profile, one-to-one with an Applicant-role
/// login account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_applicants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub current_employer: Option<String>,
    pub highest_education: Option<String>,
    pub resume_path: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::job_application::Entity")]
    JobApplication,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::job_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobApplication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
