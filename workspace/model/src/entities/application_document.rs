use sea_orm::entity::prelude::*;

/// A document attached to a job application (resume, transcript, ...).
/// Only the reference is stored; byte storage lives elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "application_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub application_id: i32,
    pub document_type: String,
    pub document_path: String,
    pub uploaded_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_application::Entity",
        from = "Column::ApplicationId",
        to = "super::job_application::Column::Id"
    )]
    JobApplication,
}

impl Related<super::job_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobApplication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
