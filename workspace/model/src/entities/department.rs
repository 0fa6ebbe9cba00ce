use sea_orm::entity::prelude::*;

/// An organizational unit. Departments can nest through `parent_department_id`
/// and name an optional head user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub department_name: String,
    pub description: Option<String>,
    pub department_head: Option<i32>,
    pub parent_department_id: Option<i32>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DepartmentHead",
        to = "super::user::Column::Id"
    )]
    Head,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentDepartmentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::personnel::Entity")]
    Personnel,
    #[sea_orm(has_many = "super::job_posting::Entity")]
    JobPosting,
}

impl Related<super::personnel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Personnel.def()
    }
}

impl Related<super::job_posting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobPosting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
