use sea_orm::entity::prelude::*;

/// Publication state of a job posting. Only Published postings are visible
/// on the public portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum PostingStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Published")]
    Published,
    #[sea_orm(string_value = "Closed")]
    Closed,
    #[sea_orm(string_value = "Filled")]
    Filled,
}

impl PostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingStatus::Draft => "Draft",
            PostingStatus::Published => "Published",
            PostingStatus::Closed => "Closed",
            PostingStatus::Filled => "Filled",
        }
    }
}

impl std::str::FromStr for PostingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(PostingStatus::Draft),
            "Published" => Ok(PostingStatus::Published),
            "Closed" => Ok(PostingStatus::Closed),
            "Filled" => Ok(PostingStatus::Filled),
            other => Err(format!("unknown posting status: {other}")),
        }
    }
}

/// An open position advertised on the job portal.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_postings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub position_title: String,
    pub department_id: i32,
    pub job_description: String,
    pub qualifications: String,
    pub technical_competencies: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub num_vacancies: i32,
    pub application_deadline: Date,
    pub posting_status: PostingStatus,
    pub created_by: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,
    #[sea_orm(has_many = "super::job_application::Entity")]
    JobApplication,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::job_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobApplication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
