use sea_orm::entity::prelude::*;

/// Recruitment pipeline stage of a candidate's application. The wire strings
/// keep the underscore form used by the portal clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Pre_Screening")]
    PreScreening,
    #[sea_orm(string_value = "For_Interview")]
    ForInterview,
    #[sea_orm(string_value = "For_Examination")]
    ForExamination,
    #[sea_orm(string_value = "Shortlisted")]
    Shortlisted,
    #[sea_orm(string_value = "Selected")]
    Selected,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
    #[sea_orm(string_value = "Withdrawn")]
    Withdrawn,
    #[sea_orm(string_value = "Hired")]
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::PreScreening => "Pre_Screening",
            ApplicationStatus::ForInterview => "For_Interview",
            ApplicationStatus::ForExamination => "For_Examination",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Selected => "Selected",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
            ApplicationStatus::Hired => "Hired",
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ApplicationStatus::Pending),
            "Pre_Screening" => Ok(ApplicationStatus::PreScreening),
            "For_Interview" => Ok(ApplicationStatus::ForInterview),
            "For_Examination" => Ok(ApplicationStatus::ForExamination),
            "Shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "Selected" => Ok(ApplicationStatus::Selected),
            "Rejected" => Ok(ApplicationStatus::Rejected),
            "Withdrawn" => Ok(ApplicationStatus::Withdrawn),
            "Hired" => Ok(ApplicationStatus::Hired),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

/// A candidate's application against one posting.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub position_id: i32,
    pub applicant_id: i32,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub application_date: DateTime,
    pub remarks: Option<String>,
    pub withdrawn_date: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_posting::Entity",
        from = "Column::PositionId",
        to = "super::job_posting::Column::Id"
    )]
    JobPosting,
    #[sea_orm(
        belongs_to = "super::job_applicant::Entity",
        from = "Column::ApplicantId",
        to = "super::job_applicant::Column::Id"
    )]
    JobApplicant,
    #[sea_orm(has_many = "super::application_document::Entity")]
    ApplicationDocument,
}

impl Related<super::job_posting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobPosting.def()
    }
}

impl Related<super::job_applicant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobApplicant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
