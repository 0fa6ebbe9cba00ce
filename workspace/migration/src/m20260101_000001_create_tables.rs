use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string(Users::Role))
                    .col(string(Users::Status))
                    .col(string_null(Users::ProfilePicture))
                    .col(date_time(Users::CreatedAt))
                    .col(date_time(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(pk_auto(Departments::Id))
                    .col(string(Departments::DepartmentName).unique_key())
                    .col(string_null(Departments::Description))
                    .col(integer_null(Departments::DepartmentHead))
                    .col(integer_null(Departments::ParentDepartmentId))
                    .col(date_time(Departments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_head")
                            .from(Departments::Table, Departments::DepartmentHead)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_parent")
                            .from(Departments::Table, Departments::ParentDepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create personnel table
        manager
            .create_table(
                Table::create()
                    .table(Personnel::Table)
                    .if_not_exists()
                    .col(pk_auto(Personnel::Id))
                    .col(integer(Personnel::UserId).unique_key())
                    .col(string(Personnel::FirstName))
                    .col(string(Personnel::LastName))
                    .col(string_null(Personnel::MiddleName))
                    .col(date_null(Personnel::DateOfBirth))
                    .col(string_null(Personnel::Gender))
                    .col(string_null(Personnel::CivilStatus))
                    .col(string_null(Personnel::ContactNumber))
                    .col(string_null(Personnel::Address))
                    .col(integer_null(Personnel::DepartmentId))
                    .col(string_null(Personnel::Designation))
                    .col(string(Personnel::EmploymentType))
                    .col(date_null(Personnel::DateHired))
                    .col(decimal(Personnel::Salary).decimal_len(12, 2))
                    .col(string_null(Personnel::GsisNumber))
                    .col(string_null(Personnel::PagibigNumber))
                    .col(string_null(Personnel::PhilhealthNumber))
                    .col(string_null(Personnel::SssNumber))
                    .col(string_null(Personnel::TinNumber))
                    .col(date_time(Personnel::CreatedAt))
                    .col(date_time(Personnel::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personnel_user")
                            .from(Personnel::Table, Personnel::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personnel_department")
                            .from(Personnel::Table, Personnel::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create employment_history table
        manager
            .create_table(
                Table::create()
                    .table(EmploymentHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(EmploymentHistory::Id))
                    .col(integer(EmploymentHistory::PersonnelId))
                    .col(string(EmploymentHistory::Organization))
                    .col(string(EmploymentHistory::Position))
                    .col(date(EmploymentHistory::StartDate))
                    .col(date_null(EmploymentHistory::EndDate))
                    .col(string(EmploymentHistory::EmploymentType))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employment_history_personnel")
                            .from(EmploymentHistory::Table, EmploymentHistory::PersonnelId)
                            .to(Personnel::Table, Personnel::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create leave_types table
        manager
            .create_table(
                Table::create()
                    .table(LeaveTypes::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaveTypes::Id))
                    .col(string(LeaveTypes::LeaveTypeName).unique_key())
                    .col(string_null(LeaveTypes::Description))
                    .col(boolean(LeaveTypes::RequiresDocument).default(false))
                    .col(integer_null(LeaveTypes::MaxDays))
                    .col(boolean(LeaveTypes::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        // Create leave_balances table
        manager
            .create_table(
                Table::create()
                    .table(LeaveBalances::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaveBalances::Id))
                    .col(integer(LeaveBalances::PersonnelId))
                    .col(integer(LeaveBalances::LeaveTypeId))
                    .col(integer(LeaveBalances::Year))
                    .col(decimal(LeaveBalances::TotalCredits).decimal_len(8, 2))
                    .col(decimal(LeaveBalances::UsedCredits).decimal_len(8, 2))
                    .col(decimal(LeaveBalances::EarnedCredits).decimal_len(8, 2))
                    .col(date_time(LeaveBalances::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_balance_personnel")
                            .from(LeaveBalances::Table, LeaveBalances::PersonnelId)
                            .to(Personnel::Table, Personnel::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_balance_leave_type")
                            .from(LeaveBalances::Table, LeaveBalances::LeaveTypeId)
                            .to(LeaveTypes::Table, LeaveTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One ledger row per personnel, leave type and year
        manager
            .create_index(
                Index::create()
                    .name("uq_leave_balance_personnel_type_year")
                    .table(LeaveBalances::Table)
                    .col(LeaveBalances::PersonnelId)
                    .col(LeaveBalances::LeaveTypeId)
                    .col(LeaveBalances::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create leave_applications table
        manager
            .create_table(
                Table::create()
                    .table(LeaveApplications::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaveApplications::Id))
                    .col(integer(LeaveApplications::PersonnelId))
                    .col(integer(LeaveApplications::LeaveTypeId))
                    .col(date(LeaveApplications::StartDate))
                    .col(date(LeaveApplications::EndDate))
                    .col(integer(LeaveApplications::TotalDays))
                    .col(string_null(LeaveApplications::Reason))
                    .col(string_null(LeaveApplications::SupportingDocument))
                    .col(string(LeaveApplications::Status))
                    .col(date_time(LeaveApplications::RequestDate))
                    .col(integer_null(LeaveApplications::ApprovedBy))
                    .col(date_time_null(LeaveApplications::ApprovalDate))
                    .col(string_null(LeaveApplications::ApprovalComments))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_application_personnel")
                            .from(LeaveApplications::Table, LeaveApplications::PersonnelId)
                            .to(Personnel::Table, Personnel::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_application_leave_type")
                            .from(LeaveApplications::Table, LeaveApplications::LeaveTypeId)
                            .to(LeaveTypes::Table, LeaveTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_application_approver")
                            .from(LeaveApplications::Table, LeaveApplications::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create leave_adjustments table
        manager
            .create_table(
                Table::create()
                    .table(LeaveAdjustments::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaveAdjustments::Id))
                    .col(integer(LeaveAdjustments::PersonnelId))
                    .col(integer(LeaveAdjustments::LeaveTypeId))
                    .col(integer(LeaveAdjustments::Year))
                    .col(string(LeaveAdjustments::AdjustmentType))
                    .col(decimal(LeaveAdjustments::AdjustmentAmount).decimal_len(8, 2))
                    .col(decimal(LeaveAdjustments::PreviousBalance).decimal_len(8, 2))
                    .col(decimal(LeaveAdjustments::NewBalance).decimal_len(8, 2))
                    .col(string(LeaveAdjustments::Reason))
                    .col(integer(LeaveAdjustments::CreatedBy))
                    .col(date_time(LeaveAdjustments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_adjustment_personnel")
                            .from(LeaveAdjustments::Table, LeaveAdjustments::PersonnelId)
                            .to(Personnel::Table, Personnel::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_adjustment_leave_type")
                            .from(LeaveAdjustments::Table, LeaveAdjustments::LeaveTypeId)
                            .to(LeaveTypes::Table, LeaveTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_adjustment_created_by")
                            .from(LeaveAdjustments::Table, LeaveAdjustments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create leave_monetizations table
        manager
            .create_table(
                Table::create()
                    .table(LeaveMonetizations::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaveMonetizations::Id))
                    .col(integer(LeaveMonetizations::PersonnelId))
                    .col(integer(LeaveMonetizations::LeaveTypeId))
                    .col(integer(LeaveMonetizations::DaysToMonetize))
                    .col(string(LeaveMonetizations::Status))
                    .col(decimal_null(LeaveMonetizations::Amount).decimal_len(12, 2))
                    .col(date_time(LeaveMonetizations::RequestDate))
                    .col(integer_null(LeaveMonetizations::ApprovedBy))
                    .col(date_time_null(LeaveMonetizations::ApprovalDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_monetization_personnel")
                            .from(LeaveMonetizations::Table, LeaveMonetizations::PersonnelId)
                            .to(Personnel::Table, Personnel::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_monetization_leave_type")
                            .from(LeaveMonetizations::Table, LeaveMonetizations::LeaveTypeId)
                            .to(LeaveTypes::Table, LeaveTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create job_postings table
        manager
            .create_table(
                Table::create()
                    .table(JobPostings::Table)
                    .if_not_exists()
                    .col(pk_auto(JobPostings::Id))
                    .col(string(JobPostings::PositionTitle))
                    .col(integer(JobPostings::DepartmentId))
                    .col(string(JobPostings::JobDescription))
                    .col(string(JobPostings::Qualifications))
                    .col(string_null(JobPostings::TechnicalCompetencies))
                    .col(string_null(JobPostings::SalaryRange))
                    .col(string_null(JobPostings::EmploymentType))
                    .col(integer(JobPostings::NumVacancies).default(1))
                    .col(date(JobPostings::ApplicationDeadline))
                    .col(string(JobPostings::PostingStatus))
                    .col(integer(JobPostings::CreatedBy))
                    .col(date_time(JobPostings::CreatedAt))
                    .col(date_time(JobPostings::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_posting_department")
                            .from(JobPostings::Table, JobPostings::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_posting_created_by")
                            .from(JobPostings::Table, JobPostings::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create job_applicants table
        manager
            .create_table(
                Table::create()
                    .table(JobApplicants::Table)
                    .if_not_exists()
                    .col(pk_auto(JobApplicants::Id))
                    .col(integer(JobApplicants::UserId).unique_key())
                    .col(string(JobApplicants::FirstName))
                    .col(string(JobApplicants::LastName))
                    .col(string_null(JobApplicants::MiddleName))
                    .col(string(JobApplicants::Email).unique_key())
                    .col(string_null(JobApplicants::Phone))
                    .col(string_null(JobApplicants::CurrentEmployer))
                    .col(string_null(JobApplicants::HighestEducation))
                    .col(string_null(JobApplicants::ResumePath))
                    .col(date_time(JobApplicants::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applicant_user")
                            .from(JobApplicants::Table, JobApplicants::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create job_applications table
        manager
            .create_table(
                Table::create()
                    .table(JobApplications::Table)
                    .if_not_exists()
                    .col(pk_auto(JobApplications::Id))
                    .col(integer(JobApplications::PositionId))
                    .col(integer(JobApplications::ApplicantId))
                    .col(string_null(JobApplications::CoverLetter))
                    .col(string(JobApplications::Status))
                    .col(date_time(JobApplications::ApplicationDate))
                    .col(string_null(JobApplications::Remarks))
                    .col(date_time_null(JobApplications::WithdrawnDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_application_posting")
                            .from(JobApplications::Table, JobApplications::PositionId)
                            .to(JobPostings::Table, JobPostings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_application_applicant")
                            .from(JobApplications::Table, JobApplications::ApplicantId)
                            .to(JobApplicants::Table, JobApplicants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create application_documents table
        manager
            .create_table(
                Table::create()
                    .table(ApplicationDocuments::Table)
                    .if_not_exists()
                    .col(pk_auto(ApplicationDocuments::Id))
                    .col(integer(ApplicationDocuments::ApplicationId))
                    .col(string(ApplicationDocuments::DocumentType))
                    .col(string(ApplicationDocuments::DocumentPath))
                    .col(date_time(ApplicationDocuments::UploadedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_application_document_application")
                            .from(
                                ApplicationDocuments::Table,
                                ApplicationDocuments::ApplicationId,
                            )
                            .to(JobApplications::Table, JobApplications::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create employee_documents table
        manager
            .create_table(
                Table::create()
                    .table(EmployeeDocuments::Table)
                    .if_not_exists()
                    .col(pk_auto(EmployeeDocuments::Id))
                    .col(integer(EmployeeDocuments::PersonnelId))
                    .col(string(EmployeeDocuments::Title))
                    .col(string_null(EmployeeDocuments::Description))
                    .col(text(EmployeeDocuments::FileUrl))
                    .col(string(EmployeeDocuments::FileType))
                    .col(big_integer(EmployeeDocuments::FileSize))
                    .col(string(EmployeeDocuments::Category))
                    .col(boolean(EmployeeDocuments::IsPrivate).default(false))
                    .col(date_time(EmployeeDocuments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_document_personnel")
                            .from(EmployeeDocuments::Table, EmployeeDocuments::PersonnelId)
                            .to(Personnel::Table, Personnel::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create audit_logs table
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(AuditLogs::Id))
                    .col(integer_null(AuditLogs::UserId))
                    .col(string(AuditLogs::ActionType))
                    .col(string(AuditLogs::TableAffected))
                    .col(string_null(AuditLogs::RecordId))
                    .col(string_null(AuditLogs::ActionDetails))
                    .col(string_null(AuditLogs::IpAddress))
                    .col(string_null(AuditLogs::UserAgent))
                    .col(date_time(AuditLogs::Timestamp))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_log_user")
                            .from(AuditLogs::Table, AuditLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(pk_auto(Notifications::Id))
                    .col(integer(Notifications::UserId))
                    .col(string(Notifications::NotificationType))
                    .col(text(Notifications::Message))
                    .col(boolean(Notifications::IsRead).default(false))
                    .col(string_null(Notifications::RelatedId))
                    .col(string_null(Notifications::RelatedTable))
                    .col(date_time(Notifications::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_user")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EmployeeDocuments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ApplicationDocuments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(JobApplications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(JobApplicants::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(JobPostings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LeaveMonetizations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LeaveAdjustments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LeaveApplications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LeaveBalances::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LeaveTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EmploymentHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Personnel::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    ProfilePicture,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    DepartmentName,
    Description,
    DepartmentHead,
    ParentDepartmentId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Personnel {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    MiddleName,
    DateOfBirth,
    Gender,
    CivilStatus,
    ContactNumber,
    Address,
    DepartmentId,
    Designation,
    EmploymentType,
    DateHired,
    Salary,
    GsisNumber,
    PagibigNumber,
    PhilhealthNumber,
    SssNumber,
    TinNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmploymentHistory {
    Table,
    Id,
    PersonnelId,
    Organization,
    Position,
    StartDate,
    EndDate,
    EmploymentType,
}

#[derive(DeriveIden)]
enum LeaveTypes {
    Table,
    Id,
    LeaveTypeName,
    Description,
    RequiresDocument,
    MaxDays,
    IsActive,
}

#[derive(DeriveIden)]
enum LeaveBalances {
    Table,
    Id,
    PersonnelId,
    LeaveTypeId,
    Year,
    TotalCredits,
    UsedCredits,
    EarnedCredits,
    LastUpdated,
}

#[derive(DeriveIden)]
enum LeaveApplications {
    Table,
    Id,
    PersonnelId,
    LeaveTypeId,
    StartDate,
    EndDate,
    TotalDays,
    Reason,
    SupportingDocument,
    Status,
    RequestDate,
    ApprovedBy,
    ApprovalDate,
    ApprovalComments,
}

#[derive(DeriveIden)]
enum LeaveAdjustments {
    Table,
    Id,
    PersonnelId,
    LeaveTypeId,
    Year,
    AdjustmentType,
    AdjustmentAmount,
    PreviousBalance,
    NewBalance,
    Reason,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LeaveMonetizations {
    Table,
    Id,
    PersonnelId,
    LeaveTypeId,
    DaysToMonetize,
    Status,
    Amount,
    RequestDate,
    ApprovedBy,
    ApprovalDate,
}

#[derive(DeriveIden)]
enum JobPostings {
    Table,
    Id,
    PositionTitle,
    DepartmentId,
    JobDescription,
    Qualifications,
    TechnicalCompetencies,
    SalaryRange,
    EmploymentType,
    NumVacancies,
    ApplicationDeadline,
    PostingStatus,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JobApplicants {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    MiddleName,
    Email,
    Phone,
    CurrentEmployer,
    HighestEducation,
    ResumePath,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JobApplications {
    Table,
    Id,
    PositionId,
    ApplicantId,
    CoverLetter,
    Status,
    ApplicationDate,
    Remarks,
    WithdrawnDate,
}

#[derive(DeriveIden)]
enum ApplicationDocuments {
    Table,
    Id,
    ApplicationId,
    DocumentType,
    DocumentPath,
    UploadedAt,
}

#[derive(DeriveIden)]
enum EmployeeDocuments {
    Table,
    Id,
    PersonnelId,
    Title,
    Description,
    FileUrl,
    FileType,
    FileSize,
    Category,
    IsPrivate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    ActionType,
    TableAffected,
    RecordId,
    ActionDetails,
    IpAddress,
    UserAgent,
    Timestamp,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    NotificationType,
    Message,
    IsRead,
    RelatedId,
    RelatedTable,
    CreatedAt,
}
