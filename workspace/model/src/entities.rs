//! This file serves as the root for all SeaORM entity modules.
//! The data model covers the four HRIS domains: login accounts and system
//! administration, personnel records, the leave credit ledger, and the
//! recruitment portal.

pub mod application_document;
pub mod audit_log;
pub mod department;
pub mod employee_document;
pub mod employment_history;
pub mod job_applicant;
pub mod job_application;
pub mod job_posting;
pub mod leave_adjustment;
pub mod leave_application;
pub mod leave_balance;
pub mod leave_monetization;
pub mod leave_type;
pub mod notification;
pub mod personnel;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::application_document::Entity as ApplicationDocument;
    pub use super::audit_log::Entity as AuditLog;
    pub use super::department::Entity as Department;
    pub use super::employee_document::Entity as EmployeeDocument;
    pub use super::employment_history::Entity as EmploymentHistory;
    pub use super::job_applicant::Entity as JobApplicant;
    pub use super::job_application::Entity as JobApplication;
    pub use super::job_posting::Entity as JobPosting;
    pub use super::leave_adjustment::Entity as LeaveAdjustment;
    pub use super::leave_application::Entity as LeaveApplication;
    pub use super::leave_balance::Entity as LeaveBalance;
    pub use super::leave_monetization::Entity as LeaveMonetization;
    pub use super::leave_type::Entity as LeaveType;
    pub use super::notification::Entity as Notification;
    pub use super::personnel::Entity as Personnel;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn now() -> chrono::NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create accounts for an HR officer and an employee
        let hr_user = user::ActiveModel {
            username: Set("hr.officer".to_string()),
            email: Set("hr@agency.gov.ph".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(user::Role::Hr),
            status: Set(user::UserStatus::Active),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let employee_user = user::ActiveModel {
            username: Set("juan.delacruz".to_string()),
            email: Set("juan@agency.gov.ph".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(user::Role::Employee),
            status: Set(user::UserStatus::Active),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a department headed by the HR officer
        let dept = department::ActiveModel {
            department_name: Set("Human Resources".to_string()),
            description: Set(Some("People operations".to_string())),
            department_head: Set(Some(hr_user.id)),
            parent_department_id: Set(None),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a personnel profile for the employee
        let person = personnel::ActiveModel {
            user_id: Set(employee_user.id),
            first_name: Set("Juan".to_string()),
            last_name: Set("Dela Cruz".to_string()),
            department_id: Set(Some(dept.id)),
            designation: Set(Some("Administrative Officer".to_string())),
            employment_type: Set("Regular".to_string()),
            date_hired: Set(NaiveDate::from_ymd_opt(2020, 6, 1)),
            salary: Set(Decimal::new(3500000, 2)), // 35000.00
            gsis_number: Set(Some("GSIS-001".to_string())),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let history = employment_history::ActiveModel {
            personnel_id: Set(person.id),
            organization: Set("Provincial Government".to_string()),
            position: Set("Clerk II".to_string()),
            start_date: Set(NaiveDate::from_ymd_opt(2016, 1, 4).unwrap()),
            end_date: Set(NaiveDate::from_ymd_opt(2020, 5, 31)),
            employment_type: Set("Contractual".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a leave type and a balance row for the current year
        let vacation = leave_type::ActiveModel {
            leave_type_name: Set("Vacation Leave".to_string()),
            description: Set(None),
            requires_document: Set(false),
            max_days: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let balance = leave_balance::ActiveModel {
            personnel_id: Set(person.id),
            leave_type_id: Set(vacation.id),
            year: Set(2026),
            total_credits: Set(Decimal::new(1500, 2)), // 15.00
            used_credits: Set(Decimal::ZERO),
            earned_credits: Set(Decimal::new(125, 2)), // 1.25
            last_updated: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // File a leave application against that balance
        let application = leave_application::ActiveModel {
            personnel_id: Set(person.id),
            leave_type_id: Set(vacation.id),
            start_date: Set(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()),
            end_date: Set(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()),
            total_days: Set(3),
            reason: Set(Some("Family matters".to_string())),
            status: Set(leave_application::LeaveStatus::Pending),
            request_date: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Record an HR credit adjustment against the same ledger row
        let adjustment = leave_adjustment::ActiveModel {
            personnel_id: Set(person.id),
            leave_type_id: Set(vacation.id),
            year: Set(2026),
            adjustment_type: Set(leave_adjustment::AdjustmentType::Increase),
            adjustment_amount: Set(Decimal::new(500, 2)),
            previous_balance: Set(Decimal::new(1500, 2)),
            new_balance: Set(Decimal::new(2000, 2)),
            reason: Set("Year-end credit grant".to_string()),
            created_by: Set(hr_user.id),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Publish a job posting and run one application through the portal
        let applicant_user = user::ActiveModel {
            username: Set("maria.santos".to_string()),
            email: Set("maria@example.com".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(user::Role::Applicant),
            status: Set(user::UserStatus::Active),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let posting = job_posting::ActiveModel {
            position_title: Set("HR Assistant".to_string()),
            department_id: Set(dept.id),
            job_description: Set("Assists with personnel records".to_string()),
            qualifications: Set("Bachelor's degree".to_string()),
            num_vacancies: Set(1),
            application_deadline: Set(NaiveDate::from_ymd_opt(2026, 9, 30).unwrap()),
            posting_status: Set(job_posting::PostingStatus::Published),
            created_by: Set(hr_user.id),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let applicant = job_applicant::ActiveModel {
            user_id: Set(applicant_user.id),
            first_name: Set("Maria".to_string()),
            last_name: Set("Santos".to_string()),
            email: Set("maria@example.com".to_string()),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let job_app = job_application::ActiveModel {
            position_id: Set(posting.id),
            applicant_id: Set(applicant.id),
            cover_letter: Set(Some("I am interested in this role.".to_string())),
            status: Set(job_application::ApplicationStatus::Pending),
            application_date: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let attachment = application_document::ActiveModel {
            application_id: Set(job_app.id),
            document_type: Set("Resume".to_string()),
            document_path: Set("/uploads/resume.pdf".to_string()),
            uploaded_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // 201-file document, audit trail row and a notification
        let document = employee_document::ActiveModel {
            personnel_id: Set(person.id),
            title: Set("Appointment paper".to_string()),
            file_url: Set("data:application/pdf;base64,AAAA".to_string()),
            file_type: Set("application/pdf".to_string()),
            file_size: Set(2048),
            category: Set("Appointment".to_string()),
            is_private: Set(false),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        audit_log::ActiveModel {
            user_id: Set(Some(hr_user.id)),
            action_type: Set("CREATE".to_string()),
            table_affected: Set("personnel".to_string()),
            record_id: Set(Some(person.id.to_string())),
            action_details: Set(Some("Created personnel record".to_string())),
            timestamp: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        notification::ActiveModel {
            user_id: Set(employee_user.id),
            notification_type: Set("leave_application".to_string()),
            message: Set("Your leave application was received".to_string()),
            is_read: Set(false),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data

        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 3);
        assert!(users.iter().any(|u| u.role == user::Role::Hr));
        assert!(users.iter().any(|u| u.role == user::Role::Applicant));

        let people = Personnel::find()
            .filter(personnel::Column::DepartmentId.eq(dept.id))
            .all(&db)
            .await?;
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].user_id, employee_user.id);
        assert_eq!(people[0].salary, Decimal::new(3500000, 2));

        let histories = EmploymentHistory::find().all(&db).await?;
        assert_eq!(histories.len(), 1);
        assert_eq!(histories[0].id, history.id);
        assert_eq!(histories[0].personnel_id, person.id);

        let balances = LeaveBalance::find()
            .filter(leave_balance::Column::Year.eq(2026))
            .all(&db)
            .await?;
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].id, balance.id);
        assert_eq!(balances[0].used_credits, Decimal::ZERO);

        let applications = LeaveApplication::find().all(&db).await?;
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0].id, application.id);
        assert_eq!(
            applications[0].status,
            leave_application::LeaveStatus::Pending
        );

        let adjustments = LeaveAdjustment::find().all(&db).await?;
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].id, adjustment.id);
        assert_eq!(
            adjustments[0].new_balance - adjustments[0].previous_balance,
            adjustments[0].adjustment_amount
        );

        let postings = JobPosting::find()
            .filter(job_posting::Column::PostingStatus.eq(job_posting::PostingStatus::Published))
            .all(&db)
            .await?;
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].id, posting.id);

        let job_apps = JobApplication::find().all(&db).await?;
        assert_eq!(job_apps.len(), 1);
        assert_eq!(job_apps[0].position_id, posting.id);
        assert_eq!(job_apps[0].applicant_id, applicant.id);

        let attachments = ApplicationDocument::find().all(&db).await?;
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].id, attachment.id);

        let documents = EmployeeDocument::find().all(&db).await?;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, document.id);

        let logs = AuditLog::find().all(&db).await?;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].table_affected, "personnel");

        let notifications = Notification::find().all(&db).await?;
        assert_eq!(notifications.len(), 1);
        assert!(!notifications[0].is_read);

        Ok(())
    }

    #[tokio::test]
    async fn test_unique_balance_per_year() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let u = user::ActiveModel {
            username: Set("emp".to_string()),
            email: Set("emp@agency.gov.ph".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(user::Role::Employee),
            status: Set(user::UserStatus::Active),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let p = personnel::ActiveModel {
            user_id: Set(u.id),
            first_name: Set("Ana".to_string()),
            last_name: Set("Reyes".to_string()),
            employment_type: Set("Regular".to_string()),
            salary: Set(Decimal::ZERO),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let lt = leave_type::ActiveModel {
            leave_type_name: Set("Sick Leave".to_string()),
            requires_document: Set(true),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        leave_balance::ActiveModel {
            personnel_id: Set(p.id),
            leave_type_id: Set(lt.id),
            year: Set(2026),
            total_credits: Set(Decimal::new(1500, 2)),
            used_credits: Set(Decimal::ZERO),
            earned_credits: Set(Decimal::ZERO),
            last_updated: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Second row for the same (personnel, type, year) triple must be rejected
        let duplicate = leave_balance::ActiveModel {
            personnel_id: Set(p.id),
            leave_type_id: Set(lt.id),
            year: Set(2026),
            total_credits: Set(Decimal::new(500, 2)),
            used_credits: Set(Decimal::ZERO),
            earned_credits: Set(Decimal::ZERO),
            last_updated: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(duplicate.is_err());

        // A different year is fine
        leave_balance::ActiveModel {
            personnel_id: Set(p.id),
            leave_type_id: Set(lt.id),
            year: Set(2025),
            total_credits: Set(Decimal::new(1500, 2)),
            used_credits: Set(Decimal::new(300, 2)),
            earned_credits: Set(Decimal::ZERO),
            last_updated: Set(now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let rows = LeaveBalance::find().all(&db).await?;
        assert_eq!(rows.len(), 2);

        Ok(())
    }
}
