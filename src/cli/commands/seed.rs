use anyhow::{anyhow, Result};
use chrono::Datelike;
use model::entities::user::{Role, UserStatus};
use model::entities::{department, leave_balance, leave_type, personnel, user};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, info, trace, warn};

use crate::auth::hash_password;

/// Standard leave types seeded on a fresh installation. Sick and study leave
/// require supporting documents per the filing rules.
const LEAVE_TYPES: &[(&str, bool, Option<i32>)] = &[
    ("Vacation Leave", false, None),
    ("Sick Leave", true, None),
    ("Special Privilege Leave", false, Some(3)),
    ("Maternity Leave", true, Some(105)),
    ("Paternity Leave", true, Some(7)),
    ("Study Leave", true, Some(180)),
];

const HR_USERNAME: &str = "hr_manager";
const HR_INITIAL_PASSWORD: &str = "HrManager#1";

/// Uncapped leave types accrue the standard 15 days per year.
const DEFAULT_ANNUAL_CREDITS: i32 = 15;

pub async fn seed_database(database_url: &str, admin_password: &str) -> Result<()> {
    trace!("Entering seed_database function");
    info!("Seeding database");
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url).await?;
    apply_seed(&db, admin_password).await
}

async fn apply_seed(db: &DatabaseConnection, admin_password: &str) -> Result<()> {
    let now = chrono::Utc::now().naive_utc();

    let existing_admin = user::Entity::find()
        .filter(user::Column::Username.eq("admin"))
        .one(db)
        .await?;
    if existing_admin.is_some() {
        warn!("Admin account already exists, skipping");
    } else {
        let password_hash =
            hash_password(admin_password).map_err(|e| anyhow!("password hashing failed: {e}"))?;
        user::ActiveModel {
            username: Set("admin".to_string()),
            email: Set("admin@kawani.local".to_string()),
            password_hash: Set(password_hash),
            role: Set(Role::Admin),
            status: Set(UserStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!("Admin account created");
    }

    for (name, requires_document, max_days) in LEAVE_TYPES {
        let existing = leave_type::Entity::find()
            .filter(leave_type::Column::LeaveTypeName.eq(*name))
            .one(db)
            .await?;
        if existing.is_some() {
            debug!("Leave type {} already exists, skipping", name);
            continue;
        }
        leave_type::ActiveModel {
            leave_type_name: Set(name.to_string()),
            requires_document: Set(*requires_document),
            max_days: Set(*max_days),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!("Leave type {} created", name);
    }

    let hr_department = match department::Entity::find()
        .filter(department::Column::DepartmentName.eq("Human Resources"))
        .one(db)
        .await?
    {
        Some(found) => found,
        None => {
            let created = department::ActiveModel {
                department_name: Set("Human Resources".to_string()),
                description: Set(Some("Personnel and recruitment administration".to_string())),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!("Default Human Resources department created");
            created
        }
    };

    let existing_hr = user::Entity::find()
        .filter(user::Column::Username.eq(HR_USERNAME))
        .one(db)
        .await?;
    if existing_hr.is_some() {
        warn!("HR manager account already exists, skipping");
    } else {
        let password_hash = hash_password(HR_INITIAL_PASSWORD)
            .map_err(|e| anyhow!("password hashing failed: {e}"))?;
        let hr_user = user::ActiveModel {
            username: Set(HR_USERNAME.to_string()),
            email: Set("hr@kawani.local".to_string()),
            password_hash: Set(password_hash),
            role: Set(Role::Hr),
            status: Set(UserStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        personnel::ActiveModel {
            user_id: Set(hr_user.id),
            first_name: Set("Maria".to_string()),
            last_name: Set("Santos".to_string()),
            department_id: Set(Some(hr_department.id)),
            designation: Set(Some("HR Manager".to_string())),
            employment_type: Set("Permanent".to_string()),
            salary: Set(Decimal::new(65_000_00, 2)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        warn!(
            "HR manager account created with the initial password; change it after first login"
        );
    }

    let year = chrono::Utc::now().date_naive().year();
    let people = personnel::Entity::find().all(db).await?;
    let types = leave_type::Entity::find()
        .filter(leave_type::Column::IsActive.eq(true))
        .all(db)
        .await?;

    let mut initialized = 0u32;
    for person in &people {
        for lt in &types {
            let existing = leave_balance::Entity::find()
                .filter(leave_balance::Column::PersonnelId.eq(person.id))
                .filter(leave_balance::Column::LeaveTypeId.eq(lt.id))
                .filter(leave_balance::Column::Year.eq(year))
                .one(db)
                .await?;
            if existing.is_some() {
                continue;
            }
            leave_balance::ActiveModel {
                personnel_id: Set(person.id),
                leave_type_id: Set(lt.id),
                year: Set(year),
                total_credits: Set(Decimal::from(
                    lt.max_days.unwrap_or(DEFAULT_ANNUAL_CREDITS),
                )),
                used_credits: Set(Decimal::ZERO),
                earned_credits: Set(Decimal::ZERO),
                last_updated: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            initialized += 1;
        }
    }
    if initialized > 0 {
        info!("Initialized {} leave balances for {}", initialized, year);
    }

    info!("Database seeding completed successfully!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn seeding_twice_creates_accounts_and_balances_once() {
        let db = setup_test_db().await;
        apply_seed(&db, "Admin#123").await.unwrap();
        apply_seed(&db, "Admin#123").await.unwrap();

        let admins = user::Entity::find()
            .filter(user::Column::Username.eq("admin"))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(admins, 1);

        let hr = user::Entity::find()
            .filter(user::Column::Username.eq(HR_USERNAME))
            .one(&db)
            .await
            .unwrap()
            .expect("hr manager account missing");
        assert_eq!(hr.role, Role::Hr);

        let hr_profile = personnel::Entity::find()
            .filter(personnel::Column::UserId.eq(hr.id))
            .one(&db)
            .await
            .unwrap()
            .expect("hr manager personnel record missing");

        // One balance row per leave type for the single seeded personnel row
        let type_count = leave_type::Entity::find().count(&db).await.unwrap();
        assert_eq!(type_count, LEAVE_TYPES.len() as u64);
        let balances = leave_balance::Entity::find()
            .filter(leave_balance::Column::PersonnelId.eq(hr_profile.id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(balances.len(), LEAVE_TYPES.len());

        let vacation = leave_type::Entity::find()
            .filter(leave_type::Column::LeaveTypeName.eq("Vacation Leave"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let vacation_balance = balances
            .iter()
            .find(|b| b.leave_type_id == vacation.id)
            .unwrap();
        assert_eq!(vacation_balance.total_credits, Decimal::from(15));
        assert_eq!(vacation_balance.used_credits, Decimal::ZERO);
        assert_eq!(
            vacation_balance.year,
            chrono::Utc::now().date_naive().year()
        );
    }
}
