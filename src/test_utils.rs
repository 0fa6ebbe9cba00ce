#[cfg(test)]
pub mod test_utils {
    use crate::auth::{hash_password, JwtService};
    use crate::router::create_router;
    use crate::schemas::{ApiResponse, AppState};
    use axum::http::header::AUTHORIZATION;
    use axum::http::HeaderValue;
    use axum::Router;
    use axum_test::TestServer;
    use chrono::Datelike;
    use migration::{Migrator, MigratorTrait};
    use model::entities::user::{Role, UserStatus};
    use model::entities::{leave_balance, leave_type, personnel, user};
    use moka::future::Cache;
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// IDs of the rows seeded by [`seed_core_data`].
    pub struct SeedData {
        pub employee_user_id: i32,
        pub employee_personnel_id: i32,
        pub leave_type_id: i32,
        pub leave_balance_id: i32,
    }

    async fn create_user(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
        role: Role,
    ) -> user::Model {
        let now = chrono::Utc::now().naive_utc();
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{}@test.local", username)),
            password_hash: Set(hash_password(password).expect("Failed to hash password")),
            role: Set(role),
            status: Set(UserStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test user")
    }

    /// Seed an admin, an HR officer and one employee with a vacation-leave
    /// balance of 15 credits for the current year.
    pub async fn seed_core_data(db: &DatabaseConnection) -> SeedData {
        create_user(db, "admin", "Admin#123", Role::Admin).await;
        create_user(db, "hr_officer", "HrPass#1", Role::Hr).await;
        let employee = create_user(db, "jdoe", "Employee#1", Role::Employee).await;

        let now = chrono::Utc::now().naive_utc();
        let person = personnel::ActiveModel {
            user_id: Set(employee.id),
            first_name: Set("Juan".to_string()),
            last_name: Set("Dela Cruz".to_string()),
            employment_type: Set("Permanent".to_string()),
            salary: Set(Decimal::new(30_000_00, 2)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test personnel");

        let vacation = leave_type::ActiveModel {
            leave_type_name: Set("Vacation Leave".to_string()),
            requires_document: Set(false),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create leave type");

        let balance = leave_balance::ActiveModel {
            personnel_id: Set(person.id),
            leave_type_id: Set(vacation.id),
            year: Set(chrono::Utc::now().date_naive().year()),
            total_credits: Set(Decimal::from(15)),
            used_credits: Set(Decimal::ZERO),
            earned_credits: Set(Decimal::ZERO),
            last_updated: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create leave balance");

        SeedData {
            employee_user_id: employee.id,
            employee_personnel_id: person.id,
            leave_type_id: vacation.id,
            leave_balance_id: balance.id,
        }
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> (AppState, SeedData) {
        let db = setup_test_db().await;
        let seed = seed_core_data(&db).await;
        let cache = Cache::new(100);
        let jwt = JwtService::new();
        (AppState { db, cache, jwt }, seed)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> (Router, SeedData) {
        let (state, seed) = setup_test_app_state().await;
        (create_router(state), seed)
    }

    /// Log in through the API and return the bearer token.
    pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
        let response = server
            .post("/api/v1/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .await;
        assert_eq!(
            response.status_code(),
            200,
            "login failed for {}: {}",
            username,
            response.text()
        );
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["token"]
            .as_str()
            .expect("login response carries no token")
            .to_string()
    }

    /// Bearer header value for an issued token.
    pub fn bearer(token: &str) -> (axum::http::HeaderName, HeaderValue) {
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("invalid header value"),
        )
    }
}
