#[cfg(test)]
mod integration_tests {
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{bearer, login, setup_test_app};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Datelike;
    use serde_json::json;

    async fn server() -> (TestServer, crate::test_utils::test_utils::SeedData) {
        let (app, seed) = setup_test_app().await;
        (TestServer::new(app).unwrap(), seed)
    }

    fn number(value: &serde_json::Value) -> f64 {
        match value {
            serde_json::Value::String(s) => s.parse().unwrap(),
            serde_json::Value::Number(n) => n.as_f64().unwrap(),
            other => panic!("not a number: {}", other),
        }
    }

    fn current_year() -> i32 {
        chrono::Utc::now().date_naive().year()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _) = server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_login_success() {
        let (server, _) = server().await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({"username": "admin", "password": "Admin#123"}))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert!(body.data["token"].as_str().unwrap().len() > 20);
        assert_eq!(body.data["user"]["role"], "Admin");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (server, _) = server().await;

        let wrong_password = server
            .post("/api/v1/auth/login")
            .json(&json!({"username": "admin", "password": "WrongPass#1"}))
            .await;
        let unknown_user = server
            .post("/api/v1/auth/login")
            .json(&json!({"username": "nobody", "password": "WrongPass#1"}))
            .await;

        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        unknown_user.assert_status(StatusCode::UNAUTHORIZED);

        let a: serde_json::Value = wrong_password.json();
        let b: serde_json::Value = unknown_user.json();
        assert_eq!(a["message"], b["message"]);
        assert_eq!(a["success"], false);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let (server, _) = server().await;

        let response = server.get("/api/v1/personnel").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_employee_cannot_administer_users() {
        let (server, _) = server().await;
        let token = login(&server, "jdoe", "Employee#1").await;
        let (name, value) = bearer(&token);

        let response = server.get("/api/v1/users").add_header(name, value).await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_register_applicant_and_portal_profile() {
        let (server, _) = server().await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({
                "username": "maria",
                "email": "maria@example.com",
                "password": "Applicant#1",
                "first_name": "Maria",
                "last_name": "Santos",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["user"]["role"], "Applicant");
        let token = body.data["token"].as_str().unwrap().to_string();

        let (name, value) = bearer(&token);
        let profile = server
            .get("/api/v1/portal/profile")
            .add_header(name, value)
            .await;
        profile.assert_status(StatusCode::OK);
        let profile: ApiResponse<serde_json::Value> = profile.json();
        assert_eq!(profile.data["first_name"], "Maria");
        assert_eq!(profile.data["email"], "maria@example.com");
    }

    #[tokio::test]
    async fn test_create_personnel_and_list() {
        let (server, _) = server().await;
        let token = login(&server, "admin", "Admin#123").await;

        let (name, value) = bearer(&token);
        let response = server
            .post("/api/v1/personnel")
            .add_header(name, value)
            .json(&json!({
                "username": "psantos",
                "email": "psantos@test.local",
                "password": "Employee#2",
                "first_name": "Pedro",
                "last_name": "Santos",
                "employment_type": "Permanent",
                "salary": "25000.00",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let (name, value) = bearer(&token);
        let list = server
            .get("/api/v1/personnel?search=Santos")
            .add_header(name, value)
            .await;
        list.assert_status(StatusCode::OK);
        let list: ApiResponse<serde_json::Value> = list.json();
        let records = list.data["personnel"].as_array().unwrap();
        assert!(records.iter().any(|p| p["last_name"] == "Santos"));

        // Same username again must conflict
        let (name, value) = bearer(&token);
        let duplicate = server
            .post("/api/v1/personnel")
            .add_header(name, value)
            .json(&json!({
                "username": "psantos",
                "email": "other@test.local",
                "password": "Employee#2",
                "first_name": "Pablo",
                "last_name": "Santos",
                "employment_type": "Casual",
                "salary": "20000.00",
            }))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_leave_approval_debits_balance() {
        let (server, _) = server().await;
        let employee = login(&server, "jdoe", "Employee#1").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let year = current_year();

        let (name, value) = bearer(&employee);
        let filed = server
            .post("/api/v1/leave/applications")
            .add_header(name, value)
            .json(&json!({
                "leave_type_id": 1,
                "start_date": format!("{}-06-01", year),
                "end_date": format!("{}-06-03", year),
                "reason": "Family trip",
            }))
            .await;
        filed.assert_status(StatusCode::CREATED);
        let filed: ApiResponse<serde_json::Value> = filed.json();
        assert_eq!(filed.data["total_days"], 3);
        assert_eq!(filed.data["status"], "Pending");
        let application_id = filed.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        let approved = server
            .post(&format!(
                "/api/v1/leave/applications/{}/approve",
                application_id
            ))
            .add_header(name, value)
            .json(&json!({"comments": "Enjoy"}))
            .await;
        approved.assert_status(StatusCode::OK);
        let approved: ApiResponse<serde_json::Value> = approved.json();
        assert_eq!(approved.data["status"], "Approved");

        let (name, value) = bearer(&employee);
        let balances = server
            .get("/api/v1/me/leave-balances")
            .add_header(name, value)
            .await;
        balances.assert_status(StatusCode::OK);
        let balances: ApiResponse<serde_json::Value> = balances.json();
        let row = &balances.data.as_array().unwrap()[0];
        assert_eq!(number(&row["used_credits"]), 3.0);
        assert_eq!(number(&row["remaining_credits"]), 12.0);

        // Thirteen more days no longer fit in the remaining twelve
        let (name, value) = bearer(&employee);
        let too_long = server
            .post("/api/v1/leave/applications")
            .add_header(name, value)
            .json(&json!({
                "leave_type_id": 1,
                "start_date": format!("{}-07-01", year),
                "end_date": format!("{}-07-13", year),
            }))
            .await;
        too_long.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_leave_application_requires_initialized_balance() {
        let (server, _) = server().await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let employee = login(&server, "jdoe", "Employee#1").await;

        let (name, value) = bearer(&hr);
        let created = server
            .post("/api/v1/leave/types")
            .add_header(name, value)
            .json(&json!({"leave_type_name": "Study Leave", "requires_document": false}))
            .await;
        created.assert_status(StatusCode::CREATED);
        let created: ApiResponse<serde_json::Value> = created.json();
        let study_id = created.data["id"].as_i64().unwrap();

        let year = current_year();
        let (name, value) = bearer(&employee);
        let filed = server
            .post("/api/v1/leave/applications")
            .add_header(name, value)
            .json(&json!({
                "leave_type_id": study_id,
                "start_date": format!("{}-08-01", year),
                "end_date": format!("{}-08-02", year),
            }))
            .await;
        filed.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_adjustment_moves_total_credits() {
        let (server, seed) = server().await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let year = current_year();

        let (name, value) = bearer(&hr);
        let increase = server
            .post("/api/v1/leave/adjustments")
            .add_header(name, value)
            .json(&json!({
                "personnel_id": seed.employee_personnel_id,
                "leave_type_id": seed.leave_type_id,
                "year": year,
                "adjustment_type": "increase",
                "amount": "5",
                "reason": "Credit correction",
            }))
            .await;
        increase.assert_status(StatusCode::CREATED);
        let increase: ApiResponse<serde_json::Value> = increase.json();
        assert_eq!(number(&increase.data["previous_balance"]), 15.0);
        assert_eq!(number(&increase.data["new_balance"]), 20.0);

        let (name, value) = bearer(&hr);
        let balance = server
            .get(&format!("/api/v1/leave/balances/{}", seed.leave_balance_id))
            .add_header(name, value)
            .await;
        balance.assert_status(StatusCode::OK);
        let balance: ApiResponse<serde_json::Value> = balance.json();
        assert_eq!(number(&balance.data["total_credits"]), 20.0);

        // A decrease below zero never lands
        let (name, value) = bearer(&hr);
        let underflow = server
            .post("/api/v1/leave/adjustments")
            .add_header(name, value)
            .json(&json!({
                "personnel_id": seed.employee_personnel_id,
                "leave_type_id": seed.leave_type_id,
                "year": year,
                "adjustment_type": "decrease",
                "amount": "100",
                "reason": "Typo",
            }))
            .await;
        underflow.assert_status(StatusCode::BAD_REQUEST);

        let (name, value) = bearer(&hr);
        let balance = server
            .get(&format!("/api/v1/leave/balances/{}", seed.leave_balance_id))
            .add_header(name, value)
            .await;
        let balance: ApiResponse<serde_json::Value> = balance.json();
        assert_eq!(number(&balance.data["total_credits"]), 20.0);
    }

    #[tokio::test]
    async fn test_only_pending_applications_can_be_cancelled() {
        let (server, _) = server().await;
        let employee = login(&server, "jdoe", "Employee#1").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let year = current_year();

        let (name, value) = bearer(&employee);
        let filed = server
            .post("/api/v1/leave/applications")
            .add_header(name, value)
            .json(&json!({
                "leave_type_id": 1,
                "start_date": format!("{}-09-01", year),
                "end_date": format!("{}-09-01", year),
            }))
            .await;
        filed.assert_status(StatusCode::CREATED);
        let filed: ApiResponse<serde_json::Value> = filed.json();
        let application_id = filed.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        server
            .post(&format!(
                "/api/v1/leave/applications/{}/approve",
                application_id
            ))
            .add_header(name, value)
            .json(&json!({"comments": null}))
            .await
            .assert_status(StatusCode::OK);

        let (name, value) = bearer(&employee);
        let cancel = server
            .delete(&format!("/api/v1/leave/applications/{}", application_id))
            .add_header(name, value)
            .await;
        cancel.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_monetization_approval_sets_amount_and_debits() {
        let (server, seed) = server().await;
        let employee = login(&server, "jdoe", "Employee#1").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;

        let (name, value) = bearer(&employee);
        let filed = server
            .post("/api/v1/leave/monetization")
            .add_header(name, value)
            .json(&json!({"leave_type_id": seed.leave_type_id, "days_to_monetize": 5}))
            .await;
        filed.assert_status(StatusCode::CREATED);
        let filed: ApiResponse<serde_json::Value> = filed.json();
        assert_eq!(filed.data["status"], "Pending");
        assert!(filed.data["amount"].is_null());
        let request_id = filed.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        let approved = server
            .post(&format!("/api/v1/leave/monetization/{}/approve", request_id))
            .add_header(name, value)
            .json(&json!({"amount": "6818.18"}))
            .await;
        approved.assert_status(StatusCode::OK);
        let approved: ApiResponse<serde_json::Value> = approved.json();
        assert_eq!(approved.data["status"], "Approved");
        assert_eq!(number(&approved.data["amount"]), 6818.18);

        let (name, value) = bearer(&hr);
        let balance = server
            .get(&format!("/api/v1/leave/balances/{}", seed.leave_balance_id))
            .add_header(name, value)
            .await;
        let balance: ApiResponse<serde_json::Value> = balance.json();
        assert_eq!(number(&balance.data["used_credits"]), 5.0);
    }

    #[tokio::test]
    async fn test_posting_lifecycle_and_public_visibility() {
        let (server, _) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let deadline = chrono::Utc::now().date_naive() + chrono::Duration::days(30);

        let (name, value) = bearer(&admin);
        let department = server
            .post("/api/v1/departments")
            .add_header(name, value)
            .json(&json!({"department_name": "Accounting"}))
            .await;
        department.assert_status(StatusCode::CREATED);
        let department: ApiResponse<serde_json::Value> = department.json();
        let department_id = department.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        let posting = server
            .post("/api/v1/recruitment/postings")
            .add_header(name, value)
            .json(&json!({
                "position_title": "Accountant II",
                "department_id": department_id,
                "job_description": "Prepares financial statements",
                "qualifications": "CPA license",
                "application_deadline": deadline.to_string(),
            }))
            .await;
        posting.assert_status(StatusCode::CREATED);
        let posting: ApiResponse<serde_json::Value> = posting.json();
        assert_eq!(posting.data["posting_status"], "Draft");
        let posting_id = posting.data["id"].as_i64().unwrap();

        // Draft postings stay off the public portal
        let public = server.get("/api/v1/jobs").await;
        public.assert_status(StatusCode::OK);
        let public: ApiResponse<serde_json::Value> = public.json();
        assert!(public.data["positions"].as_array().unwrap().is_empty());

        let (name, value) = bearer(&hr);
        server
            .post(&format!("/api/v1/recruitment/postings/{}/status", posting_id))
            .add_header(name, value)
            .json(&json!({"status": "Published"}))
            .await
            .assert_status(StatusCode::OK);

        let public: ApiResponse<serde_json::Value> = server.get("/api/v1/jobs").await.json();
        let positions = public.data["positions"].as_array().unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0]["position_title"], "Accountant II");

        // A draft cannot jump straight to Filled
        let (name, value) = bearer(&hr);
        let bad_jump = server
            .post(&format!("/api/v1/recruitment/postings/{}/status", posting_id))
            .add_header(name, value)
            .json(&json!({"status": "Draft"}))
            .await;
        bad_jump.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_apply_withdraw_and_duplicate_guard() {
        let (server, _) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let deadline = chrono::Utc::now().date_naive() + chrono::Duration::days(14);

        let (name, value) = bearer(&admin);
        let department: ApiResponse<serde_json::Value> = server
            .post("/api/v1/departments")
            .add_header(name, value)
            .json(&json!({"department_name": "IT"}))
            .await
            .json();
        let department_id = department.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        let posting: ApiResponse<serde_json::Value> = server
            .post("/api/v1/recruitment/postings")
            .add_header(name, value)
            .json(&json!({
                "position_title": "Developer",
                "department_id": department_id,
                "job_description": "Builds internal systems",
                "qualifications": "BS Computer Science",
                "application_deadline": deadline.to_string(),
            }))
            .await
            .json();
        let posting_id = posting.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        server
            .post(&format!("/api/v1/recruitment/postings/{}/status", posting_id))
            .add_header(name, value)
            .json(&json!({"status": "Published"}))
            .await
            .assert_status(StatusCode::OK);

        let registered: ApiResponse<serde_json::Value> = server
            .post("/api/v1/auth/register")
            .json(&json!({
                "username": "applicant1",
                "email": "applicant1@example.com",
                "password": "Applicant#1",
                "first_name": "Ana",
                "last_name": "Reyes",
            }))
            .await
            .json();
        let applicant = registered.data["token"].as_str().unwrap().to_string();

        let (name, value) = bearer(&applicant);
        let applied = server
            .post(&format!("/api/v1/jobs/{}/apply", posting_id))
            .add_header(name, value)
            .json(&json!({
                "cover_letter": "I would like to apply.",
                "documents": [{"document_type": "resume", "document_path": "/uploads/resume.pdf"}],
            }))
            .await;
        applied.assert_status(StatusCode::CREATED);
        let applied: ApiResponse<serde_json::Value> = applied.json();
        let application_id = applied.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&applicant);
        let duplicate = server
            .post(&format!("/api/v1/jobs/{}/apply", posting_id))
            .add_header(name, value)
            .json(&json!({"documents": []}))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);

        let (name, value) = bearer(&applicant);
        let withdrawn = server
            .post(&format!(
                "/api/v1/portal/applications/{}/withdraw",
                application_id
            ))
            .add_header(name, value)
            .await;
        withdrawn.assert_status(StatusCode::OK);
        let withdrawn: ApiResponse<serde_json::Value> = withdrawn.json();
        assert_eq!(withdrawn.data["status"], "Withdrawn");
        assert!(!withdrawn.data["withdrawn_date"].is_null());

        // Withdrawing released the slot
        let (name, value) = bearer(&applicant);
        server
            .post(&format!("/api/v1/jobs/{}/apply", posting_id))
            .add_header(name, value)
            .json(&json!({"documents": []}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_notification_delivered_on_approval() {
        let (server, _) = server().await;
        let employee = login(&server, "jdoe", "Employee#1").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let year = current_year();

        let (name, value) = bearer(&employee);
        let filed: ApiResponse<serde_json::Value> = server
            .post("/api/v1/leave/applications")
            .add_header(name, value)
            .json(&json!({
                "leave_type_id": 1,
                "start_date": format!("{}-10-05", year),
                "end_date": format!("{}-10-05", year),
            }))
            .await
            .json();
        let application_id = filed.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        server
            .post(&format!(
                "/api/v1/leave/applications/{}/reject",
                application_id
            ))
            .add_header(name, value)
            .json(&json!({"comments": "Blackout period"}))
            .await
            .assert_status(StatusCode::OK);

        let (name, value) = bearer(&employee);
        let notifications: ApiResponse<serde_json::Value> = server
            .get("/api/v1/me/notifications")
            .add_header(name, value)
            .await
            .json();
        let items = notifications.data.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["is_read"], false);
        let notification_id = items[0]["id"].as_i64().unwrap();

        let (name, value) = bearer(&employee);
        let read: ApiResponse<serde_json::Value> = server
            .post(&format!("/api/v1/me/notifications/{}/read", notification_id))
            .add_header(name, value)
            .await
            .json();
        assert_eq!(read.data["is_read"], true);

        // Someone else's notification is invisible
        let (name, value) = bearer(&hr);
        let other = server
            .post(&format!("/api/v1/me/notifications/{}/read", notification_id))
            .add_header(name, value)
            .await;
        other.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_audit_logs_are_admin_only() {
        let (server, _) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;

        let (name, value) = bearer(&admin);
        let logs = server.get("/api/v1/audit-logs").add_header(name, value).await;
        logs.assert_status(StatusCode::OK);
        let logs: ApiResponse<serde_json::Value> = logs.json();
        // Both logins above were recorded
        assert!(logs.data["logs"].as_array().unwrap().len() >= 2);

        let (name, value) = bearer(&hr);
        let forbidden = server.get("/api/v1/audit-logs").add_header(name, value).await;
        forbidden.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_audit_log_filtering() {
        let (server, _) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;

        let (name, value) = bearer(&admin);
        let department: ApiResponse<serde_json::Value> = server
            .post("/api/v1/departments")
            .add_header(name, value)
            .json(&json!({"department_name": "Legal"}))
            .await
            .json();
        let department_id = department.data["id"].as_i64().unwrap();

        // Only the creation row carries this table and record id
        let (name, value) = bearer(&admin);
        let filtered: ApiResponse<serde_json::Value> = server
            .get(&format!(
                "/api/v1/audit-logs?table_affected=departments&record_id={}",
                department_id
            ))
            .add_header(name, value)
            .await
            .json();
        let rows = filtered.data["logs"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["action_type"], "CREATE");

        let (name, value) = bearer(&admin);
        let logins: ApiResponse<serde_json::Value> = server
            .get("/api/v1/audit-logs?action_type=LOGIN")
            .add_header(name, value)
            .await
            .json();
        let rows = logins.data["logs"].as_array().unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row["action_type"] == "LOGIN"));

        let (name, value) = bearer(&admin);
        let none: ApiResponse<serde_json::Value> = server
            .get("/api/v1/audit-logs?record_id=999999")
            .add_header(name, value)
            .await
            .json();
        assert!(none.data["logs"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deactivated_account_cannot_login() {
        let (server, _) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;

        let (name, value) = bearer(&admin);
        let created: ApiResponse<serde_json::Value> = server
            .post("/api/v1/users")
            .add_header(name, value)
            .json(&json!({
                "username": "temp_clerk",
                "email": "temp_clerk@test.local",
                "password": "Clerk#123",
                "role": "Employee",
            }))
            .await
            .json();
        let user_id = created.data["id"].as_i64().unwrap();

        // Works while active
        login(&server, "temp_clerk", "Clerk#123").await;

        let (name, value) = bearer(&admin);
        let deactivated: ApiResponse<serde_json::Value> = server
            .delete(&format!("/api/v1/users/{}", user_id))
            .add_header(name, value)
            .await
            .json();
        assert_eq!(deactivated.data["status"], "Inactive");

        let rejected = server
            .post("/api/v1/auth/login")
            .json(&json!({"username": "temp_clerk", "password": "Clerk#123"}))
            .await;
        rejected.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_referenced_leave_type_is_deactivated_not_deleted() {
        let (server, seed) = server().await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;

        // Vacation leave is pinned by the seeded balance
        let (name, value) = bearer(&hr);
        server
            .delete(&format!("/api/v1/leave/types/{}", seed.leave_type_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::OK);

        let (name, value) = bearer(&hr);
        let types: ApiResponse<serde_json::Value> = server
            .get("/api/v1/leave/types")
            .add_header(name, value)
            .await
            .json();
        let vacation = types
            .data
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["leave_type_name"] == "Vacation Leave")
            .expect("vacation leave row disappeared");
        assert_eq!(vacation["is_active"], false);

        // An unreferenced type goes away entirely
        let (name, value) = bearer(&hr);
        let birthday: ApiResponse<serde_json::Value> = server
            .post("/api/v1/leave/types")
            .add_header(name, value)
            .json(&json!({"leave_type_name": "Birthday Leave"}))
            .await
            .json();
        let birthday_id = birthday.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        server
            .delete(&format!("/api/v1/leave/types/{}", birthday_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::OK);

        let (name, value) = bearer(&hr);
        let types: ApiResponse<serde_json::Value> = server
            .get("/api/v1/leave/types")
            .add_header(name, value)
            .await
            .json();
        assert!(types
            .data
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["leave_type_name"] != "Birthday Leave"));
    }

    #[tokio::test]
    async fn test_expired_posting_hidden_from_portal() {
        let (server, _) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let deadline = chrono::Utc::now().date_naive() + chrono::Duration::days(7);

        let (name, value) = bearer(&admin);
        let department: ApiResponse<serde_json::Value> = server
            .post("/api/v1/departments")
            .add_header(name, value)
            .json(&json!({"department_name": "Treasury"}))
            .await
            .json();
        let department_id = department.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        let posting: ApiResponse<serde_json::Value> = server
            .post("/api/v1/recruitment/postings")
            .add_header(name, value)
            .json(&json!({
                "position_title": "Cashier I",
                "department_id": department_id,
                "job_description": "Handles collections",
                "qualifications": "Bachelor's degree",
                "application_deadline": deadline.to_string(),
            }))
            .await
            .json();
        let posting_id = posting.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        server
            .post(&format!("/api/v1/recruitment/postings/{}/status", posting_id))
            .add_header(name, value)
            .json(&json!({"status": "Published"}))
            .await
            .assert_status(StatusCode::OK);

        // Visible while the deadline is ahead
        server
            .get(&format!("/api/v1/jobs/{}", posting_id))
            .await
            .assert_status(StatusCode::OK);

        let yesterday = chrono::Utc::now().date_naive() - chrono::Duration::days(1);
        let (name, value) = bearer(&hr);
        server
            .put(&format!("/api/v1/recruitment/postings/{}", posting_id))
            .add_header(name, value)
            .json(&json!({"application_deadline": yesterday.to_string()}))
            .await
            .assert_status(StatusCode::OK);

        // Gone from the list and from the detail endpoint alike
        let listed: ApiResponse<serde_json::Value> = server.get("/api/v1/jobs").await.json();
        assert!(listed.data["positions"].as_array().unwrap().is_empty());
        server
            .get(&format!("/api/v1/jobs/{}", posting_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_department_delete_guarded_by_personnel() {
        let (server, seed) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;

        let (name, value) = bearer(&admin);
        let department: ApiResponse<serde_json::Value> = server
            .post("/api/v1/departments")
            .add_header(name, value)
            .json(&json!({"department_name": "Records"}))
            .await
            .json();
        let department_id = department.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&admin);
        server
            .put(&format!("/api/v1/personnel/{}", seed.employee_personnel_id))
            .add_header(name, value)
            .json(&json!({"department_id": department_id}))
            .await
            .assert_status(StatusCode::OK);

        let (name, value) = bearer(&admin);
        let blocked = server
            .delete(&format!("/api/v1/departments/{}", department_id))
            .add_header(name, value)
            .await;
        blocked.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_token_exchange() {
        let (server, _) = server().await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({"username": "jdoe", "password": "Employee#1"}))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let refresh_token = body.data["refresh_token"].as_str().unwrap().to_string();

        // A refresh token is not a bearer credential
        let (name, value) = bearer(&refresh_token);
        server
            .get("/api/v1/auth/me")
            .add_header(name, value)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let exchanged = server
            .post("/api/v1/auth/refresh")
            .json(&json!({"refresh_token": refresh_token}))
            .await;
        exchanged.assert_status(StatusCode::OK);
        let exchanged: ApiResponse<serde_json::Value> = exchanged.json();
        let token = exchanged.data["token"].as_str().unwrap().to_string();

        let (name, value) = bearer(&token);
        let me = server.get("/api/v1/auth/me").add_header(name, value).await;
        me.assert_status(StatusCode::OK);
        let me: ApiResponse<serde_json::Value> = me.json();
        assert_eq!(me.data["user"]["username"], "jdoe");

        // Garbage is rejected outright
        server
            .post("/api/v1/auth/refresh")
            .json(&json!({"refresh_token": "not-a-token"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_posting_delete_guarded_by_applications() {
        let (server, _) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;
        let hr = login(&server, "hr_officer", "HrPass#1").await;
        let deadline = chrono::Utc::now().date_naive() + chrono::Duration::days(30);

        let (name, value) = bearer(&admin);
        let department = server
            .post("/api/v1/departments")
            .add_header(name, value)
            .json(&json!({"department_name": "Records"}))
            .await;
        department.assert_status(StatusCode::CREATED);
        let department: ApiResponse<serde_json::Value> = department.json();
        let department_id = department.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        let posting = server
            .post("/api/v1/recruitment/postings")
            .add_header(name, value)
            .json(&json!({
                "position_title": "Records Officer I",
                "department_id": department_id,
                "job_description": "Maintains the registry",
                "qualifications": "Bachelor's degree",
                "application_deadline": deadline.to_string(),
            }))
            .await;
        posting.assert_status(StatusCode::CREATED);
        let posting: ApiResponse<serde_json::Value> = posting.json();
        let posting_id = posting.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        server
            .post(&format!("/api/v1/recruitment/postings/{}/status", posting_id))
            .add_header(name, value)
            .json(&json!({"status": "Published"}))
            .await
            .assert_status(StatusCode::OK);

        let register = server
            .post("/api/v1/auth/register")
            .json(&json!({
                "username": "applicant2",
                "email": "applicant2@mail.test",
                "password": "Applic4nt!",
                "first_name": "Maria",
                "last_name": "Santos",
            }))
            .await;
        register.assert_status(StatusCode::CREATED);
        let register: ApiResponse<serde_json::Value> = register.json();
        let applicant = register.data["token"].as_str().unwrap().to_string();

        let (name, value) = bearer(&applicant);
        server
            .post(&format!("/api/v1/jobs/{}/apply", posting_id))
            .add_header(name, value)
            .json(&json!({"cover_letter": "I am interested in this role."}))
            .await
            .assert_status(StatusCode::CREATED);

        // Applications pin the posting in place
        let (name, value) = bearer(&hr);
        server
            .delete(&format!("/api/v1/recruitment/postings/{}", posting_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::CONFLICT);

        // A fresh posting with no applications deletes cleanly
        let (name, value) = bearer(&hr);
        let empty = server
            .post("/api/v1/recruitment/postings")
            .add_header(name, value)
            .json(&json!({
                "position_title": "Records Officer II",
                "department_id": department_id,
                "job_description": "Supervises the registry",
                "qualifications": "Bachelor's degree, 2 years experience",
                "application_deadline": deadline.to_string(),
            }))
            .await;
        let empty: ApiResponse<serde_json::Value> = empty.json();
        let empty_id = empty.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&hr);
        server
            .delete(&format!("/api/v1/recruitment/postings/{}", empty_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_personnel_not_found() {
        let (server, _) = server().await;
        let admin = login(&server, "admin", "Admin#123").await;

        let (name, value) = bearer(&admin);
        let response = server
            .get("/api/v1/personnel/99999")
            .add_header(name, value)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
