//! Endpoint-level scenarios for authentication and access control

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use std::sync::Arc;
use traindesk::api::{auth as auth_api, server::AppState, server::SharedState, trainings, users};
use traindesk::auth::models::{AuthUser, LoginRequest, RegisterRequest};
use traindesk::auth::{Role, TokenIssuer};
use traindesk::config::{AuthConfig, Config};
use traindesk::error::Error;
use traindesk::store::{MemoryStore, NewTraining, NewUser, TrainingType, UserRecord, UserStore, UserUpdate};

const SECRET: &str = "scenario-secret";

// Low bcrypt cost keeps the suite fast; production uses DEFAULT_COST.
const TEST_COST: u32 = 4;

fn test_state() -> (SharedState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let config = Config {
        auth: AuthConfig {
            secret: SECRET.to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    (AppState::with_store(config, store.clone()), store)
}

async fn seed_user(
    store: &MemoryStore,
    username: &str,
    firstname: &str,
    lastname: &str,
    role: Role,
    approved: bool,
) -> UserRecord {
    store
        .create_user(NewUser {
            title: "Mr.".to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            middlename: None,
            office: "Operations".to_string(),
            username: username.to_string(),
            email: format!("{}@example.gov", username),
            role,
            password_hash: bcrypt::hash("correct", TEST_COST).unwrap(),
            approved,
        })
        .await
        .unwrap()
}

fn as_caller(record: &UserRecord) -> AuthUser {
    AuthUser {
        id: record.id,
        role: record.role,
        firstname: record.firstname.clone(),
        lastname: record.lastname.clone(),
        office: record.office.clone(),
    }
}

fn login_request(identifier: &str, password: &str) -> LoginRequest {
    LoginRequest {
        identifier: identifier.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_login_approved_member_succeeds() {
    let (state, store) = test_state();
    seed_user(&store, "jdoe", "John", "Doe", Role::Member, true).await;

    let resp = auth_api::login_user(
        state.users.as_ref(),
        &state.issuer,
        login_request("jdoe", "correct"),
    )
    .await
    .expect("login failed");

    assert_eq!(resp.role, Role::Member);
    assert!(resp.is_approved);
    assert!(!resp.token.is_empty());
    // The issued token verifies and carries the same identity.
    let identity = state.issuer.verify(&resp.token).unwrap();
    assert_eq!(identity.id, resp.id);
    assert_eq!(identity.role, Role::Member);
}

#[tokio::test]
async fn test_login_by_email_identifier() {
    let (state, store) = test_state();
    seed_user(&store, "jdoe", "John", "Doe", Role::Member, true).await;

    let resp = auth_api::login_user(
        state.users.as_ref(),
        &state.issuer,
        login_request("jdoe@example.gov", "correct"),
    )
    .await
    .unwrap();
    assert_eq!(resp.firstname, "John");
}

#[tokio::test]
async fn test_login_unapproved_member_gets_not_approved() {
    let (state, store) = test_state();
    seed_user(&store, "jdoe", "John", "Doe", Role::Member, false).await;

    let err = auth_api::login_user(
        state.users.as_ref(),
        &state.issuer,
        login_request("jdoe", "correct"),
    )
    .await
    .expect_err("login should be rejected");

    assert!(matches!(err, Error::NotApproved));
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_unapproved_admin_is_not_gated() {
    let (state, store) = test_state();
    seed_user(&store, "boss", "Ada", "Cruz", Role::Admin, false).await;

    let resp = auth_api::login_user(
        state.users.as_ref(),
        &state.issuer,
        login_request("boss", "correct"),
    )
    .await
    .unwrap();
    assert_eq!(resp.role, Role::Admin);
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let (state, store) = test_state();
    seed_user(&store, "jdoe", "John", "Doe", Role::Member, true).await;

    let err = auth_api::login_user(
        state.users.as_ref(),
        &state.issuer,
        login_request("jdoe", "wrong"),
    )
    .await
    .expect_err("login should fail");
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_user_is_not_found() {
    let (state, _store) = test_state();
    let err = auth_api::login_user(
        state.users.as_ref(),
        &state.issuer,
        login_request("ghost", "correct"),
    )
    .await
    .expect_err("login should fail");
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

fn register_request(username: &str, role: Role) -> RegisterRequest {
    RegisterRequest {
        title: "Ms.".to_string(),
        lastname: "Reyes".to_string(),
        firstname: "Ana".to_string(),
        middlename: None,
        office: "Operations".to_string(),
        username: username.to_string(),
        email: format!("{}@example.gov", username),
        role,
        password: "secret123".to_string(),
    }
}

#[tokio::test]
async fn test_register_member_starts_unapproved() {
    let (state, store) = test_state();
    auth_api::register_user(state.users.as_ref(), register_request("areyes", Role::Member))
        .await
        .unwrap();

    let user = store.find_by_identifier("areyes").await.unwrap().unwrap();
    assert!(!user.approved);
}

#[tokio::test]
async fn test_register_admin_auto_approved() {
    let (state, store) = test_state();
    auth_api::register_user(state.users.as_ref(), register_request("chief", Role::Admin))
        .await
        .unwrap();

    let user = store.find_by_identifier("chief").await.unwrap().unwrap();
    assert!(user.approved);
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let (state, store) = test_state();
    seed_user(&store, "areyes", "Ana", "Reyes", Role::Member, true).await;

    let err = auth_api::register_user(state.users.as_ref(), register_request("areyes", Role::Member))
        .await
        .expect_err("duplicate registration should fail");
    assert!(matches!(err, Error::AccountConflict));
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_refresh_extends_expiry() {
    let (state, store) = test_state();
    let user = seed_user(&store, "boss", "Ada", "Cruz", Role::Admin, true).await;

    // Mint a token two minutes from expiry; the state issuer's full TTL
    // applies to the replacement.
    let near_expiry_issuer = TokenIssuer::new(SECRET, 2);
    let old_token = near_expiry_issuer.issue(&user).unwrap();
    let old_expiry = state.issuer.verify(&old_token).unwrap().expires_at;

    let resp = auth_api::refresh_user_token(state.users.as_ref(), &state.issuer, &old_token)
        .await
        .expect("refresh failed");
    let new_expiry = state.issuer.verify(&resp.token).unwrap().expires_at;
    assert!(new_expiry > old_expiry);
}

#[tokio::test]
async fn test_refresh_carries_current_role_not_token_role() {
    let (state, store) = test_state();
    let user = seed_user(&store, "jdoe", "John", "Doe", Role::Member, true).await;
    let old_token = state.issuer.issue(&user).unwrap();

    // Promote between issuance and refresh.
    store
        .update_user(
            user.id,
            UserUpdate {
                role: Some(Role::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let resp = auth_api::refresh_user_token(state.users.as_ref(), &state.issuer, &old_token)
        .await
        .unwrap();
    assert_eq!(resp.role, Role::Admin);
    assert_eq!(state.issuer.verify(&resp.token).unwrap().role, Role::Admin);
}

#[tokio::test]
async fn test_refresh_with_expired_token_rejected() {
    let (state, store) = test_state();
    let user = seed_user(&store, "jdoe", "John", "Doe", Role::Member, true).await;

    let expired_issuer = TokenIssuer::new(SECRET, -5);
    let expired_token = expired_issuer.issue(&user).unwrap();

    let err = auth_api::refresh_user_token(state.users.as_ref(), &state.issuer, &expired_token)
        .await
        .expect_err("expired token must not refresh");
    assert!(matches!(err, Error::ExpiredCredential));
}

#[tokio::test]
async fn test_member_fetching_other_profile_is_forbidden_not_not_found() {
    let (state, store) = test_state();
    let member_a = seed_user(&store, "a", "Ana", "Reyes", Role::Member, true).await;
    let member_b = seed_user(&store, "b", "Ben", "Cruz", Role::Member, true).await;

    let err = users::get_user(State(state.clone()), as_caller(&member_a), Path(member_b.id))
        .await
        .map(|_| ())
        .expect_err("cross-member profile read must fail");
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    // The same applies to a nonexistent id, so existence is not leaked.
    let err = users::get_user(
        State(state.clone()),
        as_caller(&member_a),
        Path(uuid::Uuid::new_v4()),
    )
    .await
    .map(|_| ())
    .expect_err("probe must fail");
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_member_reads_and_edits_own_profile() {
    let (state, store) = test_state();
    let member = seed_user(&store, "a", "Ana", "Reyes", Role::Member, true).await;

    let fetched = users::get_user(State(state.clone()), as_caller(&member), Path(member.id))
        .await
        .unwrap();
    assert_eq!(fetched.0.username, "a");

    let updated = users::apply_user_update(
        state.users.as_ref(),
        &as_caller(&member),
        member.id,
        UserUpdate {
            office: Some("Field Office".to_string()),
            // Attempted self-promotion; must be ignored.
            role: Some(Role::Admin),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.office, "Field Office");
    assert_eq!(updated.role, Role::Member);
}

#[tokio::test]
async fn test_admin_cannot_touch_superadmin() {
    let (state, store) = test_state();
    let admin = seed_user(&store, "boss", "Ada", "Cruz", Role::Admin, true).await;
    let superadmin = seed_user(&store, "root", "Sam", "Vera", Role::SuperAdmin, true).await;

    let err = users::apply_user_update(
        state.users.as_ref(),
        &as_caller(&admin),
        superadmin.id,
        UserUpdate {
            role: Some(Role::Member),
            ..Default::default()
        },
    )
    .await
    .expect_err("admin must not demote a superadmin");
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_edits_other_admins_and_members() {
    let (state, store) = test_state();
    let admin = seed_user(&store, "boss", "Ada", "Cruz", Role::Admin, true).await;
    let peer = seed_user(&store, "boss2", "Bea", "Lim", Role::Admin, true).await;

    let updated = users::apply_user_update(
        state.users.as_ref(),
        &as_caller(&admin),
        peer.id,
        UserUpdate {
            role: Some(Role::Member),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.role, Role::Member);
}

async fn seed_training(state: &SharedState, author: &str, title: &str) {
    use traindesk::store::TrainingStore;
    state
        .trainings
        .create_training(NewTraining {
            title: title.to_string(),
            training_type: TrainingType::Technical,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
            hours: 24.0,
            sponsor: "CSC".to_string(),
            author: author.to_string(),
            office: "Operations".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_member_list_is_scoped_to_own_records() {
    let (state, store) = test_state();
    let member = seed_user(&store, "a", "Ana", "Reyes", Role::Member, true).await;
    seed_training(&state, "Ana Reyes", "Incident Command").await;
    seed_training(&state, "Ana Reyes", "First Aid").await;
    seed_training(&state, "Ben Cruz", "Logistics").await;

    let page = trainings::list_trainings(
        State(state.clone()),
        as_caller(&member),
        Query(serde_json::from_value(serde_json::json!({})).unwrap()),
    )
    .await
    .unwrap();

    assert_eq!(page.0.total, 2);
    assert!(page.0.records.iter().all(|t| t.author == "Ana Reyes"));
}

#[tokio::test]
async fn test_admin_list_is_unscoped() {
    let (state, store) = test_state();
    let admin = seed_user(&store, "boss", "Ada", "Cruz", Role::Admin, true).await;
    seed_training(&state, "Ana Reyes", "Incident Command").await;
    seed_training(&state, "Ben Cruz", "Logistics").await;

    let page = trainings::list_trainings(
        State(state.clone()),
        as_caller(&admin),
        Query(serde_json::from_value(serde_json::json!({})).unwrap()),
    )
    .await
    .unwrap();
    assert_eq!(page.0.total, 2);
}

#[tokio::test]
async fn test_member_cannot_read_another_members_training() {
    use traindesk::store::TrainingStore;
    let (state, store) = test_state();
    let member = seed_user(&store, "a", "Ana", "Reyes", Role::Member, true).await;
    let record = state
        .trainings
        .create_training(NewTraining {
            title: "Logistics".to_string(),
            training_type: TrainingType::Supervisory,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
            hours: 16.0,
            sponsor: "CSC".to_string(),
            author: "Ben Cruz".to_string(),
            office: "Operations".to_string(),
        })
        .await
        .unwrap();

    let err = trainings::get_training(State(state.clone()), as_caller(&member), Path(record.id))
        .await
        .map(|_| ())
        .expect_err("cross-member training read must fail");
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_unauthorized_on_protected_routes() {
    let (state, store) = test_state();
    let user = seed_user(&store, "jdoe", "John", "Doe", Role::Member, true).await;
    let token = state.issuer.issue(&user).unwrap();

    // The token still verifies, but the account behind it is gone; the
    // credential is dead, not a missing resource.
    store.delete_user(user.id).await.unwrap();

    let err = traindesk::auth::resolve_auth_user(&state, &token)
        .await
        .map(|_| ())
        .expect_err("dead credential must be rejected");
    assert!(matches!(err, Error::InvalidCredential(_)));
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_training_hours_must_be_a_finite_non_negative_number() {
    let (state, store) = test_state();
    let member = seed_user(&store, "a", "Ana", "Reyes", Role::Member, true).await;

    let request = |hours: f64| trainings::CreateTrainingRequest {
        title: "Water Rescue".to_string(),
        training_type: TrainingType::Technical,
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        hours,
        sponsor: "Civil Defense Office".to_string(),
        office: None,
        author: None,
    };

    for bad in [f64::NAN, f64::INFINITY, -1.0] {
        let err = trainings::create_training(
            State(state.clone()),
            as_caller(&member),
            axum::Json(request(bad)),
        )
        .await
        .map(|_| ())
        .expect_err("non-finite or negative hours must be rejected");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    // A plain finite value still passes.
    assert!(trainings::create_training(
        State(state.clone()),
        as_caller(&member),
        axum::Json(request(8.0)),
    )
    .await
    .is_ok());
}

#[tokio::test]
async fn test_member_created_training_is_always_self_authored() {
    let (state, store) = test_state();
    let member = seed_user(&store, "a", "Ana", "Reyes", Role::Member, true).await;

    let (_status, record) = trainings::create_training(
        State(state.clone()),
        as_caller(&member),
        axum::Json(
            serde_json::from_value(serde_json::json!({
                "title": "Water Rescue",
                "type": "Technical",
                "start_date": "2024-06-01",
                "end_date": "2024-06-03",
                "hours": 24.0,
                "sponsor": "Civil Defense Office",
                "author": "Somebody Else"
            }))
            .unwrap(),
        ),
    )
    .await
    .unwrap();
    assert_eq!(record.0.author, "Ana Reyes");
}
