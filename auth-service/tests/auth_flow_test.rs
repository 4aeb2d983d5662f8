mod common;

use auth_service::models::VerificationKind;
use auth_service::services::ServiceError;
use common::AuthHarness;
use uuid::Uuid;

#[tokio::test]
async fn test_create_credential_and_login() {
    let harness = AuthHarness::new(15);
    let user_id = Uuid::new_v4();

    harness
        .service
        .create_credential(user_id, "ada@example.com", "correct horse battery")
        .await
        .unwrap();

    let tokens = harness
        .service
        .login_with_password("ada@example.com", "correct horse battery")
        .await
        .unwrap();

    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(tokens.expires_in, 3600);

    let claims = harness.jwt.validate_token(&tokens.access_token).unwrap();
    assert_eq!(claims.user_id, user_id.to_string());
    assert_eq!(claims.sub, user_id.to_string());
}

#[tokio::test]
async fn test_login_is_case_insensitive_on_login_only() {
    let harness = AuthHarness::new(15);

    harness
        .service
        .create_credential(Uuid::new_v4(), "Ada@Example.com", "pw-secret-1")
        .await
        .unwrap();

    harness
        .service
        .login_with_password("ada@example.com", "pw-secret-1")
        .await
        .unwrap();

    let result = harness
        .service
        .login_with_password("ada@example.com", "PW-SECRET-1")
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_failures_collapse_to_invalid_credentials() {
    let harness = AuthHarness::new(15);

    harness
        .service
        .create_credential(Uuid::new_v4(), "ada@example.com", "pw-secret-1")
        .await
        .unwrap();

    let wrong_password = harness
        .service
        .login_with_password("ada@example.com", "nope")
        .await;
    assert!(matches!(wrong_password, Err(ServiceError::InvalidCredentials)));

    let unknown_login = harness
        .service
        .login_with_password("eve@example.com", "nope")
        .await;
    assert!(matches!(unknown_login, Err(ServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_second_credential_for_user_is_rejected() {
    let harness = AuthHarness::new(15);
    let user_id = Uuid::new_v4();

    harness
        .service
        .create_credential(user_id, "ada@example.com", "pw-secret-1")
        .await
        .unwrap();

    let result = harness
        .service
        .create_credential(user_id, "ada2@example.com", "pw-secret-2")
        .await;
    assert!(matches!(result, Err(ServiceError::CredentialAlreadyExists)));
}

#[tokio::test]
async fn test_change_password_rotates_and_logs_history() {
    let harness = AuthHarness::new(15);
    let user_id = Uuid::new_v4();

    harness
        .service
        .create_credential(user_id, "ada@example.com", "old-password")
        .await
        .unwrap();

    harness
        .service
        .change_password(
            user_id,
            "old-password",
            "new-password",
            Some("routine rotation".to_string()),
        )
        .await
        .unwrap();

    let old = harness
        .service
        .login_with_password("ada@example.com", "old-password")
        .await;
    assert!(matches!(old, Err(ServiceError::InvalidCredentials)));

    harness
        .service
        .login_with_password("ada@example.com", "new-password")
        .await
        .unwrap();

    let history = harness.credentials.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].changed_by_user_id, user_id);
    assert_eq!(history[0].reason.as_deref(), Some("routine rotation"));
}

#[tokio::test]
async fn test_change_password_requires_current_password() {
    let harness = AuthHarness::new(15);
    let user_id = Uuid::new_v4();

    harness
        .service
        .create_credential(user_id, "ada@example.com", "old-password")
        .await
        .unwrap();

    let result = harness
        .service
        .change_password(user_id, "wrong-current", "new-password", None)
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
    assert!(harness.credentials.history().is_empty());
}

#[tokio::test]
async fn test_password_reset_flow() {
    let harness = AuthHarness::new(15);
    let user_id = Uuid::new_v4();

    harness
        .service
        .create_credential(user_id, "ada@example.com", "old-password")
        .await
        .unwrap();

    let record = harness
        .service
        .request_password_reset("ada@example.com")
        .await
        .unwrap();
    assert_eq!(record.kind, VerificationKind::ResetPassword);
    assert_eq!(record.user_id, Some(user_id));

    harness
        .service
        .confirm_password_reset(record.verification_id, &record.code, "fresh-password")
        .await
        .unwrap();

    harness
        .service
        .login_with_password("ada@example.com", "fresh-password")
        .await
        .unwrap();

    let history = harness.credentials.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reason.as_deref(), Some("password reset"));

    // The code is single-use
    let reuse = harness
        .service
        .confirm_password_reset(record.verification_id, &record.code, "another-password")
        .await;
    assert!(matches!(reuse, Err(ServiceError::VerificationAlreadyUsed)));
}

#[tokio::test]
async fn test_reset_request_for_unknown_login_still_issues_a_record() {
    let harness = AuthHarness::new(15);

    let record = harness
        .service
        .request_password_reset("nobody@example.com")
        .await
        .unwrap();
    assert!(record.user_id.is_none());

    // Redemption fails only at credential lookup, after the code burns
    let result = harness
        .service
        .confirm_password_reset(record.verification_id, &record.code, "whatever")
        .await;
    assert!(matches!(result, Err(ServiceError::CredentialNotFound)));
}

#[tokio::test]
async fn test_login_with_verification_code() {
    let harness = AuthHarness::new(15);
    let user_id = Uuid::new_v4();

    let record = harness
        .verification
        .issue(
            "ada@example.com",
            VerificationKind::Authentication,
            Some(user_id),
        )
        .await
        .unwrap();

    let tokens = harness
        .service
        .login_with_verification_code(record.verification_id, &record.code)
        .await
        .unwrap();

    let claims = harness.jwt.validate_token(&tokens.access_token).unwrap();
    assert_eq!(claims.user_id, user_id.to_string());

    // Single-use: a second login with the same code fails
    let reuse = harness
        .service
        .login_with_verification_code(record.verification_id, &record.code)
        .await;
    assert!(matches!(reuse, Err(ServiceError::VerificationAlreadyUsed)));
}

#[tokio::test]
async fn test_login_code_of_wrong_kind_is_rejected() {
    let harness = AuthHarness::new(15);

    let record = harness
        .verification
        .issue(
            "ada@example.com",
            VerificationKind::ResetPassword,
            Some(Uuid::new_v4()),
        )
        .await
        .unwrap();

    let result = harness
        .service
        .login_with_verification_code(record.verification_id, &record.code)
        .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}
