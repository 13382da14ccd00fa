use domain::DomainError;
use domain::platform::{AuthAdmin, IdentityProvider};
use domain::user::{NewAuthUser, Role};
use infrastructure::PlatformAuthClient;
use infrastructure::config::PlatformConfig;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PlatformAuthClient {
    PlatformAuthClient::new(&PlatformConfig {
        url: format!("{}/", server.uri()),
        service_role_key: "service-key".into(),
        anon_key: "anon-key".into(),
    })
    .unwrap()
}

fn new_user() -> NewAuthUser {
    NewAuthUser {
        email: "sup001@fieldops.local".into(),
        password: "Ab3#xY9z".into(),
        full_name: "Ravi".into(),
        role: Role::Supervisor,
        city_id: Some("c1".into()),
    }
}

#[tokio::test]
async fn resolves_token_with_anon_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "emp001@fieldops.local",
            "role": "authenticated"
        })))
        .mount(&server)
        .await;

    let user = client(&server).resolve("user-token").await.unwrap();

    assert_eq!(user.id, "u-1");
    assert_eq!(user.email, "emp001@fieldops.local");
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "invalid JWT"})))
        .mount(&server)
        .await;

    let err = client(&server).resolve("expired").await.unwrap_err();

    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn create_user_sends_metadata_with_service_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/admin/users"))
        .and(header("authorization", "Bearer service-key"))
        .and(body_partial_json(json!({
            "email": "sup001@fieldops.local",
            "email_confirm": true,
            "user_metadata": { "full_name": "Ravi", "role": "supervisor", "city_id": "c1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "new-id",
            "email": "sup001@fieldops.local"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server).create_user(&new_user()).await.unwrap();

    assert_eq!(created.id, "new-id");
}

#[tokio::test]
async fn existing_email_is_a_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/admin/users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 422,
            "error_code": "email_exists",
            "msg": "A user with this email address has already been registered"
        })))
        .mount(&server)
        .await;

    let err = client(&server).create_user(&new_user()).await.unwrap_err();

    assert_eq!(err, DomainError::Conflict("Email already exists".into()));
}

#[tokio::test]
async fn update_and_delete_hit_admin_user_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/auth/v1/admin/users/u-9"))
        .and(body_partial_json(json!({ "password": "N3w#pass" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u-9" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/auth/v1/admin/users/u-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let platform = client(&server);
    platform.update_password("u-9", "N3w#pass").await.unwrap();
    platform.delete_user("u-9").await.unwrap();
}

#[tokio::test]
async fn server_errors_surface_as_platform_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/auth/v1/admin/users/u-9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).delete_user("u-9").await.unwrap_err();

    assert!(matches!(err, DomainError::Platform(_)));
    assert_eq!(err.status_code(), 502);
}
