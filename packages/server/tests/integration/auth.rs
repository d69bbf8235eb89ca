use serde_json::json;

use crate::common::{PASSWORD, TestApp, TestResponse, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn cosplayer_can_register() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "yuki_cos", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "yuki_cos");
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "yuki_cos", "password": PASSWORD});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn short_password_and_bad_username_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "yuki_cos", "password": "short"}),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["details"]["password"], "must be 8-128 characters");

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "yuki cos!", "password": PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["details"]["username"].is_string());
        assert!(res.body["details"].get("password").is_none());
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn new_user_is_a_cosplayer_who_may_submit_credentials() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "yuki_cos", "password": PASSWORD});

        let reg = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);
        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["id"], reg.body["id"]);
        assert_eq!(res.body["role"], "cosplayer");
        assert_eq!(res.body["permissions"], json!(["credential:submit"]));
    }

    #[tokio::test]
    async fn admin_token_carries_review_permissions() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("mod_aki", PASSWORD, "admin").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        let permissions = res.body["permissions"]
            .as_array()
            .expect("permissions should be an array");
        for p in [
            "credential:review",
            "competition:review",
            "competition:manage",
        ] {
            assert!(permissions.contains(&json!(p)), "missing {p}");
        }
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("yuki_cos", PASSWORD).await;

        let wrong = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "yuki_cos", "password": "not-the-password"}),
            )
            .await;
        let unknown = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "nobody", "password": PASSWORD}),
            )
            .await;

        assert_eq!(wrong.status, 401);
        assert_eq!(unknown.status, 401);
        assert_eq!(wrong.body, unknown.body);
        assert_eq!(wrong.body["code"], "INVALID_CREDENTIALS");
    }
}

mod request_validation {
    use super::*;

    #[tokio::test]
    async fn malformed_json_body_returns_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::REGISTER))
            .header("Content-Type", "application/json")
            .body("{\"username\": ")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod authenticated_access {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_token_identity() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("yuki_cos", PASSWORD).await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "yuki_cos");
        assert_eq!(res.body["id"], app.user_id("yuki_cos").await);
        assert_eq!(res.body["role"], "cosplayer");
    }

    #[tokio::test]
    async fn missing_token_is_reported_as_missing() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::COMPETITIONS).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_and_non_bearer_tokens_are_invalid() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-valid-jwt").await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, routes::ME))
            .header("Authorization", "Basic abc123")
            .send()
            .await
            .expect("Failed to send request");
        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
