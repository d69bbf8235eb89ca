use ::common::{CompetitionStatus, NotificationKind};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use server::entity::{credential, notification};

use crate::common::{ASSET_BASE_URL, PASSWORD, PLACEHOLDER_IMAGE, TestApp, routes};

async fn credential_count(app: &TestApp, user_id: i32) -> u64 {
    credential::Entity::find()
        .filter(credential::Column::UserId.eq(user_id))
        .count(&app.db)
        .await
        .expect("DB query failed")
}

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body["credentials"]
        .as_array()
        .expect("credentials should be an array")
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

mod submission {
    use super::*;

    #[tokio::test]
    async fn first_submission_is_pending_at_order_zero() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;

        let res = app
            .post_with_token(
                &routes::submit_credential(competition_id),
                &json!({
                    "cosplay_title": "Spider-Gwen",
                    "character_name": "Gwen Stacy",
                    "position": "CHAMPION",
                    "contact_email": "gwen@example.com",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "PENDING");
        assert_eq!(res.body["order"], 0);
        assert_eq!(res.body["cosplay_title"], "Spider-Gwen");
        assert_eq!(res.body["competition_id"], competition_id);
        assert_eq!(res.body["user"]["username"], "gwen_cos");
        assert_eq!(res.body["competition"]["name"], "Winter Fest");
        assert_eq!(res.body["contact_email"], "gwen@example.com");
        assert!(res.body["reviewed_at"].is_null());
    }

    #[tokio::test]
    async fn later_submissions_append_to_the_order() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let a = app
            .insert_competition("A", CompetitionStatus::Accepted, None)
            .await;
        let b = app
            .insert_competition("B", CompetitionStatus::Ongoing, None)
            .await;

        let first = app.submit_credential(a, &token, "Spider-Gwen").await;
        let second = app.submit_credential(b, &token, "Miles").await;

        assert_eq!(first.body["order"], 0);
        assert_eq!(second.status, 201, "{}", second.text);
        assert_eq!(second.body["order"], 1);
    }

    #[tokio::test]
    async fn second_submission_for_same_competition_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let user_id = app.user_id("gwen_cos").await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;

        app.create_credential(competition_id, &token, "Spider-Gwen")
            .await;
        let res = app
            .submit_credential(competition_id, &token, "Spider-Gwen again")
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        assert!(
            res.body["message"]
                .as_str()
                .unwrap()
                .contains("already submitted")
        );
        assert_eq!(credential_count(&app, user_id).await, 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_submissions_create_one_row() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let user_id = app.user_id("gwen_cos").await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;

        let (a, b, c) = tokio::join!(
            app.submit_credential(competition_id, &token, "One"),
            app.submit_credential(competition_id, &token, "Two"),
            app.submit_credential(competition_id, &token, "Three"),
        );

        let statuses = [a.status, b.status, c.status];
        assert_eq!(statuses.iter().filter(|&&s| s == 201).count(), 1);
        assert_eq!(statuses.iter().filter(|&&s| s == 409).count(), 2);
        assert_eq!(credential_count(&app, user_id).await, 1);
    }

    #[tokio::test]
    async fn closed_competitions_reject_even_valid_submissions() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;

        for status in [
            CompetitionStatus::Draft,
            CompetitionStatus::Submitted,
            CompetitionStatus::Completed,
            CompetitionStatus::Rejected,
            CompetitionStatus::Cancelled,
        ] {
            let competition_id = app.insert_competition("Closed", status, None).await;
            let res = app
                .submit_credential(competition_id, &token, "Spider-Gwen")
                .await;
            assert_eq!(res.status, 400, "status {status}: {}", res.text);
            assert_eq!(res.body["code"], "INVALID_STATE");
        }
    }

    #[tokio::test]
    async fn unknown_competition_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;

        let res = app.submit_credential(9999, &token, "Spider-Gwen").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn empty_title_is_reported_per_field_and_nothing_is_written() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let user_id = app.user_id("gwen_cos").await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;

        let res = app
            .post_with_token(
                &routes::submit_credential(competition_id),
                &json!({
                    "cosplay_title": "",
                    "video_url": "not a url",
                    "contact_email": "nope",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["details"]["cosplay_title"], "is required");
        assert_eq!(res.body["details"]["video_url"], "must be a valid URL");
        assert_eq!(
            res.body["details"]["contact_email"],
            "must be a valid email address"
        );
        assert_eq!(credential_count(&app, user_id).await, 0);
    }

    #[tokio::test]
    async fn validation_runs_before_competition_checks() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;

        let res = app.submit_credential(9999, &token, "").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn organizer_is_notified_of_new_credentials() {
        let app = TestApp::spawn().await;
        app.create_user_with_role("org_hana", PASSWORD, "organizer")
            .await;
        let organizer_id = app.user_id("org_hana").await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, Some(organizer_id))
            .await;

        app.create_credential(competition_id, &token, "Spider-Gwen")
            .await;

        let rows = notification::Entity::find()
            .filter(notification::Column::UserId.eq(organizer_id))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, NotificationKind::CredentialSubmitted);
        assert_eq!(rows[0].related_id, Some(competition_id));
        assert!(rows[0].message.contains("gwen_cos"));
    }

    #[tokio::test]
    async fn competition_without_submitter_sends_no_notification() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let competition_id = app
            .insert_competition("Imported", CompetitionStatus::Accepted, None)
            .await;

        app.create_credential(competition_id, &token, "Spider-Gwen")
            .await;

        let total = notification::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(total, 0);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn owner_sees_all_statuses_others_see_approved_only() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let owner_id = app.user_id("gwen_cos").await;
        let viewer = app.create_authenticated_user("fan_ren", PASSWORD).await;
        let admin = app.create_user_with_role("mod_aki", PASSWORD, "admin").await;

        let a = app
            .insert_competition("A", CompetitionStatus::Accepted, None)
            .await;
        let b = app
            .insert_competition("B", CompetitionStatus::Accepted, None)
            .await;
        let approved = app.create_credential(a, &owner, "Approved one").await;
        app.create_credential(b, &owner, "Pending one").await;

        let res = app
            .post_with_token(
                &routes::credential_review(approved),
                &json!({"action": "APPROVE"}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let own = app
            .get_with_token(&routes::user_credentials(owner_id), &owner)
            .await;
        assert_eq!(own.status, 200);
        assert_eq!(ids(&own.body).len(), 2);

        let public = app
            .get_with_token(&routes::user_credentials(owner_id), &viewer)
            .await;
        assert_eq!(public.status, 200);
        assert_eq!(ids(&public.body), vec![approved as i64]);
        assert!(public.body["credentials"][0].get("contact_email").is_none());

        let hidden = app
            .get_with_token(&routes::user_credential(owner_id, b), &viewer)
            .await;
        assert_eq!(hidden.status, 404);

        let by_admin = app
            .get_with_token(&routes::user_credential(owner_id, b), &admin)
            .await;
        assert_eq!(by_admin.status, 200);
        assert_eq!(by_admin.body["credential"]["status"], "PENDING");
    }

    #[tokio::test]
    async fn get_returns_the_credential_for_a_competition() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let user_id = app.user_id("gwen_cos").await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;
        let id = app
            .create_credential(competition_id, &token, "Spider-Gwen")
            .await;

        let res = app
            .get_with_token(&routes::user_credential(user_id, competition_id), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["credential"]["id"], id);

        let other = app
            .insert_competition("Other", CompetitionStatus::Accepted, None)
            .await;
        let missing = app
            .get_with_token(&routes::user_credential(user_id, other), &token)
            .await;
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn display_image_falls_back_to_logo_then_placeholder() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let with_logo = app
            .insert_competition_with_logo(
                "Logo Fest",
                CompetitionStatus::Accepted,
                None,
                Some("https://cdn.example.com/logo.png"),
            )
            .await;
        let bare = app
            .insert_competition("Bare Fest", CompetitionStatus::Accepted, None)
            .await;
        let photo = app
            .insert_competition_with_logo(
                "Photo Fest",
                CompetitionStatus::Accepted,
                None,
                Some("https://cdn.example.com/other-logo.png"),
            )
            .await;

        let res = app.submit_credential(with_logo, &token, "A").await;
        assert_eq!(res.body["display_image"], "https://cdn.example.com/logo.png");

        let res = app.submit_credential(bare, &token, "B").await;
        assert_eq!(res.body["display_image"], PLACEHOLDER_IMAGE);

        let res = app
            .post_with_token(
                &routes::submit_credential(photo),
                &json!({
                    "cosplay_title": "C",
                    "image_url": "https://cdn.example.com/me.jpg",
                }),
                &token,
            )
            .await;
        assert_eq!(res.body["display_image"], "https://cdn.example.com/me.jpg");
    }
}

mod reorder {
    use super::*;

    async fn three_credentials(app: &TestApp, token: &str) -> [i32; 3] {
        let mut out = [0; 3];
        for (i, slot) in out.iter_mut().enumerate() {
            let competition_id = app
                .insert_competition(&format!("Fest {i}"), CompetitionStatus::Accepted, None)
                .await;
            *slot = app
                .create_credential(competition_id, token, &format!("Entry {i}"))
                .await;
        }
        out
    }

    #[tokio::test]
    async fn reorder_then_list_follows_the_new_order() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let user_id = app.user_id("gwen_cos").await;
        let [c1, c2, c3] = three_credentials(&app, &token).await;

        let res = app
            .put_with_token(
                routes::CREDENTIALS_REORDER,
                &json!({"credentials": [
                    {"id": c3, "order": 0},
                    {"id": c1, "order": 1},
                    {"id": c2, "order": 2},
                ]}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let list = app
            .get_with_token(&routes::user_credentials(user_id), &token)
            .await;
        assert_eq!(ids(&list.body), vec![c3 as i64, c1 as i64, c2 as i64]);
        let orders: Vec<i64> = list.body["credentials"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["order"].as_i64().unwrap())
            .collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn sparse_orders_are_normalized_to_indexes() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let [c1, c2, c3] = three_credentials(&app, &token).await;

        let res = app
            .put_with_token(
                routes::CREDENTIALS_REORDER,
                &json!({"credentials": [
                    {"id": c1, "order": 50},
                    {"id": c2, "order": 10},
                    {"id": c3, "order": 30},
                ]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(ids(&res.body), vec![c2 as i64, c3 as i64, c1 as i64]);
        assert_eq!(res.body["credentials"][2]["order"], 2);
    }

    #[tokio::test]
    async fn foreign_credential_aborts_the_whole_reorder() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let user_id = app.user_id("gwen_cos").await;
        let other = app.create_authenticated_user("miles_cos", PASSWORD).await;
        let [c1, c2, _] = three_credentials(&app, &token).await;
        let competition_id = app
            .insert_competition("Elsewhere", CompetitionStatus::Accepted, None)
            .await;
        let foreign = app
            .create_credential(competition_id, &other, "Miles")
            .await;

        let res = app
            .put_with_token(
                routes::CREDENTIALS_REORDER,
                &json!({"credentials": [
                    {"id": c2, "order": 0},
                    {"id": c1, "order": 1},
                    {"id": foreign, "order": 2},
                ]}),
                &token,
            )
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let list = app
            .get_with_token(&routes::user_credentials(user_id), &token)
            .await;
        assert_eq!(ids(&list.body)[..2], [c1 as i64, c2 as i64]);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let [c1, _, _] = three_credentials(&app, &token).await;

        let res = app
            .put_with_token(
                routes::CREDENTIALS_REORDER,
                &json!({"credentials": [{"id": c1, "order": 0}, {"id": 99999, "order": 1}]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn empty_or_duplicate_payloads_are_invalid() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let [c1, _, _] = three_credentials(&app, &token).await;

        for payload in [
            json!({"credentials": []}),
            json!({"credentials": [{"id": c1, "order": 0}, {"id": c1, "order": 1}]}),
            json!({"credentials": [{"id": c1, "order": -1}]}),
        ] {
            let res = app
                .put_with_token(routes::CREDENTIALS_REORDER, &payload, &token)
                .await;
            assert_eq!(res.status, 400, "{payload}");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_row_photo_and_sends_receipt() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let user_id = app.user_id("gwen_cos").await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;

        let photo = app.assets_dir.path().join("credentials").join("gwen.jpg");
        std::fs::create_dir_all(photo.parent().unwrap()).unwrap();
        std::fs::write(&photo, b"jpeg").unwrap();

        let created = app
            .post_with_token(
                &routes::submit_credential(competition_id),
                &json!({
                    "cosplay_title": "Spider-Gwen",
                    "image_url": format!("{ASSET_BASE_URL}/credentials/gwen.jpg"),
                }),
                &token,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);

        let res = app
            .delete_with_token(&routes::credential(created.id()), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);

        let list = app
            .get_with_token(&routes::user_credentials(user_id), &token)
            .await;
        assert!(ids(&list.body).is_empty());
        assert!(!photo.exists());

        let receipts = notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::Kind.eq(NotificationKind::CredentialDeleted))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(receipts, 1);
    }

    #[tokio::test]
    async fn external_photo_url_is_left_alone() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;
        let created = app
            .post_with_token(
                &routes::submit_credential(competition_id),
                &json!({
                    "cosplay_title": "Spider-Gwen",
                    "image_url": "https://elsewhere.example.com/gwen.jpg",
                }),
                &token,
            )
            .await;

        let res = app
            .delete_with_token(&routes::credential(created.id()), &token)
            .await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn reviewed_credentials_can_still_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let user_id = app.user_id("gwen_cos").await;
        let admin = app.create_user_with_role("mod_aki", PASSWORD, "admin").await;
        let a = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;
        let b = app
            .insert_competition("Spring Fest", CompetitionStatus::Ongoing, None)
            .await;
        let approved = app.create_credential(a, &token, "Spider-Gwen").await;
        let rejected = app.create_credential(b, &token, "Miles").await;

        for (id, review) in [
            (approved, json!({"action": "APPROVE"})),
            (rejected, json!({"action": "REJECT", "rejection_reason": "Blurry photo"})),
        ] {
            let res = app
                .post_with_token(&routes::credential_review(id), &review, &admin)
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
        }

        for id in [approved, rejected] {
            let res = app.delete_with_token(&routes::credential(id), &token).await;
            assert_eq!(res.status, 200, "{}", res.text);
            assert_eq!(res.body["success"], true);
        }

        let list = app
            .get_with_token(&routes::user_credentials(user_id), &token)
            .await;
        assert!(ids(&list.body).is_empty());
        assert_eq!(credential_count(&app, user_id).await, 0);
    }

    #[tokio::test]
    async fn only_the_owner_may_delete() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let other = app.create_authenticated_user("miles_cos", PASSWORD).await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;
        let id = app
            .create_credential(competition_id, &token, "Spider-Gwen")
            .await;

        let res = app.delete_with_token(&routes::credential(id), &other).await;
        assert_eq!(res.status, 403);

        let res = app
            .delete_with_token(&routes::credential(99999), &token)
            .await;
        assert_eq!(res.status, 404);

        assert!(
            credential::Entity::find_by_id(id)
                .one(&app.db)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn receipt_can_be_disabled() {
        let app = TestApp::spawn_with(
            |config| config.notifications.notify_on_delete = false,
            std::sync::Arc::new(server::effects::CredentialCountBadges),
        )
        .await;
        let token = app.create_authenticated_user("gwen_cos", PASSWORD).await;
        let competition_id = app
            .insert_competition("Winter Fest", CompetitionStatus::Accepted, None)
            .await;
        let id = app
            .create_credential(competition_id, &token, "Spider-Gwen")
            .await;

        let res = app.delete_with_token(&routes::credential(id), &token).await;
        assert_eq!(res.status, 200);

        let total = notification::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(total, 0);
    }
}
