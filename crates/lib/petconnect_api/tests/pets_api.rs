//! Pet listings and contact messages: public reads, owner/admin writes.

mod common;

use axum::http::StatusCode;
use common::{pet_body, request, test_app};
use serde_json::json;

#[tokio::test]
async fn creating_a_pet_requires_authentication() {
    let t = test_app().await;
    let (status, _) = t.post("/api/pets", None, pet_body("Rex", "Dog")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unsupported_method_on_pet_paths_is_405_even_anonymously() {
    let t = test_app().await;
    let uri = "/api/pets/0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b";

    let (status, _) = t.send(request("PATCH", uri, None, Some(pet_body("Rex", "Dog")))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = t.send(request("PATCH", "/api/pets", None, None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = t.put(uri, None, pet_body("Rex", "Dog")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = t.delete(uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn pet_is_owned_by_the_caller() {
    let t = test_app().await;
    t.register("admin").await;
    let (token, user) = t.register("alice").await;

    let mut body = pet_body("Rex", "Dog");
    body["ownerId"] = json!("00000000-0000-0000-0000-000000000000");
    let (status, pet) = t.post("/api/pets", Some(&token), body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pet["ownerId"], user["id"]);
    assert_eq!(pet["name"], "Rex");

    let (status, fetched) = t
        .get(&format!("/api/pets/{}", pet["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, pet);
}

#[tokio::test]
async fn invalid_pet_is_400() {
    let t = test_app().await;
    let (token, _) = t.register("alice").await;

    let mut body = pet_body("Rex", "Dog");
    body["birthDate"] = json!("2999-01-01");
    let (status, json) = t.post("/api/pets", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Birth date must be in the past");

    let (status, json) = t.post("/api/pets", Some(&token), pet_body("  ", "Dog")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Pet name is required");
}

#[tokio::test]
async fn only_owner_or_admin_may_modify() {
    let t = test_app().await;
    let (admin, _) = t.register("admin").await;
    let (alice, _) = t.register("alice").await;
    let (bob, _) = t.register("bob").await;

    let (_, pet) = t.post("/api/pets", Some(&alice), pet_body("Rex", "Dog")).await;
    let uri = format!("/api/pets/{}", pet["id"].as_str().unwrap());

    let (status, json) = t.put(&uri, Some(&bob), pet_body("Stolen", "Dog")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Forbidden");

    let (status, _) = t.delete(&uri, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = t.put(&uri, Some(&alice), pet_body("Rex II", "Dog")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Rex II");

    let (status, json) = t.put(&uri, Some(&admin), pet_body("Rex III", "Dog")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Rex III");

    let (status, _) = t.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = t.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn modifying_a_missing_pet_is_404() {
    let t = test_app().await;
    let (token, _) = t.register("alice").await;
    let uri = "/api/pets/0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b";
    let (status, _) = t.put(uri, Some(&token), pet_body("Rex", "Dog")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = t.delete(uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listings_filter_by_owner_species_and_activity() {
    let t = test_app().await;
    let (alice, user) = t.register("alice").await;
    let (bob, _) = t.register("bob").await;

    t.post("/api/pets", Some(&alice), pet_body("Rex", "Dog")).await;
    let mut retired = pet_body("Tom", "Cat");
    retired["isActive"] = json!(false);
    t.post("/api/pets", Some(&alice), retired).await;
    t.post("/api/pets", Some(&bob), pet_body("Fido", "dog")).await;

    let (_, all) = t.get("/api/pets", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let owner_id = user["id"].as_str().unwrap();
    let (_, mine) = t.get(&format!("/api/pets/owner/{owner_id}"), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);

    let (_, active) = t.get(&format!("/api/pets/owner/{owner_id}/active"), None).await;
    let active = active.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "Rex");

    let (_, dogs) = t.get("/api/pets/species/DOG", None).await;
    assert_eq!(dogs.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn contact_messages_are_admin_only() {
    let t = test_app().await;
    let (admin, _) = t.register("admin").await;
    let (user, _) = t.register("alice").await;

    let (status, json) = t
        .post(
            "/api/contact",
            None,
            json!({"name": "Sam", "email": "sam@example.com", "message": "Is Rex available?"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert!(json["messageId"].is_string());

    let (status, _) = t.get("/api/contact/messages", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = t.get("/api/contact/messages", Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Forbidden");

    let (status, json) = t.get("/api/contact/messages", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let messages = json.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["name"], "Sam");
}

#[tokio::test]
async fn contact_form_requires_fields() {
    let t = test_app().await;
    let (status, json) = t
        .post("/api/contact", None, json!({"name": "Sam", "email": "", "message": "hi"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Email is required");
}

#[tokio::test]
async fn health_and_ping() {
    let t = test_app().await;
    let (status, json) = t.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "UP");
    assert_eq!(json["storeConnected"], true);
    assert_eq!(json["version"], petconnect_core::version());

    let (status, _) = t.get("/api/ping", None).await;
    assert_eq!(status, StatusCode::OK);
}
