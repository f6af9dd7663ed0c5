//! API integration tests
//!
//! These run against a live server on localhost:8080 with its database
//! migrated. Run with: cargo test -- --ignored

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080";

/// Unique name so tests can be re-run against the same database
fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

async fn create_author(client: &Client, name: &str) -> Value {
    let response = client
        .post(format!("{}/author", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn create_category(client: &Client, name: &str) -> Value {
    let response = client
        .post(format!("{}/category", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn create_book(client: &Client, body: Value) -> Value {
    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn get_book(client: &Client, id: i64) -> Value {
    let response = client
        .get(format!("{}/book/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    response.json().await.expect("Failed to parse response")
}

fn cover_form(filename: &str, mime: &str, data: Vec<u8>) -> Form {
    let part = Part::bytes(data)
        .file_name(filename.to_string())
        .mime_str(mime)
        .expect("Invalid mime type");
    Form::new().part("file", part)
}

#[tokio::test]
#[ignore]
async fn test_root_banner() {
    let client = Client::new();

    let response = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book management API is running");
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_author() {
    let client = Client::new();
    let name = unique("tolkien");

    let author = create_author(&client, &name).await;
    let id = author["id"].as_i64().expect("No author ID");
    assert_eq!(author["name"], name.as_str());
    assert!(author["bio"].is_null());

    let response = client
        .get(format!("{}/author/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["name"], name.as_str());
}

#[tokio::test]
#[ignore]
async fn test_create_author_duplicate_name_conflicts() {
    let client = Client::new();
    let name = unique("austen");

    create_author(&client, &name).await;

    let response = client
        .post(format!("{}/author", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
#[ignore]
async fn test_author_partial_update_keeps_other_fields() {
    let client = Client::new();
    let name = unique("pratchett");

    let response = client
        .post(format!("{}/author", BASE_URL))
        .json(&json!({ "name": name, "bio": "Discworld" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let author: Value = response.json().await.expect("Failed to parse response");
    let id = author["id"].as_i64().expect("No author ID");

    // Update only the bio; the name must survive
    let response = client
        .put(format!("{}/author/{}", BASE_URL, id))
        .json(&json!({ "bio": "Sir Terry" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["name"], name.as_str());
    assert_eq!(updated["bio"], "Sir Terry");
}

#[tokio::test]
#[ignore]
async fn test_update_author_name_collision_conflicts() {
    let client = Client::new();
    let first = unique("orwell");
    let second = unique("huxley");

    create_author(&client, &first).await;
    let author = create_author(&client, &second).await;
    let id = author["id"].as_i64().expect("No author ID");

    let response = client
        .put(format!("{}/author/{}", BASE_URL, id))
        .json(&json!({ "name": first }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_delete_then_get_author_is_404() {
    let client = Client::new();
    let author = create_author(&client, &unique("ephemeral")).await;
    let id = author["id"].as_i64().expect("No author ID");

    let response = client
        .delete(format!("{}/author/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/author/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("{}/author/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_category_update_name_collision_is_conflict_not_404() {
    let client = Client::new();
    let first = unique("fantasy");
    let second = unique("scifi");

    create_category(&client, &first).await;
    let category = create_category(&client, &second).await;
    let id = category["id"].as_i64().expect("No category ID");

    let response = client
        .put(format!("{}/category/{}", BASE_URL, id))
        .json(&json!({ "name": first }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
#[ignore]
async fn test_category_partial_update() {
    let client = Client::new();
    let name = unique("horror");

    let response = client
        .post(format!("{}/category", BASE_URL))
        .json(&json!({ "name": name, "description": "spooky" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let category: Value = response.json().await.expect("Failed to parse response");
    let id = category["id"].as_i64().expect("No category ID");

    let response = client
        .put(format!("{}/category/{}", BASE_URL, id))
        .json(&json!({ "description": "very spooky" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["name"], name.as_str());
    assert_eq!(updated["description"], "very spooky");
}

#[tokio::test]
#[ignore]
async fn test_create_book_requires_existing_references() {
    let client = Client::new();
    let author = create_author(&client, &unique("verne")).await;
    let category = create_category(&client, &unique("adventure")).await;
    let author_id = author["id"].as_i64().unwrap();
    let category_id = category["id"].as_i64().unwrap();

    // Unknown author
    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "title": "Ghost Book",
            "author_id": 999_999_999,
            "category_id": category_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "InvalidReference");

    // Unknown category
    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "title": "Ghost Book",
            "author_id": author_id,
            "category_id": 999_999_999
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Valid references
    let book = create_book(
        &client,
        json!({
            "title": "Twenty Thousand Leagues",
            "author_id": author_id,
            "category_id": category_id
        }),
    )
    .await;
    assert_eq!(book["author_id"], author_id);
    assert_eq!(book["category_id"], category_id);
    assert!(book["cover_image"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_update_book_invalid_reference_leaves_book_unchanged() {
    let client = Client::new();
    let author = create_author(&client, &unique("tolkien")).await;
    let category = create_category(&client, &unique("fantasy")).await;
    let author_id = author["id"].as_i64().unwrap();
    let category_id = category["id"].as_i64().unwrap();

    let book = create_book(
        &client,
        json!({
            "title": "The Hobbit",
            "author_id": author_id,
            "category_id": category_id
        }),
    )
    .await;
    let book_id = book["id"].as_i64().unwrap();

    let response = client
        .put(format!("{}/book/{}", BASE_URL, book_id))
        .json(&json!({ "author_id": 999_999_999 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let unchanged = get_book(&client, book_id).await;
    assert_eq!(unchanged["author_id"], author_id);
    assert_eq!(unchanged["title"], "The Hobbit");
}

#[tokio::test]
#[ignore]
async fn test_book_partial_update() {
    let client = Client::new();
    let author = create_author(&client, &unique("lem")).await;
    let category = create_category(&client, &unique("scifi")).await;

    let book = create_book(
        &client,
        json!({
            "title": "Solaris",
            "description": "An ocean planet",
            "published_year": 1961,
            "author_id": author["id"],
            "category_id": category["id"]
        }),
    )
    .await;
    let book_id = book["id"].as_i64().unwrap();

    let response = client
        .put(format!("{}/book/{}", BASE_URL, book_id))
        .json(&json!({ "title": "Solaris (revised)" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["title"], "Solaris (revised)");
    assert_eq!(updated["description"], "An ocean planet");
    assert_eq!(updated["published_year"], 1961);
}

#[tokio::test]
#[ignore]
async fn test_book_filters_combine_with_and() {
    let client = Client::new();
    let author_a = create_author(&client, &unique("author-a")).await;
    let author_b = create_author(&client, &unique("author-b")).await;
    let category = create_category(&client, &unique("filtered")).await;
    let a_id = author_a["id"].as_i64().unwrap();
    let b_id = author_b["id"].as_i64().unwrap();
    let c_id = category["id"].as_i64().unwrap();

    let token = unique("zephyrantha");
    create_book(
        &client,
        json!({
            "title": format!("First {}", token),
            "published_year": 1990,
            "author_id": a_id,
            "category_id": c_id
        }),
    )
    .await;
    create_book(
        &client,
        json!({
            "title": "Second",
            "description": format!("mentions {} inside", token.to_uppercase()),
            "published_year": 1990,
            "author_id": a_id,
            "category_id": c_id
        }),
    )
    .await;
    create_book(
        &client,
        json!({
            "title": format!("Third {}", token),
            "published_year": 2001,
            "author_id": b_id,
            "category_id": c_id
        }),
    )
    .await;

    // Filter by author: exactly the two books of author A
    let response = client
        .get(format!("{}/book?author_id={}", BASE_URL, a_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|b| b["author_id"] == a_id));

    // Combining filters narrows to the intersection
    let response = client
        .get(format!("{}/book?author_id={}&year=1990", BASE_URL, a_id))
        .send()
        .await
        .expect("Failed to send request");
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(books.len(), 2);

    let response = client
        .get(format!("{}/book?author_id={}&year=2001", BASE_URL, a_id))
        .send()
        .await
        .expect("Failed to send request");
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(books.is_empty());

    // Keyword matches case-insensitively against title OR description
    let response = client
        .get(format!(
            "{}/book?keyword={}",
            BASE_URL,
            token.to_uppercase()
        ))
        .send()
        .await
        .expect("Failed to send request");
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(books.len(), 3);

    // A keyword absent from both fields matches nothing
    let response = client
        .get(format!("{}/book?keyword={}", BASE_URL, unique("absent")))
        .send()
        .await
        .expect("Failed to send request");
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(books.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_delete_referenced_author_is_restricted() {
    let client = Client::new();
    let author = create_author(&client, &unique("busy")).await;
    let category = create_category(&client, &unique("busy-cat")).await;
    let author_id = author["id"].as_i64().unwrap();

    let book = create_book(
        &client,
        json!({
            "title": "Still referenced",
            "author_id": author_id,
            "category_id": category["id"]
        }),
    )
    .await;

    let response = client
        .delete(format!("{}/author/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // After the book is gone the author can be deleted
    let response = client
        .delete(format!("{}/book/{}", BASE_URL, book["id"].as_i64().unwrap()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/author/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_cover_upload_rejects_invalid_files() {
    let client = Client::new();
    let author = create_author(&client, &unique("cover-author")).await;
    let category = create_category(&client, &unique("cover-cat")).await;
    let book = create_book(
        &client,
        json!({
            "title": "Coverless",
            "author_id": author["id"],
            "category_id": category["id"]
        }),
    )
    .await;
    let book_id = book["id"].as_i64().unwrap();

    // Disallowed content type
    let response = client
        .post(format!("{}/book/{}/cover", BASE_URL, book_id))
        .multipart(cover_form("cover.png", "image/gif", b"gif data".to_vec()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Disallowed extension
    let response = client
        .post(format!("{}/book/{}/cover", BASE_URL, book_id))
        .multipart(cover_form("cover.bmp", "image/png", b"png data".to_vec()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Payload over 2 MiB
    let oversize = vec![0u8; 2 * 1024 * 1024 + 1];
    let response = client
        .post(format!("{}/book/{}/cover", BASE_URL, book_id))
        .multipart(cover_form("cover.png", "image/png", oversize))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // None of the rejected uploads touched the book
    let unchanged = get_book(&client, book_id).await;
    assert!(unchanged["cover_image"].is_null());

    // Unknown book id
    let response = client
        .post(format!("{}/book/999999999/cover", BASE_URL))
        .multipart(cover_form("cover.png", "image/png", b"png data".to_vec()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_cover_upload_sets_unique_paths() {
    let client = Client::new();
    let author = create_author(&client, &unique("illustrated")).await;
    let category = create_category(&client, &unique("art")).await;
    let book = create_book(
        &client,
        json!({
            "title": "Illustrated Edition",
            "author_id": author["id"],
            "category_id": category["id"]
        }),
    )
    .await;
    let book_id = book["id"].as_i64().unwrap();

    let png = b"\x89PNG\r\n\x1a\nfake image bytes".to_vec();

    let response = client
        .post(format!("{}/book/{}/cover", BASE_URL, book_id))
        .multipart(cover_form("cover.png", "image/png", png.clone()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse response");
    let first_path = updated["cover_image"]
        .as_str()
        .expect("cover_image not set")
        .to_string();
    assert!(first_path.starts_with(&format!("static/covers/book_{}_", book_id)));
    assert!(first_path.ends_with(".png"));

    // A second upload produces a distinct path
    let response = client
        .post(format!("{}/book/{}/cover", BASE_URL, book_id))
        .multipart(cover_form("cover.jpg", "image/jpeg", png))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse response");
    let second_path = updated["cover_image"].as_str().expect("cover_image not set");
    assert_ne!(second_path, first_path);

    // The uploaded file is served under /static
    let response = client
        .get(format!("{}/{}", BASE_URL, second_path))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
}
