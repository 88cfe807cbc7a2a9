mod common;

use anyhow::Result;
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn get_user_by_id() -> Result<()> {
    let server = common::spawn_server().await?;
    server.signup(Some("alice"), "a@x.com", "pw").await?;
    server.signup(Some("bob"), "b@x.com", "pw").await?;

    let res = server.client.get(server.url("/users/2")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["user"]["id"], 2);
    assert_eq!(body["user"]["username"], "bob");
    assert_eq!(body["user"]["email"], "b@x.com");
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/users/abc")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Invalid id type");

    let res = server.client.delete(server.url("/users/abc")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn missing_id_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/users/99")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["error"], "Couldn't find user with id 99");
    Ok(())
}

#[tokio::test]
async fn delete_twice_is_ok_then_not_found() -> Result<()> {
    let server = common::spawn_server().await?;
    server.signup(Some("alice"), "a@x.com", "pw").await?;

    let res = server.client.delete(server.url("/users/1")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "user deleted");

    let res = server.client.delete(server.url("/users/1")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["error"], "Couldn't delete user with id 1");

    let res = server.client.get(server.url("/users/1")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_is_anonymous_without_cookie() -> Result<()> {
    let server = common::spawn_server().await?;
    server.signup(Some("alice"), "a@x.com", "pw").await?;

    let (status, body) = server.list_users(None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert_eq!(body["current_user"]["status"], "anonymous");
    Ok(())
}

#[tokio::test]
async fn forged_cookie_is_anonymous() -> Result<()> {
    let server = common::spawn_server().await?;
    let cookie = server.logged_in("alice", "a@x.com", "pw").await?;

    // Flip one character of the signature
    let mut forged: Vec<char> = cookie.chars().collect();
    let idx = "go-api=".len() + 3;
    forged[idx] = if forged[idx] == 'A' { 'B' } else { 'A' };
    let forged: String = forged.into_iter().collect();

    let res = server
        .client
        .get(server.url("/users"))
        .header(COOKIE, forged)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["current_user"]["status"], "anonymous");

    let res = server
        .client
        .get(server.url("/users"))
        .header(COOKIE, "go-api=garbage")
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["current_user"]["status"], "anonymous");
    Ok(())
}

#[tokio::test]
async fn deleted_user_session_degrades_to_anonymous() -> Result<()> {
    let server = common::spawn_server().await?;
    let cookie = server.logged_in("alice", "a@x.com", "pw").await?;

    server.client.delete(server.url("/users/1")).send().await?;

    let (status, body) = server.list_users(Some(&cookie)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_user"]["status"], "anonymous");
    assert!(body["users"].as_array().unwrap().is_empty());
    Ok(())
}
