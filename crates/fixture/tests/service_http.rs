//! HTTP checks for the in-process fixture service
//!
//! The users contract itself is exercised by the harness suites; these
//! tests pin the parts only the service owns: readiness, the console
//! page, and the echo semantics of writes.

use anyhow::Result;

use vigil_client::{NewUser, User, UsersClient};
use vigil_fixture::{FixtureServer, CONSOLE_TITLE, JSON_CONTENT_TYPE};

fn draft_user() -> NewUser {
    NewUser {
        name: "Nikolai Tesla".to_string(),
        username: "nikola".to_string(),
        email: "nikola@wardenclyffe.example".to_string(),
    }
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let server = FixtureServer::spawn().await?;

    let resp = reqwest::get(format!("{}/health", server.base_url())).await?;
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn console_page_serves_the_smoke_test_title() -> Result<()> {
    let server = FixtureServer::spawn().await?;

    let page = reqwest::get(server.console_url()).await?.text().await?;
    assert!(page.contains(&format!("<title>{}</title>", CONSOLE_TITLE)));
    Ok(())
}

#[tokio::test]
async fn json_responses_carry_the_upstream_content_type() -> Result<()> {
    let server = FixtureServer::spawn().await?;
    let client = UsersClient::new(server.base_url())?;

    for resp in [client.list().await?, client.get(999).await?] {
        assert_eq!(resp.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
    }
    Ok(())
}

#[tokio::test]
async fn writes_echo_without_persisting() -> Result<()> {
    let server = FixtureServer::spawn().await?;
    let client = UsersClient::new(server.base_url())?;

    let created = client.create(&draft_user()).await?;
    assert_eq!(created.status.as_u16(), 201);

    let body: serde_json::Value = created.json()?;
    assert_eq!(body["id"], 11);
    assert_eq!(body["name"], "Nikolai Tesla");

    let users: Vec<User> = client.list().await?.json()?;
    assert_eq!(users.len(), 10, "creates must not persist");
    Ok(())
}

#[tokio::test]
async fn updating_an_unknown_id_is_not_found() -> Result<()> {
    let server = FixtureServer::spawn().await?;
    let client = UsersClient::new(server.base_url())?;

    let resp = client.update(999, &draft_user()).await?;
    assert_eq!(resp.status.as_u16(), 404);
    assert_eq!(resp.json::<serde_json::Value>()?, serde_json::json!({}));
    Ok(())
}

#[tokio::test]
async fn each_spawn_gets_its_own_port() -> Result<()> {
    let first = FixtureServer::spawn().await?;
    let second = FixtureServer::spawn().await?;

    assert_ne!(first.port(), second.port());
    Ok(())
}
