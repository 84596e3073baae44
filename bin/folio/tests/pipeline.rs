//! Pipeline tests against a mock GraphQL endpoint.

use std::{fs, path::PathBuf};

use folio::{Pipeline, Settings};
use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const PROFILE: &str = "\
# identity
octocat

# projects
octocat/hello-world
octocat/spoon-knife

# contributions
rust-lang/rust 0 7

# creations
Keycap|#222 keycap.png https://example.com/keycap
";

fn response_body() -> serde_json::Value {
    json!({
        "data": {
            "user": {
                "avatarUrl": "https://avatars.example.com/u/1",
                "email": "octo@example.com",
                "bio": null,
                "name": null,
                "login": "octocat",
                "location": "Earth",
                "url": "https://github.com/octocat"
            },
            "p0": {
                "nameWithOwner": "octocat/hello-world",
                "name": "hello-world",
                "owner": { "login": "octocat" },
                "description": "My first repository",
                "url": "https://github.com/octocat/hello-world",
                "homepageUrl": "https://octocat.github.io/",
                "stargazers": { "totalCount": 1500 },
                "languages": { "nodes": [{ "name": "Rust", "color": "#dea584" }] }
            },
            "p1": {
                "nameWithOwner": "octocat/spoon-knife",
                "name": "spoon-knife",
                "owner": { "login": "octocat" },
                "description": null,
                "url": "https://github.com/octocat/spoon-knife",
                "homepageUrl": null,
                "stargazers": { "totalCount": 12 },
                "languages": { "nodes": [] }
            },
            "c0": {
                "name": "rust",
                "owner": { "login": "rust-lang" },
                "url": "https://github.com/rust-lang/rust",
                "issue": { "number": 7, "url": "https://github.com/rust-lang/rust/issues/7" }
            }
        }
    })
}

fn write_site(dir: &TempDir) -> PathBuf {
    fs::write(dir.path().join("profile.txt"), PROFILE).unwrap();

    let templates = dir.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("entry.html"),
        "<h1>{{ display_name }}</h1>\n  <ul>{{ projects }}</ul>\n\n  {{ contributions }}\n{{ creations }}\n",
    )
    .unwrap();
    fs::write(
        templates.join("project.html"),
        "<li>{{ name_with_owner }} {{ stars }} {{ homepage? }}</li>",
    )
    .unwrap();

    dir.path().join("folio.toml")
}

fn settings(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.site.profile = PathBuf::from("profile.txt");
    settings.api.endpoint = format!("{}/graphql", server.uri());
    settings.api.token = "secret".to_string();
    settings
}

#[tokio::test]
async fn test_pipeline_renders_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings_path = write_site(&dir);

    let pipeline = Pipeline::new(settings(&server), &settings_path).unwrap();
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.projects, 2);
    assert_eq!(stats.contributions, 1);
    assert_eq!(stats.creations, 1);

    let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
    let lines: Vec<&str> = html.lines().collect();
    assert_eq!(lines[0], "<h1>octocat</h1>");
    assert_eq!(
        lines[1],
        "<ul><li>octocat/hello-world 1500 octocat.github.io</li><li>octocat/spoon-knife 12 </li></ul>"
    );
    assert!(html.contains("#7"));
    assert!(html.contains("keycap.png"));
    assert!(!html.contains("\n\n"));
}

#[tokio::test]
async fn test_pipeline_sends_batched_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings_path = write_site(&dir);
    Pipeline::new(settings(&server), &settings_path)
        .unwrap()
        .run()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let query = payload["query"].as_str().unwrap();
    assert!(query.contains(r#"user(login: "octocat")"#));
    assert!(query.contains(r#"p0: repository(owner: "octocat", name: "hello-world")"#));
    assert!(query.contains(r#"p1: repository(owner: "octocat", name: "spoon-knife")"#));
    assert!(query.contains("issue(number: 7)"));
    assert!(!query.contains("pullRequest"));
}

#[tokio::test]
async fn test_pipeline_output_override() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings_path = write_site(&dir);
    let output = dir.path().join("public/portfolio.html");

    Pipeline::new(settings(&server), &settings_path)
        .unwrap()
        .with_output(&output)
        .run()
        .await
        .unwrap();

    assert!(output.exists());
    assert!(!dir.path().join("index.html").exists());
}

#[tokio::test]
async fn test_pipeline_surfaces_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": null },
            "errors": [{ "message": "Could not resolve to a User with the login of 'octocat'." }]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings_path = write_site(&dir);

    let err = Pipeline::new(settings(&server), &settings_path)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Could not resolve"));
    assert!(!dir.path().join("index.html").exists());
}

#[tokio::test]
async fn test_pipeline_fetches_remote_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings_path = write_site(&dir);
    fs::remove_file(dir.path().join("profile.txt")).unwrap();

    let mut settings = settings(&server);
    settings.site.profile_url = Some(format!("{}/profile", server.uri()));

    let stats = Pipeline::new(settings, &settings_path)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(stats.projects, 2);
    assert!(dir.path().join("index.html").exists());
}

#[tokio::test]
async fn test_pipeline_remote_profile_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body()))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings_path = write_site(&dir);

    let mut settings = settings(&server);
    settings.site.profile_url = Some(format!("{}/profile", server.uri()));

    let err = Pipeline::new(settings, &settings_path)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("404"));
    assert!(!dir.path().join("index.html").exists());
}
