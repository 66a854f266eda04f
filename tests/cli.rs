//
//  redmine-api
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The `redmine` binary with an isolated configuration file.
fn redmine(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("redmine").unwrap();
    cmd.env("REDMINE_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("REDMINE_URL")
        .env_remove("REDMINE_API_KEY")
        .env_remove("REDMINE_USERNAME")
        .env_remove("REDMINE_PASSWORD")
        .env_remove("REDMINE_LOG");
    cmd
}

mod help {
    use super::*;

    #[test]
    fn shows_top_level_help() {
        let dir = TempDir::new().unwrap();
        redmine(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Redmine"))
            .stdout(predicate::str::contains("api"))
            .stdout(predicate::str::contains("list"));
    }

    #[test]
    fn shows_list_help() {
        let dir = TempDir::new().unwrap();
        redmine(&dir)
            .args(["list", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--project"));
    }

    #[test]
    fn prints_version() {
        let dir = TempDir::new().unwrap();
        redmine(&dir)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod config {
    use super::*;

    #[test]
    fn set_then_get() {
        let dir = TempDir::new().unwrap();

        redmine(&dir)
            .args(["config", "set", "url", "https://redmine.example.com"])
            .assert()
            .success();

        redmine(&dir)
            .args(["config", "get", "url"])
            .assert()
            .success()
            .stdout("https://redmine.example.com\n");
    }

    #[test]
    fn list_masks_secrets() {
        let dir = TempDir::new().unwrap();

        redmine(&dir)
            .args(["config", "set", "api_key", "topsecret"])
            .assert()
            .success();

        redmine(&dir)
            .args(["config", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("topsecret").not());
    }

    #[test]
    fn unknown_key_fails() {
        let dir = TempDir::new().unwrap();
        redmine(&dir)
            .args(["config", "set", "colour", "red"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown configuration key"));
    }
}

mod requests {
    use super::*;

    #[test]
    fn missing_url_is_reported() {
        let dir = TempDir::new().unwrap();
        redmine(&dir)
            .args(["api", "/issues.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No Redmine URL configured"));
    }

    #[test]
    fn unknown_resource_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        redmine(&dir)
            .args(["list", "widgets"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown API 'widgets'"));
    }

    #[test]
    fn list_prints_names_as_json() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/trackers.json")
            .match_query(mockito::Matcher::Any)
            .match_header("x-redmine-api-key", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"trackers":[{"id":1,"name":"Bug"},{"id":2,"name":"Feature"}]}"#)
            .create();

        redmine(&dir)
            .args(["list", "tracker", "--json", "--url", &server.url(), "--api-key", "secret"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"1\": \"Bug\""))
            .stdout(predicate::str::contains("\"2\": \"Feature\""));

        mock.assert();
    }

    #[test]
    fn api_command_sends_fields_as_query() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/issues.json")
            .match_query(mockito::Matcher::UrlEncoded("project_id".to_string(), "1".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"issues":[{"id":7,"subject":"Crash"}]}"#)
            .create();

        redmine(&dir)
            .args(["api", "/issues.json", "-F", "project_id=1", "--url", &server.url()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Crash"));

        mock.assert();
    }

    #[test]
    fn api_command_fails_on_error_status() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/issues/404.json")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body("")
            .create();

        redmine(&dir)
            .args(["api", "/issues/404.json", "--transport", "http", "--url", &server.url()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Request failed with status 404"));
    }
}
