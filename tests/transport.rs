//
//  redmine-api
//  tests/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use mockito::{Matcher, Server};
use redmine_api::api::Client;
use redmine_api::auth::Auth;
use redmine_api::http::{ClientError, NativeTransport};
use serde_json::json;
use std::thread;
use std::time::Duration;

/// Both transports against the same server.
fn clients(url: &str, auth: Auth) -> Vec<(&'static str, Client)> {
    vec![
        ("native", Client::native(url, auth.clone()).unwrap()),
        (
            "http",
            Client::with_http_client(url, auth, reqwest::blocking::Client::new()).unwrap(),
        ),
    ]
}

#[test]
fn api_key_is_sent_as_header() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/issues.json")
        .match_header("x-redmine-api-key", "secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"issues":[],"total_count":0}"#)
        .expect(2)
        .create();

    for (name, client) in clients(&server.url(), Auth::api_key("secret")) {
        assert!(client.request_get("/issues.json").unwrap(), "{name}");
        assert_eq!(client.last_response_status_code(), 200, "{name}");
        assert_eq!(client.last_response_content_type(), "application/json", "{name}");
    }

    mock.assert();
}

#[test]
fn native_transport_pairs_api_key_with_basic_auth() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/issues.json")
        .match_header("x-redmine-api-key", "secret")
        .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
        .with_status(200)
        .create();

    let client = Client::native(&server.url(), Auth::api_key("secret")).unwrap();
    assert!(client.request_get("/issues.json").unwrap());

    mock.assert();
}

#[test]
fn basic_credentials_are_encoded() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/users/current.json")
        .match_header("authorization", "Basic anNtaXRoOnBhc3M=")
        .match_header("x-redmine-api-key", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"user":{"login":"jsmith"}}"#)
        .expect(2)
        .create();

    for (name, client) in clients(&server.url(), Auth::basic("jsmith", "pass")) {
        let user = client.user().current(serde_json::Value::Null).unwrap();
        assert_eq!(user["user"]["login"], "jsmith", "{name}");
    }

    mock.assert();
}

#[test]
fn anonymous_requests_carry_no_credentials() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/projects.json")
        .match_header("authorization", Matcher::Missing)
        .match_header("x-redmine-api-key", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"projects":[]}"#)
        .create();

    let client = Client::native(&server.url(), Auth::Anonymous).unwrap();
    assert!(client.request_get("/projects.json").unwrap());

    mock.assert();
}

#[test]
fn xml_body_is_posted_with_xml_content_type() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/projects.xml")
        .match_header("content-type", "text/xml")
        .match_body(Matcher::Regex("<identifier>website</identifier>".to_string()))
        .with_status(201)
        .with_header("content-type", "application/xml")
        .with_body("<project><id>9</id></project>")
        .expect(2)
        .create();

    for (name, client) in clients(&server.url(), Auth::api_key("secret")) {
        let project = client
            .project()
            .create(json!({"name": "Website", "identifier": "website"}))
            .unwrap();
        assert_eq!(project, json!({"project": {"id": "9"}}), "{name}");
    }

    mock.assert();
}

#[test]
fn transports_return_identical_error_responses() {
    let mut server = Server::new();
    server
        .mock("PUT", "/issues/1.json")
        .with_status(422)
        .with_header("content-type", "application/json; charset=utf-8")
        .with_body(r#"{"errors":["Subject cannot be blank"]}"#)
        .expect(2)
        .create();

    let mut seen = Vec::new();
    for (_, client) in clients(&server.url(), Auth::api_key("secret")) {
        let success = client.request_put("/issues/1.json", r#"{"issue":{"subject":""}}"#).unwrap();
        assert!(!success);
        seen.push((
            client.last_response_status_code(),
            client.last_response_content_type(),
            client.last_response_body(),
        ));
    }

    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[0].0, 422);
    assert!(seen[0].2.contains("Subject cannot be blank"));
}

#[test]
fn impersonation_header_is_sent() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/my/account.json")
        .match_header("x-redmine-switch-user", "jsmith")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(2)
        .create();

    for (_, mut client) in clients(&server.url(), Auth::api_key("admin")) {
        client.start_impersonate_user("jsmith");
        assert!(client.request_get("/my/account.json").unwrap());
    }

    mock.assert();
}

#[test]
fn query_parameters_reach_the_server() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/issues.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".to_string(), "2".to_string()),
            Matcher::UrlEncoded("offset".to_string(), "0".to_string()),
            Matcher::UrlEncoded("status_id".to_string(), "open".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"issues":[{"id":1},{"id":2}],"total_count":2,"offset":0,"limit":2}"#)
        .create();

    let client = Client::native(&server.url(), Auth::Anonymous).unwrap();
    let issues = client
        .issue()
        .list(json!({"limit": 2, "status_id": "open"}))
        .unwrap();

    assert_eq!(issues["issues"].as_array().unwrap().len(), 2);
    mock.assert();
}

#[test]
fn redirects_are_not_followed() {
    let mut server = Server::new();
    server
        .mock("GET", "/login")
        .with_status(302)
        .with_header("location", "/elsewhere")
        .create();
    let elsewhere = server.mock("GET", "/elsewhere").expect(0).create();

    let client = Client::native(&server.url(), Auth::Anonymous).unwrap();
    assert!(client.request_get("/login").unwrap());
    assert_eq!(client.last_response_status_code(), 302);

    elsewhere.assert();
}

#[test]
fn connection_refused_is_a_connection_error() {
    let client = Client::native("http://127.0.0.1:1", Auth::Anonymous).unwrap();

    let err = client.request_get("/issues.json").unwrap_err();

    assert!(matches!(err, ClientError::Connection(_)), "got {err:?}");
    assert_eq!(client.last_response_status_code(), 0);
}

#[test]
fn slow_response_is_a_timeout_error() {
    let mut server = Server::new();
    server
        .mock("GET", "/issues.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_chunked_body(|w| {
            thread::sleep(Duration::from_secs(2));
            w.write_all(br#"{"issues":[]}"#)
        })
        .create();

    let transport = NativeTransport::builder(&server.url(), Auth::Anonymous)
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = Client::from_transport(transport);

    let err = client.request_get("/issues.json").unwrap_err();

    assert!(matches!(err, ClientError::Timeout(_)), "got {err:?}");
    assert_eq!(client.last_response_status_code(), 0);
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(matches!(
        Client::native("redmine.example.com", Auth::Anonymous),
        Err(ClientError::InvalidUrl(_))
    ));
    assert!(matches!(
        Client::with_http_client("::", Auth::Anonymous, reqwest::blocking::Client::new()),
        Err(ClientError::InvalidUrl(_))
    ));
}
