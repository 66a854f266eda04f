//
//  redmine-api
//  tests/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use redmine_api::api::Client;
use redmine_api::http::{ClientError, Method, Request, Response, Transport};

/// A request as the fake transport received it.
#[derive(Debug, Clone)]
pub struct Sent {
    pub method: Method,
    pub path: String,
    pub content_type: String,
    pub body: String,
    pub impersonated: Option<String>,
}

/// A transport answering from a queue and recording every request.
///
/// Once the queue is empty every request is answered with `200` and an
/// empty body.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<VecDeque<Response>>>,
    sent: Arc<Mutex<Vec<Sent>>>,
    impersonated: Option<String>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, content_type: &str, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::new(status, content_type, body));
        self
    }

    pub fn respond_json(&self, body: serde_json::Value) -> &Self {
        self.respond(200, "application/json", &body.to_string())
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.sent().into_iter().map(|s| s.path).collect()
    }

    pub fn client(&self) -> Client {
        Client::from_transport(self.clone())
    }
}

impl Transport for FakeTransport {
    fn request(&self, request: Request) -> Result<Response, ClientError> {
        self.sent.lock().unwrap().push(Sent {
            method: request.method(),
            path: request.path().to_string(),
            content_type: request.content_type().to_string(),
            body: String::from_utf8_lossy(request.content()).into_owned(),
            impersonated: self.impersonated.clone(),
        });

        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Response::new(200, "", "")))
    }

    fn set_impersonated_user(&mut self, login: Option<String>) {
        self.impersonated = login;
    }
}
