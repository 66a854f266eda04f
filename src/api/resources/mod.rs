//
//  redmine-api
//  api/resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource APIs
//!
//! One module per Redmine REST resource. Every API is a thin borrowing view
//! over a [`Client`]: it builds the path and body for an operation, sends it
//! through the client and decodes the answer.
//!
//! ## Access
//!
//! ```rust,no_run
//! use redmine_api::api::{Api, ApiName, Client};
//! use redmine_api::auth::Auth;
//! use serde_json::json;
//!
//! let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
//!
//! // Typed accessor
//! let issues = client.issue().list(json!({"project_id": 1, "limit": 50}))?;
//!
//! // Lookup by name
//! if let Api::Tracker(trackers) = client.api("tracker".parse::<ApiName>()?) {
//!     println!("{:?}", trackers.list_names()?);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Parameters
//!
//! Operations taking parameters accept a [`serde_json::Value`] mapping, so
//! `json!({...})` literals can be passed directly. `Value::Null` stands for
//! "no parameters".

pub mod attachment;
pub mod custom_field;
pub mod group;
pub mod issue;
pub mod issue_category;
pub mod issue_priority;
pub mod issue_relation;
pub mod issue_status;
pub mod membership;
pub mod news;
pub mod project;
pub mod query;
pub mod role;
pub mod search;
pub mod time_entry;
pub mod time_entry_activity;
pub mod tracker;
pub mod user;
pub mod version;
pub mod wiki;

pub use attachment::AttachmentApi;
pub use custom_field::CustomFieldApi;
pub use group::GroupApi;
pub use issue::IssueApi;
pub use issue_category::IssueCategoryApi;
pub use issue_priority::IssuePriorityApi;
pub use issue_relation::IssueRelationApi;
pub use issue_status::IssueStatusApi;
pub use membership::MembershipApi;
pub use news::NewsApi;
pub use project::ProjectApi;
pub use query::QueryApi;
pub use role::RoleApi;
pub use search::SearchApi;
pub use time_entry::TimeEntryApi;
pub use time_entry_activity::TimeEntryActivityApi;
pub use tracker::TrackerApi;
pub use user::UserApi;
pub use version::VersionApi;
pub use wiki::WikiApi;

use std::fmt;
use std::str::FromStr;

use super::{ApiError, Client};

/// Names of the resource APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiName {
    Attachment,
    CustomFields,
    Group,
    Issue,
    IssueCategory,
    IssuePriority,
    IssueRelation,
    IssueStatus,
    Membership,
    News,
    Project,
    Query,
    Role,
    Search,
    TimeEntry,
    TimeEntryActivity,
    Tracker,
    User,
    Version,
    Wiki,
}

impl ApiName {
    pub const ALL: [ApiName; 20] = [
        Self::Attachment,
        Self::CustomFields,
        Self::Group,
        Self::Issue,
        Self::IssueCategory,
        Self::IssuePriority,
        Self::IssueRelation,
        Self::IssueStatus,
        Self::Membership,
        Self::News,
        Self::Project,
        Self::Query,
        Self::Role,
        Self::Search,
        Self::TimeEntry,
        Self::TimeEntryActivity,
        Self::Tracker,
        Self::User,
        Self::Version,
        Self::Wiki,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::CustomFields => "custom_fields",
            Self::Group => "group",
            Self::Issue => "issue",
            Self::IssueCategory => "issue_category",
            Self::IssuePriority => "issue_priority",
            Self::IssueRelation => "issue_relation",
            Self::IssueStatus => "issue_status",
            Self::Membership => "membership",
            Self::News => "news",
            Self::Project => "project",
            Self::Query => "query",
            Self::Role => "role",
            Self::Search => "search",
            Self::TimeEntry => "time_entry",
            Self::TimeEntryActivity => "time_entry_activity",
            Self::Tracker => "tracker",
            Self::User => "user",
            Self::Version => "version",
            Self::Wiki => "wiki",
        }
    }
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiName {
    type Err = ApiError;

    /// Parses an API name. Hyphens are accepted in place of underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == wanted)
            .ok_or_else(|| ApiError::InvalidParameter(format!("unknown API '{}'", s)))
    }
}

/// A resource API selected by [`ApiName`].
pub enum Api<'a> {
    Attachment(AttachmentApi<'a>),
    CustomFields(CustomFieldApi<'a>),
    Group(GroupApi<'a>),
    Issue(IssueApi<'a>),
    IssueCategory(IssueCategoryApi<'a>),
    IssuePriority(IssuePriorityApi<'a>),
    IssueRelation(IssueRelationApi<'a>),
    IssueStatus(IssueStatusApi<'a>),
    Membership(MembershipApi<'a>),
    News(NewsApi<'a>),
    Project(ProjectApi<'a>),
    Query(QueryApi<'a>),
    Role(RoleApi<'a>),
    Search(SearchApi<'a>),
    TimeEntry(TimeEntryApi<'a>),
    TimeEntryActivity(TimeEntryActivityApi<'a>),
    Tracker(TrackerApi<'a>),
    User(UserApi<'a>),
    Version(VersionApi<'a>),
    Wiki(WikiApi<'a>),
}

impl Client {
    /// Returns the API registered under `name`.
    pub fn api(&self, name: ApiName) -> Api<'_> {
        match name {
            ApiName::Attachment => Api::Attachment(self.attachment()),
            ApiName::CustomFields => Api::CustomFields(self.custom_fields()),
            ApiName::Group => Api::Group(self.group()),
            ApiName::Issue => Api::Issue(self.issue()),
            ApiName::IssueCategory => Api::IssueCategory(self.issue_category()),
            ApiName::IssuePriority => Api::IssuePriority(self.issue_priority()),
            ApiName::IssueRelation => Api::IssueRelation(self.issue_relation()),
            ApiName::IssueStatus => Api::IssueStatus(self.issue_status()),
            ApiName::Membership => Api::Membership(self.membership()),
            ApiName::News => Api::News(self.news()),
            ApiName::Project => Api::Project(self.project()),
            ApiName::Query => Api::Query(self.query()),
            ApiName::Role => Api::Role(self.role()),
            ApiName::Search => Api::Search(self.search()),
            ApiName::TimeEntry => Api::TimeEntry(self.time_entry()),
            ApiName::TimeEntryActivity => Api::TimeEntryActivity(self.time_entry_activity()),
            ApiName::Tracker => Api::Tracker(self.tracker()),
            ApiName::User => Api::User(self.user()),
            ApiName::Version => Api::Version(self.version()),
            ApiName::Wiki => Api::Wiki(self.wiki()),
        }
    }

    pub fn attachment(&self) -> AttachmentApi<'_> {
        AttachmentApi::new(self)
    }

    pub fn custom_fields(&self) -> CustomFieldApi<'_> {
        CustomFieldApi::new(self)
    }

    pub fn group(&self) -> GroupApi<'_> {
        GroupApi::new(self)
    }

    pub fn issue(&self) -> IssueApi<'_> {
        IssueApi::new(self)
    }

    pub fn issue_category(&self) -> IssueCategoryApi<'_> {
        IssueCategoryApi::new(self)
    }

    pub fn issue_priority(&self) -> IssuePriorityApi<'_> {
        IssuePriorityApi::new(self)
    }

    pub fn issue_relation(&self) -> IssueRelationApi<'_> {
        IssueRelationApi::new(self)
    }

    pub fn issue_status(&self) -> IssueStatusApi<'_> {
        IssueStatusApi::new(self)
    }

    pub fn membership(&self) -> MembershipApi<'_> {
        MembershipApi::new(self)
    }

    pub fn news(&self) -> NewsApi<'_> {
        NewsApi::new(self)
    }

    pub fn project(&self) -> ProjectApi<'_> {
        ProjectApi::new(self)
    }

    pub fn query(&self) -> QueryApi<'_> {
        QueryApi::new(self)
    }

    pub fn role(&self) -> RoleApi<'_> {
        RoleApi::new(self)
    }

    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    pub fn time_entry(&self) -> TimeEntryApi<'_> {
        TimeEntryApi::new(self)
    }

    pub fn time_entry_activity(&self) -> TimeEntryActivityApi<'_> {
        TimeEntryActivityApi::new(self)
    }

    pub fn tracker(&self) -> TrackerApi<'_> {
        TrackerApi::new(self)
    }

    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    pub fn version(&self) -> VersionApi<'_> {
        VersionApi::new(self)
    }

    pub fn wiki(&self) -> WikiApi<'_> {
        WikiApi::new(self)
    }
}
