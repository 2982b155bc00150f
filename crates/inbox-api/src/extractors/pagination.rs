//! Query string extractors
//!
//! Time-cursor pagination for conversations and the notification filter.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::{DateTime, Utc};
use inbox_core::{ConversationQuery, MessageId};
use serde::Deserialize;

use crate::response::ApiError;

/// Default page size
const DEFAULT_LIMIT: i64 = 50;
/// Maximum page size
const MAX_LIMIT: i64 = 100;

/// Raw pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    /// RFC 3339 timestamp; only older messages are returned
    #[serde(default)]
    pub before: Option<String>,
    /// Id of the oldest message already seen; only honoured with `before`
    #[serde(default)]
    pub before_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Validated pagination parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub before: Option<DateTime<Utc>>,
    pub before_id: Option<MessageId>,
    /// Clamped to 1-100
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            before: None,
            before_id: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = ApiError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let before = params
            .before
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| ApiError::invalid_query("Invalid 'before' timestamp"))
            })
            .transpose()?;

        let before_id = params
            .before_id
            .map(|s| {
                s.parse::<MessageId>()
                    .map_err(|_| ApiError::invalid_query("Invalid 'before_id' message id"))
            })
            .transpose()?;

        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        Ok(Pagination {
            before,
            before_id,
            limit,
        })
    }
}

impl From<Pagination> for ConversationQuery {
    fn from(page: Pagination) -> Self {
        ConversationQuery {
            before: page.before,
            before_id: page.before_id,
            limit: page.limit,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Pagination::try_from(params)
    }
}

/// `?unread=true` on the notification list
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for NotificationFilter
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(filter) = Query::<NotificationFilter>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;
        Ok(filter)
    }
}
