//! Uniform response envelope shared by every endpoint.

use serde::{Deserialize, Serialize};

/// `{ success, message?, data?, count? }` plus optional pagination metadata.
///
/// Offset-paginated endpoints fill `pagination`; cursor-paginated endpoints
/// fill `has_more` / `next_cursor` / `total_count` at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<OffsetPagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
            pagination: None,
            has_more: None,
            next_cursor: None,
            total_count: None,
        }
    }

    /// Cursor metadata, present only when the server sent `hasMore`.
    pub fn cursor(&self) -> Option<CursorPage> {
        self.has_more.map(|has_more| CursorPage {
            has_more,
            next_cursor: self.next_cursor.clone(),
            total_count: self.total_count,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage {
    pub has_more: bool,
    pub next_cursor: Option<String>,
    pub total_count: Option<u64>,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable message the server supplied.
    pub fn best_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}
