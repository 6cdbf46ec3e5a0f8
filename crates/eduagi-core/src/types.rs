//! Domain value types exchanged with the `EduAGI` backend

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Backend timestamp
///
/// The backend emits RFC 3339 values as well as naive ISO-8601 values without
/// an offset; naive values are taken as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Parse either an RFC 3339 or a naive ISO-8601 timestamp
    ///
    /// # Errors
    ///
    /// Returns a decode error if neither format matches.
    pub fn parse(value: &str) -> crate::Result<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| Self(naive.and_utc()))
            .map_err(|e| crate::Error::decode(format!("invalid timestamp '{value}': {e}")))
    }

    /// Format used in table cells
    #[must_use]
    pub fn display(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// User role as issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// System administrator
    Admin,
    /// Teacher
    Teacher,
    /// Student
    Student,
    /// Any role this client does not know about
    Other(String),
}

impl Role {
    /// Wire value used by the backend
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Admin => "管理员",
            Self::Teacher => "教师",
            Self::Student => "学生",
            Self::Other(raw) => raw,
        }
    }

    /// Landing route for this role
    #[must_use]
    pub const fn dashboard_route(&self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Student => "/student/dashboard",
            Self::Teacher | Self::Other(_) => "/teacher/dashboard",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.trim() {
            "管理员" | "admin" | "Admin" | "administrator" => Self::Admin,
            "教师" | "teacher" | "Teacher" => Self::Teacher,
            "学生" | "student" | "Student" => Self::Student,
            _ => Self::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_wire().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user id
    pub id: i64,
    /// Login account
    pub account_id: String,
    /// Name shown in the shell header
    pub display_name: String,
    /// Role, drives routing
    pub role: Role,
    /// Class membership for students
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
}

/// One row of an activity feed
///
/// The admin table reads `time`, `user` and `activity`; the teacher list reads
/// `title`, `time` and `kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// When it happened, as sent by the backend
    #[serde(default)]
    pub time: Option<String>,
    /// Acting user
    #[serde(default)]
    pub user: Option<String>,
    /// Activity description
    #[serde(default)]
    pub activity: Option<String>,
    /// Headline
    #[serde(default)]
    pub title: Option<String>,
    /// Category such as `resource`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Admin dashboard snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Registered users
    #[serde(default)]
    pub total_users: u64,
    /// Uploaded resources
    #[serde(default)]
    pub total_resources: u64,
    /// Exams created
    #[serde(default)]
    pub total_exams: u64,
    /// Video analyses, absent from older backends
    #[serde(default)]
    pub total_videos: u64,
    /// Most recent first, as sent
    #[serde(default)]
    pub recent_activities: Vec<ActivityRecord>,
}

/// Teacher dashboard snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherDashboard {
    /// Resources owned by the teacher
    #[serde(default)]
    pub total_resources: u64,
    /// Video analyses requested by the teacher
    #[serde(default)]
    pub total_videos: u64,
    /// Students across the teacher's classes
    #[serde(default)]
    pub total_students: u64,
    /// Most recent first, as sent
    #[serde(default)]
    pub recent_activities: Vec<ActivityRecord>,
}

/// A teaching resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Resource id
    pub id: i64,
    /// Title
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// File extension or kind, e.g. `pdf`
    pub file_type: String,
    /// Creation time
    pub created_at: Timestamp,
}

/// Lifecycle of a backend video-analysis job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisStatus {
    /// Queued
    Pending,
    /// Running
    Processing,
    /// Finished with a result
    Completed,
    /// Finished with an error
    Failed,
    /// Any status this client does not know about, kept verbatim
    Other(String),
}

impl AnalysisStatus {
    /// Whether the job will not change any more
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Lowercase wire name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for AnalysisStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<AnalysisStatus> for String {
    fn from(status: AnalysisStatus) -> Self {
        match status {
            AnalysisStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A video-analysis job record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAnalysisRecord {
    /// Job id
    pub id: i64,
    /// Analysed video
    pub video_url: String,
    /// Job status
    pub status: AnalysisStatus,
    /// When the job was created
    pub analyzed_at: Timestamp,
    /// Analysis text once available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<String>,
}

/// Body of the submit-video-analysis call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAnalysisRequest {
    /// Video to analyse
    pub video_url: String,
}

/// Body of the login call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login account
    pub account_id: String,
    /// Plain-text password, sent over TLS
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_dashboard_summary_without_video_count() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "total_users": 5,
            "total_resources": 2,
            "total_exams": 0,
            "recent_activities": []
        }))
        .unwrap();

        assert_eq!(summary.total_users, 5);
        assert_eq!(summary.total_resources, 2);
        assert_eq!(summary.total_exams, 0);
        assert_eq!(summary.total_videos, 0);
        assert!(summary.recent_activities.is_empty());
    }

    #[test]
    fn test_activity_type_field() {
        let activity: ActivityRecord = serde_json::from_value(json!({
            "title": "Uploaded Python tutorial",
            "time": "2024-01-13",
            "type": "resource"
        }))
        .unwrap();

        assert_eq!(activity.kind.as_deref(), Some("resource"));
        assert!(activity.user.is_none());
    }

    #[test]
    fn test_role_wire_values() {
        let user: CurrentUser = serde_json::from_value(json!({
            "id": 1,
            "account_id": "t001",
            "display_name": "Zhang",
            "role": "教师"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Teacher);
        assert_eq!(Role::from("admin".to_string()), Role::Admin);
        assert_eq!(
            Role::from("guest".to_string()),
            Role::Other("guest".to_string())
        );

        let encoded = serde_json::to_value(&user).unwrap();
        assert_eq!(encoded["role"], "教师");
    }

    #[test]
    fn test_role_dashboard_routes() {
        assert_eq!(Role::Admin.dashboard_route(), "/admin/dashboard");
        assert_eq!(Role::Teacher.dashboard_route(), "/teacher/dashboard");
        assert_eq!(Role::Student.dashboard_route(), "/student/dashboard");
        assert_eq!(
            Role::Other("guest".into()).dashboard_route(),
            "/teacher/dashboard"
        );
    }

    #[test]
    fn test_timestamp_formats() {
        let rfc = Timestamp::parse("2024-08-01T10:00:00Z").unwrap();
        let naive = Timestamp::parse("2024-08-01T10:00:00.123456").unwrap();
        let spaced = Timestamp::parse("2024-08-01 10:00:00").unwrap();

        assert_eq!(rfc.display(), "2024-08-01 10:00:00");
        assert_eq!(naive.display(), "2024-08-01 10:00:00");
        assert_eq!(spaced, rfc);
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_video_analysis_record() {
        let record: VideoAnalysisRecord = serde_json::from_value(json!({
            "id": 7,
            "video_url": "http://x/y.mp4",
            "status": "processing",
            "analyzed_at": "2024-08-03T09:15:00"
        }))
        .unwrap();

        assert_eq!(record.status, AnalysisStatus::Processing);
        assert!(!record.status.is_terminal());
        assert!(record.analysis_result.is_none());
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let status: AnalysisStatus = serde_json::from_value(json!("archived")).unwrap();
        assert_eq!(status, AnalysisStatus::Other("archived".to_string()));
        assert!(!status.is_terminal());
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("archived"));

        let known: AnalysisStatus = serde_json::from_value(json!("Completed")).unwrap();
        assert_eq!(known, AnalysisStatus::Completed);
        assert_eq!(serde_json::to_value(&known).unwrap(), json!("completed"));
    }

    #[test]
    fn test_history_with_unknown_status_decodes() {
        let history: Vec<VideoAnalysisRecord> = serde_json::from_value(json!([
            {"id": 2, "video_url": "http://x/b.mp4", "status": "archived", "analyzed_at": "2024-08-03T09:15:00"},
            {"id": 1, "video_url": "http://x/a.mp4", "status": "failed", "analyzed_at": "2024-08-02T09:15:00"}
        ]))
        .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status.as_str(), "archived");
        assert_eq!(history[1].status, AnalysisStatus::Failed);
    }
}
