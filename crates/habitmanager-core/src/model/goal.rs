//! Goals: one-off objectives, optionally carrying a link or an attachment.

use base64::Engine as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::serde_ext;
use crate::error::{CoreError, Result};

/// Points awarded when a goal is marked completed.
pub const GOAL_POINTS: i64 = 20;

/// File attached to a goal, stored inline as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// `data:<mime>;base64,<payload>`
    pub data: String,
}

impl Attachment {
    /// Encode raw bytes, refusing payloads larger than `limit` bytes.
    pub fn from_bytes(name: &str, mime_type: &str, bytes: &[u8], limit: u64) -> Result<Self> {
        let size = bytes.len() as u64;
        if size > limit {
            return Err(CoreError::FileTooLarge { size, limit });
        }
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            data: format!("data:{mime_type};base64,{payload}"),
        })
    }

    /// Decode the inline payload back into bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let payload = self
            .data
            .split_once(";base64,")
            .map(|(_, p)| p)
            .unwrap_or(&self.data);
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| {
                crate::error::ValidationError::InvalidValue {
                    field: "file.data".into(),
                    message: e.to_string(),
                }
                .into()
            })
    }
}

/// What a goal is about. Serialized inline with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GoalKind {
    /// Tied to building a habit.
    Habit,
    /// Watch or follow a video.
    Youtube {
        #[serde(default)]
        url: String,
    },
    /// Work through an attached document.
    File {
        #[serde(default)]
        file: Option<Attachment>,
    },
}

impl Default for GoalKind {
    fn default() -> Self {
        GoalKind::Habit
    }
}

fn default_goal_points() -> i64 {
    GOAL_POINTS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: GoalKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "serde_ext::opt_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_goal_points")]
    pub points: i64,
    pub created: NaiveDate,
}

impl Goal {
    pub fn from_draft(draft: GoalDraft, created: NaiveDate) -> Self {
        Self {
            id: draft.id.unwrap_or_else(super::new_id),
            title: draft.title,
            kind: draft.kind,
            description: draft.description,
            deadline: draft.deadline,
            completed: false,
            points: GOAL_POINTS,
            created,
        }
    }

    /// Replace the editable fields. Completion state is kept.
    pub fn apply_draft(&mut self, draft: GoalDraft) {
        self.title = draft.title;
        self.kind = draft.kind;
        self.description = draft.description;
        self.deadline = draft.deadline;
    }

    /// A deadline runs out at the start of its day, so a goal due today is
    /// already overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline.is_some_and(|d| d <= today)
    }

    /// The 11-character video id of a YouTube goal's link.
    pub fn video_id(&self) -> Option<String> {
        match &self.kind {
            GoalKind::Youtube { url } => youtube_video_id(url),
            _ => None,
        }
    }
}

const VIDEO_ID_LEN: usize = 11;

/// Extract the video id from `youtu.be/<id>`, `watch?v=<id>`, `/embed/<id>`,
/// `/v/<id>` and `/e/<id>` links. A missing scheme is tolerated.
pub fn youtube_video_id(link: &str) -> Option<String> {
    let link = link.trim();
    let parsed = match url::Url::parse(link) {
        Ok(parsed) => parsed,
        Err(_) => url::Url::parse(&format!("https://{link}")).ok()?,
    };
    let host = parsed.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let candidate = match host {
        "youtu.be" => segments.first().map(|s| s.to_string()),
        "youtube.com" => match segments.as_slice() {
            ["v" | "e" | "embed", id, ..] => Some(id.to_string()),
            _ => parsed
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
        },
        _ => None,
    }?;

    let id: String = candidate.chars().take(VIDEO_ID_LEN).collect();
    let valid = id.chars().count() == VIDEO_ID_LEN
        && id.chars().all(|c| !c.is_whitespace() && !matches!(c, '"' | '&' | '?' | '/'));
    valid.then_some(id)
}

#[derive(Debug, Clone, Default)]
pub struct GoalDraft {
    pub id: Option<String>,
    pub title: String,
    pub kind: GoalKind,
    pub description: String,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalFilter {
    #[default]
    All,
    Completed,
    Pending,
    Overdue,
}

impl GoalFilter {
    pub fn matches(self, goal: &Goal, today: NaiveDate) -> bool {
        match self {
            GoalFilter::All => true,
            GoalFilter::Completed => goal.completed,
            GoalFilter::Pending => !goal.completed,
            GoalFilter::Overdue => goal.is_overdue(today),
        }
    }

    pub fn apply<'a>(self, goals: &'a [Goal], today: NaiveDate) -> Vec<&'a Goal> {
        goals.iter().filter(|g| self.matches(g, today)).collect()
    }
}

impl std::str::FromStr for GoalFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(GoalFilter::All),
            "completed" => Ok(GoalFilter::Completed),
            "pending" => Ok(GoalFilter::Pending),
            "overdue" => Ok(GoalFilter::Overdue),
            other => Err(format!("unknown goal filter: {other}")),
        }
    }
}
