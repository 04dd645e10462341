//! Answer and chat reply types.

use serde::{Deserialize, Serialize, Serializer};
use twin_core::{AppError, ErrorKind};

/// A profile chunk that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,

    /// Score relative to the best chunk, in `[0, 1]`
    #[serde(rename = "relativeScore")]
    pub relative_score: f64,
}

impl SourceRef {
    /// Relative score as a whole percentage.
    pub fn percent(&self) -> i64 {
        (self.relative_score * 100.0).round() as i64
    }
}

/// Successful digital twin answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwinAnswer {
    pub message: String,
    pub sources: Vec<SourceRef>,
}

/// Outcome of a chat query, as returned to the page.
///
/// Serializes as `{ success, message, sources, error? }`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Answered {
        message: String,
        sources: Vec<SourceRef>,
    },
    Failed {
        kind: ErrorKind,
        message: String,
    },
}

impl ChatReply {
    /// Failure reply for `err`, with the message shown to the visitor.
    pub fn from_error(err: &AppError) -> Self {
        ChatReply::Failed {
            kind: err.kind(),
            message: format!("Error: {}", err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChatReply::Answered { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ChatReply::Answered { message, .. } | ChatReply::Failed { message, .. } => message,
        }
    }
}

impl From<TwinAnswer> for ChatReply {
    fn from(answer: TwinAnswer) -> Self {
        ChatReply::Answered {
            message: answer.message,
            sources: answer.sources,
        }
    }
}

#[derive(Serialize)]
struct ChatReplyWire<'a> {
    success: bool,
    message: &'a str,
    sources: &'a [SourceRef],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorKind>,
}

impl Serialize for ChatReply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            ChatReply::Answered { message, sources } => ChatReplyWire {
                success: true,
                message,
                sources,
                error: None,
            },
            ChatReply::Failed { kind, message } => ChatReplyWire {
                success: false,
                message,
                sources: &[],
                error: Some(*kind),
            },
        };
        wire.serialize(serializer)
    }
}
