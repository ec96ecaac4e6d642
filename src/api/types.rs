//! Request and record types for the gallery API.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::transport::TransportError;

/// Kinds of signed write the backend issues challenges for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageId {
    BuildDelete,
    BuildFeature,
    BuilderCreate,
    BuilderUpdateSocials,
}

impl MessageId {
    pub const ALL: [MessageId; 4] = [
        MessageId::BuildDelete,
        MessageId::BuildFeature,
        MessageId::BuilderCreate,
        MessageId::BuilderUpdateSocials,
    ];

    /// Wire name, as sent in the `messageId` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageId::BuildDelete => "buildDelete",
            MessageId::BuildFeature => "buildFeature",
            MessageId::BuilderCreate => "builderCreate",
            MessageId::BuilderUpdateSocials => "builderUpdateSocials",
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown message id '{0}'")]
pub struct UnknownMessageId(pub String);

impl FromStr for MessageId {
    type Err = UnknownMessageId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownMessageId(s.to_string()))
    }
}

/// Operation-specific challenge parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeParams {
    BuildDelete { build_id: String },
    BuildFeature { build_id: String, featured: bool },
    BuilderCreate { builder_address: String },
    BuilderUpdateSocials,
}

impl ChallengeParams {
    pub fn message_id(&self) -> MessageId {
        match self {
            ChallengeParams::BuildDelete { .. } => MessageId::BuildDelete,
            ChallengeParams::BuildFeature { .. } => MessageId::BuildFeature,
            ChallengeParams::BuilderCreate { .. } => MessageId::BuilderCreate,
            ChallengeParams::BuilderUpdateSocials => MessageId::BuilderUpdateSocials,
        }
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            ChallengeParams::BuildDelete { build_id } => {
                vec![("buildId".into(), build_id.clone())]
            }
            ChallengeParams::BuildFeature { build_id, featured } => vec![
                ("buildId".into(), build_id.clone()),
                ("featured".into(), featured.to_string()),
            ],
            ChallengeParams::BuilderCreate { builder_address } => {
                vec![("builderAddress".into(), builder_address.clone())]
            }
            ChallengeParams::BuilderUpdateSocials => Vec::new(),
        }
    }
}

/// Request for a message to sign on behalf of `subject_address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub subject_address: String,
    pub params: ChallengeParams,
}

impl ChallengeRequest {
    pub fn new(subject_address: impl Into<String>, params: ChallengeParams) -> Self {
        Self {
            subject_address: subject_address.into(),
            params,
        }
    }

    pub fn message_id(&self) -> MessageId {
        self.params.message_id()
    }

    /// Query string for `GET /sign-message`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("messageId".to_string(), self.message_id().as_str().to_string()),
            ("address".to_string(), self.subject_address.clone()),
        ];
        query.extend(self.params.query_pairs());
        query
    }
}

/// Server-issued message to sign verbatim.
///
/// Deliberately not `Clone`: signing consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct ChallengeResponse {
    message: String,
}

impl ChallengeResponse {
    /// Parse a `/sign-message` body.
    ///
    /// Accepts `{"message": "..."}`, a JSON string, or plain text. Bodies
    /// that parse as a non-string JSON scalar (`123`, `true`, `null`) count
    /// as plain text; arrays and objects without `message` are rejected.
    pub fn from_body(body: &str) -> Result<Self, TransportError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(TransportError::Decode("empty challenge body".into()));
        }

        let message = match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::String(message)) => message,
            Ok(Value::Object(mut map)) => match map.remove("message") {
                Some(Value::String(message)) => message,
                _ => {
                    return Err(TransportError::Decode(
                        "challenge object has no string `message` field".into(),
                    ))
                }
            },
            Ok(Value::Array(_)) => {
                return Err(TransportError::Decode(
                    "unexpected challenge body: array".into(),
                ))
            }
            Ok(_) | Err(_) => body.to_string(),
        };

        if message.is_empty() {
            return Err(TransportError::Decode("challenge message is empty".into()));
        }
        Ok(Self { message })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

/// Account role assigned to a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuilderRole {
    Anonymous,
    #[default]
    Builder,
    Admin,
}

impl FromStr for BuilderRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anonymous" => Ok(BuilderRole::Anonymous),
            "builder" => Ok(BuilderRole::Builder),
            "admin" => Ok(BuilderRole::Admin),
            other => Err(format!("unknown builder role '{}'", other)),
        }
    }
}

/// A builder's social handles. Unset entries are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self == &SocialLinks::default()
    }
}

/// A privileged write, one variant per operation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    DeleteBuild {
        build_id: String,
    },
    FeatureBuild {
        user_address: String,
        build_id: String,
        featured: bool,
    },
    CreateBuilder {
        builder_address: String,
        builder_role: BuilderRole,
        builder_function: String,
    },
    UpdateSocials {
        social_links: SocialLinks,
    },
}

impl MutationRequest {
    pub fn message_id(&self) -> MessageId {
        match self {
            MutationRequest::DeleteBuild { .. } => MessageId::BuildDelete,
            MutationRequest::FeatureBuild { .. } => MessageId::BuildFeature,
            MutationRequest::CreateBuilder { .. } => MessageId::BuilderCreate,
            MutationRequest::UpdateSocials { .. } => MessageId::BuilderUpdateSocials,
        }
    }

    /// Challenge parameters the backend expects before accepting this write.
    pub fn challenge_params(&self) -> ChallengeParams {
        match self {
            MutationRequest::DeleteBuild { build_id } => ChallengeParams::BuildDelete {
                build_id: build_id.clone(),
            },
            MutationRequest::FeatureBuild {
                build_id, featured, ..
            } => ChallengeParams::BuildFeature {
                build_id: build_id.clone(),
                featured: *featured,
            },
            MutationRequest::CreateBuilder {
                builder_address, ..
            } => ChallengeParams::BuilderCreate {
                builder_address: builder_address.clone(),
            },
            MutationRequest::UpdateSocials { .. } => ChallengeParams::BuilderUpdateSocials,
        }
    }

    /// HTTP method and path segments of the mutation endpoint.
    pub fn endpoint(&self) -> (Method, Vec<String>) {
        match self {
            MutationRequest::DeleteBuild { build_id } => {
                (Method::DELETE, vec!["builds".into(), build_id.clone()])
            }
            MutationRequest::FeatureBuild { .. } => (Method::PATCH, vec!["builds".into()]),
            MutationRequest::CreateBuilder { .. } => {
                (Method::POST, vec!["builders".into(), "create".into()])
            }
            MutationRequest::UpdateSocials { .. } => {
                (Method::POST, vec!["builders".into(), "update-socials".into()])
            }
        }
    }

    /// JSON body carrying the payload and signature.
    pub fn body(&self, signature: &str) -> Value {
        match self {
            MutationRequest::DeleteBuild { .. } => json!({ "signature": signature }),
            MutationRequest::FeatureBuild {
                user_address,
                build_id,
                featured,
            } => json!({
                "userAddress": user_address,
                "buildId": build_id,
                "featured": featured,
                "signature": signature,
            }),
            MutationRequest::CreateBuilder {
                builder_address,
                builder_role,
                builder_function,
            } => json!({
                "builderAddress": builder_address,
                "builderRole": builder_role,
                "builderFunction": builder_function,
                "signature": signature,
            }),
            MutationRequest::UpdateSocials { social_links } => json!({
                "socialLinks": social_links,
                "signature": signature,
            }),
        }
    }
}

/// A write plus the signature over its challenge.
///
/// `caller_address` is sent as a header, never in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMutation {
    pub caller_address: String,
    pub signature: String,
    pub request: MutationRequest,
}

impl SignedMutation {
    pub fn new(
        caller_address: impl Into<String>,
        signature: impl Into<String>,
        request: MutationRequest,
    ) -> Self {
        Self {
            caller_address: caller_address.into(),
            signature: signature.into(),
            request,
        }
    }

    pub fn message_id(&self) -> MessageId {
        self.request.message_id()
    }
}

/// Field decoders that never fail a record over one odd value.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings as-is, numbers rendered; anything else is `None`.
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// `true` only for a JSON `true`.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(Value::deserialize(d)?.as_bool().unwrap_or(false))
    }

    /// Non-negative integer, truncated float or numeric string.
    pub fn millis<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }
}

/// A submitted build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub builder: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub featured: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_draft: bool,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An activity-feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::millis")]
    pub timestamp: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub signature: Option<String>,
    #[serde(default)]
    pub payload: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
