use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::lenient;

/// Where a feedback record stands with respect to agent acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Accepted,
    InReview,
}

impl FeedbackStatus {
    pub const ALL: [FeedbackStatus; 3] = [
        FeedbackStatus::Pending,
        FeedbackStatus::Accepted,
        FeedbackStatus::InReview,
    ];

    /// Accepts English and Portuguese spellings; anything unrecognised is
    /// treated as still pending.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "accepted" | "aceito" | "aceita" | "aplicado" | "applied" => FeedbackStatus::Accepted,
            "in_review" | "inreview" | "em_revisao" | "em_revisão" | "contestado"
            | "contested" => FeedbackStatus::InReview,
            _ => FeedbackStatus::Pending,
        }
    }

    /// Wire value, as sent in the `status` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Accepted => "accepted",
            FeedbackStatus::InReview => "in_review",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "Pending",
            FeedbackStatus::Accepted => "Accepted",
            FeedbackStatus::InReview => "In review",
        }
    }
}

impl From<String> for FeedbackStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// Who produced the feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Origin {
    Ai,
    #[default]
    Monitor,
}

impl Origin {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "ai" | "ia" | "automatic" | "automatica" | "automática" => Origin::Ai,
            _ => Origin::Monitor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Origin::Ai => "AI",
            Origin::Monitor => "Monitor",
        }
    }
}

impl From<String> for Origin {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestationResolution {
    /// The agent was right; the feedback is withdrawn.
    Upheld,
    /// The feedback stands.
    Rejected,
}

impl ContestationResolution {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "upheld" | "procedente" | "deferido" => Some(ContestationResolution::Upheld),
            "rejected" | "improcedente" | "indeferido" => Some(ContestationResolution::Rejected),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContestationResolution::Upheld => "Upheld",
            ContestationResolution::Rejected => "Rejected",
        }
    }
}

fn resolution<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> Result<Option<ContestationResolution>, D::Error> {
    Ok(lenient::value_to_string(&Value::deserialize(d)?)
        .and_then(|raw| ContestationResolution::parse(&raw)))
}

/// An agent's dispute of a feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contestation {
    #[serde(alias = "motivo", deserialize_with = "lenient::string")]
    pub reason: String,
    #[serde(
        alias = "requestedAt",
        alias = "data_contestacao",
        deserialize_with = "lenient::opt_string"
    )]
    pub requested_at: Option<String>,
    #[serde(alias = "resposta", deserialize_with = "lenient::opt_string")]
    pub reply: Option<String>,
    #[serde(alias = "resultado", deserialize_with = "resolution")]
    pub resolution: Option<ContestationResolution>,
}

/// One criterion-level feedback item from an evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackRecord {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(
        alias = "evaluationId",
        alias = "avaliacao_id",
        deserialize_with = "lenient::string"
    )]
    pub evaluation_id: String,
    #[serde(
        alias = "agentId",
        alias = "agente_id",
        deserialize_with = "lenient::string"
    )]
    pub agent_id: String,
    #[serde(
        alias = "agentName",
        alias = "agente_nome",
        alias = "nome_agente",
        deserialize_with = "lenient::opt_string"
    )]
    pub agent_name: Option<String>,
    #[serde(
        alias = "criterionName",
        alias = "criterio",
        deserialize_with = "lenient::string"
    )]
    pub criterion_name: String,
    #[serde(
        alias = "criterionCategory",
        alias = "categoria",
        deserialize_with = "lenient::opt_string"
    )]
    pub criterion_category: Option<String>,
    #[serde(
        alias = "currentPerformance",
        alias = "performance_atual",
        deserialize_with = "lenient::number"
    )]
    pub current_performance: f64,
    #[serde(alias = "observacao", deserialize_with = "lenient::string")]
    pub comment: String,
    #[serde(deserialize_with = "lenient::parsed")]
    pub status: FeedbackStatus,
    #[serde(
        alias = "createdAt",
        alias = "data_criacao",
        deserialize_with = "lenient::string"
    )]
    pub created_at: String,
    #[serde(alias = "origem", deserialize_with = "lenient::parsed")]
    pub origin: Origin,
    #[serde(alias = "contestacao", deserialize_with = "lenient::object")]
    pub contestation: Option<Contestation>,
}

/// Decode a listing page. Elements that are not JSON objects are dropped
/// with a warning; objects always decode thanks to field fallbacks.
pub fn decode_records(values: Vec<Value>) -> Vec<FeedbackRecord> {
    values
        .into_iter()
        .filter_map(|value| {
            if !value.is_object() {
                warn!("Skipping non-object feedback entry: {}", value);
                return None;
            }
            match serde_json::from_value::<FeedbackRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping undecodable feedback entry: {}", e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_english_snake_case() {
        let records = decode_records(vec![json!({
            "id": 9,
            "evaluation_id": "E1",
            "agent_id": "A1",
            "agent_name": "Ana Souza",
            "criterion_name": "Greeting",
            "current_performance": 72.5,
            "comment": "Missed the greeting script",
            "status": "in_review",
            "created_at": "2024-03-02",
            "origin": "ai",
            "contestation": {"reason": "Audio cut", "resolution": null}
        })]);

        let record = &records[0];
        assert_eq!(record.id, 9);
        assert_eq!(record.agent_name.as_deref(), Some("Ana Souza"));
        assert_eq!(record.status, FeedbackStatus::InReview);
        assert_eq!(record.origin, Origin::Ai);
        let contestation = record.contestation.as_ref().unwrap();
        assert_eq!(contestation.reason, "Audio cut");
        assert!(contestation.resolution.is_none());
    }

    #[test]
    fn test_decode_portuguese_aliases_and_numeric_ids() {
        let records = decode_records(vec![json!({
            "id": "15",
            "avaliacao_id": 3021,
            "agente_id": 1188,
            "criterio": "saudacao_padrao",
            "performance_atual": "64",
            "observacao": "Faltou a saudação",
            "status": "pendente",
            "origem": "ia"
        })]);

        let record = &records[0];
        assert_eq!(record.id, 15);
        assert_eq!(record.evaluation_id, "3021");
        assert_eq!(record.agent_id, "1188");
        assert_eq!(record.current_performance, 64.0);
        assert_eq!(record.status, FeedbackStatus::Pending);
        assert_eq!(record.origin, Origin::Ai);
    }

    #[test]
    fn test_decode_camel_case_aliases() {
        let records = decode_records(vec![json!({
            "id": 3,
            "evaluationId": "E9",
            "agentId": "A7",
            "criterionName": "Closing",
            "currentPerformance": 90,
            "status": "inReview",
            "createdAt": "2024-01-01"
        })]);

        let record = &records[0];
        assert_eq!(record.evaluation_id, "E9");
        assert_eq!(record.agent_id, "A7");
        assert_eq!(record.status, FeedbackStatus::InReview);
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let records = decode_records(vec![
            json!({"id": null, "status": 12, "contestation": "yes", "agent_id": null}),
            json!("not a record"),
        ]);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, 0);
        assert_eq!(record.status, FeedbackStatus::Pending);
        assert_eq!(record.agent_id, "");
        assert!(record.contestation.is_none());
    }

    #[test]
    fn test_status_parse_variants() {
        assert_eq!(FeedbackStatus::parse("ACCEPTED"), FeedbackStatus::Accepted);
        assert_eq!(FeedbackStatus::parse("em revisão"), FeedbackStatus::InReview);
        assert_eq!(FeedbackStatus::parse("something else"), FeedbackStatus::Pending);
        assert_eq!(FeedbackStatus::InReview.as_str(), "in_review");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let value = serde_json::to_value(FeedbackStatus::InReview).unwrap();
        assert_eq!(value, json!("in_review"));
    }
}
