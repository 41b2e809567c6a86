use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::upload::UploadId;
use crate::domain::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SavedDesignId(pub i64);

/// Coarse quality label attached to a suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceScore {
    /// Resolved through a curated template or the fallback rules.
    High,
    /// The generic safety net fired.
    Medium,
}

impl ConfidenceScore {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceScore {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            other => Err(DomainError::InvalidAttribute {
                field: "confidence_score",
                value: other.to_string(),
            }),
        }
    }
}

/// The five design fields of a recommendation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesignFields {
    pub neck_design: String,
    pub sleeve_style: String,
    pub embroidery_pattern: String,
    pub color_combination: String,
    pub border_style: String,
}

impl DesignFields {
    pub fn ensure_complete(&self) -> Result<(), DomainError> {
        let named = [
            ("neck_design", &self.neck_design),
            ("sleeve_style", &self.sleeve_style),
            ("embroidery_pattern", &self.embroidery_pattern),
            ("color_combination", &self.color_combination),
            ("border_style", &self.border_style),
        ];
        match named.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => {
                Err(DomainError::InvariantViolation(format!("design field `{name}` is empty")))
            }
            None => Ok(()),
        }
    }
}

/// How the engine arrived at a recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    CuratedTemplate,
    FallbackRules,
    Generic,
}

/// Engine output, before it is persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    #[serde(flatten)]
    pub fields: DesignFields,
    pub description: String,
    pub confidence_score: ConfidenceScore,
    pub source: SuggestionSource,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSuggestion {
    pub id: SuggestionId,
    pub upload_id: UploadId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub fields: DesignFields,
    pub description: String,
    pub confidence_score: ConfidenceScore,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDesignSuggestion {
    pub upload_id: UploadId,
    pub user_id: UserId,
    pub fields: DesignFields,
    pub description: String,
    pub confidence_score: ConfidenceScore,
}

impl NewDesignSuggestion {
    pub fn from_record(upload_id: UploadId, user_id: UserId, record: SuggestionRecord) -> Self {
        Self {
            upload_id,
            user_id,
            fields: record.fields,
            description: record.description,
            confidence_score: record.confidence_score,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDesign {
    pub id: SavedDesignId,
    pub user_id: UserId,
    pub design_suggestion_id: SuggestionId,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::{ConfidenceScore, DesignFields};
    use crate::errors::DomainError;

    fn fields() -> DesignFields {
        DesignFields {
            neck_design: "Round neck".to_string(),
            sleeve_style: "Half sleeves".to_string(),
            embroidery_pattern: "Minimal print".to_string(),
            color_combination: "Multi-color".to_string(),
            border_style: "Simple border".to_string(),
        }
    }

    #[test]
    fn complete_fields_pass() {
        assert_eq!(fields().ensure_complete(), Ok(()));
    }

    #[test]
    fn blank_field_is_an_invariant_violation() {
        let mut incomplete = fields();
        incomplete.color_combination = "  ".to_string();

        let error = incomplete.ensure_complete().expect_err("blank field");
        assert!(matches!(error, DomainError::InvariantViolation(ref message)
            if message.contains("color_combination")));
    }

    #[test]
    fn confidence_round_trips_through_its_label() {
        for score in [ConfidenceScore::High, ConfidenceScore::Medium] {
            assert_eq!(score.as_str().parse::<ConfidenceScore>(), Ok(score));
        }
        assert!("Low".parse::<ConfidenceScore>().is_err());
    }
}
