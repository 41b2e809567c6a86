use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use atelier_core::domain::suggestion::{
    DesignFields, DesignSuggestion, SavedDesign, SavedDesignId, SuggestionId,
};
use atelier_core::domain::upload::{Upload, UploadId};
use atelier_core::domain::user::UserId;

use super::RepositoryError;

pub(super) const UPLOAD_COLUMNS: &str = "id, user_id, file_path, cloth_type, occasion, gender, \
     age_group, budget_range, size_info, created_at";

pub(super) const SUGGESTION_COLUMNS: &str = "id, upload_id, user_id, neck_design, sleeve_style, \
     embroidery_pattern, color_combination, border_style, description, confidence_score, \
     created_at";

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(super) fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid timestamp `{value}`: {e}")))
}

fn column<T>(row: &SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn parsed<T>(row: &SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = column(row, name)?;
    raw.parse().map_err(|e: T::Err| RepositoryError::Decode(format!("column `{name}`: {e}")))
}

pub(super) fn row_to_upload(row: &SqliteRow) -> Result<Upload, RepositoryError> {
    let created_at: String = column(row, "created_at")?;

    Ok(Upload {
        id: UploadId(column(row, "id")?),
        user_id: UserId(column(row, "user_id")?),
        file_path: column(row, "file_path")?,
        cloth_type: parsed(row, "cloth_type")?,
        occasion: parsed(row, "occasion")?,
        gender: parsed(row, "gender")?,
        age_group: parsed(row, "age_group")?,
        budget_range: parsed(row, "budget_range")?,
        size_info: column(row, "size_info")?,
        created_at: decode_timestamp(&created_at)?,
    })
}

pub(super) fn row_to_suggestion(row: &SqliteRow) -> Result<DesignSuggestion, RepositoryError> {
    let created_at: String = column(row, "created_at")?;

    Ok(DesignSuggestion {
        id: SuggestionId(column(row, "id")?),
        upload_id: UploadId(column(row, "upload_id")?),
        user_id: UserId(column(row, "user_id")?),
        fields: DesignFields {
            neck_design: column(row, "neck_design")?,
            sleeve_style: column(row, "sleeve_style")?,
            embroidery_pattern: column(row, "embroidery_pattern")?,
            color_combination: column(row, "color_combination")?,
            border_style: column(row, "border_style")?,
        },
        description: column(row, "description")?,
        confidence_score: parsed(row, "confidence_score")?,
        created_at: decode_timestamp(&created_at)?,
    })
}

pub(super) fn row_to_saved_design(row: &SqliteRow) -> Result<SavedDesign, RepositoryError> {
    let saved_at: String = column(row, "saved_at")?;

    Ok(SavedDesign {
        id: SavedDesignId(column(row, "id")?),
        user_id: UserId(column(row, "user_id")?),
        design_suggestion_id: SuggestionId(column(row, "design_suggestion_id")?),
        saved_at: decode_timestamp(&saved_at)?,
    })
}
