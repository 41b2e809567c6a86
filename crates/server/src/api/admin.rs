use atelier_core::domain::garment::ClothType;
use atelier_core::domain::stats::{
    CategoryCount, TRENDING_COLORS, TRENDING_LIMIT, TRENDING_PATTERNS,
};
use atelier_core::errors::ApplicationError;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::auth::AdminUser;
use super::uploads::UploadView;
use super::{ApiError, AppState, PageParams};
use crate::workflow::persistence;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClothTypeCount {
    #[serde(rename = "type")]
    pub cloth_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OccasionCount {
    pub occasion: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStatsView {
    pub total_uploads: i64,
    pub cloth_types: Vec<ClothTypeCount>,
    pub occasions: Vec<OccasionCount>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendingCloth {
    pub cloth_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendingView {
    pub trending_cloths: Vec<TrendingCloth>,
    pub trending_occasions: Vec<OccasionCount>,
    pub trending_colors: Vec<String>,
    pub trending_patterns: Vec<String>,
}

fn occasions(counts: Vec<CategoryCount>) -> Vec<OccasionCount> {
    counts
        .into_iter()
        .map(|entry| OccasionCount { occasion: entry.value, count: entry.count })
        .collect()
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<DashboardStatsView>, ApiError> {
    let stats = state.stats.dashboard_stats().await.map_err(persistence)?;
    Ok(Json(DashboardStatsView {
        total_uploads: stats.total_uploads,
        cloth_types: stats
            .cloth_types
            .into_iter()
            .map(|entry| ClothTypeCount { cloth_type: entry.value, count: entry.count })
            .collect(),
        occasions: occasions(stats.occasions),
    }))
}

pub async fn list_uploads(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<UploadView>>, ApiError> {
    let uploads = state.uploads.list_all(params.into()).await.map_err(persistence)?;
    Ok(Json(uploads.into_iter().map(UploadView::from).collect()))
}

pub async fn uploads_by_type(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(cloth_type): Path<String>,
) -> Result<Json<Vec<UploadView>>, ApiError> {
    let cloth_type = cloth_type.parse::<ClothType>().map_err(ApplicationError::from)?;
    let uploads = state.uploads.list_by_cloth_type(cloth_type).await.map_err(persistence)?;
    Ok(Json(uploads.into_iter().map(UploadView::from).collect()))
}

pub async fn trending(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<TrendingView>, ApiError> {
    let stats = state.stats.dashboard_stats().await.map_err(persistence)?;
    let (cloth_types, top_occasions) = stats.top(TRENDING_LIMIT);

    Ok(Json(TrendingView {
        trending_cloths: cloth_types
            .into_iter()
            .map(|entry| TrendingCloth { cloth_type: entry.value, count: entry.count })
            .collect(),
        trending_occasions: occasions(top_occasions),
        trending_colors: owned(TRENDING_COLORS),
        trending_patterns: owned(TRENDING_PATTERNS),
    }))
}
