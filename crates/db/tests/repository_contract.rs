use std::sync::Arc;

use atelier_core::domain::garment::{
    AgeGroup, BudgetRange, ClothType, GarmentProfile, Gender, Occasion,
};
use atelier_core::domain::suggestion::{ConfidenceScore, DesignFields, NewDesignSuggestion};
use atelier_core::domain::upload::NewUpload;
use atelier_core::domain::user::UserId;
use atelier_db::migrations::run_pending;
use atelier_db::{
    connect_with_settings, InMemoryStore, Page, SavedDesignRepository, SqlSavedDesignRepository,
    SqlStatsRepository, SqlSuggestionRepository, SqlUploadRepository, StatsRepository,
    SuggestionRepository, UploadRepository,
};

type ContractResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

struct Repositories {
    uploads: Arc<dyn UploadRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
    saved: Arc<dyn SavedDesignRepository>,
    stats: Arc<dyn StatsRepository>,
}

async fn sql_repositories() -> ContractResult<Repositories> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.map_err(|e| e.to_string())?;
    run_pending(&pool).await.map_err(|e| e.to_string())?;
    Ok(Repositories {
        uploads: Arc::new(SqlUploadRepository::new(pool.clone())),
        suggestions: Arc::new(SqlSuggestionRepository::new(pool.clone())),
        saved: Arc::new(SqlSavedDesignRepository::new(pool.clone())),
        stats: Arc::new(SqlStatsRepository::new(pool)),
    })
}

fn memory_repositories() -> Repositories {
    let store = Arc::new(InMemoryStore::default());
    Repositories {
        uploads: store.clone(),
        suggestions: store.clone(),
        saved: store.clone(),
        stats: store,
    }
}

fn upload_for(user_id: i64, cloth_type: ClothType, occasion: Occasion) -> NewUpload {
    NewUpload {
        user_id: UserId(user_id),
        file_path: format!("uploads/user_{user_id}_{}.jpg", cloth_type.as_str()),
        profile: GarmentProfile {
            cloth_type,
            occasion,
            gender: Gender::Unisex,
            age_group: AgeGroup::Senior,
            budget_range: BudgetRange::High,
        },
        size_info: None,
    }
}

fn fields() -> DesignFields {
    DesignFields {
        neck_design: "Mandarin collar".to_string(),
        sleeve_style: "Full sleeves".to_string(),
        embroidery_pattern: "Heavy zari and stone work".to_string(),
        color_combination: "Deep maroon with gold".to_string(),
        border_style: "Heavy zari border".to_string(),
    }
}

async fn exercise_upload_workflow(repos: Repositories) -> ContractResult {
    let upload = repos
        .uploads
        .create(upload_for(11, ClothType::Shirt, Occasion::Wedding))
        .await
        .map_err(|e| e.to_string())?;
    let suggestion = repos
        .suggestions
        .create(NewDesignSuggestion {
            upload_id: upload.id,
            user_id: upload.user_id,
            fields: fields(),
            description: "For this premium cotton shirt, a mandarin collar ...".to_string(),
            confidence_score: ConfidenceScore::High,
        })
        .await
        .map_err(|e| e.to_string())?;

    require_eq!(suggestion.upload_id, upload.id);
    require_eq!(suggestion.fields, fields());

    let saved = repos.saved.save(UserId(11), suggestion.id).await.map_err(|e| e.to_string())?;
    let saved_again =
        repos.saved.save(UserId(11), suggestion.id).await.map_err(|e| e.to_string())?;
    require_eq!(saved.id, saved_again.id);

    let listed = repos.saved.list_saved_suggestions(UserId(11)).await.map_err(|e| e.to_string())?;
    require_eq!(listed, vec![suggestion.clone()]);

    let mine = repos
        .uploads
        .list_for_user(UserId(11), Page::default())
        .await
        .map_err(|e| e.to_string())?;
    require_eq!(mine.len(), 1);

    let stats = repos.stats.dashboard_stats().await.map_err(|e| e.to_string())?;
    require_eq!(stats.total_uploads, 1);
    require!(stats.cloth_types.iter().any(|entry| entry.value == "shirt" && entry.count == 1));

    require!(repos.uploads.delete(upload.id).await.map_err(|e| e.to_string())?);
    let remaining_saved =
        repos.saved.list_saved_suggestions(UserId(11)).await.map_err(|e| e.to_string())?;
    require!(remaining_saved.is_empty(), "saved designs should cascade with their upload");
    let remaining =
        repos.suggestions.find_by_id(suggestion.id).await.map_err(|e| e.to_string())?;
    require!(remaining.is_none(), "suggestions should cascade with their upload");

    Ok(())
}

#[tokio::test]
async fn sql_repositories_honor_the_contract() -> ContractResult {
    exercise_upload_workflow(sql_repositories().await?).await
}

#[tokio::test]
async fn in_memory_repositories_honor_the_contract() -> ContractResult {
    exercise_upload_workflow(memory_repositories()).await
}
