use sqlx::Row;

use atelier_core::domain::stats::{CategoryCount, DashboardStats};

use super::{RepositoryError, StatsRepository};
use crate::DbPool;

pub struct SqlStatsRepository {
    pool: DbPool,
}

impl SqlStatsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn counts_by(&self, column: GroupColumn) -> Result<Vec<CategoryCount>, RepositoryError> {
        let column = column.as_str();
        let rows = sqlx::query(&format!(
            "SELECT {column} AS value, COUNT(*) AS count
             FROM uploads
             GROUP BY {column}
             ORDER BY count DESC, value ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let value: String =
                    row.try_get("value").map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let count: i64 =
                    row.try_get("count").map_err(|e| RepositoryError::Decode(e.to_string()))?;
                Ok(CategoryCount { value, count })
            })
            .collect()
    }
}

/// Columns that may be grouped on; never built from request input.
#[derive(Clone, Copy)]
enum GroupColumn {
    ClothType,
    Occasion,
}

impl GroupColumn {
    fn as_str(self) -> &'static str {
        match self {
            Self::ClothType => "cloth_type",
            Self::Occasion => "occasion",
        }
    }
}

#[async_trait::async_trait]
impl StatsRepository for SqlStatsRepository {
    async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let total_uploads: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM uploads")
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardStats {
            total_uploads,
            cloth_types: self.counts_by(GroupColumn::ClothType).await?,
            occasions: self.counts_by(GroupColumn::Occasion).await?,
        })
    }
}
