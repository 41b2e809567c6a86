use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::garment::{
    AgeGroup, BudgetRange, ClothType, GarmentAttributes, GarmentProfile, Gender, Occasion,
};
use crate::domain::user::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadId(pub i64);

/// A persisted garment photo together with the attributes the user picked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    pub id: UploadId,
    pub user_id: UserId,
    pub file_path: String,
    pub cloth_type: ClothType,
    pub occasion: Occasion,
    pub gender: Gender,
    pub age_group: AgeGroup,
    pub budget_range: BudgetRange,
    pub size_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Upload {
    pub fn profile(&self) -> GarmentProfile {
        GarmentProfile {
            cloth_type: self.cloth_type,
            occasion: self.occasion,
            gender: self.gender,
            age_group: self.age_group,
            budget_range: self.budget_range,
        }
    }
}

impl From<&Upload> for GarmentAttributes {
    fn from(upload: &Upload) -> Self {
        upload.profile().into()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUpload {
    pub user_id: UserId,
    pub file_path: String,
    pub profile: GarmentProfile,
    pub size_info: Option<String>,
}
