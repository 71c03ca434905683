use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Where a door is meant to be installed
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "door_purpose")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DoorPurpose {
    #[sea_orm(string_value = "apartment")]
    Apartment,
    #[sea_orm(string_value = "home")]
    Home,
}

/// Showroom markers on an article
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "additional_feature")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdditionalFeature {
    /// Discontinued model sold from stock
    #[sea_orm(string_value = "outdated")]
    Outdated,
    /// Former showroom sample
    #[sea_orm(string_value = "showcase")]
    Showcase,
}

/// A purchasable article of a door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub id: Uuid,
    pub item_id: Uuid,
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub target: DoorPurpose,
    /// `false` opens to the left, `true` to the right
    pub opening_direction: bool,
    pub mirror: bool,
    pub additional_features: Option<AdditionalFeature>,
    pub is_defect: bool,
    /// Price in minor currency units
    pub price: i64,
    pub images: Vec<String>,
}

/// A door with its articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogItem {
    pub id: Uuid,
    pub title: String,
    pub image_entry: String,
    pub image_exit: String,
    pub variants: Vec<Variant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogItem {
    pub fn new(input: CreateDoor) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            image_entry: input.image_entry,
            image_exit: input.image_exit,
            variants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn min_variant_price(&self) -> Option<i64> {
        self.variants.iter().map(|v| v.price).min()
    }

    pub fn max_variant_price(&self) -> Option<i64> {
        self.variants.iter().map(|v| v.price).max()
    }

    pub fn apply_update(&mut self, update: UpdateDoor) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(image_entry) = update.image_entry {
            self.image_entry = image_entry;
        }
        if let Some(image_exit) = update.image_exit {
            self.image_exit = image_exit;
        }
        self.updated_at = Utc::now();
    }
}

/// Standard leaf sizes (width x height, mm) offered as filter checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SizeBucket {
    #[strum(serialize = "780x2000")]
    S780x2000,
    #[strum(serialize = "800x2030")]
    S800x2030,
    #[strum(serialize = "860x2050")]
    S860x2050,
    #[strum(serialize = "900x2050")]
    S900x2050,
    #[strum(serialize = "960x2070")]
    S960x2070,
    #[strum(serialize = "980x2080")]
    S980x2080,
    #[strum(serialize = "1050x2070")]
    S1050x2070,
}

impl SizeBucket {
    pub fn dimensions(self) -> (i32, i32) {
        match self {
            Self::S780x2000 => (780, 2000),
            Self::S800x2030 => (800, 2030),
            Self::S860x2050 => (860, 2050),
            Self::S900x2050 => (900, 2050),
            Self::S960x2070 => (960, 2070),
            Self::S980x2080 => (980, 2080),
            Self::S1050x2070 => (1050, 2070),
        }
    }
}

fn default_limit() -> i64 {
    20
}

/// Catalog filter as submitted by the storefront. Every flag defaults to
/// `false`; unset flags leave the corresponding stage inactive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FilterCriteria {
    pub all_sizes: bool,
    #[serde(rename = "size780on2000")]
    pub size_780_on_2000: bool,
    #[serde(rename = "size800on2030")]
    pub size_800_on_2030: bool,
    #[serde(rename = "size860on2050")]
    pub size_860_on_2050: bool,
    #[serde(rename = "size900on2050")]
    pub size_900_on_2050: bool,
    #[serde(rename = "size960on2070")]
    pub size_960_on_2070: bool,
    #[serde(rename = "size980on2080")]
    pub size_980_on_2080: bool,
    #[serde(rename = "size1050on2070")]
    pub size_1050_on_2070: bool,
    pub for_apartment: bool,
    pub for_home: bool,
    pub left_opening: bool,
    pub right_opening: bool,
    pub mirror: bool,
    pub outdated_model: bool,
    pub showcase_sample: bool,
    pub without_defect: bool,
    pub filter_by_min_price: bool,
    pub filter_by_max_price: bool,
    /// Index of the first item to return. Also accepted as `count`; a body
    /// carrying both names is rejected.
    #[serde(alias = "count")]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            all_sizes: false,
            size_780_on_2000: false,
            size_800_on_2030: false,
            size_860_on_2050: false,
            size_900_on_2050: false,
            size_960_on_2070: false,
            size_980_on_2080: false,
            size_1050_on_2070: false,
            for_apartment: false,
            for_home: false,
            left_opening: false,
            right_opening: false,
            mirror: false,
            outdated_model: false,
            showcase_sample: false,
            without_defect: false,
            filter_by_min_price: false,
            filter_by_max_price: false,
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl FilterCriteria {
    /// Buckets whose checkbox is set, in declaration order.
    pub fn checked_sizes(&self) -> Vec<SizeBucket> {
        [
            (self.size_780_on_2000, SizeBucket::S780x2000),
            (self.size_800_on_2030, SizeBucket::S800x2030),
            (self.size_860_on_2050, SizeBucket::S860x2050),
            (self.size_900_on_2050, SizeBucket::S900x2050),
            (self.size_960_on_2070, SizeBucket::S960x2070),
            (self.size_980_on_2080, SizeBucket::S980x2080),
            (self.size_1050_on_2070, SizeBucket::S1050x2070),
        ]
        .into_iter()
        .filter_map(|(checked, bucket)| checked.then_some(bucket))
        .collect()
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    /// Number of items on this page
    pub count: usize,
}

impl CatalogPage {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Also accepted as `count`, but not together with `offset`
    #[serde(default, alias = "count")]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDoor {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Image path relative to the uploads directory
    #[validate(length(min = 1))]
    pub image_entry: String,
    #[validate(length(min = 1))]
    pub image_exit: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDoor {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub image_entry: Option<String>,
    #[validate(length(min = 1))]
    pub image_exit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVariant {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(range(min = 1))]
    pub width: i32,
    #[validate(range(min = 1))]
    pub height: i32,
    pub target: DoorPurpose,
    #[serde(default)]
    pub opening_direction: bool,
    #[serde(default)]
    pub mirror: bool,
    #[serde(default)]
    pub additional_features: Option<AdditionalFeature>,
    #[serde(default)]
    pub is_defect: bool,
    #[validate(range(min = 0))]
    pub price: i64,
}

impl Variant {
    pub fn new(item_id: Uuid, input: CreateVariant) -> Self {
        Self {
            id: Uuid::now_v7(),
            item_id,
            title: input.title,
            width: input.width,
            height: input.height,
            target: input.target,
            opening_direction: input.opening_direction,
            mirror: input.mirror,
            additional_features: input.additional_features,
            is_defect: input.is_defect,
            price: input.price,
            images: Vec::new(),
        }
    }
}

/// Path of an already uploaded image, relative to the uploads directory.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ImagePath {
    #[validate(length(min = 1, max = 512))]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilterInfo {
    pub url: String,
}
