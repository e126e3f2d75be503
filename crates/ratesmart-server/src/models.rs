//! Records stored by the service and their request payloads

use chrono::{DateTime, Utc};
use ratesmart_core::Sentiment;
use serde::{Deserialize, Serialize};

/// Row identifier
pub type Id = u64;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_CUSTOMER_NAME_LEN: usize = 255;

/// A registered business (tenant)
#[derive(Debug, Clone, Serialize)]
pub struct Business {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub state: String,
    pub description: String,
    pub hours: String,

    /// argon2 PHC string, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// A product listed by a business
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: Id,
    pub business: Id,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Product as returned over the wire
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub business_name: String,
}

/// A customer review. `sentiment` and `is_fake` are derived on every save.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Id,
    pub customer_name: String,
    pub product: Id,
    pub rating: i64,
    pub text: String,
    pub sentiment: Sentiment,
    pub is_fake: bool,
    pub reply: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review as returned over the wire
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub product_name: String,
    pub business_id: Id,
    pub business_name: String,
}

/// Signup / business creation payload. Every field is optional so missing
/// ones can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBusiness {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub hours: Option<String>,
    pub description: Option<String>,
}

impl NewBusiness {
    /// Names of required fields absent from the payload
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_none()),
            ("email", self.email.is_none()),
            ("password", self.password.is_none()),
            ("phone", self.phone.is_none()),
            ("country", self.country.is_none()),
            ("state", self.state.is_none()),
            ("hours", self.hours.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect()
    }
}

/// Partial business update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub hours: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProduct {
    pub name: Option<String>,
    pub business: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub business: Option<Id>,
}

/// Review submission. Client-supplied `sentiment`/`is_fake` are not part of
/// the payload and are dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReview {
    pub customer_name: Option<String>,
    pub product: Option<Id>,
    pub rating: Option<i64>,
    pub text: Option<String>,
}

/// Partial review update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
    pub customer_name: Option<String>,
    pub product: Option<Id>,
    pub rating: Option<i64>,
    pub text: Option<String>,
    pub reply: Option<String>,
}

impl ReviewPatch {
    /// Keep only the reply, the single field a business may change
    pub fn reply_only(self) -> Self {
        Self {
            reply: self.reply,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token issued on signup and login
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub access: String,
    pub business: Business,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewQuery {
    pub business_id: Option<Id>,
}
