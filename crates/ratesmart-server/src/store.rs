//! In-memory storage for businesses, products, reviews, and sessions
//!
//! Stands in for a relational database. All tables sit behind one
//! `RwLock`; every write, including the review analysis that precedes it,
//! happens under a single write guard so concurrent updates of the same row
//! are serialized and the last write wins with its own derived fields.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use ratesmart_classifiers::ReviewAnalyzer;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{
    Business, BusinessPatch, Id, NewProduct, NewReview, Product, ProductPatch, ProductView,
    Review, ReviewPatch, ReviewView, MAX_CUSTOMER_NAME_LEN, MAX_NAME_LEN, MAX_PHONE_LEN,
};

/// Storage errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("{0}")]
    Validation(String),
}

impl StoreError {
    fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Validated fields of a new business; the password is already hashed
#[derive(Debug, Clone)]
pub struct BusinessRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub state: String,
    pub description: String,
    pub hours: String,
    pub password_hash: String,
}

/// A business login; valid until `issued_at + ttl`
struct Session {
    business_id: Id,
    issued_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    next_business_id: Id,
    next_product_id: Id,
    next_review_id: Id,
    businesses: BTreeMap<Id, Business>,
    products: BTreeMap<Id, Product>,
    reviews: BTreeMap<Id, Review>,
    sessions: HashMap<String, Session>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Id>) -> bool {
        self.businesses
            .values()
            .any(|b| Some(b.id) != except && b.email.eq_ignore_ascii_case(email))
    }

    fn product_view(&self, product: &Product) -> ProductView {
        ProductView {
            product: product.clone(),
            business_name: self
                .businesses
                .get(&product.business)
                .map(|b| b.name.clone())
                .unwrap_or_default(),
        }
    }

    fn review_view(&self, review: &Review) -> ReviewView {
        let product = self.products.get(&review.product);
        let business = product.and_then(|p| self.businesses.get(&p.business));
        ReviewView {
            review: review.clone(),
            product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
            business_id: product.map(|p| p.business).unwrap_or_default(),
            business_name: business.map(|b| b.name.clone()).unwrap_or_default(),
        }
    }

    fn business_of_review(&self, review: &Review) -> Option<Id> {
        self.products.get(&review.product).map(|p| p.business)
    }

    fn remove_product(&mut self, product_id: Id) {
        self.products.remove(&product_id);
        self.reviews.retain(|_, r| r.product != product_id);
    }
}

/// The service's data store
pub struct Store {
    tables: RwLock<Tables>,
    analyzer: Arc<ReviewAnalyzer>,
    session_ttl: Duration,
}

impl Store {
    pub fn new(analyzer: Arc<ReviewAnalyzer>, session_ttl: Duration) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            analyzer,
            session_ttl,
        }
    }

    fn session_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.issued_at >= self.session_ttl
    }

    // --- businesses ---

    pub fn create_business(&self, record: BusinessRecord) -> Result<Business, StoreError> {
        validate_name("name", &record.name)?;
        validate_email(&record.email)?;
        validate_phone(&record.phone)?;

        let mut tables = self.tables.write();
        if tables.email_taken(&record.email, None) {
            return Err(StoreError::DuplicateEmail);
        }

        tables.next_business_id += 1;
        let business = Business {
            id: tables.next_business_id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            country: record.country,
            state: record.state,
            description: record.description,
            hours: record.hours,
            password_hash: record.password_hash,
        };
        tables.businesses.insert(business.id, business.clone());

        info!(business_id = business.id, "Business created");
        Ok(business)
    }

    pub fn business(&self, id: Id) -> Result<Business, StoreError> {
        self.tables
            .read()
            .businesses
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("Business"))
    }

    pub fn business_by_email(&self, email: &str) -> Option<Business> {
        self.tables
            .read()
            .businesses
            .values()
            .find(|b| b.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn list_businesses(&self) -> Vec<Business> {
        self.tables.read().businesses.values().cloned().collect()
    }

    /// Apply a partial update. `password_hash` replaces the stored hash when set.
    pub fn update_business(
        &self,
        id: Id,
        patch: BusinessPatch,
        password_hash: Option<String>,
    ) -> Result<Business, StoreError> {
        let mut tables = self.tables.write();
        if !tables.businesses.contains_key(&id) {
            return Err(StoreError::NotFound("Business"));
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(phone) = &patch.phone {
            validate_phone(phone)?;
        }

        let business = tables
            .businesses
            .get_mut(&id)
            .ok_or(StoreError::NotFound("Business"))?;
        if let Some(name) = patch.name {
            business.name = name;
        }
        if let Some(email) = patch.email {
            business.email = email;
        }
        if let Some(phone) = patch.phone {
            business.phone = phone;
        }
        if let Some(country) = patch.country {
            business.country = country;
        }
        if let Some(state) = patch.state {
            business.state = state;
        }
        if let Some(hours) = patch.hours {
            business.hours = hours;
        }
        if let Some(description) = patch.description {
            business.description = description;
        }
        if let Some(hash) = password_hash {
            business.password_hash = hash;
        }

        Ok(business.clone())
    }

    /// Delete a business with its products, their reviews, and its sessions
    pub fn delete_business(&self, id: Id) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.businesses.remove(&id).is_none() {
            return Err(StoreError::NotFound("Business"));
        }

        let product_ids: Vec<Id> = tables
            .products
            .values()
            .filter(|p| p.business == id)
            .map(|p| p.id)
            .collect();
        for product_id in product_ids {
            tables.remove_product(product_id);
        }
        tables.sessions.retain(|_, session| session.business_id != id);

        info!(business_id = id, "Business deleted");
        Ok(())
    }

    // --- sessions ---

    /// Record a new login, dropping sessions that have expired
    pub fn insert_session(&self, token: String, business_id: Id) {
        let now = Utc::now();
        let mut tables = self.tables.write();

        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|_, session| !self.session_expired(session, now));
        let pruned = before - tables.sessions.len();
        if pruned > 0 {
            debug!(pruned, "Expired sessions removed");
        }

        tables.sessions.insert(
            token,
            Session {
                business_id,
                issued_at: now,
            },
        );
    }

    /// Business behind a session token, unless the token is unknown or expired
    pub fn session_business(&self, token: &str) -> Option<Id> {
        let tables = self.tables.read();
        let session = tables.sessions.get(token)?;
        (!self.session_expired(session, Utc::now())).then_some(session.business_id)
    }

    // --- products ---

    pub fn create_product(&self, new: NewProduct) -> Result<ProductView, StoreError> {
        let name = new
            .name
            .ok_or_else(|| StoreError::validation("name is required"))?;
        validate_name("name", &name)?;
        let business = new
            .business
            .ok_or_else(|| StoreError::validation("business is required"))?;

        let mut tables = self.tables.write();
        if !tables.businesses.contains_key(&business) {
            return Err(StoreError::validation(format!(
                "Invalid business id {business}"
            )));
        }

        tables.next_product_id += 1;
        let product = Product {
            id: tables.next_product_id,
            business,
            name,
            created_at: Utc::now(),
        };
        tables.products.insert(product.id, product.clone());

        debug!(product_id = product.id, business_id = business, "Product created");
        Ok(tables.product_view(&product))
    }

    pub fn product(&self, id: Id) -> Result<ProductView, StoreError> {
        let tables = self.tables.read();
        tables
            .products
            .get(&id)
            .map(|p| tables.product_view(p))
            .ok_or(StoreError::NotFound("Product"))
    }

    pub fn list_products(&self) -> Vec<ProductView> {
        let tables = self.tables.read();
        tables
            .products
            .values()
            .map(|p| tables.product_view(p))
            .collect()
    }

    pub fn update_product(&self, id: Id, patch: ProductPatch) -> Result<ProductView, StoreError> {
        let mut tables = self.tables.write();
        if !tables.products.contains_key(&id) {
            return Err(StoreError::NotFound("Product"));
        }
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(business) = patch.business {
            if !tables.businesses.contains_key(&business) {
                return Err(StoreError::validation(format!(
                    "Invalid business id {business}"
                )));
            }
        }

        let product = tables
            .products
            .get_mut(&id)
            .ok_or(StoreError::NotFound("Product"))?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(business) = patch.business {
            product.business = business;
        }
        let product = product.clone();

        Ok(tables.product_view(&product))
    }

    /// Delete a product with its reviews
    pub fn delete_product(&self, id: Id) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.products.contains_key(&id) {
            return Err(StoreError::NotFound("Product"));
        }
        tables.remove_product(id);
        Ok(())
    }

    // --- reviews ---

    pub fn create_review(&self, new: NewReview) -> Result<ReviewView, StoreError> {
        let customer_name = new
            .customer_name
            .ok_or_else(|| StoreError::validation("customer_name is required"))?;
        validate_customer_name(&customer_name)?;
        let product = new
            .product
            .ok_or_else(|| StoreError::validation("product is required"))?;
        let rating = new
            .rating
            .ok_or_else(|| StoreError::validation("rating is required"))?;
        validate_rating(rating)?;
        let text = new
            .text
            .ok_or_else(|| StoreError::validation("text is required"))?;

        let mut tables = self.tables.write();
        if !tables.products.contains_key(&product) {
            return Err(StoreError::validation(format!("Invalid product id {product}")));
        }

        tables.next_review_id += 1;
        let now = Utc::now();
        let review = Review {
            id: tables.next_review_id,
            customer_name,
            product,
            rating,
            text,
            sentiment: Default::default(),
            is_fake: false,
            reply: String::new(),
            created_at: now,
            updated_at: now,
        };
        let review = self.save_review(&mut tables, review);

        Ok(tables.review_view(&review))
    }

    pub fn review(&self, id: Id) -> Result<ReviewView, StoreError> {
        let tables = self.tables.read();
        tables
            .reviews
            .get(&id)
            .map(|r| tables.review_view(r))
            .ok_or(StoreError::NotFound("Review"))
    }

    /// Business that owns the reviewed product
    pub fn review_owner(&self, id: Id) -> Result<Option<Id>, StoreError> {
        let tables = self.tables.read();
        let review = tables.reviews.get(&id).ok_or(StoreError::NotFound("Review"))?;
        Ok(tables.business_of_review(review))
    }

    /// Reviews newest first, optionally only those for one business
    pub fn list_reviews(&self, business_id: Option<Id>) -> Vec<ReviewView> {
        let tables = self.tables.read();
        let mut reviews: Vec<&Review> = tables
            .reviews
            .values()
            .filter(|r| business_id.map_or(true, |id| tables.business_of_review(r) == Some(id)))
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        reviews.into_iter().map(|r| tables.review_view(r)).collect()
    }

    /// Apply a partial update and re-analyze the review before it is written
    pub fn update_review(&self, id: Id, patch: ReviewPatch) -> Result<ReviewView, StoreError> {
        if let Some(name) = &patch.customer_name {
            validate_customer_name(name)?;
        }
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }

        let mut tables = self.tables.write();
        let mut review = tables
            .reviews
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("Review"))?;
        if let Some(product) = patch.product {
            if !tables.products.contains_key(&product) {
                return Err(StoreError::validation(format!("Invalid product id {product}")));
            }
            review.product = product;
        }
        if let Some(customer_name) = patch.customer_name {
            review.customer_name = customer_name;
        }
        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(text) = patch.text {
            review.text = text;
        }
        if let Some(reply) = patch.reply {
            review.reply = reply;
        }
        review.updated_at = Utc::now();
        let review = self.save_review(&mut tables, review);

        Ok(tables.review_view(&review))
    }

    pub fn delete_review(&self, id: Id) -> Result<(), StoreError> {
        self.tables
            .write()
            .reviews
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("Review"))
    }

    /// Derive sentiment and fake verdict, then write the row. Every insert and
    /// update goes through here.
    fn save_review(&self, tables: &mut Tables, mut review: Review) -> Review {
        let analysis = self.analyzer.analyze(&review.text, review.rating);
        review.sentiment = analysis.sentiment;
        review.is_fake = analysis.is_fake;

        debug!(
            review_id = review.id,
            sentiment = review.sentiment.as_str(),
            is_fake = review.is_fake,
            "Review saved"
        );
        tables.reviews.insert(review.id, review.clone());
        review
    }

    // --- admin ---

    /// Remove every review, product, business, and session
    pub fn reset(&self) {
        let mut tables = self.tables.write();
        let counts = (
            tables.reviews.len(),
            tables.products.len(),
            tables.businesses.len(),
        );
        tables.reviews.clear();
        tables.products.clear();
        tables.businesses.clear();
        tables.sessions.clear();

        info!(
            reviews = counts.0,
            products = counts.1,
            businesses = counts.2,
            "System reset"
        );
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(format!("{field} may not be blank")));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(StoreError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_customer_name(value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation("customer_name may not be blank"));
    }
    if value.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(StoreError::validation(format!(
            "customer_name must be at most {MAX_CUSTOMER_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_phone(value: &str) -> Result<(), StoreError> {
    if value.chars().count() > MAX_PHONE_LEN {
        return Err(StoreError::validation(format!(
            "phone must be at most {MAX_PHONE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), StoreError> {
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(StoreError::validation("Enter a valid email address"));
    }
    Ok(())
}

fn validate_rating(rating: i64) -> Result<(), StoreError> {
    if !(1..=5).contains(&rating) {
        return Err(StoreError::validation("Rating must be between 1 and 5"));
    }
    Ok(())
}
