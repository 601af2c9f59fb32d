//! Catalog (dashboard) route handlers.
//!
//! The dashboard fetches the full sweet listing (cached by the API client)
//! and filters it in memory. The search box and the two filter selects
//! re-request only the grid fragment via HTMX; every response is computed
//! from its own fetch, so a superseded request can never overwrite a newer
//! one.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::api::types::Sweet;
use crate::catalog::{FilterCriteria, PriceBracket, distinct_categories, filter_catalog};
use crate::filters;
use crate::images::resolve_image_url;
use crate::middleware::OptionalAuth;
use crate::routes::UserView;
use crate::state::AppState;

/// Card dimensions requested from the image host.
const CARD_IMAGE_SIZE: u32 = 600;

/// Sweet display data for templates.
#[derive(Clone)]
pub struct SweetView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: u32,
    pub stock_label: &'static str,
    pub out_of_stock: bool,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl SweetView {
    /// Build display data from a catalog snapshot.
    pub fn from_sweet(state: &AppState, sweet: &Sweet) -> Self {
        let stock = sugarplum_core::StockLevel::from_quantity(sweet.quantity);
        Self {
            id: sweet.id.to_string(),
            name: sweet.name.clone(),
            category: sweet.category.clone(),
            price: sweet.price.to_string(),
            quantity: sweet.quantity,
            stock_label: stock.label(),
            out_of_stock: sweet.quantity == 0,
            description: sweet.description.clone(),
            image: resolve_image_url(
                &state.config().cloudinary,
                sweet.image_url.as_deref(),
                CARD_IMAGE_SIZE,
                CARD_IMAGE_SIZE,
            ),
        }
    }
}

/// Category filter option for the dropdown.
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Price filter option for the dropdown.
pub struct PriceOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search term.
    pub q: Option<String>,
    /// Category name or "all".
    pub category: Option<String>,
    /// Price bracket parameter; unknown values fall back to "all".
    pub price: Option<String>,
}

impl CatalogQuery {
    fn criteria(&self) -> FilterCriteria {
        let category = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "all")
            .map(ToString::to_string);
        FilterCriteria {
            search: self.q.clone().unwrap_or_default(),
            category,
            price: self
                .price
                .as_deref()
                .map_or(PriceBracket::All, PriceBracket::from_param),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub user: Option<UserView>,
    pub sweets: Vec<SweetView>,
    pub category_options: Vec<CategoryOption>,
    pub price_options: Vec<PriceOption>,
    pub search: String,
    pub total: usize,
    pub filters_active: bool,
    pub load_failed: bool,
    pub is_admin: bool,
}

/// Sweet grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/sweet_grid.html")]
pub struct SweetGridTemplate {
    pub sweets: Vec<SweetView>,
    pub total: usize,
    pub filters_active: bool,
    pub load_failed: bool,
    pub is_admin: bool,
}

struct FilteredCatalog {
    sweets: Vec<SweetView>,
    categories: Vec<String>,
    total: usize,
    load_failed: bool,
}

/// Fetch, filter, and project the catalog for rendering.
///
/// Browsing works logged out; the token just rides along when present.
async fn load_filtered(
    state: &AppState,
    token: Option<&str>,
    criteria: &FilterCriteria,
) -> FilteredCatalog {
    match state.api().list_sweets(token).await {
        Ok(listing) => {
            let categories = distinct_categories(&listing);
            let visible = filter_catalog(&listing, criteria);
            FilteredCatalog {
                sweets: visible
                    .iter()
                    .map(|s| SweetView::from_sweet(state, s))
                    .collect(),
                total: visible.len(),
                categories,
                load_failed: false,
            }
        }
        Err(e) => {
            tracing::error!("failed to load sweet listing: {e}");
            FilteredCatalog {
                sweets: Vec::new(),
                categories: Vec::new(),
                total: 0,
                load_failed: true,
            }
        }
    }
}

/// Display the catalog page.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let user_view = user.as_ref().map(UserView::from);
    let is_admin = user_view.as_ref().is_some_and(|u| u.is_admin);
    let criteria = query.criteria();
    let token = user.as_ref().map(|u| u.token.as_str());
    let loaded = load_filtered(&state, token, &criteria).await;

    CatalogTemplate {
        user: user_view,
        sweets: loaded.sweets,
        category_options: loaded
            .categories
            .into_iter()
            .map(|name| CategoryOption {
                selected: criteria.category.as_deref() == Some(name.as_str()),
                name,
            })
            .collect(),
        price_options: PriceBracket::CHOICES
            .into_iter()
            .map(|b| PriceOption {
                value: b.as_str(),
                label: b.label(),
                selected: b == criteria.price,
            })
            .collect(),
        search: criteria.search.clone(),
        total: loaded.total,
        filters_active: !criteria.is_all(),
        load_failed: loaded.load_failed,
        is_admin,
    }
}

/// Display the filtered sweet grid fragment (for HTMX).
pub async fn grid(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let user_view = user.as_ref().map(UserView::from);
    let is_admin = user_view.as_ref().is_some_and(|u| u.is_admin);
    let criteria = query.criteria();
    let token = user.as_ref().map(|u| u.token.as_str());
    let loaded = load_filtered(&state, token, &criteria).await;

    SweetGridTemplate {
        sweets: loaded.sweets,
        total: loaded.total,
        filters_active: !criteria.is_all(),
        load_failed: loaded.load_failed,
        is_admin,
    }
}
