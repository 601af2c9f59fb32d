//! Admin panel route handlers.
//!
//! Inventory CRUD against the Sweet Shop API, restricted to admin accounts.
//! Mutations redirect back to the panel on success; failures re-render the
//! panel with the backend's message so nothing is lost to a toast that
//! never shows.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sugarplum_core::{Price, StockLevel, SweetId};

use crate::api::ApiError;
use crate::api::types::{NewSweet, Sweet, SweetPatch};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdmin, clear_current_user};
use crate::models::CurrentUser;
use crate::routes::UserView;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Inventory row display data.
pub struct AdminSweetView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub price_raw: String,
    pub quantity: u32,
    pub stock_label: &'static str,
    pub description: String,
    pub image_url: String,
}

impl From<&Sweet> for AdminSweetView {
    fn from(sweet: &Sweet) -> Self {
        Self {
            id: sweet.id.to_string(),
            name: sweet.name.clone(),
            category: sweet.category.clone(),
            price: sweet.price.to_string(),
            price_raw: format!("{:.2}", sweet.price.amount()),
            quantity: sweet.quantity,
            stock_label: StockLevel::from_quantity(sweet.quantity).label(),
            description: sweet.description.clone().unwrap_or_default(),
            image_url: sweet.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Aggregate inventory stats shown at the top of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryStats {
    pub total_sweets: usize,
    pub out_of_stock: usize,
    pub low_stock: usize,
}

impl InventoryStats {
    /// Compute stats over the full listing.
    #[must_use]
    pub fn compute(sweets: &[Sweet]) -> Self {
        Self {
            total_sweets: sweets.len(),
            out_of_stock: sweets.iter().filter(|s| s.quantity == 0).count(),
            low_stock: sweets
                .iter()
                .filter(|s| {
                    StockLevel::from_quantity(s.quantity) == StockLevel::LowStock
                })
                .count(),
        }
    }

    /// Total inventory value: sum of price x available quantity.
    #[must_use]
    pub fn total_value(sweets: &[Sweet]) -> Decimal {
        sweets.iter().map(|s| s.price.times(s.quantity)).sum()
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Create/update form data.
#[derive(Debug, Deserialize)]
pub struct SweetForm {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

/// Restock form data.
#[derive(Debug, Deserialize)]
pub struct RestockForm {
    pub quantity: u32,
}

/// Flash message query parameter.
#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin panel page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub user: Option<UserView>,
    pub sweets: Vec<AdminSweetView>,
    pub stats: InventoryStats,
    pub total_value: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

async fn render_panel(
    state: &AppState,
    user: &CurrentUser,
    notice: Option<String>,
    error: Option<String>,
) -> Result<AdminTemplate, AppError> {
    let listing = state
        .api()
        .list_sweets(Some(&user.token))
        .await
        .map_err(AppError::from_api)?;

    Ok(AdminTemplate {
        user: Some(UserView::from(user)),
        sweets: listing.iter().map(AdminSweetView::from).collect(),
        stats: InventoryStats::compute(&listing),
        total_value: filters::format_money(&InventoryStats::total_value(&listing)),
        notice,
        error,
    })
}

fn notice_message(code: &str) -> String {
    match code {
        "created" => "Sweet created".to_string(),
        "updated" => "Sweet updated".to_string(),
        "deleted" => "Sweet deleted".to_string(),
        "restocked" => "Inventory updated".to_string(),
        other => other.to_string(),
    }
}

/// Display the admin panel.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(query): Query<NoticeQuery>,
) -> Result<AdminTemplate, AppError> {
    let notice = query.notice.as_deref().map(notice_message);
    render_panel(&state, &user, notice, None).await
}

/// Run one mutation, redirecting on success and re-rendering with the
/// backend's message on failure.
async fn run_mutation(
    state: &AppState,
    session: &Session,
    user: &CurrentUser,
    notice_code: &str,
    result: Result<(), ApiError>,
) -> Result<Response, AppError> {
    match result {
        Ok(()) => Ok(Redirect::to(&format!("/admin?notice={notice_code}")).into_response()),
        Err(ApiError::Unauthorized) => {
            if let Err(e) = clear_current_user(session).await {
                tracing::warn!("failed to clear session after 401: {e}");
            }
            Err(AppError::Unauthorized)
        }
        Err(e) => {
            let template = render_panel(state, user, None, Some(e.to_string())).await?;
            Ok(template.into_response())
        }
    }
}

fn new_sweet(form: SweetForm) -> Result<NewSweet, AppError> {
    let price =
        Price::new(form.price).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(NewSweet {
        name: form.name,
        category: form.category,
        price,
        quantity: form.quantity,
        description: Some(form.description).filter(|d| !d.is_empty()),
        image_url: Some(form.image_url).filter(|u| !u.is_empty()),
    })
}

/// Create a sweet.
#[instrument(skip(state, session, user, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(user): RequireAdmin,
    Form(form): Form<SweetForm>,
) -> Result<Response, AppError> {
    let sweet = new_sweet(form)?;
    let result = state.api().create_sweet(&user.token, &sweet).await;
    run_mutation(&state, &session, &user, "created", result).await
}

/// Update a sweet.
///
/// The edit form submits every field, so the patch carries the full record.
#[instrument(skip(state, session, user, form), fields(sweet_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<SweetForm>,
) -> Result<Response, AppError> {
    let sweet = new_sweet(form)?;
    let patch = SweetPatch {
        name: Some(sweet.name),
        category: Some(sweet.category),
        price: Some(sweet.price),
        quantity: Some(sweet.quantity),
        description: sweet.description,
        image_url: sweet.image_url,
    };
    let result = state
        .api()
        .update_sweet(&user.token, &SweetId::new(id), &patch)
        .await;
    run_mutation(&state, &session, &user, "updated", result).await
}

/// Delete a sweet.
#[instrument(skip(state, session, user), fields(sweet_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let result = state.api().delete_sweet(&user.token, &SweetId::new(id)).await;
    run_mutation(&state, &session, &user, "deleted", result).await
}

/// Restock a sweet.
#[instrument(skip(state, session, user), fields(sweet_id = %id))]
pub async fn restock(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<RestockForm>,
) -> Result<Response, AppError> {
    let result = state
        .api()
        .restock(&user.token, &SweetId::new(id), form.quantity)
        .await;
    run_mutation(&state, &session, &user, "restocked", result).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sugarplum_core::Price;

    fn sweet(id: &str, price: &str, quantity: u32) -> Sweet {
        Sweet {
            id: SweetId::new(id),
            name: id.to_string(),
            category: "c".to_string(),
            price: Price::new(price.parse().unwrap()).unwrap(),
            quantity,
            description: None,
            image_url: None,
        }
    }

    #[test]
    fn test_inventory_stats() {
        let sweets = vec![
            sweet("a", "2.00", 0),
            sweet("b", "3.00", 5),
            sweet("c", "10.00", 50),
        ];
        let stats = InventoryStats::compute(&sweets);
        assert_eq!(stats.total_sweets, 3);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(
            InventoryStats::total_value(&sweets),
            "515.00".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_stats_empty_listing() {
        let stats = InventoryStats::compute(&[]);
        assert_eq!(stats.total_sweets, 0);
        assert_eq!(InventoryStats::total_value(&[]), Decimal::ZERO);
    }
}
