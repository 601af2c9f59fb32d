//! Tolerant normalization of backend payloads.
//!
//! The Sweet Shop API has shipped several incompatible payload shapes for
//! the same resources (different field names for identifiers and image
//! references, listings wrapped in different envelopes, auth responses with
//! the token at different depths). The adapters in this module accept every
//! known variant and produce the canonical types from [`super::types`], so
//! the ambiguity never leaks further into the crate.
//!
//! Fallback orders are part of the contract and are documented per function;
//! every variant has a test.

use rust_decimal::Decimal;
use serde_json::Value;

use sugarplum_core::{Price, SweetId, UserId, UserRole};

use super::ApiError;
use super::types::{AuthSession, RegisterOutcome, Sweet, User};

/// Envelope keys tried, in order, when a listing is not a bare array.
const LIST_ENVELOPE_KEYS: &[&str] = &["sweets", "data", "content"];

/// Field names tried, in order, for a sweet's identifier.
const SWEET_ID_KEYS: &[&str] = &["id", "_id", "sweetId"];

/// Field names tried, in order, for a sweet's image reference.
const IMAGE_KEYS: &[&str] = &["imageUrl", "image_url", "image"];

/// Field names tried, in order, for an auth token.
const TOKEN_KEYS: &[&str] = &["token", "accessToken", "jwt"];

// =============================================================================
// Sweets
// =============================================================================

/// Normalize a sweet-listing payload.
///
/// Accepts a bare JSON array, or an object wrapping the array under
/// `sweets`, `data`, or `content` (tried in that order). Records that fail
/// to normalize are skipped with a warning rather than failing the whole
/// listing.
pub fn parse_sweet_list(value: &Value) -> Result<Vec<Sweet>, ApiError> {
    let items = unwrap_list(value)
        .ok_or_else(|| ApiError::Shape("sweet listing is neither an array nor a known envelope".to_string()))?;

    let mut sweets = Vec::with_capacity(items.len());
    for item in items {
        match parse_sweet(item) {
            Ok(sweet) => sweets.push(sweet),
            Err(e) => tracing::warn!("skipping malformed sweet record: {e}"),
        }
    }
    Ok(sweets)
}

fn unwrap_list(value: &Value) -> Option<&Vec<Value>> {
    if let Some(items) = value.as_array() {
        return Some(items);
    }
    for key in LIST_ENVELOPE_KEYS {
        if let Some(items) = value.get(key).and_then(Value::as_array) {
            return Some(items);
        }
    }
    None
}

/// Normalize a single sweet record.
///
/// - id: `id` → `_id` → `sweetId`, as string or number
/// - name/category: missing normalizes to the empty string
/// - price: JSON number or numeric string; negative prices are rejected
/// - quantity: `quantity` → `availableQuantity`, number or numeric string;
///   negative values clamp to 0
/// - image: `imageUrl` → `image_url` → `image`
///
/// # Errors
///
/// Returns [`ApiError::Shape`] when no usable id or price is present.
pub fn parse_sweet(value: &Value) -> Result<Sweet, ApiError> {
    let id = first_string(value, SWEET_ID_KEYS)
        .ok_or_else(|| ApiError::Shape("sweet record has no usable id".to_string()))?;

    let price_raw = value
        .get("price")
        .and_then(as_decimal)
        .ok_or_else(|| ApiError::Shape(format!("sweet {id} has no usable price")))?;
    let price = Price::new(price_raw)
        .map_err(|e| ApiError::Shape(format!("sweet {id}: {e}")))?;

    let quantity = value
        .get("quantity")
        .or_else(|| value.get("availableQuantity"))
        .and_then(as_quantity)
        .unwrap_or(0);

    Ok(Sweet {
        id: SweetId::new(id),
        name: string_or_empty(value, "name"),
        category: string_or_empty(value, "category"),
        price,
        quantity,
        description: non_empty_string(value, "description"),
        image_url: IMAGE_KEYS.iter().find_map(|k| non_empty_string(value, k)),
    })
}

// =============================================================================
// Auth
// =============================================================================

/// Normalize a login response into an [`AuthSession`].
///
/// The token is looked up as `token` → `accessToken` → `jwt`, first at the
/// top level and then under a `data` envelope. The profile comes from a
/// nested `user` object when present, otherwise from top-level fields.
///
/// # Errors
///
/// Returns [`ApiError::Shape`] when no token can be found.
pub fn parse_auth_session(value: &Value) -> Result<AuthSession, ApiError> {
    let scope = auth_scope(value);

    let token = first_string(scope, TOKEN_KEYS)
        .ok_or_else(|| ApiError::Shape("auth response contains no token".to_string()))?;

    let user_scope = scope.get("user").unwrap_or(scope);
    let user = parse_user(user_scope);

    Ok(AuthSession { token, user })
}

/// Normalize a registration response.
///
/// Registration reuses the login shapes when the backend logs the account in
/// immediately; a response without a token means "created, please log in".
#[must_use]
pub fn parse_register_outcome(value: &Value) -> RegisterOutcome {
    match parse_auth_session(value) {
        Ok(session) => RegisterOutcome::LoggedIn(session),
        Err(_) => RegisterOutcome::Created,
    }
}

/// Normalize a user profile, tolerating missing fields.
///
/// The role accepts any casing of `ADMIN`; everything else is a regular
/// user. A missing id normalizes to the empty string (the storefront only
/// displays it).
fn parse_user(value: &Value) -> User {
    let role = value
        .get("role")
        .and_then(Value::as_str)
        .map_or(UserRole::User, |r| {
            if r.eq_ignore_ascii_case("ADMIN") {
                UserRole::Admin
            } else {
                UserRole::User
            }
        });

    User {
        id: UserId::new(first_string(value, &["id", "_id", "userId"]).unwrap_or_default()),
        username: string_or_empty(value, "username"),
        email: string_or_empty(value, "email"),
        role,
    }
}

/// Extract a user-facing message from an error body.
///
/// Tried in order: `message` → `error` → `detail`. Returns `None` when the
/// body is not JSON or carries none of them.
#[must_use]
pub fn parse_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    first_string(&value, &["message", "error", "detail"])
}

// =============================================================================
// Value Helpers
// =============================================================================

/// Auth payloads are sometimes wrapped in a `data` envelope; use it when the
/// top level has no token of its own.
fn auth_scope(value: &Value) -> &Value {
    if first_string(value, TOKEN_KEYS).is_some() {
        return value;
    }
    value.get("data").unwrap_or(value)
}

/// First present key rendered as a string (numbers are stringified).
fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn string_or_empty(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn non_empty_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// A decimal from a JSON number or numeric string.
fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A quantity from a JSON number or numeric string; negatives clamp to 0.
fn as_quantity(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(u32::try_from(i.max(0)).unwrap_or(u32::MAX))
            } else {
                n.as_f64()
                    .map(|f| if f.is_sign_negative() { 0.0 } else { f })
                    .map(|f| {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        {
                            f as u32
                        }
                    })
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok().map(|i| {
            u32::try_from(i.max(0)).unwrap_or(u32::MAX)
        }),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================================================
    // Sweet record variants
    // =========================================================================

    #[test]
    fn test_sweet_canonical_shape() {
        let value = json!({
            "id": "s-1",
            "name": "Kaju Katli",
            "category": "Barfi",
            "price": 4.5,
            "quantity": 12,
            "description": "Cashew diamonds",
            "imageUrl": "https://img.example.com/kaju.jpg"
        });
        let sweet = parse_sweet(&value).unwrap();
        assert_eq!(sweet.id.as_str(), "s-1");
        assert_eq!(sweet.name, "Kaju Katli");
        assert_eq!(sweet.price.amount(), "4.5".parse::<Decimal>().unwrap());
        assert_eq!(sweet.quantity, 12);
        assert_eq!(sweet.image_url.as_deref(), Some("https://img.example.com/kaju.jpg"));
    }

    #[test]
    fn test_sweet_mongo_style_shape() {
        // _id, snake_case image key, price as string, availableQuantity
        let value = json!({
            "_id": "64af0c",
            "name": "Jalebi",
            "category": "Fried",
            "price": "2.00",
            "availableQuantity": "30",
            "image_url": "jalebi-public-id"
        });
        let sweet = parse_sweet(&value).unwrap();
        assert_eq!(sweet.id.as_str(), "64af0c");
        assert_eq!(sweet.quantity, 30);
        assert_eq!(sweet.image_url.as_deref(), Some("jalebi-public-id"));
    }

    #[test]
    fn test_sweet_numeric_id_and_bare_image_key() {
        let value = json!({
            "sweetId": 42,
            "name": "Laddu",
            "category": "Laddu",
            "price": 3,
            "quantity": 7,
            "image": "laddu.png"
        });
        let sweet = parse_sweet(&value).unwrap();
        assert_eq!(sweet.id.as_str(), "42");
        assert_eq!(sweet.image_url.as_deref(), Some("laddu.png"));
    }

    #[test]
    fn test_sweet_id_fallback_order_prefers_id() {
        let value = json!({
            "id": "canonical",
            "_id": "legacy",
            "name": "x",
            "category": "y",
            "price": 1,
            "quantity": 1
        });
        assert_eq!(parse_sweet(&value).unwrap().id.as_str(), "canonical");
    }

    #[test]
    fn test_sweet_missing_id_is_shape_error() {
        let value = json!({"name": "Anon", "category": "?", "price": 1, "quantity": 1});
        assert!(matches!(parse_sweet(&value), Err(ApiError::Shape(_))));
    }

    #[test]
    fn test_sweet_negative_price_is_shape_error() {
        let value = json!({"id": "s", "name": "n", "category": "c", "price": -1, "quantity": 1});
        assert!(matches!(parse_sweet(&value), Err(ApiError::Shape(_))));
    }

    #[test]
    fn test_sweet_negative_quantity_clamps_to_zero() {
        let value = json!({"id": "s", "name": "n", "category": "c", "price": 1, "quantity": -3});
        assert_eq!(parse_sweet(&value).unwrap().quantity, 0);
    }

    #[test]
    fn test_sweet_missing_name_normalizes_to_empty() {
        let value = json!({"id": "s", "price": 1, "quantity": 1});
        let sweet = parse_sweet(&value).unwrap();
        assert_eq!(sweet.name, "");
        assert_eq!(sweet.category, "");
        assert_eq!(sweet.description, None);
        assert_eq!(sweet.image_url, None);
    }

    // =========================================================================
    // Listing envelopes
    // =========================================================================

    fn record(id: &str) -> Value {
        json!({"id": id, "name": id, "category": "c", "price": 1, "quantity": 1})
    }

    #[test]
    fn test_listing_bare_array() {
        let value = json!([record("a"), record("b")]);
        let sweets = parse_sweet_list(&value).unwrap();
        assert_eq!(sweets.len(), 2);
    }

    #[test]
    fn test_listing_envelopes() {
        for key in ["sweets", "data", "content"] {
            let value = json!({key: [record("a")]});
            let sweets = parse_sweet_list(&value).unwrap();
            assert_eq!(sweets.len(), 1, "envelope {key}");
        }
    }

    #[test]
    fn test_listing_skips_malformed_records() {
        let value = json!([record("ok"), {"name": "no id"}]);
        let sweets = parse_sweet_list(&value).unwrap();
        assert_eq!(sweets.len(), 1);
        assert_eq!(sweets.first().unwrap().id.as_str(), "ok");
    }

    #[test]
    fn test_listing_unknown_envelope_is_shape_error() {
        let value = json!({"results": []});
        assert!(matches!(parse_sweet_list(&value), Err(ApiError::Shape(_))));
    }

    // =========================================================================
    // Auth payload variants
    // =========================================================================

    #[test]
    fn test_auth_token_and_nested_user() {
        let value = json!({
            "token": "tok-1",
            "user": {"id": "u-1", "username": "mina", "email": "m@example.com", "role": "ADMIN"}
        });
        let session = parse_auth_session(&value).unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.user.username, "mina");
        assert!(session.user.role.is_admin());
    }

    #[test]
    fn test_auth_access_token_under_data() {
        let value = json!({
            "data": {
                "accessToken": "tok-2",
                "user": {"id": 9, "username": "ravi", "email": "r@example.com", "role": "USER"}
            }
        });
        let session = parse_auth_session(&value).unwrap();
        assert_eq!(session.token, "tok-2");
        assert_eq!(session.user.id.as_str(), "9");
        assert!(!session.user.role.is_admin());
    }

    #[test]
    fn test_auth_flat_jwt_shape() {
        let value = json!({
            "jwt": "tok-3",
            "id": "u-3",
            "username": "asha",
            "email": "a@example.com",
            "role": "admin"
        });
        let session = parse_auth_session(&value).unwrap();
        assert_eq!(session.token, "tok-3");
        assert_eq!(session.user.username, "asha");
        // lowercase role still counts as admin
        assert!(session.user.role.is_admin());
    }

    #[test]
    fn test_auth_missing_token_is_shape_error() {
        let value = json!({"user": {"username": "mina"}});
        assert!(matches!(parse_auth_session(&value), Err(ApiError::Shape(_))));
    }

    #[test]
    fn test_register_without_token_is_created() {
        let value = json!({"message": "registered"});
        assert!(matches!(
            parse_register_outcome(&value),
            RegisterOutcome::Created
        ));
    }

    #[test]
    fn test_register_with_token_is_logged_in() {
        let value = json!({"token": "t", "user": {"username": "mina"}});
        assert!(matches!(
            parse_register_outcome(&value),
            RegisterOutcome::LoggedIn(_)
        ));
    }

    // =========================================================================
    // Error bodies
    // =========================================================================

    #[test]
    fn test_error_message_fallback_order() {
        assert_eq!(
            parse_error_message(r#"{"message": "out of stock"}"#).as_deref(),
            Some("out of stock")
        );
        assert_eq!(
            parse_error_message(r#"{"error": "bad request"}"#).as_deref(),
            Some("bad request")
        );
        assert_eq!(
            parse_error_message(r#"{"detail": "nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(parse_error_message("<html>502</html>"), None);
        assert_eq!(parse_error_message(r#"{"code": 1}"#), None);
    }
}
