//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/stores/{store_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page showing the financial overview.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying and filtering transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for recording a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for listing stores.
pub const STORES_VIEW: &str = "/stores";
/// The page for creating a new store.
pub const NEW_STORE_VIEW: &str = "/stores/new";
/// The page for editing an existing store.
pub const EDIT_STORE_VIEW: &str = "/stores/{store_id}/edit";
/// The page for listing business models.
pub const MODELS_VIEW: &str = "/models";
/// The page for creating a new business model.
pub const NEW_MODEL_VIEW: &str = "/models/new";
/// The page for editing an existing business model.
pub const EDIT_MODEL_VIEW: &str = "/models/{model_id}/edit";
/// The page for listing categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page for listing recurring expenses.
pub const SUBSCRIPTIONS_VIEW: &str = "/subscriptions";
/// The page for creating a new recurring expense.
pub const NEW_SUBSCRIPTION_VIEW: &str = "/subscriptions/new";
/// The page for editing an existing recurring expense.
pub const EDIT_SUBSCRIPTION_VIEW: &str = "/subscriptions/{subscription_id}/edit";
/// The page for listing product ideas.
pub const IDEAS_VIEW: &str = "/ideas";
/// The page for creating a new product idea.
pub const NEW_IDEA_VIEW: &str = "/ideas/new";
/// The page for editing an existing product idea.
pub const EDIT_IDEA_VIEW: &str = "/ideas/{idea_id}/edit";
/// The page that asks for the access code.
pub const UNLOCK_VIEW: &str = "/unlock";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for submitting the access code.
pub const UNLOCK_API: &str = "/api/unlock";
/// The route for the client to end the unlocked session.
pub const LOCK: &str = "/api/lock";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create a store.
pub const POST_STORE: &str = "/api/stores";
/// The route to update a store.
pub const PUT_STORE: &str = "/api/stores/{store_id}";
/// The route to delete a store.
pub const DELETE_STORE: &str = "/api/stores/{store_id}";
/// The route to create a business model.
pub const POST_MODEL: &str = "/api/models";
/// The route to update a business model.
pub const PUT_MODEL: &str = "/api/models/{model_id}";
/// The route to delete a business model.
pub const DELETE_MODEL: &str = "/api/models/{model_id}";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to update a category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create a recurring expense.
pub const POST_SUBSCRIPTION: &str = "/api/subscriptions";
/// The route to update a recurring expense.
pub const PUT_SUBSCRIPTION: &str = "/api/subscriptions/{subscription_id}";
/// The route to delete a recurring expense.
pub const DELETE_SUBSCRIPTION: &str = "/api/subscriptions/{subscription_id}";
/// The route to flip a recurring expense between active and paused.
pub const TOGGLE_SUBSCRIPTION: &str = "/api/subscriptions/{subscription_id}/toggle";
/// The route to create a product idea.
pub const POST_IDEA: &str = "/api/ideas";
/// The route to update a product idea.
pub const PUT_IDEA: &str = "/api/ideas/{idea_id}";
/// The route to delete a product idea.
pub const DELETE_IDEA: &str = "/api/ideas/{idea_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/stores/{store_id}/edit', '{store_id}'
/// is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
