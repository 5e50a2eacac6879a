//! Application router configuration with gated and open route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{gate_guard, gate_guard_hx, get_lock, get_unlock_page, post_unlock},
    business_model::{
        create_model_endpoint, delete_model_endpoint, get_edit_model_page, get_models_page,
        get_new_model_page, update_model_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    idea::{
        create_idea_endpoint, delete_idea_endpoint, get_edit_idea_page, get_ideas_page,
        get_new_idea_page, update_idea_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    recurring::{
        create_subscription_endpoint, delete_subscription_endpoint, get_edit_subscription_page,
        get_new_subscription_page, get_subscriptions_page, toggle_subscription_endpoint,
        update_subscription_endpoint,
    },
    store::{
        create_store_endpoint, delete_store_endpoint, get_edit_store_page, get_new_store_page,
        get_stores_page, update_store_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_create_transaction_page,
        get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let open_routes = Router::new()
        .route(endpoints::UNLOCK_VIEW, get(get_unlock_page))
        .route(endpoints::UNLOCK_API, post(post_unlock))
        .route(endpoints::LOCK, get(get_lock))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let gated_pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(endpoints::STORES_VIEW, get(get_stores_page))
        .route(endpoints::NEW_STORE_VIEW, get(get_new_store_page))
        .route(endpoints::EDIT_STORE_VIEW, get(get_edit_store_page))
        .route(endpoints::MODELS_VIEW, get(get_models_page))
        .route(endpoints::NEW_MODEL_VIEW, get(get_new_model_page))
        .route(endpoints::EDIT_MODEL_VIEW, get(get_edit_model_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::SUBSCRIPTIONS_VIEW, get(get_subscriptions_page))
        .route(
            endpoints::NEW_SUBSCRIPTION_VIEW,
            get(get_new_subscription_page),
        )
        .route(
            endpoints::EDIT_SUBSCRIPTION_VIEW,
            get(get_edit_subscription_page),
        )
        .route(endpoints::IDEAS_VIEW, get(get_ideas_page))
        .route(endpoints::NEW_IDEA_VIEW, get(get_new_idea_page))
        .route(endpoints::EDIT_IDEA_VIEW, get(get_edit_idea_page))
        .layer(middleware::from_fn_with_state(state.clone(), gate_guard));

    // These POST/PUT/DELETE routes need the HX-Redirect header for gate
    // redirects to work properly for htmx requests.
    let gated_api = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::POST_STORE, post(create_store_endpoint))
        .route(endpoints::PUT_STORE, put(update_store_endpoint))
        .route(endpoints::DELETE_STORE, delete(delete_store_endpoint))
        .route(endpoints::POST_MODEL, post(create_model_endpoint))
        .route(endpoints::PUT_MODEL, put(update_model_endpoint))
        .route(endpoints::DELETE_MODEL, delete(delete_model_endpoint))
        .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
        .route(endpoints::PUT_CATEGORY, put(update_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::POST_SUBSCRIPTION,
            post(create_subscription_endpoint),
        )
        .route(
            endpoints::PUT_SUBSCRIPTION,
            put(update_subscription_endpoint),
        )
        .route(
            endpoints::DELETE_SUBSCRIPTION,
            delete(delete_subscription_endpoint),
        )
        .route(
            endpoints::TOGGLE_SUBSCRIPTION,
            post(toggle_subscription_endpoint),
        )
        .route(endpoints::POST_IDEA, post(create_idea_endpoint))
        .route(endpoints::PUT_IDEA, put(update_idea_endpoint))
        .route(endpoints::DELETE_IDEA, delete(delete_idea_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), gate_guard_hx));

    gated_pages
        .merge(gated_api)
        .merge(open_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
