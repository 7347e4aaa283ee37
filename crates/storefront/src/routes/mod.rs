//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /about                   - About page (markdown content)
//! GET  /history                 - History page (markdown content)
//! GET  /docs                    - API catalog, rendered from GET /api/docs
//! GET  /health                  - Health check
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action (PUT /api/auth)
//! GET  /register                - Register page
//! POST /register                - Register action (POST /api/auth)
//! GET  /logout                  - Logout (DELETE /api/auth, clears session)
//!
//! # Ordering
//! GET  /menu                    - Order view (menu + store picker + cart)
//! POST /menu/store              - Select the store
//! POST /menu/add                - Add a pizza to the cart
//! POST /menu/remove             - Remove a pizza from the cart
//! POST /menu/checkout           - Move to the checkout confirmation
//! GET  /payment                 - Checkout confirmation (login detour if anonymous)
//! POST /payment                 - Pay now (POST /api/order)
//! POST /payment/cancel          - Cancel back to the menu, no network call
//! GET  /delivery                - Delivered view (JWT + server total)
//! POST /delivery/verify         - Verify the JWT (read-only)
//!
//! # Dashboards
//! GET  /diner-dashboard                                 - Profile + order history
//! GET  /diner-dashboard/edit                            - Edit profile dialog
//! POST /diner-dashboard/edit                            - Apply profile edit
//! GET  /franchise-dashboard                             - Owned franchise overview
//! GET  /franchise-dashboard/store/create                - Create store form
//! POST /franchise-dashboard/store/create                - Create store
//! GET  /franchise-dashboard/store/{id}/close            - Close store confirmation
//! POST /franchise-dashboard/store/{id}/close            - Close store
//! GET  /admin-dashboard                                 - Franchise + user administration
//! GET  /admin-dashboard/franchise/create                - Create franchise form
//! POST /admin-dashboard/franchise/create                - Create franchise
//! GET  /admin-dashboard/franchise/{id}/close            - Close franchise confirmation
//! POST /admin-dashboard/franchise/{id}/close            - Close franchise
//! POST /admin-dashboard/user/{id}/delete                - Delete user
//! ```

pub mod admin;
pub mod auth;
pub mod diner;
pub mod franchise;
pub mod home;
pub mod order;
pub mod pages;
pub mod payment;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

/// Create the ordering routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(order::menu))
        .route("/menu/store", post(order::select_store))
        .route("/menu/add", post(order::add_item))
        .route("/menu/remove", post(order::remove_item))
        .route("/menu/checkout", post(order::checkout))
        .route("/payment", get(payment::confirm).post(payment::pay))
        .route("/payment/cancel", post(payment::cancel))
        .route("/delivery", get(payment::delivery))
        .route("/delivery/verify", post(payment::verify))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/diner-dashboard", get(diner::dashboard))
        .route(
            "/diner-dashboard/edit",
            get(diner::edit_page).post(diner::edit),
        )
        .route("/franchise-dashboard", get(franchise::dashboard))
        .route(
            "/franchise-dashboard/store/create",
            get(franchise::create_store_page).post(franchise::create_store),
        )
        .route(
            "/franchise-dashboard/store/{store_id}/close",
            get(franchise::close_store_page).post(franchise::close_store),
        )
        .route("/admin-dashboard", get(admin::dashboard))
        .route(
            "/admin-dashboard/franchise/create",
            get(admin::create_franchise_page).post(admin::create_franchise),
        )
        .route(
            "/admin-dashboard/franchise/{franchise_id}/close",
            get(admin::close_franchise_page).post(admin::close_franchise),
        )
        .route(
            "/admin-dashboard/user/{user_id}/delete",
            post(admin::delete_user),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home and informational pages
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/history", get(pages::history))
        .route("/docs", get(home::docs))
        // Auth routes
        .merge(auth_routes())
        // Ordering workflow
        .merge(order_routes())
        // Role-gated dashboards
        .merge(dashboard_routes())
        // Unmatched routes get the "Oops" view
        .fallback(home::not_found)
}
