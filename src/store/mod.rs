//! The seller's storefronts (e.g. an Etsy shop).

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_store_endpoint, get_new_store_page};
pub use db::{
    create_store, create_store_table, delete_store, get_all_stores, get_store, update_store,
};
pub use delete::delete_store_endpoint;
pub use domain::{Store, StoreFormData, StoreId, StoreName};
pub use edit::{get_edit_store_page, update_store_endpoint};
pub use list::get_stores_page;
