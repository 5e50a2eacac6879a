//! Business models the seller operates under (e.g. POD, digital goods).

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_model_endpoint, get_new_model_page};
pub use db::{
    create_business_model, create_business_model_table, delete_business_model,
    get_all_business_models, get_business_model, get_business_models_for, update_business_model,
};
pub use delete::delete_model_endpoint;
pub use domain::{BusinessModel, ModelFormData, ModelId, ModelKind, ModelName};
pub use edit::{get_edit_model_page, update_model_endpoint};
pub use list::get_models_page;
