//! Product ideas ranked by expectation score.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_idea_endpoint, get_new_idea_page};
pub use db::{
    IdeaListRow, create_idea, create_product_idea_table, delete_idea, get_idea,
    get_ideas_with_store_names, update_idea,
};
pub use delete::delete_idea_endpoint;
pub use domain::{ExpectationScore, Idea, IdeaDraft, IdeaId, IdeaStatus};
pub use edit::{get_edit_idea_page, update_idea_endpoint};
pub use list::get_ideas_page;
