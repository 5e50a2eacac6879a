//! Database operations for business models.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    business_model::{BusinessModel, ModelId, ModelKind, ModelName},
    transaction::TransactionKind,
};

/// Create a business model and return it with its generated ID.
pub fn create_business_model(
    name: ModelName,
    description: Option<&str>,
    kind: ModelKind,
    connection: &Connection,
) -> Result<BusinessModel, Error> {
    connection.execute(
        "INSERT INTO business_model (name, description, kind) VALUES (?1, ?2, ?3);",
        (name.as_ref(), description, kind.as_str()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(BusinessModel {
        id,
        name,
        description: description.map(str::to_string),
        kind,
    })
}

/// Retrieve a single business model by ID.
pub fn get_business_model(model_id: ModelId, connection: &Connection) -> Result<BusinessModel, Error> {
    connection
        .prepare("SELECT id, name, description, kind FROM business_model WHERE id = :id;")?
        .query_one(&[(":id", &model_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all business models ordered alphabetically by name.
pub fn get_all_business_models(connection: &Connection) -> Result<Vec<BusinessModel>, Error> {
    connection
        .prepare("SELECT id, name, description, kind FROM business_model ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_model| maybe_model.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the business models that fit a transaction of `kind`, ordered by name.
pub fn get_business_models_for(
    kind: TransactionKind,
    connection: &Connection,
) -> Result<Vec<BusinessModel>, Error> {
    connection
        .prepare(
            "SELECT id, name, description, kind FROM business_model
            WHERE kind IN ('both', :kind) ORDER BY name ASC;",
        )?
        .query_map(&[(":kind", &kind.as_str())], map_row)?
        .map(|maybe_model| maybe_model.map_err(|error| error.into()))
        .collect()
}

/// Update a business model. Returns an error if it doesn't exist.
pub fn update_business_model(
    model_id: ModelId,
    new_name: ModelName,
    new_description: Option<&str>,
    new_kind: ModelKind,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE business_model SET name = ?1, description = ?2, kind = ?3 WHERE id = ?4",
        (new_name.as_ref(), new_description, new_kind.as_str(), model_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingModel);
    }

    Ok(())
}

/// Delete a business model by ID. Returns an error if it doesn't exist.
pub fn delete_business_model(model_id: ModelId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM business_model WHERE id = ?1", [model_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingModel);
    }

    Ok(())
}

/// Initialize the business model table.
pub fn create_business_model_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS business_model (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            kind TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<BusinessModel, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = ModelName::new_unchecked(&raw_name);
    let description = row.get(2)?;
    let raw_kind: String = row.get(3)?;
    let kind = ModelKind::from_sql(&raw_kind, 3)?;

    Ok(BusinessModel {
        id,
        name,
        description,
        kind,
    })
}
