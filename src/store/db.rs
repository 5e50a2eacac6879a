//! Database operations for stores.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    currency::{Currency, parse_sql_currency},
    store::{Store, StoreId, StoreName},
};

/// Create a store and return it with its generated ID.
pub fn create_store(
    name: StoreName,
    platform: &str,
    currency: Currency,
    connection: &Connection,
) -> Result<Store, Error> {
    connection.execute(
        "INSERT INTO store (name, platform, currency) VALUES (?1, ?2, ?3);",
        (name.as_ref(), platform, currency.code()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Store {
        id,
        name,
        platform: platform.to_string(),
        currency,
    })
}

/// Retrieve a single store by ID.
pub fn get_store(store_id: StoreId, connection: &Connection) -> Result<Store, Error> {
    connection
        .prepare("SELECT id, name, platform, currency FROM store WHERE id = :id;")?
        .query_one(&[(":id", &store_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all stores ordered alphabetically by name.
pub fn get_all_stores(connection: &Connection) -> Result<Vec<Store>, Error> {
    connection
        .prepare("SELECT id, name, platform, currency FROM store ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_store| maybe_store.map_err(|error| error.into()))
        .collect()
}

/// Update a store. Returns an error if the store doesn't exist.
pub fn update_store(
    store_id: StoreId,
    new_name: StoreName,
    new_platform: &str,
    new_currency: Currency,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE store SET name = ?1, platform = ?2, currency = ?3 WHERE id = ?4",
        (new_name.as_ref(), new_platform, new_currency.code(), store_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingStore);
    }

    Ok(())
}

/// Delete a store by ID. Returns an error if the store doesn't exist.
pub fn delete_store(store_id: StoreId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM store WHERE id = ?1", [store_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingStore);
    }

    Ok(())
}

/// Initialize the store table.
pub fn create_store_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS store (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            platform TEXT NOT NULL,
            currency TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Store, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = StoreName::new_unchecked(&raw_name);
    let platform = row.get(2)?;
    let raw_currency: String = row.get(3)?;
    let currency = parse_sql_currency(&raw_currency, 3)?;

    Ok(Store {
        id,
        name,
        platform,
        currency,
    })
}
