//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryKind, CategoryName},
    transaction::TransactionKind,
};

/// Create a category and return it with its generated ID.
pub fn create_category(
    name: CategoryName,
    kind: CategoryKind,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, kind) VALUES (?1, ?2);",
        (name.as_ref(), kind.as_str()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, kind })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category WHERE id = :id;")?
        .query_one(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the categories that can label a transaction of `kind`, ordered by name.
pub fn get_categories_for(
    kind: TransactionKind,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category WHERE kind IN ('both', :kind) ORDER BY name ASC;")?
        .query_map(&[(":kind", &kind.as_str())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category's name and kind. Returns an error if the category doesn't exist.
pub fn update_category(
    category_id: CategoryId,
    new_name: CategoryName,
    new_kind: CategoryKind,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, kind = ?2 WHERE id = ?3",
        (new_name.as_ref(), new_kind.as_str(), category_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID. Returns an error if the category doesn't exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let raw_kind: String = row.get(2)?;
    let kind = CategoryKind::from_sql(&raw_kind, 2)?;

    Ok(Category { id, name, kind })
}


#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            Category, CategoryKind, CategoryName, create_category, get_all_categories,
            get_categories_for, get_category, update_category,
        },
        transaction::TransactionKind,
    };

    use super::{create_category_table, delete_category};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_category_table(&connection).expect("Could not create category table");
        connection
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Software").unwrap();

        let category = create_category(name.clone(), CategoryKind::Expense, &connection);

        let got_category = category.expect("Could not create category");
        assert!(got_category.id > 0);
        assert_eq!(got_category.name, name);
        assert_eq!(got_category.kind, CategoryKind::Expense);
    }

    #[test]
    fn get_category_succeeds() {
        let connection = get_test_db_connection();
        let inserted = create_category(
            CategoryName::new_unchecked("Sales"),
            CategoryKind::Income,
            &connection,
        )
        .expect("Could not create test category");

        let selected = get_category(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted = create_category(
            CategoryName::new_unchecked("Sales"),
            CategoryKind::Income,
            &connection,
        )
        .expect("Could not create test category");

        let selected = get_category(inserted.id + 123, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories_orders_by_name() {
        let connection = get_test_db_connection();
        let fees = create_category(
            CategoryName::new_unchecked("Fees"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();
        let ads = create_category(
            CategoryName::new_unchecked("Ads"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();

        let selected = get_all_categories(&connection).expect("Could not get all categories");

        assert_eq!(selected, vec![ads, fees]);
    }

    #[test]
    fn get_categories_for_kind_includes_both() {
        let connection = get_test_db_connection();
        let sales = create_category(
            CategoryName::new_unchecked("Sales"),
            CategoryKind::Income,
            &connection,
        )
        .unwrap();
        create_category(
            CategoryName::new_unchecked("Software"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();
        let misc = create_category(
            CategoryName::new_unchecked("Misc"),
            CategoryKind::Both,
            &connection,
        )
        .unwrap();

        let selected =
            get_categories_for(TransactionKind::Income, &connection).expect("Could not query");

        assert_eq!(selected, vec![misc, sales]);
    }

    #[test]
    fn update_category_succeeds() {
        let connection = get_test_db_connection();
        let category = create_category(
            CategoryName::new_unchecked("Original"),
            CategoryKind::Expense,
            &connection,
        )
        .expect("Could not create test category");

        let new_name = CategoryName::new_unchecked("Updated");
        let result = update_category(category.id, new_name.clone(), CategoryKind::Both, &connection);

        assert!(result.is_ok());

        let updated = get_category(category.id, &connection).expect("Could not get category");
        assert_eq!(
            updated,
            Category {
                id: category.id,
                name: new_name,
                kind: CategoryKind::Both
            }
        );
    }

    #[test]
    fn update_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let result = update_category(
            999999,
            CategoryName::new_unchecked("Updated"),
            CategoryKind::Both,
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_category_succeeds() {
        let connection = get_test_db_connection();
        let category = create_category(
            CategoryName::new_unchecked("ToDelete"),
            CategoryKind::Expense,
            &connection,
        )
        .expect("Could not create test category");

        let result = delete_category(category.id, &connection);

        assert!(result.is_ok());
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let result = delete_category(999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
    }
}
