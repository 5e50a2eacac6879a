//! Database operations for product ideas.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    idea::{ExpectationScore, Idea, IdeaDraft, IdeaId, IdeaStatus},
};

/// An idea with its store name joined in for display.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaListRow {
    pub idea: Idea,
    pub store_name: String,
}

/// Create a product idea and return it with its generated ID.
pub fn create_idea(draft: IdeaDraft, connection: &Connection) -> Result<Idea, Error> {
    connection.execute(
        "INSERT INTO product_idea (store_id, title, description, expectation_score, status)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        (
            draft.store_id,
            &draft.title,
            &draft.description,
            draft.expectation_score.get(),
            draft.status.as_str(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Idea {
        id,
        store_id: draft.store_id,
        title: draft.title,
        description: draft.description,
        expectation_score: draft.expectation_score,
        status: draft.status,
    })
}

/// Retrieve a single idea by ID.
pub fn get_idea(idea_id: IdeaId, connection: &Connection) -> Result<Idea, Error> {
    connection
        .prepare(
            "SELECT id, store_id, title, description, expectation_score, status
             FROM product_idea WHERE id = :id;",
        )?
        .query_one(&[(":id", &idea_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all ideas with their store names, highest expectations first.
pub fn get_ideas_with_store_names(connection: &Connection) -> Result<Vec<IdeaListRow>, Error> {
    connection
        .prepare(
            "SELECT i.id, i.store_id, i.title, i.description, i.expectation_score, i.status, store.name
             FROM product_idea i
             INNER JOIN store ON i.store_id = store.id
             ORDER BY i.expectation_score DESC, i.id DESC;",
        )?
        .query_map([], |row| {
            let idea = map_row(row)?;
            let store_name = row.get(6)?;

            Ok(IdeaListRow { idea, store_name })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Update an idea and bump its updated-at timestamp. Returns an error if the
/// idea doesn't exist.
pub fn update_idea(idea_id: IdeaId, draft: IdeaDraft, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE product_idea
         SET store_id = ?1, title = ?2, description = ?3, expectation_score = ?4, status = ?5,
             updated_at = datetime('now')
         WHERE id = ?6",
        (
            draft.store_id,
            &draft.title,
            &draft.description,
            draft.expectation_score.get(),
            draft.status.as_str(),
            idea_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingIdea);
    }

    Ok(())
}

/// Delete an idea by ID. Returns an error if the idea doesn't exist.
pub fn delete_idea(idea_id: IdeaId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM product_idea WHERE id = ?1", [idea_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingIdea);
    }

    Ok(())
}

/// Initialize the product idea table.
pub fn create_product_idea_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_idea (
            id INTEGER PRIMARY KEY,
            store_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            expectation_score INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'idea',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(store_id) REFERENCES store(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Idea, rusqlite::Error> {
    let id = row.get(0)?;
    let store_id = row.get(1)?;
    let title = row.get(2)?;
    let description = row.get(3)?;
    let raw_score: i64 = row.get(4)?;
    let expectation_score = ExpectationScore::new(raw_score).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Integer,
            format!("{error}").into(),
        )
    })?;
    let raw_status: String = row.get(5)?;
    let status = IdeaStatus::from_sql(&raw_status, 5)?;

    Ok(Idea {
        id,
        store_id,
        title,
        description,
        expectation_score,
        status,
    })
}


#[cfg(test)]
mod idea_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        idea::{
            ExpectationScore, IdeaStatus, create_idea, get_idea, get_ideas_with_store_names,
            update_idea,
        },
    };

    use super::{delete_idea, test_helpers::{idea_draft, insert_test_store}};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_idea_succeeds() {
        let connection = get_test_connection();
        let store = insert_test_store(&connection);

        let idea = create_idea(idea_draft(store.id, "Clay earrings", 8), &connection)
            .expect("Could not create idea");

        assert!(idea.id > 0);
        assert_eq!(idea.title, "Clay earrings");
        assert_eq!(idea.expectation_score, ExpectationScore::new(8).unwrap());
        assert_eq!(idea.status, IdeaStatus::Idea);
    }

    #[test]
    fn create_idea_fails_on_missing_store() {
        let connection = get_test_connection();

        let result = create_idea(idea_draft(42, "Clay earrings", 8), &connection);

        assert_eq!(result, Err(Error::InvalidForeignKey));
    }

    #[test]
    fn list_orders_by_score_descending() {
        let connection = get_test_connection();
        let store = insert_test_store(&connection);
        create_idea(idea_draft(store.id, "Long shot", 2), &connection).unwrap();
        create_idea(idea_draft(store.id, "Sure thing", 9), &connection).unwrap();
        create_idea(idea_draft(store.id, "Maybe", 5), &connection).unwrap();

        let rows = get_ideas_with_store_names(&connection).unwrap();

        let titles: Vec<_> = rows.iter().map(|row| row.idea.title.as_str()).collect();
        assert_eq!(titles, vec!["Sure thing", "Maybe", "Long shot"]);
        assert!(rows.iter().all(|row| row.store_name == "Cozy Prints"));
    }

    #[test]
    fn update_idea_changes_fields() {
        let connection = get_test_connection();
        let store = insert_test_store(&connection);
        let idea = create_idea(idea_draft(store.id, "Clay earrings", 8), &connection).unwrap();

        let mut draft = idea_draft(store.id, "Polymer clay earrings", 9);
        draft.status = IdeaStatus::InProgress;
        draft.description = Some("Test with three colorways".to_string());
        update_idea(idea.id, draft, &connection).unwrap();

        let updated = get_idea(idea.id, &connection).unwrap();
        assert_eq!(updated.title, "Polymer clay earrings");
        assert_eq!(updated.expectation_score, ExpectationScore::new(9).unwrap());
        assert_eq!(updated.status, IdeaStatus::InProgress);
        assert_eq!(
            updated.description.as_deref(),
            Some("Test with three colorways")
        );
    }

    #[test]
    fn update_missing_idea_fails() {
        let connection = get_test_connection();
        let store = insert_test_store(&connection);

        let result = update_idea(999, idea_draft(store.id, "Nope", 5), &connection);

        assert_eq!(result, Err(Error::UpdateMissingIdea));
    }

    #[test]
    fn delete_idea_succeeds() {
        let connection = get_test_connection();
        let store = insert_test_store(&connection);
        let idea = create_idea(idea_draft(store.id, "Clay earrings", 8), &connection).unwrap();

        delete_idea(idea.id, &connection).unwrap();

        assert_eq!(get_idea(idea.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn deleting_a_store_cascades_to_its_ideas() {
        let connection = get_test_connection();
        let store = insert_test_store(&connection);
        let idea = create_idea(idea_draft(store.id, "Clay earrings", 8), &connection).unwrap();

        crate::store::delete_store(store.id, &connection).unwrap();

        assert_eq!(get_idea(idea.id, &connection), Err(Error::NotFound));
    }
}
