//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    category::Category,
    database_id::TransactionId,
    stores::{CategoryFilter, CategorySummary, Totals, TransactionFilter, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionType},
};

const TRANSACTION_COLUMNS: &str = "id, type, amount, category, description, tags, date, created_at";

/// Stores transactions in a SQLite database.
///
/// Tags are stored as a JSON array of strings in a single column.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// Call [TransactionStore::initialize] before using the store on a new database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn initialize(&self) -> Result<(), Error> {
        let connection = self.connection()?;

        crate::db::initialize(&connection)
    }

    fn list_all(&self) -> Result<Vec<Transaction>, Error> {
        self.query(&TransactionFilter::default())
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn query(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\""
        )];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        match filter.category {
            Some(CategoryFilter::Income) => {
                where_clause_parts.push("type = 'income'".to_owned());
            }
            Some(CategoryFilter::Category(category)) => {
                query_parameters.push(Value::Text(category.as_str().to_owned()));
                where_clause_parts.push(format!("category = ?{}", query_parameters.len()));
            }
            None => {}
        }

        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty());

        if let Some(search) = search {
            query_parameters.push(Value::Text(format!(
                "%{}%",
                escape_like_pattern(&search.to_lowercase())
            )));
            let param = query_parameters.len();
            where_clause_parts.push(format!(
                "(lower(description) LIKE ?{param} ESCAPE '\\' \
                 OR EXISTS (SELECT 1 FROM json_each(\"transaction\".tags) \
                 WHERE lower(json_each.value) LIKE ?{param} ESCAPE '\\'))"
            ));
        }

        if let Some(date_from) = filter.date_from {
            query_parameters.push(Value::Text(date_from.to_string()));
            where_clause_parts.push(format!("date >= ?{}", query_parameters.len()));
        }

        if let Some(date_to) = filter.date_to {
            query_parameters.push(Value::Text(date_to.to_string()));
            where_clause_parts.push(format!("date <= ?{}", query_parameters.len()));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        query_string_parts.push("ORDER BY date DESC, created_at DESC, id DESC".to_owned());

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection()?
            .prepare(&query_string)?
            .query_map(params, map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::ConstraintViolation] if a CHECK or NOT NULL constraint failed,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert(&self, transaction: &NewTransaction) -> Result<Transaction, Error> {
        let tags = encode_tags(&transaction.tags)?;

        let transaction = self
            .connection()?
            .prepare(&format!(
                "INSERT INTO \"transaction\" (type, amount, category, description, tags, date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    transaction.type_.as_str(),
                    transaction.amount,
                    transaction.category.as_str(),
                    &transaction.description,
                    tags,
                    transaction.date,
                    OffsetDateTime::now_utc(),
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    /// Overwrite a transaction, keeping its ID and creation time.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - [Error::ConstraintViolation] if a CHECK or NOT NULL constraint failed,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &self,
        id: TransactionId,
        transaction: &NewTransaction,
    ) -> Result<Transaction, Error> {
        let tags = encode_tags(&transaction.tags)?;

        let transaction = self
            .connection()?
            .prepare(&format!(
                "UPDATE \"transaction\"
                 SET type = ?1, amount = ?2, category = ?3, description = ?4, tags = ?5, date = ?6
                 WHERE id = ?7
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    transaction.type_.as_str(),
                    transaction.amount,
                    transaction.category.as_str(),
                    &transaction.description,
                    tags,
                    transaction.date,
                    id,
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn delete(&self, id: TransactionId) -> Result<bool, Error> {
        let rows_affected = self
            .connection()?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

        Ok(rows_affected > 0)
    }

    fn compute_totals(&self) -> Result<Totals, Error> {
        let (income, expenses) = self.connection()?.query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0.0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0.0)
             FROM \"transaction\"",
            [],
            |row| Ok((row.get::<_, f64>(0)?, row.get::<_, f64>(1)?)),
        )?;

        Ok(Totals::from_sums(income, expenses))
    }

    fn compute_category_summary(&self) -> Result<CategorySummary, Error> {
        let connection = self.connection()?;
        let mut statement = connection.prepare(
            "SELECT category, SUM(amount) FROM \"transaction\"
             WHERE type = 'expense'
             GROUP BY category",
        )?;

        let sums = statement
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let sums = sums.into_iter().filter_map(|(name, sum)| match name.parse() {
            Ok(category) => Some((category, sum)),
            Err(error) => {
                tracing::warn!("Excluding expenses from the category summary: {error}");
                None
            }
        });

        Ok(CategorySummary::from_sums(sums))
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            amount REAL NOT NULL CHECK (amount > 0),
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            tags TEXT,
            date TEXT NOT NULL CHECK (date GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]'),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date_created_at
            ON \"transaction\"(date, created_at);",
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
///
/// Expects the columns in the order of `TRANSACTION_COLUMNS`.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_type: String = row.get(1)?;
    let type_ = raw_type
        .parse::<TransactionType>()
        .map_err(|error| conversion_error(1, error))?;
    let amount = row.get(2)?;
    let raw_category: String = row.get(3)?;
    let category = raw_category
        .parse::<Category>()
        .map_err(|error| conversion_error(3, error))?;
    let description = row.get(4)?;
    let raw_tags: Option<String> = row.get(5)?;
    let tags = match raw_tags {
        Some(text) => serde_json::from_str(&text).map_err(|error| conversion_error(5, error))?,
        None => Vec::new(),
    };
    let date = row.get(6)?;
    let created_at = row.get(7)?;

    Ok(Transaction {
        id,
        type_,
        amount,
        category,
        description,
        tags,
        date,
        created_at,
    })
}

fn conversion_error(
    column: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(error))
}

fn encode_tags(tags: &[String]) -> Result<String, Error> {
    serde_json::to_string(tags).map_err(|error| Error::TagEncodingError(error.to_string()))
}

/// Escape the LIKE wildcards in `text` so that it only matches literally.
fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }

    escaped
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{Category, EXPENSE_CATEGORIES},
        stores::{CategoryFilter, TransactionFilter, TransactionStore},
        transaction::{NewTransaction, TransactionType},
    };

    use super::{SQLiteTransactionStore, escape_like_pattern};

    fn get_test_store() -> (SQLiteTransactionStore, Arc<Mutex<Connection>>) {
        let connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let store = SQLiteTransactionStore::new(connection.clone());
        store.initialize().expect("Could not initialize database");

        (store, connection)
    }

    fn expense(amount: f64, category: Category, description: &str) -> NewTransaction {
        NewTransaction {
            type_: TransactionType::Expense,
            amount,
            category,
            description: description.to_owned(),
            tags: vec![],
            date: date!(2024 - 01 - 15),
        }
    }

    fn income(amount: f64, description: &str) -> NewTransaction {
        NewTransaction {
            type_: TransactionType::Income,
            amount,
            category: Category::Income,
            description: description.to_owned(),
            tags: vec![],
            date: date!(2024 - 01 - 15),
        }
    }

    #[test]
    fn initialize_is_idempotent() {
        let (store, _) = get_test_store();
        store.insert(&income(10.0, "pay")).unwrap();

        store.initialize().expect("Second initialize should succeed");

        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn insert_assigns_id_and_preserves_fields() {
        let (store, _) = get_test_store();
        let want = NewTransaction {
            tags: vec!["food".to_owned(), "weekly".to_owned()],
            ..expense(50.0, Category::Groceries, "milk")
        };

        let inserted = store.insert(&want).unwrap();
        let listed = store.list_all().unwrap();

        assert!(inserted.id > 0);
        assert_eq!(inserted.to_new(), want);
        assert_eq!(listed, vec![inserted]);
    }

    #[test]
    fn insert_assigns_distinct_ids() {
        let (store, _) = get_test_store();

        let first = store.insert(&income(1.0, "a")).unwrap();
        let second = store.insert(&income(2.0, "b")).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn null_tags_are_read_as_empty() {
        let (store, connection) = get_test_store();
        connection
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO \"transaction\" (type, amount, category, description, tags, date, created_at)
                 VALUES ('expense', 5.0, 'Groceries', 'bread', NULL, '2024-02-01', '2024-02-01 10:00:00.0+00:00')",
                [],
            )
            .unwrap();

        let transactions = store.list_all().unwrap();

        assert_eq!(transactions.len(), 1);
        assert!(transactions[0].tags.is_empty());
    }

    #[test]
    fn invalid_type_is_a_constraint_violation() {
        let (_, connection) = get_test_store();

        let result: Result<usize, Error> = connection
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO \"transaction\" (type, amount, category, description, date, created_at)
                 VALUES ('transfer', 5.0, 'Groceries', 'bread', '2024-02-01', '2024-02-01')",
                [],
            )
            .map_err(Error::from);

        assert!(
            matches!(result, Err(Error::ConstraintViolation(_))),
            "want constraint violation, got {result:?}"
        );
    }

    #[test]
    fn missing_description_is_a_constraint_violation() {
        let (_, connection) = get_test_store();

        let result: Result<usize, Error> = connection
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO \"transaction\" (type, amount, category, date, created_at)
                 VALUES ('expense', 5.0, 'Groceries', '2024-02-01', '2024-02-01')",
                [],
            )
            .map_err(Error::from);

        assert!(
            matches!(result, Err(Error::ConstraintViolation(_))),
            "want constraint violation, got {result:?}"
        );
    }

    #[test]
    fn non_positive_amount_is_a_constraint_violation() {
        let (store, _) = get_test_store();

        let result = store.insert(&expense(0.0, Category::Groceries, "free"));

        assert!(
            matches!(result, Err(Error::ConstraintViolation(_))),
            "want constraint violation, got {result:?}"
        );
    }

    #[test]
    fn lists_most_recent_date_first() {
        let (store, _) = get_test_store();
        let old = store
            .insert(&NewTransaction {
                date: date!(2023 - 12 - 31),
                ..income(1.0, "old")
            })
            .unwrap();
        let new = store
            .insert(&NewTransaction {
                date: date!(2024 - 03 - 01),
                ..income(1.0, "new")
            })
            .unwrap();

        let ids: Vec<_> = store.list_all().unwrap().iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![new.id, old.id]);
    }

    #[test]
    fn same_date_lists_most_recently_created_first() {
        let (store, _) = get_test_store();
        let first = store.insert(&income(1.0, "first")).unwrap();
        let second = store.insert(&income(2.0, "second")).unwrap();
        let third = store.insert(&income(3.0, "third")).unwrap();

        let ids: Vec<_> = store.list_all().unwrap().iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn update_overwrites_fields_and_keeps_id() {
        let (store, _) = get_test_store();
        let original = store
            .insert(&expense(50.0, Category::Groceries, "milk"))
            .unwrap();
        let changes = NewTransaction {
            tags: vec!["dairy".to_owned()],
            date: date!(2024 - 01 - 16),
            ..expense(45.5, Category::EatOut, "milkshake")
        };

        let updated = store.update(original.id, &changes).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.to_new(), changes);
        assert_eq!(store.list_all().unwrap(), vec![updated]);
    }

    #[test]
    fn update_missing_transaction_is_not_found() {
        let (store, _) = get_test_store();

        let result = store.update(42, &income(1.0, "ghost"));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_transaction() {
        let (store, _) = get_test_store();
        let transaction = store.insert(&income(1.0, "pay")).unwrap();

        let removed = store.delete(transaction.id).unwrap();

        assert!(removed);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_transaction_returns_false() {
        let (store, _) = get_test_store();
        let kept = store.insert(&income(1.0, "pay")).unwrap();

        let removed = store.delete(kept.id + 1).unwrap();

        assert!(!removed);
        assert_eq!(store.list_all().unwrap(), vec![kept]);
    }

    #[test]
    fn totals_are_zero_when_empty() {
        let (store, _) = get_test_store();

        let totals = store.compute_totals().unwrap();

        assert_eq!(totals.total_income, 0.0);
        assert_eq!(totals.total_expenses, 0.0);
        assert_eq!(totals.balance, 0.0);
    }

    #[test]
    fn totals_sum_by_type() {
        let (store, _) = get_test_store();
        store.insert(&income(1000.0, "salary")).unwrap();
        store.insert(&income(250.25, "bonus")).unwrap();
        store
            .insert(&expense(50.0, Category::Groceries, "milk"))
            .unwrap();
        store
            .insert(&expense(800.5, Category::Housing, "rent"))
            .unwrap();

        let totals = store.compute_totals().unwrap();

        assert_eq!(totals.total_income, 1250.25);
        assert_eq!(totals.total_expenses, 850.5);
        assert_eq!(totals.balance, 399.75);
    }

    #[test]
    fn category_summary_sums_expenses_only() {
        let (store, _) = get_test_store();
        store.insert(&income(1000.0, "salary")).unwrap();
        store
            .insert(&expense(50.0, Category::Groceries, "milk"))
            .unwrap();
        store
            .insert(&expense(25.25, Category::Groceries, "eggs"))
            .unwrap();
        store
            .insert(&expense(12.0, Category::EatOut, "lunch"))
            .unwrap();

        let summary = store.compute_category_summary().unwrap();
        let totals = store.compute_totals().unwrap();

        assert_eq!(summary.len(), EXPENSE_CATEGORIES.len());
        assert_eq!(summary.get(Category::Groceries), 75.25);
        assert_eq!(summary.get(Category::EatOut), 12.0);
        assert_eq!(summary.get(Category::Utilities), 0.0);
        assert_eq!(
            summary.iter().map(|(_, amount)| amount).sum::<f64>(),
            totals.total_expenses
        );
    }

    #[test]
    fn query_filters_by_category() {
        let (store, _) = get_test_store();
        let salary = store.insert(&income(1000.0, "salary")).unwrap();
        let milk = store
            .insert(&expense(5.0, Category::Groceries, "milk"))
            .unwrap();
        store.insert(&expense(9.0, Category::EatOut, "pie")).unwrap();

        let incomes = store
            .query(&TransactionFilter {
                category: Some(CategoryFilter::Income),
                ..Default::default()
            })
            .unwrap();
        let groceries = store
            .query(&TransactionFilter {
                category: Some(CategoryFilter::Category(Category::Groceries)),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(incomes, vec![salary]);
        assert_eq!(groceries, vec![milk]);
    }

    #[test]
    fn query_searches_tags_and_description_ignoring_case() {
        let (store, _) = get_test_store();
        let tagged = store
            .insert(&NewTransaction {
                tags: vec!["Holiday".to_owned()],
                ..expense(300.0, Category::TravelAndVacation, "flights")
            })
            .unwrap();
        let described = store
            .insert(&expense(20.0, Category::Shopping, "holiday snacks"))
            .unwrap();
        store
            .insert(&expense(20.0, Category::Shopping, "socks"))
            .unwrap();

        let found = store
            .query(&TransactionFilter {
                search: Some("HOLI".to_owned()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(found, vec![described, tagged]);
    }

    #[test]
    fn query_search_treats_wildcards_literally() {
        let (store, _) = get_test_store();
        let discount = store
            .insert(&expense(10.0, Category::Shopping, "50% off"))
            .unwrap();
        store
            .insert(&expense(10.0, Category::Shopping, "full price"))
            .unwrap();

        let found = store
            .query(&TransactionFilter {
                search: Some("%".to_owned()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(found, vec![discount]);
    }

    #[test]
    fn query_filters_by_inclusive_date_range() {
        let (store, _) = get_test_store();
        let mut ids = Vec::new();
        for day in [date!(2024 - 01 - 01), date!(2024 - 01 - 15), date!(2024 - 01 - 31)] {
            let transaction = store
                .insert(&NewTransaction {
                    date: day,
                    ..income(1.0, "pay")
                })
                .unwrap();
            ids.push(transaction.id);
        }

        let found: Vec<_> = store
            .query(&TransactionFilter {
                date_from: Some(date!(2024 - 01 - 15)),
                date_to: Some(date!(2024 - 01 - 31)),
                ..Default::default()
            })
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(found, vec![ids[2], ids[1]]);
    }

    #[test]
    fn empty_filter_matches_list_all() {
        let (store, _) = get_test_store();
        store.insert(&income(1.0, "a")).unwrap();
        store.insert(&expense(2.0, Category::Housing, "b")).unwrap();

        let filtered = store
            .query(&TransactionFilter {
                search: Some("   ".to_owned()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(filtered, store.list_all().unwrap());
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like_pattern("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }
}
