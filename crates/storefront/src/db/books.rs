//! Book repository for catalog queries.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use bookstall_core::BookId;

use super::RepositoryError;
use crate::models::Book;

/// Optional filters for the catalog listing.
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Substring match over title OR author.
    pub search: Option<String>,
}

const BOOK_COLUMNS: &str = "id, title, author, description, price, stock, category, image_url";

/// Sample catalog inserted on first start with an empty books table.
/// (title, author, description, price, stock, category, image)
const SAMPLE_CATALOG: &[(&str, &str, &str, i64, i64, &str, &str)] = &[
    (
        "How to Win Friends and Influence People",
        "Dale Carnegie",
        "The classic guide to communication and getting along with people.",
        89000,
        50,
        "Self-help",
        "/static/covers/how_to_win_friends.jpg",
    ),
    (
        "The Alchemist",
        "Paulo Coelho",
        "The story of a shepherd's journey in search of a treasure.",
        79000,
        30,
        "Fiction",
        "/static/covers/the_alchemist.jpg",
    ),
    (
        "Sapiens",
        "Yuval Noah Harari",
        "A brief history of humankind.",
        199000,
        20,
        "Science",
        "/static/covers/sapiens.jpg",
    ),
    (
        "I Am Gifted, So Are You!",
        "Adam Khoo",
        "Practical methods for studying effectively.",
        95000,
        40,
        "Study skills",
        "/static/covers/i_am_gifted.jpg",
    ),
];

/// Repository for catalog database operations.
pub struct BookRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookRepository<'a> {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a book by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(book)
    }

    /// The first `limit` books of the catalog, for the home page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Book>, RepositoryError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// List books, optionally filtered by category and/or search term.
    ///
    /// The search term matches as a substring of either title or author.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE 1 = 1"
        ));

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category);
        }

        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query
                .push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" OR author LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        let books = query
            .build_query_as::<Book>()
            .fetch_all(self.pool)
            .await?;

        Ok(books)
    }

    /// All distinct categories, for the listing filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT category FROM books ORDER BY category")
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(|(category,)| category).collect())
    }

    /// Insert the sample catalog if the books table is empty.
    ///
    /// Called once on startup so a fresh install has something to browse.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn seed_if_empty(&self) -> Result<bool, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(self.pool)
            .await?;

        if count > 0 {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await?;
        for (title, author, description, price, stock, category, image_url) in SAMPLE_CATALOG {
            sqlx::query(
                r"
                INSERT INTO books (title, author, description, price, stock, category, image_url)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(title)
            .bind(author)
            .bind(description)
            .bind(price)
            .bind(stock)
            .bind(category)
            .bind(image_url)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(true)
    }
}
