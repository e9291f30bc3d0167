pub mod test_helpers {
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;
    use uuid::Uuid;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when you need to test features that don't work with in-memory databases
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a test user with hashed password, returning the generated id
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        insert_test_user_with_id(pool, &id, email, password).await?;
        Ok(id)
    }

    /// Insert a test user under a caller-chosen id
    pub async fn insert_test_user_with_id(
        pool: &SqlitePool,
        id: &str,
        email: &str,
        password: &str,
    ) -> Result<(), sqlx::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
            })?
            .to_string();

        sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(email)
            .bind(password_hash)
            .bind(chrono::Utc::now().timestamp())
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Insert a device token for a user, returning the generated id
    pub async fn insert_test_device_token(
        pool: &SqlitePool,
        user_id: &str,
        token: &str,
        active: bool,
    ) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO device_tokens (id, user_id, token, active, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(token)
        .bind(active)
        .bind(chrono::Utc::now().timestamp())
        .execute(pool)
        .await?;

        Ok(id)
    }

    /// Count rows in a table, for asserting that a failed request wrote nothing
    pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
