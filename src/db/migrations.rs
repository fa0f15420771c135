//! Database migrations module
//!
//! This module provides code-based database migrations for the GlobalNest
//! service. All migrations are embedded directly in Rust code as SQL strings,
//! supporting both SQLite and PostgreSQL databases for single-binary
//! deployment.
//!
//! # Usage
//!
//! ```ignore
//! use globalnest::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```
//!
//! # Architecture
//!
//! Each migration is defined as a `Migration` struct containing:
//! - `version`: Unique version number for ordering
//! - `name`: Human-readable migration name
//! - `up_sqlite`: SQL for SQLite databases
//! - `up_postgres`: SQL for PostgreSQL databases

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and PostgreSQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for PostgreSQL
    pub up_postgres: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    /// Migration version number
    pub version: i64,
    /// Migration name/description
    pub name: String,
    /// When the migration was applied
    pub applied_at: DateTime<Utc>,
}

/// All migrations for the GlobalNest service.
/// These are embedded in the binary for single-binary deployment.
pub const MIGRATIONS: &[Migration] = &[
    // Migration 1: Create users table
    Migration {
        version: 1,
        name: "create_users",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                role VARCHAR(20) NOT NULL DEFAULT 'planning',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                role VARCHAR(20) NOT NULL DEFAULT 'planning',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        "#,
    },
    // Migration 2: Create auth sessions table
    Migration {
        version: 2,
        name: "create_sessions",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id INTEGER NOT NULL,
                expires_at TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                expires_at TIMESTAMPTZ NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
        "#,
    },
    // Migration 3: Create profiles table (one row per user)
    Migration {
        version: 3,
        name: "create_profiles",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL DEFAULT '',
                university VARCHAR(255) NOT NULL DEFAULT '',
                field_of_study VARCHAR(255) NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                image_url TEXT,
                location TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id BIGINT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                name VARCHAR(255) NOT NULL DEFAULT '',
                university VARCHAR(255) NOT NULL DEFAULT '',
                field_of_study VARCHAR(255) NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                image_url TEXT,
                location TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
        "#,
    },
    // Migration 4: Create housing listings table
    Migration {
        version: 4,
        name: "create_housing",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS housing (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                location TEXT,
                available_from DATE NOT NULL,
                available_until DATE,
                contact_email VARCHAR(255),
                contact_phone VARCHAR(50),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_housing_user_id ON housing(user_id);
            CREATE INDEX IF NOT EXISTS idx_housing_created_at ON housing(created_at);
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS housing (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                location TEXT,
                available_from DATE NOT NULL,
                available_until DATE,
                contact_email VARCHAR(255),
                contact_phone VARCHAR(50),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_housing_user_id ON housing(user_id);
            CREATE INDEX IF NOT EXISTS idx_housing_created_at ON housing(created_at);
        "#,
    },
    // Migration 5: Create job listings table
    Migration {
        version: 5,
        name: "create_jobs",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title VARCHAR(255) NOT NULL,
                company VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                salary VARCHAR(255) NOT NULL DEFAULT '',
                job_type VARCHAR(20) NOT NULL DEFAULT 'full-time',
                location TEXT,
                contact_email VARCHAR(255),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_jobs_user_id ON jobs(user_id);
            CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title VARCHAR(255) NOT NULL,
                company VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                salary VARCHAR(255) NOT NULL DEFAULT '',
                job_type VARCHAR(20) NOT NULL DEFAULT 'full-time',
                location TEXT,
                contact_email VARCHAR(255),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_jobs_user_id ON jobs(user_id);
            CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);
        "#,
    },
    // Migration 6: Create mentors table
    Migration {
        version: 6,
        name: "create_mentors",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS mentors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE,
                name VARCHAR(255) NOT NULL,
                title VARCHAR(255) NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                expertise TEXT NOT NULL DEFAULT '[]',
                hourly_rate REAL NOT NULL DEFAULT 0,
                currency VARCHAR(10) NOT NULL DEFAULT 'USD',
                rating REAL NOT NULL DEFAULT 0,
                review_count INTEGER NOT NULL DEFAULT 0,
                badges TEXT NOT NULL DEFAULT '[]',
                languages TEXT NOT NULL DEFAULT '[]',
                availability TEXT NOT NULL DEFAULT '{}',
                image_url TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_mentors_user_id ON mentors(user_id);
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS mentors (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                name VARCHAR(255) NOT NULL,
                title VARCHAR(255) NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                expertise TEXT NOT NULL DEFAULT '[]',
                hourly_rate DOUBLE PRECISION NOT NULL DEFAULT 0,
                currency VARCHAR(10) NOT NULL DEFAULT 'USD',
                rating DOUBLE PRECISION NOT NULL DEFAULT 0,
                review_count BIGINT NOT NULL DEFAULT 0,
                badges TEXT NOT NULL DEFAULT '[]',
                languages TEXT NOT NULL DEFAULT '[]',
                availability TEXT NOT NULL DEFAULT '{}',
                image_url TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_mentors_user_id ON mentors(user_id);
        "#,
    },
    // Migration 7: Create mentor reviews table.
    // One review per (mentor, user) pair is enforced at the database level.
    Migration {
        version: 7,
        name: "create_mentor_reviews",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS mentor_reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mentor_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                rating INTEGER NOT NULL,
                comment TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (mentor_id) REFERENCES mentors(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_mentor_reviews_mentor_user
                ON mentor_reviews(mentor_id, user_id);
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS mentor_reviews (
                id BIGSERIAL PRIMARY KEY,
                mentor_id BIGINT NOT NULL REFERENCES mentors(id) ON DELETE CASCADE,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                rating INTEGER NOT NULL,
                comment TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_mentor_reviews_mentor_user
                ON mentor_reviews(mentor_id, user_id);
        "#,
    },
    // Migration 8: Create bookings table (mentoring sessions)
    Migration {
        version: 8,
        name: "create_bookings",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mentor_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                date DATE NOT NULL,
                time_slot VARCHAR(20) NOT NULL,
                duration_minutes INTEGER NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'upcoming',
                payment_status VARCHAR(20) NOT NULL DEFAULT 'pending',
                amount REAL NOT NULL,
                currency VARCHAR(10) NOT NULL DEFAULT 'USD',
                notes TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (mentor_id) REFERENCES mentors(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id);
            CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date);
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id BIGSERIAL PRIMARY KEY,
                mentor_id BIGINT NOT NULL REFERENCES mentors(id) ON DELETE CASCADE,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date DATE NOT NULL,
                time_slot VARCHAR(20) NOT NULL,
                duration_minutes INTEGER NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'upcoming',
                payment_status VARCHAR(20) NOT NULL DEFAULT 'pending',
                amount DOUBLE PRECISION NOT NULL,
                currency VARCHAR(10) NOT NULL DEFAULT 'USD',
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id);
            CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date);
        "#,
    },
    // Migration 9: Create feedback table
    Migration {
        version: 9,
        name: "create_feedback",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                subject VARCHAR(255) NOT NULL,
                message TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS feedback (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                subject VARCHAR(255) NOT NULL,
                message TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
        "#,
    },
    // Migration 10: Create universities and students tables, seed the directory
    Migration {
        version: 10,
        name: "create_universities",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS universities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL UNIQUE,
                location VARCHAR(255) NOT NULL,
                acceptance_rate REAL NOT NULL,
                annual_fees INTEGER NOT NULL,
                description TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS university_students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                university_id INTEGER NOT NULL,
                name VARCHAR(255) NOT NULL,
                roll_number VARCHAR(50) NOT NULL,
                degree VARCHAR(100) NOT NULL,
                batch_year INTEGER NOT NULL,
                course VARCHAR(255) NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'current',
                profile_picture TEXT,
                FOREIGN KEY (university_id) REFERENCES universities(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_students_university_id
                ON university_students(university_id);
            INSERT OR IGNORE INTO universities (name, location, acceptance_rate, annual_fees, description) VALUES
                ('Stanford University', 'California, USA', 4.3, 55000, 'A world-renowned private research university.'),
                ('Harvard University', 'Massachusetts, USA', 5.2, 57000, 'The oldest institution of higher learning in the United States.'),
                ('Massachusetts Institute of Technology (MIT)', 'Massachusetts, USA', 7.3, 59000, 'A globally renowned technological university.'),
                ('University of Oxford', 'Oxford, UK', 17.5, 27000, 'The oldest university in the English-speaking world.'),
                ('University of Cambridge', 'Cambridge, UK', 21.0, 28000, 'A prestigious university known for its academic excellence.'),
                ('California Institute of Technology (Caltech)', 'California, USA', 6.4, 56000, 'A world-class science and engineering institution.'),
                ('University of California, Berkeley', 'California, USA', 16.1, 44000, 'A leading public research university.');
        "#,
        up_postgres: r#"
            CREATE TABLE IF NOT EXISTS universities (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                location VARCHAR(255) NOT NULL,
                acceptance_rate DOUBLE PRECISION NOT NULL,
                annual_fees BIGINT NOT NULL,
                description TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS university_students (
                id BIGSERIAL PRIMARY KEY,
                university_id BIGINT NOT NULL REFERENCES universities(id) ON DELETE CASCADE,
                name VARCHAR(255) NOT NULL,
                roll_number VARCHAR(50) NOT NULL,
                degree VARCHAR(100) NOT NULL,
                batch_year INTEGER NOT NULL,
                course VARCHAR(255) NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'current',
                profile_picture TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_students_university_id
                ON university_students(university_id);
            INSERT INTO universities (name, location, acceptance_rate, annual_fees, description) VALUES
                ('Stanford University', 'California, USA', 4.3, 55000, 'A world-renowned private research university.'),
                ('Harvard University', 'Massachusetts, USA', 5.2, 57000, 'The oldest institution of higher learning in the United States.'),
                ('Massachusetts Institute of Technology (MIT)', 'Massachusetts, USA', 7.3, 59000, 'A globally renowned technological university.'),
                ('University of Oxford', 'Oxford, UK', 17.5, 27000, 'The oldest university in the English-speaking world.'),
                ('University of Cambridge', 'Cambridge, UK', 21.0, 28000, 'A prestigious university known for its academic excellence.'),
                ('California Institute of Technology (Caltech)', 'California, USA', 6.4, 56000, 'A world-class science and engineering institution.'),
                ('University of California, Berkeley', 'California, USA', 16.1, 44000, 'A leading public research university.')
            ON CONFLICT (name) DO NOTHING;
        "#,
    },
];

/// Run all pending migrations
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    // Create migrations table
    create_migrations_table(pool).await?;

    // Get applied migrations
    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Postgres => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

/// Get list of already applied migrations
async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    match pool.driver() {
        DatabaseDriver::Sqlite => get_applied_migrations_sqlite(pool.as_sqlite().unwrap()).await,
        DatabaseDriver::Postgres => {
            get_applied_migrations_postgres(pool.as_postgres().unwrap()).await
        }
    }
}

async fn get_applied_migrations_sqlite(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

async fn get_applied_migrations_postgres(pool: &PgPool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        let version: i32 = row.get("version");
        records.push(MigrationRecord {
            version: version as i64,
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

/// Apply a single migration
async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => apply_migration_sqlite(pool.as_sqlite().unwrap(), migration).await,
        DatabaseDriver::Postgres => {
            apply_migration_postgres(pool.as_postgres().unwrap(), migration).await
        }
    }
}

async fn apply_migration_sqlite(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    // Migration SQL may contain multiple statements
    for statement in split_sql_statements(migration.up_sqlite) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    // Record the migration
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

async fn apply_migration_postgres(pool: &PgPool, migration: &Migration) -> Result<()> {
    // Migration SQL may contain multiple statements
    for statement in split_sql_statements(migration.up_postgres) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    // Record the migration
    sqlx::query("INSERT INTO _migrations (version, name) VALUES ($1, $2)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Split SQL into individual statements on semicolons
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_migrations_are_sequential() {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(
                migration.version,
                (i + 1) as i32,
                "Migration versions must be sequential"
            );
        }
    }

    #[test]
    fn test_migration_names_are_unique() {
        let mut names: Vec<&str> = MIGRATIONS.iter().map(|m| m.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), MIGRATIONS.len(), "Migration names must be unique");
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (id INTEGER);\nCREATE INDEX b ON a(id);\n";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE"));
        assert!(statements[1].starts_with("CREATE INDEX"));
    }

    #[tokio::test]
    async fn test_run_migrations_from_scratch() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_run_migrations_is_idempotent() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("First run failed");
        let count = run_migrations(&pool).await.expect("Second run failed");
        assert_eq!(count, 0, "No migrations should re-apply");
    }

    #[tokio::test]
    async fn test_universities_are_seeded() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let row = sqlx::query("SELECT COUNT(*) as count FROM universities")
            .fetch_one(pool.as_sqlite().unwrap())
            .await
            .expect("Failed to count universities");
        let count: i64 = row.get("count");
        assert_eq!(count, 7);
    }
}
