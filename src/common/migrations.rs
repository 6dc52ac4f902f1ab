// src/common/migrations.rs
//! Database schema management

use sqlx::SqlitePool;
use tracing::info;

/// Create all tables and indexes if they do not exist.
///
/// The `slot` column on `about` and `admins` is a schema-level singleton
/// guard: every row must carry slot = 0 and slot is unique, so a second
/// insert fails atomically instead of racing a count check.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_singleton_tables(pool).await?;
    create_resource_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed");
    Ok(())
}

async fn create_singleton_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id TEXT PRIMARY KEY,
            slot INTEGER NOT NULL DEFAULT 0 UNIQUE CHECK (slot = 0),
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS about (
            id TEXT PRIMARY KEY,
            slot INTEGER NOT NULL DEFAULT 0 UNIQUE CHECK (slot = 0),
            name TEXT NOT NULL,
            title TEXT NOT NULL,
            bio TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            location TEXT,
            profile_image_url TEXT,
            profile_image_media_id TEXT,
            resume_url TEXT,
            resume_media_id TEXT,
            years_experience INTEGER NOT NULL DEFAULT 2 CHECK (years_experience >= 0),
            projects_completed INTEGER NOT NULL DEFAULT 10 CHECK (projects_completed >= 0),
            certificates_earned INTEGER NOT NULL DEFAULT 5 CHECK (certificates_earned >= 0),
            happy_clients INTEGER NOT NULL DEFAULT 10 CHECK (happy_clients >= 0),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_resource_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            short_description TEXT,
            category TEXT NOT NULL DEFAULT 'other'
                CHECK (category IN ('web', 'mobile', 'fullstack', 'other')),
            technologies TEXT NOT NULL DEFAULT '[]',
            github_link TEXT,
            live_link TEXT,
            image_url TEXT NOT NULL,
            image_media_id TEXT NOT NULL,
            featured INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS skills (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL
                CHECK (category IN ('frontend', 'backend', 'database', 'tools', 'languages', 'other')),
            proficiency INTEGER NOT NULL CHECK (proficiency BETWEEN 0 AND 100),
            icon_name TEXT,
            icon_url TEXT,
            icon_media_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS experiences (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            company TEXT NOT NULL,
            location TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT,
            current INTEGER NOT NULL DEFAULT 0,
            description TEXT,
            responsibilities TEXT NOT NULL DEFAULT '[]',
            technologies TEXT NOT NULL DEFAULT '[]',
            company_logo_url TEXT,
            company_logo_media_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS certificates (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            issuer TEXT NOT NULL,
            issue_date TEXT,
            expiry_date TEXT,
            credential_id TEXT,
            credential_url TEXT,
            description TEXT,
            image_url TEXT NOT NULL,
            image_media_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS socials (
            id TEXT PRIMARY KEY,
            platform TEXT NOT NULL
                CHECK (platform IN ('github', 'linkedin', 'twitter', 'instagram', 'facebook',
                                    'youtube', 'dribbble', 'behance', 'medium', 'stackoverflow', 'other')),
            url TEXT NOT NULL,
            username TEXT,
            visible INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            subject TEXT,
            message TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,
            replied INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_projects_featured ON projects(featured)",
        "CREATE INDEX IF NOT EXISTS idx_skills_category ON skills(category)",
        "CREATE INDEX IF NOT EXISTS idx_experiences_start_date ON experiences(start_date)",
        "CREATE INDEX IF NOT EXISTS idx_socials_visible ON socials(visible)",
        "CREATE INDEX IF NOT EXISTS idx_contacts_is_read ON contacts(is_read)",
        "CREATE INDEX IF NOT EXISTS idx_contacts_created_at ON contacts(created_at)",
    ];

    for stmt in indexes {
        sqlx::query(stmt).execute(pool).await?;
    }

    Ok(())
}
