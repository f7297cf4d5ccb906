//! SQL migration definitions for the jobsift database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a set of SQL statements executed within a transaction.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: postings keyed by canonical URL",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version   INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- One row per posting; the canonical URL is the identity key, so
-- re-scrapes land on the same row instead of duplicating it.
CREATE TABLE IF NOT EXISTS postings (
    url         TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    company     TEXT NOT NULL,
    location    TEXT NOT NULL,
    source      TEXT NOT NULL,
    posted_at   TEXT,
    description TEXT NOT NULL DEFAULT '',
    skills_json TEXT NOT NULL DEFAULT '[]',
    seniority   TEXT NOT NULL,
    salary_min  INTEGER,
    salary_max  INTEGER,
    currency    TEXT,
    created_at  TEXT NOT NULL
);

-- posted_at is ISO %Y-%m-%d, so lexicographic order is chronological.
CREATE INDEX IF NOT EXISTS idx_postings_posted_at ON postings(posted_at);
CREATE INDEX IF NOT EXISTS idx_postings_source ON postings(source);
CREATE INDEX IF NOT EXISTS idx_postings_seniority ON postings(seniority);
CREATE INDEX IF NOT EXISTS idx_postings_salary_min ON postings(salary_min);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}
