//! libSQL storage layer for harvested postings.
//!
//! The [`Storage`] struct wraps a local libSQL database holding one row per
//! canonical posting URL. Re-scraping upserts onto the same row, so repeated
//! runs never duplicate a posting, and `created_at` keeps the first-seen
//! timestamp across overwrites.

mod migrations;

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use jobsift_shared::{JobPosting, JobsiftError, Result, Seniority, Source};
use libsql::{Connection, Database, params};

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

/// Filter set for [`Storage::search`]. Text fields match as substrings,
/// `skill` matches an exact tag within the stored skill set.
#[derive(Debug, Clone)]
pub struct PostingFilter {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub skill: Option<String>,
    pub seniority: Option<Seniority>,
    pub source: Option<Source>,
    /// Keep postings whose advertised salary floor is at least this figure.
    /// Rows without a `salary_min` never match.
    pub min_salary: Option<i64>,
    pub limit: u32,
}

impl Default for PostingFilter {
    fn default() -> Self {
        Self {
            title: None,
            company: None,
            location: None,
            description: None,
            skill: None,
            seniority: None,
            source: None,
            min_salary: None,
            limit: 20,
        }
    }
}

impl Storage {
    /// Open or create a database at `path` and bring the schema up to date.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| JobsiftError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| JobsiftError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| JobsiftError::Storage(e.to_string()))?;

        let storage = Self { db, conn };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn
                    .execute_batch(migration.sql)
                    .await
                    .map_err(|e| {
                        JobsiftError::Storage(format!(
                            "migration v{} failed: {e}",
                            migration.version
                        ))
                    })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    // -----------------------------------------------------------------------
    // Posting operations
    // -----------------------------------------------------------------------

    /// Insert a posting, or overwrite the existing row with the same URL.
    ///
    /// Every field is refreshed except `created_at`, which keeps the
    /// timestamp of the first ingestion.
    pub async fn upsert(&self, posting: &JobPosting) -> Result<()> {
        let skills_json = serde_json::to_string(&posting.skills)
            .map_err(|e| JobsiftError::Storage(format!("encode skills: {e}")))?;

        self.conn
            .execute(
                "INSERT INTO postings (url, title, company, location, source, posted_at,
                                       description, skills_json, seniority, salary_min,
                                       salary_max, currency, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                 ON CONFLICT(url) DO UPDATE SET
                   title = excluded.title,
                   company = excluded.company,
                   location = excluded.location,
                   source = excluded.source,
                   posted_at = excluded.posted_at,
                   description = excluded.description,
                   skills_json = excluded.skills_json,
                   seniority = excluded.seniority,
                   salary_min = excluded.salary_min,
                   salary_max = excluded.salary_max,
                   currency = excluded.currency",
                params![
                    posting.url.as_str(),
                    posting.title.as_str(),
                    posting.company.as_str(),
                    posting.location.as_str(),
                    posting.source.as_str(),
                    posting.posted_at.map(|d| d.format("%Y-%m-%d").to_string()),
                    posting.description.as_str(),
                    skills_json.as_str(),
                    posting.seniority.as_str(),
                    posting.salary_min,
                    posting.salary_max,
                    posting.currency.as_deref(),
                    posting.created_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| JobsiftError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Get a posting by its canonical URL.
    pub async fn get(&self, url: &str) -> Result<Option<JobPosting>> {
        let mut rows = self
            .conn
            .query(
                "SELECT url, title, company, location, source, posted_at, description,
                        skills_json, seniority, salary_min, salary_max, currency, created_at
                 FROM postings WHERE url = ?1",
                params![url],
            )
            .await
            .map_err(|e| JobsiftError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_posting(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(JobsiftError::Storage(e.to_string())),
        }
    }

    /// Total number of stored postings.
    pub async fn count(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM postings", params![])
            .await
            .map_err(|e| JobsiftError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let n: i64 = row
                    .get(0)
                    .map_err(|e| JobsiftError::Storage(e.to_string()))?;
                Ok(n as u64)
            }
            _ => Ok(0),
        }
    }

    /// Query postings matching `filter`, newest first with undated rows last.
    pub async fn search(&self, filter: &PostingFilter) -> Result<Vec<JobPosting>> {
        let mut sql = String::from(
            "SELECT url, title, company, location, source, posted_at, description,
                    skills_json, seniority, salary_min, salary_max, currency, created_at
             FROM postings",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<libsql::Value> = Vec::new();

        if let Some(title) = &filter.title {
            clauses.push("title LIKE ?");
            args.push(libsql::Value::Text(format!("%{title}%")));
        }
        if let Some(company) = &filter.company {
            clauses.push("company LIKE ?");
            args.push(libsql::Value::Text(format!("%{company}%")));
        }
        if let Some(location) = &filter.location {
            clauses.push("location LIKE ?");
            args.push(libsql::Value::Text(format!("%{location}%")));
        }
        if let Some(description) = &filter.description {
            clauses.push("description LIKE ?");
            args.push(libsql::Value::Text(format!("%{description}%")));
        }
        if let Some(skill) = &filter.skill {
            // Tags are stored JSON-quoted, so matching the quoted form
            // is an exact-tag match, not a substring one.
            clauses.push("skills_json LIKE ?");
            args.push(libsql::Value::Text(format!("%\"{skill}\"%")));
        }
        if let Some(seniority) = filter.seniority {
            clauses.push("seniority = ?");
            args.push(libsql::Value::Text(seniority.as_str().to_string()));
        }
        if let Some(source) = filter.source {
            clauses.push("source = ?");
            args.push(libsql::Value::Text(source.as_str().to_string()));
        }
        if let Some(min) = filter.min_salary {
            clauses.push("salary_min >= ?");
            args.push(libsql::Value::Integer(min));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY posted_at IS NULL, posted_at DESC, url LIMIT ?");
        args.push(libsql::Value::Integer(i64::from(filter.limit)));

        let mut rows = self
            .conn
            .query(&sql, args)
            .await
            .map_err(|e| JobsiftError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_posting(&row)?);
        }
        Ok(results)
    }

    /// Delete postings dated strictly before `cutoff`. Undated postings are
    /// never evicted. Returns the number of rows removed.
    pub async fn evict_older_than(&self, cutoff: NaiveDate) -> Result<u64> {
        let cutoff_text = cutoff.format("%Y-%m-%d").to_string();
        let removed = self
            .conn
            .execute(
                "DELETE FROM postings WHERE posted_at IS NOT NULL AND posted_at < ?1",
                params![cutoff_text.as_str()],
            )
            .await
            .map_err(|e| JobsiftError::Storage(e.to_string()))?;

        tracing::info!(removed, cutoff = cutoff_text.as_str(), "evicted stale postings");
        Ok(removed)
    }
}

/// Convert a database row to a [`JobPosting`].
fn row_to_posting(row: &libsql::Row) -> Result<JobPosting> {
    let source: String = row
        .get(4)
        .map_err(|e| JobsiftError::Storage(e.to_string()))?;
    let skills_json: String = row
        .get(7)
        .map_err(|e| JobsiftError::Storage(e.to_string()))?;
    let seniority: String = row
        .get(8)
        .map_err(|e| JobsiftError::Storage(e.to_string()))?;

    Ok(JobPosting {
        url: row
            .get::<String>(0)
            .map_err(|e| JobsiftError::Storage(e.to_string()))?,
        title: row
            .get::<String>(1)
            .map_err(|e| JobsiftError::Storage(e.to_string()))?,
        company: row
            .get::<String>(2)
            .map_err(|e| JobsiftError::Storage(e.to_string()))?,
        location: row
            .get::<String>(3)
            .map_err(|e| JobsiftError::Storage(e.to_string()))?,
        source: source.parse()?,
        posted_at: match row.get::<String>(5) {
            Ok(s) => Some(
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| JobsiftError::Storage(format!("invalid posted_at: {e}")))?,
            ),
            Err(_) => None,
        },
        description: row
            .get::<String>(6)
            .map_err(|e| JobsiftError::Storage(e.to_string()))?,
        skills: serde_json::from_str::<BTreeSet<String>>(&skills_json)
            .map_err(|e| JobsiftError::Storage(format!("decode skills: {e}")))?,
        seniority: seniority.parse()?,
        salary_min: row.get::<i64>(9).ok(),
        salary_max: row.get::<i64>(10).ok(),
        currency: row.get::<String>(11).ok(),
        created_at: {
            let s: String = row
                .get(12)
                .map_err(|e| JobsiftError::Storage(e.to_string()))?;
            chrono::DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| JobsiftError::Storage(format!("invalid created_at: {e}")))?
        },
    })
}
