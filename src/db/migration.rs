use scylla::Session;
use std::path::{Path, PathBuf};
use tokio::{
    fs,
    time::{Duration, sleep},
};
use tracing::{debug, error, info, warn};

use crate::config::ScyllaConfig;

use super::DbError;

/// Keyspace name written in the `.cql` files; replaced by the configured one.
const DEFAULT_KEYSPACE: &str = "story_paths";
const KEYSPACE_ATTEMPTS: usize = 6;

#[derive(Debug, PartialEq, Eq)]
enum Statement {
    CreateKeyspace(String),
    UseKeyspace,
    Schema(String),
}

/// Apply every `.cql` file under `migrations/` in file-name order.
pub async fn run_migrations(session: &Session, config: &ScyllaConfig) -> Result<(), DbError> {
    let migrations_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let files = migration_files(&migrations_dir).await?;

    if files.is_empty() {
        warn!(
            "No migrations found in '{}'; skipping migration step",
            migrations_dir.display()
        );
        return Ok(());
    }

    info!("Applying {} migration file(s)", files.len());
    let mut keyspace_ready = false;

    for path in files {
        let display_path = path.display().to_string();
        let source = fs::read_to_string(&path).await.map_err(|e| {
            DbError::MigrationError(format!("Failed to read {}: {}", display_path, e))
        })?;
        let source = source.replace(DEFAULT_KEYSPACE, &config.keyspace);

        for (index, statement) in split_statements(&source).into_iter().enumerate() {
            match classify(statement) {
                Statement::UseKeyspace => {
                    select_keyspace(session, &config.keyspace).await?;
                    keyspace_ready = true;
                }
                Statement::CreateKeyspace(cql) => {
                    execute(session, &cql, index + 1, &display_path).await?;
                    if let Err(err) = session.await_schema_agreement().await {
                        warn!("Schema agreement wait after creating keyspace failed: {}", err);
                    }
                    if let Err(err) = session.refresh_metadata().await {
                        warn!("Metadata refresh after creating keyspace failed: {}", err);
                    }
                    select_keyspace(session, &config.keyspace).await?;
                    keyspace_ready = true;
                }
                Statement::Schema(cql) => {
                    if !keyspace_ready {
                        select_keyspace(session, &config.keyspace).await?;
                        keyspace_ready = true;
                    }
                    execute(session, &cql, index + 1, &display_path).await?;
                }
            }
        }
    }

    info!("Database migrations applied successfully");
    Ok(())
}

async fn migration_files(dir: &Path) -> Result<Vec<PathBuf>, DbError> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| {
        DbError::MigrationError(format!(
            "Failed to read migrations directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        DbError::MigrationError(format!("Failed to list {}: {}", dir.display(), e))
    })? {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("cql") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

async fn execute(
    session: &Session,
    statement: &str,
    index: usize,
    display_path: &str,
) -> Result<(), DbError> {
    debug!("Statement {} in {}: {}", index, display_path, statement);

    match session.query(statement, &[]).await {
        Ok(_) => Ok(()),
        Err(err) if err.to_string().contains("already exists") => {
            warn!("Statement {} skipped: object already exists", index);
            Ok(())
        }
        Err(err) => {
            error!(
                "Failed to execute statement {} from {}: {}",
                index, display_path, err
            );
            Err(DbError::MigrationError(format!(
                "Failed to execute statement {} from {}: {}",
                index, display_path, err
            )))
        }
    }
}

async fn select_keyspace(session: &Session, keyspace: &str) -> Result<(), DbError> {
    for attempt in 0..KEYSPACE_ATTEMPTS {
        match session.use_keyspace(keyspace, false).await {
            Ok(_) => {
                debug!("Selected keyspace '{}' (attempt {})", keyspace, attempt + 1);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Attempt {} to select keyspace '{}' failed: {}",
                    attempt + 1,
                    keyspace,
                    err
                );
                if let Err(refresh_err) = session.refresh_metadata().await {
                    warn!("Metadata refresh failed: {}", refresh_err);
                }
                sleep(Duration::from_millis(250 * (attempt as u64 + 1))).await;
            }
        }
    }

    Err(DbError::MigrationError(format!(
        "Unable to select keyspace '{}' after {} attempts",
        keyspace, KEYSPACE_ATTEMPTS
    )))
}

/// Split a migration file into statements. Whole-line `--` comments are
/// removed before splitting, so a `;` inside a comment never ends a statement.
fn split_statements(source: &str) -> Vec<String> {
    let code = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("--"))
        .collect::<Vec<_>>()
        .join(" ");

    code.split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}

fn classify(statement: String) -> Statement {
    let upper = statement.to_uppercase();
    if upper.starts_with("USE ") {
        Statement::UseKeyspace
    } else if upper.contains("CREATE KEYSPACE") {
        Statement::CreateKeyspace(statement)
    } else {
        Statement::Schema(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_statements_skips_comments() {
        let source = "-- header\nCREATE TABLE a (\n  id uuid PRIMARY KEY\n);\n\nUSE ks;\n";
        let statements = split_statements(source);

        assert_eq!(
            statements,
            vec![
                "CREATE TABLE a ( id uuid PRIMARY KEY )".to_string(),
                "USE ks".to_string()
            ]
        );
    }

    #[test]
    fn test_semicolon_in_comment_does_not_split() {
        let source = "-- steps; ordered\nCREATE TABLE b (id uuid PRIMARY KEY);\n";
        let statements = split_statements(source);

        assert_eq!(statements, vec!["CREATE TABLE b (id uuid PRIMARY KEY)".to_string()]);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("use story_paths".to_string()), Statement::UseKeyspace);
        assert!(matches!(
            classify("CREATE KEYSPACE IF NOT EXISTS x".to_string()),
            Statement::CreateKeyspace(_)
        ));
        assert!(matches!(
            classify("CREATE TABLE t (id uuid PRIMARY KEY)".to_string()),
            Statement::Schema(_)
        ));
    }

    #[test]
    fn test_bundled_migration_parses() {
        let source = include_str!("../../migrations/001_init.cql");
        let statements = split_statements(source);

        assert!(matches!(
            classify(statements[0].clone()),
            Statement::CreateKeyspace(_)
        ));
        assert_eq!(
            statements
                .iter()
                .filter(|s| s.starts_with("CREATE TABLE"))
                .count(),
            4
        );
        for statement in &statements {
            let upper = statement.to_uppercase();
            assert!(
                upper.starts_with("CREATE ") || upper.starts_with("USE "),
                "unexpected statement: {}",
                statement
            );
        }
    }
}
