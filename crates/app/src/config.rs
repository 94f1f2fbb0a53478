use std::path::{Path, PathBuf};

pub const DEFAULT_DB_URL: &str = "sqlite://quiz_bowl.db";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_url: String,
    pub admin_password: String,
    pub demo_data: bool,
    pub log_filter: String,
}

impl AppConfig {
    /// Load `.env` (if present) and read `QUIZ_*` / `RUST_LOG` variables.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_url = lookup("QUIZ_DB_URL")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.to_owned(), normalize_sqlite_url);
        let admin_password =
            lookup("QUIZ_ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_owned());
        let demo_data = lookup("QUIZ_SEED_DEMO").is_some_and(|v| parse_flag(&v));
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Self {
            db_url,
            admin_password,
            demo_data,
            log_filter,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Turn a bare or relative `SQLite` path into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file (and its parent directory) if it does not exist yet.
///
/// # Errors
///
/// Returns an I/O error if the URL has no usable path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> std::io::Result<()> {
    if db_url == "sqlite::memory:" || db_url.contains("mode=memory") {
        return Ok(());
    }

    let invalid = || {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid sqlite url: {db_url}"),
        )
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
