//! Composition root: configuration in, ready `AppContext` out.

use anyhow::{Context, Result};
use log::warn;
use std::sync::Arc;
use todonote_core::db::open_db;
use todonote_core::{
    init_logging, AppConfig, AppContext, Backend, HttpTodoApi, KeyValueStore,
    KvSessionRepository, LocalNoteStore, RemoteNoteStore, SqliteKeyValueStore,
};

/// Prepares the data directory, logging and storage, then builds the context.
///
/// For the remote backend a saved session is resumed; a stale token only
/// produces a warning so that `login` can still run.
pub async fn build_app(config: &AppConfig) -> Result<AppContext> {
    std::fs::create_dir_all(&config.home_dir).with_context(|| {
        format!(
            "failed to create data directory `{}`",
            config.home_dir.display()
        )
    })?;

    if let Err(err) = init_logging(&config.log_level, config.log_dir()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let db_path = config.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::new(conn));

    match config.backend {
        Backend::Local => {
            let store = LocalNoteStore::open(kv).context("failed to load local notes")?;
            Ok(AppContext::local(store))
        }
        Backend::Remote => {
            let sessions = KvSessionRepository::new(kv, &config.session_scope);
            let api = HttpTodoApi::new(&config.base_url);
            let app = AppContext::remote(RemoteNoteStore::new(api, sessions));
            if let Err(err) = app.resume().await {
                warn!(
                    "event=session_resume module=cli status=error error_code={} error={err}",
                    err.code()
                );
                eprintln!("warning: could not restore saved session: {err}");
            }
            Ok(app)
        }
    }
}
