//! Process environment setup.

use std::path::{Path, PathBuf};

/// Load `KEY=value` pairs from a `.env` file into the process environment.
///
/// With no explicit path, `.env` is looked up from the working directory
/// upwards. Variables that are already set keep their values. A missing or
/// unreadable file is skipped; returns the path that was loaded, if any.
pub fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ConnectionManager, StoreConfig};

    #[tokio::test]
    async fn database_url_from_env_file_reaches_the_store() {
        let tmp = tempfile::tempdir().unwrap();
        let env_file = tmp.path().join(".env");
        std::fs::write(
            &env_file,
            "FOSTERTRACK_ENVFILE_URL=:memory:\nFOSTERTRACK_ENVFILE_NAME=Shelter\n",
        )
        .unwrap();

        assert_eq!(load_dotenv(Some(&env_file)), Some(env_file.clone()));

        let config = StoreConfig::new(
            std::env::var("FOSTERTRACK_ENVFILE_URL").ok(),
            std::env::var("FOSTERTRACK_ENVFILE_NAME").ok(),
        );
        let db = ConnectionManager::new(config).get_database().await.unwrap();
        assert_eq!(db.name(), "Shelter");
    }

    #[test]
    fn env_file_does_not_override_existing_variables() {
        let tmp = tempfile::tempdir().unwrap();
        let env_file = tmp.path().join(".env");
        std::fs::write(&env_file, "FOSTERTRACK_ENVFILE_KEEP=from-file\n").unwrap();

        std::env::set_var("FOSTERTRACK_ENVFILE_KEEP", "from-shell");
        load_dotenv(Some(&env_file));

        assert_eq!(
            std::env::var("FOSTERTRACK_ENVFILE_KEEP").unwrap(),
            "from-shell"
        );
    }

    #[test]
    fn missing_env_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load_dotenv(Some(&tmp.path().join(".env"))), None);
    }
}
