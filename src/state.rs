use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub db_path: Arc<PathBuf>,
    pub config_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db_path: PathBuf, config_path: PathBuf) -> Self {
        Self {
            db_path: Arc::new(db_path),
            config_path: Arc::new(config_path),
        }
    }
}
