//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::CheatsheetService;
use crate::config::Settings;
use crate::infrastructure::store::JsonFileStore;
use crate::infrastructure::traits::{
    CommandEditor, Editor, FileSystem, RealFileSystem, TreeStore,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Tree persistence
    pub store: Arc<dyn TreeStore>,

    /// Editor used to compose notes
    pub editor: Arc<dyn Editor>,

    pub cheatsheets: CheatsheetService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store: Arc<dyn TreeStore> = Arc::new(JsonFileStore::new(
            fs.clone(),
            settings.data_file.clone(),
            settings.store.clone(),
        ));
        let editor: Arc<dyn Editor> = Arc::new(CommandEditor::new(settings.editor.clone()));
        Self::with_deps(settings, fs, store, editor)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn TreeStore>,
        editor: Arc<dyn Editor>,
    ) -> Self {
        let settings = Arc::new(settings);
        let cheatsheets = CheatsheetService::new(store.clone());

        Self {
            settings,
            fs,
            store,
            editor,
            cheatsheets,
        }
    }
}
