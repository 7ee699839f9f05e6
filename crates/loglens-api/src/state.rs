use loglens_analyzer::Analyzer;

// App state - Shared across handlers, read-only after startup
pub struct AppState {
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }
}
