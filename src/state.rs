use crate::service::PuzzleService;

// app's shared state, built once in main and injected into the router
pub struct AppState {
    pub service: PuzzleService,
}

impl AppState {
    pub fn new(service: PuzzleService) -> Self {
        Self { service }
    }
}
