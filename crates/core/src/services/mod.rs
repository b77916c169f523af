pub mod backend_service;
pub mod chart_service;
pub mod selection_service;
pub mod snapshot_service;
