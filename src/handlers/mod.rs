// Public: `/`, `/health`. Protected (bearer token): `/api/v1/*`.
pub mod resource;
pub mod root;
