pub mod axum_router;
