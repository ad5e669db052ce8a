pub mod games_repository;
pub mod reference_repository;
