//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod profile_repository;
pub mod repository_provider;
pub mod token_repository;
pub mod user_repository;

pub use profile_repository::SeaOrmProfileRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use token_repository::SeaOrmTokenRepository;
pub use user_repository::SeaOrmUserRepository;
