pub mod reader;
pub mod repository;
pub mod repository_set;
pub mod unit_of_work;

pub use reader::Reader;
pub use repository::{Repository, TenantOwned, TenantRepository, Timestamped};
pub use repository_set::{ReadRepositories, RepositorySet};
pub use unit_of_work::{UnitOfWork, WorkFuture};
