mod finances;
mod insights;
mod knowledge;
mod logins;
mod users;

pub use finances::FinancesRepo;
pub use insights::InsightsRepo;
pub use knowledge::{DefinitionsRepo, UserKnowledgeRepo};
pub use logins::LoginsRepo;
pub use users::UsersRepo;
