mod finances;
mod insights;
mod knowledge;
mod logins;
mod profiles;

pub use finances::*;
pub use insights::*;
pub use knowledge::*;
pub use logins::*;
pub use profiles::*;
