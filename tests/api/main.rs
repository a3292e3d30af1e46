mod finances;
mod health_check;
mod helpers;
mod insights;
mod users;
