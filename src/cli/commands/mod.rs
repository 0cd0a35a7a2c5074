pub mod database;
pub mod route;
pub mod serve;
pub mod token;
