pub mod auth;
pub mod category;
pub mod dish;
pub mod favorite;
pub mod lunch_schedule;
pub mod order;
