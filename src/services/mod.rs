pub mod categories;
pub mod dishes;
pub mod favorites;
pub mod lunch_schedule;
pub mod meal_slots;
pub mod orders;
pub mod projector;
pub mod week_key;
