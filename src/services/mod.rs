// Service layer
// SQLite-backed collaborators behind the scheduling grid's boundaries

pub mod appointment;
pub mod audit;
pub mod database;
pub mod hours;
pub mod staff;
