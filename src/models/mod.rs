// Data models for the scheduling dashboard

pub mod appointment;
pub mod availability;
pub mod settings;
pub mod staff;
