//! `SeaORM` entity definitions.

pub mod accounts;
pub mod clients;
pub mod movements;
