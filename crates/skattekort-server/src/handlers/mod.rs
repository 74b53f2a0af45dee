pub mod health;
pub mod skattekort;
