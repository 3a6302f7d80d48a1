pub mod auth;
pub mod days;
pub mod diary;
pub mod freeze;
pub mod health;
pub mod resources;
pub mod stats;
