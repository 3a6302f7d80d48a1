pub mod day_record;
pub mod diary;
pub mod freeze;
pub mod resource;
pub mod user;
