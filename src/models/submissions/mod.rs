pub mod entities;
pub mod listing;
pub mod requests;
pub mod responses;
