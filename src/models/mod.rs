//! Data models module
//!
//! Database row types, request payloads and response DTOs.

pub mod club;
pub mod event;
pub mod review;
pub mod user;

pub use club::{Club, ClubJoin, ClubJoinStatus, ClubMember};
pub use event::{Category, City, Event, EventJoin};
pub use review::Review;
pub use user::User;
