mod check_health;
mod domain;
mod home;
mod waitlist;

pub use check_health::*;
pub use domain::*;
pub use home::*;
pub use waitlist::*;
