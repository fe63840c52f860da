mod client;
mod response;

pub use client::*;
pub use response::*;
