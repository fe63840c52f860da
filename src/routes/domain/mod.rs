mod new_contact;
mod subscriber_email;

pub use new_contact::*;
pub use subscriber_email::*;
