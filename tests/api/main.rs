mod home;
mod waitlist;
