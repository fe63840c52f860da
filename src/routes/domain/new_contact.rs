use super::SubscriberEmail;

/// A validated waitlist signup, ready to hand to the CRM client.
pub struct NewContact {
    pub email: SubscriberEmail,
    pub first_name: Option<String>,
}
