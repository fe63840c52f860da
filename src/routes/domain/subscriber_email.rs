/// An email address that passed the waitlist's syntactic check:
/// exactly one `@`, a non-empty local part, a domain with a `.` that has at
/// least one character on each side, and no whitespace anywhere.
#[derive(Debug)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        match is_valid(&email) {
            true => Ok(Self(email)),
            false => Err(format!("'{}' is not a valid email address", email)),
        }
    }
}

fn is_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // '.' is a single byte, so the index arithmetic stays on char boundaries
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
