use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    pub fn subject(&self) -> String {
        format!("Hello from {}", self.name)
    }

    pub fn body(&self) -> String {
        format!("{}\n\nFrom: {} ({})", self.message, self.name, self.email)
    }

    pub fn mailto_href(&self, recipient: &str) -> String {
        format!(
            "mailto:{recipient}?subject={}&body={}",
            encode_uri_component(&self.subject()),
            encode_uri_component(&self.body())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_matches_uri_component_rules() {
        assert_eq!(encode_uri_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_uri_component("it's (fine)!*~._-"), "it's%20(fine)!*~._-");
        assert_eq!(encode_uri_component("café\n"), "caf%C3%A9%0A");
    }

    #[test]
    fn draft_trims_every_field() {
        let draft = ContactDraft::new("  Ada ", " ada@example.com\t", "\nHi there  ");
        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.email, "ada@example.com");
        assert_eq!(draft.message, "Hi there");
    }

    #[test]
    fn mailto_carries_encoded_subject_and_body() {
        let draft = ContactDraft::new("Ada", "ada@example.com", "Hi");

        assert_eq!(
            draft.mailto_href("owner@example.com"),
            "mailto:owner@example.com?subject=Hello%20from%20Ada\
             &body=Hi%0A%0AFrom%3A%20Ada%20(ada%40example.com)"
        );
    }
}
