use std::fmt::{Display, Formatter};

/// A domain name as its raw wire labels. Label bytes are kept exactly as
/// received, so a name decoded from a message encodes back to the same
/// bytes even when a label is not UTF-8 or contains a `.` byte.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName {
    labels: Vec<Vec<u8>>,
}

impl DomainName {
    pub fn new(labels: Vec<Vec<u8>>) -> DomainName {
        DomainName { labels }
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    pub fn is_root(&self) -> bool {
        self.labels.iter().all(|label| label.is_empty())
    }
}

impl From<&str> for DomainName {
    /// Splits a dotted name; empty labels are dropped, so `""` and `"."` are
    /// both the root.
    fn from(name: &str) -> Self {
        DomainName::new(
            name.split('.')
                .filter(|label| !label.is_empty())
                .map(|label| label.as_bytes().to_vec())
                .collect(),
        )
    }
}

impl From<String> for DomainName {
    fn from(name: String) -> Self {
        DomainName::from(name.as_str())
    }
}

impl Display for DomainName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }

        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }

            write!(f, "{}", String::from_utf8_lossy(label))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_dotted() {
        let name = DomainName::from("www.example.com.");

        assert_eq!(name.labels(), &[b"www".to_vec(), b"example".to_vec(), b"com".to_vec()]);
        assert_eq!(name.to_string(), "www.example.com");

        assert!(DomainName::from("").is_root());
        assert_eq!(DomainName::from("."), DomainName::default());
        assert_eq!(DomainName::default().to_string(), ".");
    }

    #[test]
    fn display_is_lossy_but_labels_are_not() {
        let name = DomainName::new(vec![vec![b'a', 0xFF], b"test".to_vec()]);

        assert_eq!(name.to_string(), "a\u{FFFD}.test");
        assert_eq!(name.labels()[0], vec![b'a', 0xFF]);
    }
}
