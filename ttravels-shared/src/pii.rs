use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Contact details (e-mail, phone) that must never reach the logs verbatim.
///
/// `Debug` prints a short hint instead of the value, so `tracing::debug!(?card)`
/// is safe. Serialization keeps the real value because rendered pages and
/// request bodies need it.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    /// `jane@example.com` becomes `j***@example.com`, phone numbers keep their last two digits.
    pub fn hint(&self) -> String {
        let raw = self.0.as_ref();
        if raw.is_empty() {
            return String::new();
        }
        match raw.split_once('@') {
            Some((local, domain)) => {
                let first = local.chars().next().map(String::from).unwrap_or_default();
                format!("{}***@{}", first, domain)
            }
            None => {
                let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
                let tail: String = digits.iter().rev().take(2).rev().collect();
                format!("******{}", tail)
            }
        }
    }

    pub fn expose(&self) -> &str {
        self.0.as_ref()
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Masked({})", self.hint())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hint())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Masked(value)
    }
}
