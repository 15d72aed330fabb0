//! Subject-scoped cache key derivation.
//!
//! A `SubjectKey` cannot be constructed without a validated subject and
//! the cache's configured namespace, so every store operation is keyed
//! consistently by construction: the hot tier uses the string form
//! `"<prefix>:<subject>"`, the cold tier the binary form
//! `subject ++ 0x1F ++ category`.

use devpulse_core::{CacheError, CacheSettings, KEY_SEPARATOR};

/// A cache key scoped to one subject and one cache category.
///
/// # Binary Format
///
/// The cold-tier encoding is `subject bytes`, one `0x1F` separator byte,
/// `category bytes`. Subjects are variable-length usernames, so keys
/// sort by subject first and the separator (rejected inside either
/// component) makes the split unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectKey {
    /// Private inner data - cannot be constructed externally
    inner: SubjectKeyInner,
}

/// Private inner struct - prevents external construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SubjectKeyInner {
    prefix: String,
    subject: String,
    category: String,
}

impl SubjectKey {
    /// Derive the key for a subject under the given cache settings.
    ///
    /// This is the ONLY way to construct a `SubjectKey`. Rejects empty
    /// subjects and subjects containing a key delimiter.
    pub fn new(settings: &CacheSettings, subject: &str) -> Result<Self, CacheError> {
        if subject.is_empty() {
            return Err(CacheError::KeyEncoding {
                subject: subject.to_string(),
                reason: "subject must not be empty".to_string(),
            });
        }

        if subject.contains(KEY_SEPARATOR) {
            return Err(CacheError::KeyEncoding {
                subject: subject.to_string(),
                reason: "subject must not contain the key separator".to_string(),
            });
        }

        Ok(Self {
            inner: SubjectKeyInner {
                prefix: settings.key_prefix.clone(),
                subject: subject.to_string(),
                category: settings.category.clone(),
            },
        })
    }

    /// The subject this key is scoped to.
    pub fn subject(&self) -> &str {
        &self.inner.subject
    }

    /// The hot-tier string key: `"<prefix>:<subject>"`.
    pub fn hot_key(&self) -> String {
        format!("{}:{}", self.inner.prefix, self.inner.subject)
    }

    /// The scan pattern matching every hot-tier key in a namespace.
    pub fn hot_pattern(prefix: &str) -> String {
        format!("{}:*", prefix)
    }

    /// Encode the cold-tier binary key.
    pub fn encode(&self) -> Vec<u8> {
        let subject = self.inner.subject.as_bytes();
        let category = self.inner.category.as_bytes();

        let mut bytes = Vec::with_capacity(subject.len() + 1 + category.len());
        bytes.extend_from_slice(subject);
        bytes.push(KEY_SEPARATOR as u8);
        bytes.extend_from_slice(category);
        bytes
    }

    /// Decode a cold-tier binary key back into `(subject, category)`.
    ///
    /// Returns `None` for keys that do not follow the encoding; the
    /// enumeration path skips such keys rather than failing the scan.
    pub fn decode(bytes: &[u8]) -> Option<(String, String)> {
        let split = bytes.iter().position(|&b| b == KEY_SEPARATOR as u8)?;
        let subject = std::str::from_utf8(&bytes[..split]).ok()?;
        let category = std::str::from_utf8(&bytes[split + 1..]).ok()?;

        if subject.is_empty() {
            return None;
        }

        Some((subject.to_string(), category.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn settings() -> CacheSettings {
        CacheSettings::default()
    }

    #[test]
    fn test_hot_key_format() {
        let key = SubjectKey::new(&settings(), "octocat").expect("key should build");
        assert_eq!(key.hot_key(), "analytics:octocat");
        assert_eq!(key.subject(), "octocat");
    }

    #[test]
    fn test_hot_pattern() {
        assert_eq!(SubjectKey::hot_pattern("analytics"), "analytics:*");
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let key = SubjectKey::new(&settings(), "octocat").expect("key should build");
        let encoded = key.encode();
        let (subject, category) = SubjectKey::decode(&encoded).expect("decode should succeed");
        assert_eq!(subject, "octocat");
        assert_eq!(category, "dashboard");
    }

    #[test]
    fn test_rejects_empty_subject() {
        assert!(SubjectKey::new(&settings(), "").is_err());
    }

    #[test]
    fn test_rejects_subject_with_separator() {
        let bad = format!("octo{}cat", KEY_SEPARATOR);
        let err = SubjectKey::new(&settings(), &bad).expect_err("should reject");
        assert!(matches!(err, CacheError::KeyEncoding { .. }));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(SubjectKey::decode(b"no-separator-here").is_none());
        assert!(SubjectKey::decode(&[0x1f, b'x']).is_none());
        assert!(SubjectKey::decode(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trips(subject in "[a-zA-Z0-9_.-]{1,39}") {
            let key = SubjectKey::new(&settings(), &subject).expect("key should build");
            let (decoded_subject, decoded_category) =
                SubjectKey::decode(&key.encode()).expect("decode should succeed");
            prop_assert_eq!(decoded_subject, subject);
            prop_assert_eq!(decoded_category, "dashboard");
        }

        #[test]
        fn prop_keys_for_distinct_subjects_differ(
            a in "[a-z]{1,20}",
            b in "[a-z]{1,20}",
        ) {
            prop_assume!(a != b);
            let key_a = SubjectKey::new(&settings(), &a).expect("key should build");
            let key_b = SubjectKey::new(&settings(), &b).expect("key should build");
            prop_assert_ne!(key_a.encode(), key_b.encode());
            prop_assert_ne!(key_a.hot_key(), key_b.hot_key());
        }
    }
}
