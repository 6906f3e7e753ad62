// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

use log::trace;

/// One parsed key line. Anything after the key material is kept as an opaque
/// annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Record<'line> {
    Bare {
        key_type: &'line str,
        key_data: &'line str,
    },
    Annotated {
        key_type: &'line str,
        key_data: &'line str,
        annotation: &'line str,
    },
}

impl<'line> Record<'line> {
    /// Parses a raw line. Returns `None` for blank lines, comments and lines
    /// that don't have exactly two or three fields.
    pub(crate) fn parse(line: &'line str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        match *line.split_whitespace().collect::<Vec<_>>() {
            [key_type, key_data] => Some(Self::Bare { key_type, key_data }),
            [key_type, key_data, annotation] => Some(Self::Annotated {
                key_type,
                key_data,
                annotation,
            }),
            _ => None,
        }
    }

    fn identity(&self) -> Identity {
        match *self {
            Self::Bare { key_type, key_data } | Self::Annotated { key_type, key_data, .. } => {
                Identity {
                    key_type: key_type.to_owned(),
                    key_data: key_data.to_owned(),
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Identity {
    key_type: String,
    key_data: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key_type, self.key_data)
    }
}

// An identity missing from the map has not been seen at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Presence {
    BareOnly,
    Suppressed,
}

/// Accumulates key lines from any number of sources.
///
/// A key that shows up with an annotation anywhere wins over its bare form,
/// no matter which one was added first. Distinct annotations of the same key
/// are all kept.
#[derive(Debug, Default)]
pub(crate) struct Keyset {
    annotated: BTreeSet<String>,
    presence: HashMap<Identity, Presence>,
}

impl Keyset {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for line in lines {
            let line = line.as_ref().trim();
            let Some(record) = Record::parse(line) else {
                trace!("Skipping line: {}", line);
                continue;
            };

            match record {
                Record::Bare { .. } => {
                    _ = self
                        .presence
                        .entry(record.identity())
                        .or_insert(Presence::BareOnly);
                }
                Record::Annotated { .. } => {
                    // Annotated lines keep their own spacing.
                    _ = self.annotated.insert(line.to_owned());
                    _ = self
                        .presence
                        .insert(record.identity(), Presence::Suppressed);
                }
            }
        }
    }

    /// The merged keys in lexicographic order.
    pub(crate) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .annotated
            .iter()
            .cloned()
            .chain(
                self.presence
                    .iter()
                    .filter(|&(_, presence)| *presence == Presence::BareOnly)
                    .map(|(identity, _)| identity.to_string()),
            )
            .collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(sources: &[&[&str]]) -> Vec<String> {
        let mut ks = Keyset::new();
        for lines in sources {
            ks.add(lines.iter());
        }
        ks.keys()
    }

    #[test]
    fn parse_bare_and_annotated() {
        assert_eq!(
            Record::parse("  ssh-ed25519   AAAAC3 \t"),
            Some(Record::Bare {
                key_type: "ssh-ed25519",
                key_data: "AAAAC3",
            })
        );
        assert_eq!(
            Record::parse("ssh-rsa AAAA1 alice@host"),
            Some(Record::Annotated {
                key_type: "ssh-rsa",
                key_data: "AAAA1",
                annotation: "alice@host",
            })
        );
    }

    #[test]
    fn parse_rejects_other_lines() {
        for line in [
            "",
            "   \t ",
            "# ssh-rsa AAAA1",
            "  #ssh-rsa AAAA1 alice",
            "ssh-rsa",
            "ssh-rsa AAAA1 alice bob",
            "restrict,command=\"true\" ssh-rsa AAAA1 alice",
        ] {
            assert_eq!(Record::parse(line), None, "{line:?}");
        }
    }

    #[test]
    fn remote_only() {
        assert_eq!(
            merge(&[&[], &["ssh-rsa AAAA2", "ssh-rsa AAAA1 alice", ""]]),
            ["ssh-rsa AAAA1 alice", "ssh-rsa AAAA2"],
        );
    }

    #[test]
    fn annotated_suppresses_bare() {
        assert_eq!(
            merge(&[&["ssh-rsa AAAA2 bob"], &["ssh-rsa AAAA2"]]),
            ["ssh-rsa AAAA2 bob"],
        );
    }

    #[test]
    fn annotated_suppresses_bare_added_earlier() {
        assert_eq!(
            merge(&[&["ssh-rsa AAAA2"], &["ssh-rsa AAAA2 bob"]]),
            ["ssh-rsa AAAA2 bob"],
        );
    }

    #[test]
    fn bare_duplicates_collapse() {
        assert_eq!(
            merge(&[&["ssh-rsa AAAA2", "ssh-rsa AAAA2"], &["  ssh-rsa   AAAA2"]]),
            ["ssh-rsa AAAA2"],
        );
    }

    #[test]
    fn annotated_duplicates_collapse() {
        assert_eq!(
            merge(&[&["ssh-rsa AAAA2 bob"], &["  ssh-rsa AAAA2 bob\t", "ssh-rsa AAAA2 bob"]]),
            ["ssh-rsa AAAA2 bob"],
        );
    }

    #[test]
    fn annotated_spacing_preserved() {
        assert_eq!(
            merge(&[&["ssh-rsa\tAAAA1\talice", "ssh-rsa AAAA1 alice", "ssh-rsa AAAA1"]]),
            ["ssh-rsa\tAAAA1\talice", "ssh-rsa AAAA1 alice"],
        );
    }

    #[test]
    fn distinct_annotations_all_survive() {
        assert_eq!(
            merge(&[
                &["ssh-rsa AAAA2 bob@work", "ssh-rsa AAAA2"],
                &["ssh-rsa AAAA2", "ssh-rsa AAAA2 bob@home"],
            ]),
            ["ssh-rsa AAAA2 bob@home", "ssh-rsa AAAA2 bob@work"],
        );
    }

    #[test]
    fn identity_includes_key_type() {
        assert_eq!(
            merge(&[&["ssh-dss AAAA2 bob"], &["ssh-rsa AAAA2"]]),
            ["ssh-dss AAAA2 bob", "ssh-rsa AAAA2"],
        );
    }

    #[test]
    fn comments_and_invalid_lines_ignored() {
        assert_eq!(
            merge(&[&[
                "# managed by hand",
                "",
                "   ",
                "ssh-rsa",
                "ssh-rsa AAAA3 a b",
                "ssh-ed25519 AAAAC3",
            ]]),
            ["ssh-ed25519 AAAAC3"],
        );
    }

    #[test]
    fn merge_is_commutative() {
        let local: &[&str] = &[
            "ssh-rsa AAAA1 alice",
            "ssh-rsa AAAA2",
            "# comment",
            "ssh-ed25519 AAAAC3 carol",
        ];
        let remote: &[&str] = &["ssh-rsa AAAA1", "ssh-rsa AAAA2", "ssh-ed25519 AAAAC4"];

        assert_eq!(merge(&[local, remote]), merge(&[remote, local]));
    }

    #[test]
    fn output_sorted_without_duplicates() {
        let keys = merge(&[
            &["ssh-rsa B", "ssh-rsa A z", "ecdsa-sha2-nistp256 C"],
            &["ssh-rsa A", "ssh-rsa B", "ssh-rsa A y", "ecdsa-sha2-nistp256 C c"],
        ]);

        assert_eq!(
            keys,
            [
                "ecdsa-sha2-nistp256 C c",
                "ssh-rsa A y",
                "ssh-rsa A z",
                "ssh-rsa B",
            ],
        );
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn keys_is_repeatable() {
        let mut ks = Keyset::new();
        ks.add(["ssh-rsa AAAA1 alice", "ssh-rsa AAAA2"]);
        assert_eq!(ks.keys(), ks.keys());

        ks.add(["ssh-rsa AAAA2 bob"]);
        assert_eq!(ks.keys(), ["ssh-rsa AAAA1 alice", "ssh-rsa AAAA2 bob"]);
    }

    #[test]
    fn empty() {
        assert!(Keyset::new().keys().is_empty());
    }
}
