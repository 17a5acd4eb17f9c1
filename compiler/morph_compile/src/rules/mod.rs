//! Member correspondence.
//!
//! The compiler does not decide which source member feeds which destination
//! member; it asks the configuration's [`MemberRules`].

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use morph_types::ShapeDescriptor;

/// A source member feeding a destination member, by member index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemberPair {
    pub source: usize,
    pub destination: usize,
}

/// Source of member correspondences for a pair of record shapes.
pub trait MemberRules: Send + Sync + fmt::Debug {
    /// Pairs in the order their writes should be emitted.
    fn match_members(&self, source: &ShapeDescriptor, destination: &ShapeDescriptor) -> Vec<MemberPair>;
}

/// Matches members by name.
///
/// Only readable source members and writable destination members take
/// part. Pairs come out in destination member order.
#[derive(Clone, Debug, Default)]
pub struct NameMatchRules {
    case_insensitive: bool,
    /// Destination member name -> source member name.
    renames: FxHashMap<String, String>,
    ignored: FxHashSet<String>,
}

impl NameMatchRules {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Fill destination member `destination` from source member `source`.
    #[must_use]
    pub fn rename(mut self, destination: &str, source: &str) -> Self {
        self.renames.insert(destination.to_owned(), source.to_owned());
        self
    }

    /// Never write destination member `destination`.
    #[must_use]
    pub fn ignore(mut self, destination: &str) -> Self {
        self.ignored.insert(destination.to_owned());
        self
    }

    fn names_match(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

impl MemberRules for NameMatchRules {
    fn match_members(&self, source: &ShapeDescriptor, destination: &ShapeDescriptor) -> Vec<MemberPair> {
        let mut pairs = Vec::new();
        for (dest_index, dest_member) in destination.members.iter().enumerate() {
            if !dest_member.access.is_writable() || self.ignored.contains(&dest_member.name) {
                continue;
            }
            let wanted = self
                .renames
                .get(&dest_member.name)
                .map_or(dest_member.name.as_str(), String::as_str);

            // Exact spelling wins over a case-insensitive match.
            let found = source
                .members
                .iter()
                .position(|m| m.access.is_readable() && m.name == wanted)
                .or_else(|| {
                    source
                        .members
                        .iter()
                        .position(|m| m.access.is_readable() && self.names_match(&m.name, wanted))
                });

            if let Some(source_index) = found {
                pairs.push(MemberPair {
                    source: source_index,
                    destination: dest_index,
                });
            }
        }
        pairs
    }
}
