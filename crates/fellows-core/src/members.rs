//! Validation and ordering of ranked collective members.

use crate::types::{MembershipRecord, RawMember};

/// Drop incomplete entries and order the rest by rank, most senior first.
///
/// Members of equal rank keep their enumeration order.
pub fn rank_members(raw: Vec<RawMember>) -> Vec<MembershipRecord> {
    let mut members: Vec<MembershipRecord> = raw
        .into_iter()
        .filter_map(|entry| match entry {
            RawMember {
                address: Some(address),
                rank: Some(rank),
            } => Some(MembershipRecord { address, rank }),
            _ => None,
        })
        .collect();

    // sort_by is stable
    members.sort_by(|a, b| b.rank.cmp(&a.rank));
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(address: &str, rank: u16) -> MembershipRecord {
        MembershipRecord {
            address: address.to_string(),
            rank,
        }
    }

    #[test]
    fn test_rank_members_filters_and_sorts() {
        let raw = vec![
            RawMember::new(Some("addr1"), None),
            RawMember::new(Some("addr2"), Some(5)),
            RawMember::new(None, Some(3)),
            RawMember::new(Some("addr3"), Some(8)),
        ];

        let members = rank_members(raw);
        assert_eq!(members, vec![record("addr3", 8), record("addr2", 5)]);
    }

    #[test]
    fn test_rank_members_empty() {
        assert!(rank_members(Vec::new()).is_empty());
    }

    #[test]
    fn test_rank_members_ties_keep_order() {
        let raw = vec![
            RawMember::new(Some("a"), Some(1)),
            RawMember::new(Some("b"), Some(3)),
            RawMember::new(Some("c"), Some(1)),
            RawMember::new(Some("d"), Some(3)),
        ];

        let members = rank_members(raw);
        assert_eq!(
            members,
            vec![record("b", 3), record("d", 3), record("a", 1), record("c", 1)]
        );
    }

    #[test]
    fn test_rank_zero_is_valid() {
        let members = rank_members(vec![RawMember::new(Some("candidate"), Some(0))]);
        assert_eq!(members, vec![record("candidate", 0)]);
    }

    fn arb_raw_member() -> impl Strategy<Value = RawMember> {
        (
            proptest::option::of("[a-z]{1,8}"),
            proptest::option::of(0u16..10),
        )
            .prop_map(|(address, rank)| RawMember { address, rank })
    }

    proptest! {
        #[test]
        fn test_rank_members_descending(raw in proptest::collection::vec(arb_raw_member(), 0..64)) {
            let members = rank_members(raw);
            for pair in members.windows(2) {
                prop_assert!(pair[0].rank >= pair[1].rank);
            }
        }

        #[test]
        fn test_rank_members_keeps_only_complete(raw in proptest::collection::vec(arb_raw_member(), 0..64)) {
            let complete = raw
                .iter()
                .filter(|m| m.address.is_some() && m.rank.is_some())
                .count();
            let members = rank_members(raw);
            prop_assert_eq!(members.len(), complete);
        }
    }
}
