//! Small helpers shared by every protocol round: peer iteration, culprit
//! bookkeeping, and identifier conversions between a party's `round_based`
//! index and the `frost_ed25519::Identifier` FROST's own APIs expect.

use std::collections::BTreeMap;

/// Identifies one party blamed for a protocol abort: which party, and which
/// round message triggered the blame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortBlame {
    pub party_index: u16,
    pub culprit_message_round: &'static str,
}

impl AbortBlame {
    pub fn new(party_index: u16, culprit_message_round: &'static str) -> Self {
        Self {
            party_index,
            culprit_message_round,
        }
    }
}

/// Converts a `round_based` party index (`0..n`) into the `frost_ed25519`
/// identifier FROST's own key material is indexed by (`1..=n`, since FROST
/// never hands out the identity element as an identifier).
pub fn identifier(i: u16) -> frost_ed25519::Identifier {
    frost_ed25519::Identifier::try_from(u16::from(i) + 1).expect("party index + 1 never overflows or is zero")
}

/// Inverts [`identifier`]: recovers the `round_based` party index belonging
/// to `parties`' identifiers that a given identifier is the `k`-th entry of.
pub fn party_index_of(parties: &[u16], id: frost_ed25519::Identifier) -> Option<u16> {
    parties.iter().copied().find(|&j| identifier(j) == id)
}

/// Iterates the indices of every party except `i`, in `[0, n)` order
pub fn iter_peers(i: u16, n: u16) -> impl Iterator<Item = u16> {
    (0..n).filter(move |&j| j != i)
}

/// Blames every party `j` for which `is_bad(j, &a[j])` is true, where `a` is
/// keyed by `frost_ed25519::Identifier` (as received maps from FROST's own
/// round1/round2 packages are).
pub fn collect_blame<A>(
    a: &BTreeMap<frost_ed25519::Identifier, A>,
    parties: &[u16],
    round_name: &'static str,
    mut is_bad: impl FnMut(u16, &A) -> bool,
) -> Vec<AbortBlame> {
    a.iter()
        .filter_map(|(id, x)| {
            let j = party_index_of(parties, *id)?;
            is_bad(j, x).then(|| AbortBlame::new(j, round_name))
        })
        .collect()
}
