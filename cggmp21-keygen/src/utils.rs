//! Small helpers shared by every protocol round: peer iteration, culprit
//! bookkeeping, and XOR-folding of per-party randomness.

/// Identifies one party blamed for a protocol abort: which party, and which
/// round message triggered the blame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortBlame {
    pub party_index: u16,
    pub culprit_message_round: &'static str,
}

impl AbortBlame {
    pub fn new(party_index: u16, culprit_message_round: &'static str, _unused: &'static str) -> Self {
        Self {
            party_index,
            culprit_message_round,
        }
    }
}

/// Iterates the indices of every party except `i`, in `[0, n)` order
pub fn iter_peers(i: u16, n: u16) -> impl Iterator<Item = u16> {
    (0..n).filter(move |&j| j != i)
}

/// Iterates `slice`'s items paired with their party index, skipping index `i`
pub fn but_nth<T>(i: u16, slice: impl Iterator<Item = T>) -> impl Iterator<Item = T> {
    slice
        .enumerate()
        .filter(move |(idx, _)| *idx != usize::from(i))
        .map(|(_, x)| x)
}

/// XORs `bytes` into `acc` in place and returns it, used to combine every
/// party's contributed randomness into one shared value
pub fn xor_array(mut acc: Vec<u8>, bytes: &Vec<u8>) -> Vec<u8> {
    for (a, b) in acc.iter_mut().zip(bytes.iter()) {
        *a ^= b;
    }
    acc
}

/// Blames every party `j` for which `is_bad(j, &a[j], &b[j])` is true
pub fn collect_blame<A, B>(
    a: &[A],
    b: &[B],
    round_name: &'static str,
    mut is_bad: impl FnMut(u16, &A, &B) -> bool,
) -> Vec<AbortBlame> {
    a.iter()
        .zip(b.iter())
        .enumerate()
        .filter_map(|(j, (x, y))| {
            let j = j as u16;
            is_bad(j, x, y).then(|| AbortBlame::new(j, round_name, round_name))
        })
        .collect()
}

/// Blames every party `j` for which `is_bad(&a[j])` is true
pub fn collect_simple_blame<A>(
    a: &[A],
    round_name: &'static str,
    mut is_bad: impl FnMut(&A) -> bool,
) -> Vec<AbortBlame> {
    a.iter()
        .enumerate()
        .filter_map(|(j, x)| {
            let j = j as u16;
            is_bad(x).then(|| AbortBlame::new(j, round_name, round_name))
        })
        .collect()
}

/// Fallible variant of [`collect_blame`]: short-circuits on the first
/// internal error produced by `is_bad`
pub fn try_collect_blame<A, B, E>(
    a: &[A],
    b: &[B],
    round_name: &'static str,
    mut is_bad: impl FnMut(u16, &A, &B) -> Result<bool, E>,
) -> Result<Vec<AbortBlame>, E> {
    let mut blame = Vec::new();
    for (j, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let j = j as u16;
        if is_bad(j, x, y)? {
            blame.push(AbortBlame::new(j, round_name, round_name));
        }
    }
    Ok(blame)
}

/// Picks out the commitment that party `j` generated for recipient `i` from
/// `j`'s per-peer commitment vector, which is indexed over peers (excluding
/// `j` itself) rather than over `[0, n)`.
pub fn mine_from<T>(i: u16, j: u16, commits_indexed_over_peers_of_j: &[T]) -> &T {
    let peer_position = if i < j { i } else { i - 1 };
    &commits_indexed_over_peers_of_j[usize::from(peer_position)]
}

#[cfg(test)]
mod tests {
    //! Unit tests for the building blocks every round's abort-detection pass
    //! is made of (spec.md §8 scenario E: a malformed decommitment or VSS
    //! share must be blamed on its sender, not on every party in the round).

    use super::*;

    #[test]
    fn iter_peers_skips_self_and_only_self() {
        let peers: Vec<u16> = iter_peers(2, 5).collect();
        assert_eq!(peers, vec![0, 1, 3, 4]);
    }

    #[test]
    fn but_nth_skips_the_given_index() {
        let items: Vec<u16> = but_nth(1, vec![10, 11, 12, 13].into_iter()).collect();
        assert_eq!(items, vec![10, 12, 13]);
    }

    #[test]
    fn xor_array_combines_byte_by_byte() {
        let acc = vec![0b1010_1010, 0b0000_1111];
        let folded = xor_array(acc, &vec![0b0101_0101, 0b1111_0000]);
        assert_eq!(folded, vec![0b1111_1111, 0b1111_1111]);
    }

    #[test]
    fn collect_blame_names_only_the_bad_party() {
        let a = vec![1u8, 2, 3];
        let b = vec![10u8, 20, 30];
        // Party 1 is the only one whose (a, b) pair fails the check.
        let blame = collect_blame(&a, &b, "round2", |_j, x, y| x * 10 != *y);
        assert_eq!(blame, vec![AbortBlame::new(1, "round2", "round2")]);
    }

    #[test]
    fn collect_blame_is_empty_when_everyone_is_honest() {
        let a = vec![1u8, 2, 3];
        let b = vec![10u8, 20, 30];
        let blame = collect_blame(&a, &b, "round2", |_j, x, y| x * 10 != *y);
        assert!(blame.is_empty());
    }

    #[test]
    fn collect_simple_blame_names_only_the_bad_party() {
        let sizes = vec![32usize, 16, 32];
        let blame = collect_simple_blame(&sizes, "round3", |len| *len != 32);
        assert_eq!(blame, vec![AbortBlame::new(1, "round3", "round3")]);
    }

    #[test]
    fn try_collect_blame_short_circuits_on_internal_error() {
        let a = vec![1u8, 2, 3];
        let b = vec![10u8, 20, 30];
        let result: Result<Vec<AbortBlame>, &'static str> =
            try_collect_blame(&a, &b, "round3", |j, _x, _y| if j == 2 { Err("boom") } else { Ok(false) });
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn try_collect_blame_collects_bad_parties_when_no_error() {
        let a = vec![1u8, 2, 3];
        let b = vec![10u8, 20, 30];
        let result = try_collect_blame(&a, &b, "round3", |_j, x, y| Ok::<_, &'static str>(x * 10 != *y));
        assert_eq!(result, Ok(vec![]));
    }

    #[test]
    fn mine_from_accounts_for_the_skipped_self_index() {
        // Party 3's per-peer vector is indexed over peers 0,1,2,4,... (its
        // own index 3 never appears), so recipient 4 sits at position 3, not 4.
        let commits_of_party_3 = vec!["for-0", "for-1", "for-2", "for-4"];
        assert_eq!(*mine_from(4, 3, &commits_of_party_3), "for-4");
        assert_eq!(*mine_from(0, 3, &commits_of_party_3), "for-0");
    }
}
