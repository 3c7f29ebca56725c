//! Small helpers shared by the auxiliary/presign/signing rounds: peer
//! iteration, culprit bookkeeping, scalar/bignumber conversions and Paillier
//! plumbing that doesn't belong to any one round.

use generic_ec::{Curve, Point, Scalar};
use paillier_zk::{libpaillier, unknown_order::BigNumber};
use rand_core::RngCore;

/// Identifies one party blamed for a protocol abort: which party, and which
/// round/message triggered the blame.
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

/// Iterates the indices of every party except `i`, in `[0, n)` order.
pub fn iter_peers(i: u16, n: u16) -> impl Iterator<Item = u16> {
    (0..n).filter(move |&j| j != i)
}

/// Iterates `slice`'s items paired with their party index, skipping index `i`.
pub fn but_nth<T>(i: u16, slice: impl Iterator<Item = T>) -> impl Iterator<Item = T> {
    slice
        .enumerate()
        .filter(move |(idx, _)| *idx != usize::from(i))
        .map(|(_, x)| x)
}

/// XORs `bytes` into `acc` in place and returns it.
pub fn xor_array(mut acc: Vec<u8>, bytes: &Vec<u8>) -> Vec<u8> {
    for (a, b) in acc.iter_mut().zip(bytes.iter()) {
        *a ^= b;
    }
    acc
}

/// Blames every party `j` for which `is_bad(j, &a[j], &b[j])` is true.
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
            is_bad(j, x, y).then(|| AbortBlame::new(j, round_name))
        })
        .collect()
}

/// Blames every party `j` for which `is_bad(&a[j])` is true.
pub fn collect_simple_blame<A>(a: &[A], round_name: &'static str, mut is_bad: impl FnMut(&A) -> bool) -> Vec<AbortBlame> {
    a.iter()
        .enumerate()
        .filter_map(|(j, x)| {
            let j = j as u16;
            is_bad(x).then(|| AbortBlame::new(j, round_name))
        })
        .collect()
}

/// Fallible variant of [`collect_blame`]: short-circuits on the first
/// internal error produced by `is_bad`.
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
            blame.push(AbortBlame::new(j, round_name));
        }
    }
    Ok(blame)
}

/// Picks out the item that party `j` generated for recipient `i` from `j`'s
/// per-peer vector, which is indexed over peers (excluding `j` itself)
/// rather than over `[0, n)`.
pub fn mine_from<T>(i: u16, j: u16, indexed_over_peers_of_j: &[T]) -> &T {
    let peer_position = if i < j { i } else { i - 1 };
    &indexed_over_peers_of_j[usize::from(peer_position)]
}

/// Converts a curve scalar to its big-integer magnitude, for Paillier
/// encryption of secret shares / nonces.
pub fn scalar_to_bignumber<E: Curve>(x: &Scalar<E>) -> BigNumber {
    BigNumber::from_slice(x.to_be_bytes())
}

/// Samples a uniformly random element of `(Z/NZ)*`.
pub fn sample_bigint_in_mult_group<R: RngCore>(rng: &mut R, n: &BigNumber) -> BigNumber {
    loop {
        let r = BigNumber::from_rng(n, rng);
        if r.gcd(n) == BigNumber::one() {
            return r;
        }
    }
}

/// Builds a Paillier [`libpaillier::EncryptionKey`] from a bare modulus `N`.
pub fn encryption_key_from_n(n: &BigNumber) -> libpaillier::EncryptionKey {
    libpaillier::EncryptionKey::from(n)
}

/// Integer square root, rounded down; used to derive the `fac` proof's
/// `sqrt(N)` bound.
pub fn sqrt(n: &BigNumber) -> BigNumber {
    n.sqrt()
}

/// Splits a point's uncompressed encoding (`0x04 || x || y`) into its two
/// coordinate byte strings.
fn point_coords<E: Curve>(point: &Point<E>) -> (Vec<u8>, Vec<u8>) {
    let bytes = point.to_bytes(false);
    let coord_len = (bytes.len() - 1) / 2;
    let x = bytes[1..1 + coord_len].to_vec();
    let y = bytes[1 + coord_len..].to_vec();
    (x, y)
}

/// Reduces a point's x coordinate modulo the curve order, as ECDSA's `r`
/// does; returns `None` if the reduced value is zero (the signature would
/// be invalid, spec.md's degenerate `r = 0` case).
pub fn point_x_as_scalar<E: Curve>(point: &Point<E>) -> Option<Scalar<E>> {
    let (x, _) = point_coords(point);
    let r = Scalar::<E>::from_be_bytes_mod_order(&x);
    if r.is_zero() {
        None
    } else {
        Some(r)
    }
}

/// Whether the point's y coordinate is odd, the low bit of an ECDSA
/// recovery id.
pub fn point_y_is_odd<E: Curve>(point: &Point<E>) -> bool {
    let (_, y) = point_coords(point);
    y.last().map(|b| b & 1 == 1).unwrap_or(false)
}

/// Whether the point's x coordinate, as a field element, is at least the
/// curve order `q` and therefore had to be reduced to produce `r`: the high
/// bit of an ECDSA recovery id.
pub fn point_x_overflowed<E: Curve>(point: &Point<E>) -> bool {
    let (x, _) = point_coords(point);
    let reduced = Scalar::<E>::from_be_bytes_mod_order(&x).to_be_bytes();
    reduced.as_bytes() != x.as_slice()
}

/// Whether `s` is in the high half of the curve order `(q/2, q)`, ECDSA's
/// "low-s" malleability convention.
pub fn scalar_is_high<E: Curve>(s: &Scalar<E>) -> bool {
    let neg = -*s;
    s.to_be_bytes().as_bytes() > neg.to_be_bytes().as_bytes()
}
