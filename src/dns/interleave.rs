//! Fair round-robin ordering of candidates across address families.
//!
//! Resolvers usually return every address of the preferred family before
//! any address of the other. Racing in that order means a broken IPv6 path
//! delays IPv4 by one stagger per IPv6 address. Interleaving alternates
//! families while keeping each family's own order.

use super::Candidate;
use socket2::Domain;
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Iterator produced by [`interleave_by`].
///
/// Holds one queue per key in order of first appearance and yields one item
/// from each non-empty queue in turn; exhausted queues are dropped.
#[derive(Debug, Clone)]
pub struct Interleave<K, T> {
    queues: Vec<(K, VecDeque<T>)>,
    cursor: usize,
    remaining: usize,
}

/// Reorders `items` so that successive items have different keys
/// round-robin, preserving the relative order of items sharing a key.
///
/// The input is partitioned eagerly; the output is yielded lazily.
pub fn interleave_by<I, K, F>(items: I, mut key: F) -> Interleave<K, I::Item>
where
    I: IntoIterator,
    K: PartialEq,
    F: FnMut(&I::Item) -> K,
{
    let mut queues: Vec<(K, VecDeque<I::Item>)> = Vec::new();
    let mut remaining = 0;

    for item in items {
        let k = key(&item);
        match queues.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, queue)) => queue.push_back(item),
            None => queues.push((k, VecDeque::from([item]))),
        }
        remaining += 1;
    }

    Interleave { queues, cursor: 0, remaining }
}

/// Interleaves candidates by address family.
pub fn interleave_family<I>(candidates: I) -> Interleave<Domain, Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    interleave_by(candidates, Candidate::family)
}

impl<K, T> Iterator for Interleave<K, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.queues.is_empty() {
            return None;
        }

        let (_, queue) = &mut self.queues[self.cursor];
        let item = queue.pop_front()?;

        if queue.is_empty() {
            self.queues.remove(self.cursor);
        } else {
            self.cursor += 1;
        }
        if self.cursor >= self.queues.len() {
            self.cursor = 0;
        }

        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, T> ExactSizeIterator for Interleave<K, T> {}

impl<K, T> FusedIterator for Interleave<K, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Family {
        Inet,
        Inet6,
    }
    use Family::*;

    fn interleave(input: &[(Family, u32)]) -> Vec<(Family, u32)> {
        interleave_by(input.iter().copied(), |(family, _)| *family).collect()
    }

    #[test]
    fn test_single_item() {
        assert_eq!(interleave(&[(Inet, 1)]), vec![(Inet, 1)]);
    }

    #[test]
    fn test_already_alternating() {
        assert_eq!(interleave(&[(Inet, 1), (Inet6, 2)]), vec![(Inet, 1), (Inet6, 2)]);
    }

    #[test]
    fn test_late_family_moves_up() {
        assert_eq!(
            interleave(&[(Inet, 1), (Inet, 3), (Inet6, 2)]),
            vec![(Inet, 1), (Inet6, 2), (Inet, 3)]
        );
    }

    #[test]
    fn test_exhausted_family_is_skipped() {
        assert_eq!(
            interleave(&[(Inet, 1), (Inet, 2), (Inet, 3), (Inet6, 4)]),
            vec![(Inet, 1), (Inet6, 4), (Inet, 2), (Inet, 3)]
        );
    }

    #[test]
    fn test_single_family_unchanged() {
        let input = [(Inet6, 1), (Inet6, 2), (Inet6, 3)];
        assert_eq!(interleave(&input), input.to_vec());
    }

    #[test]
    fn test_empty_input() {
        let mut it = interleave_by(Vec::<(Family, u32)>::new(), |(family, _)| *family);
        assert_eq!(it.len(), 0);
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_first_appearance_order_of_three_keys() {
        let input = ["b1", "a1", "b2", "c1", "a2", "b3"];
        let out: Vec<_> = interleave_by(input, |s| s.as_bytes()[0]).collect();
        assert_eq!(out, vec!["b1", "a1", "c1", "b2", "a2", "b3"]);
    }

    #[test]
    fn test_interleaving_is_idempotent() {
        let input = [(Inet6, 1), (Inet6, 2), (Inet, 3), (Inet6, 4), (Inet, 5), (Inet, 6)];
        let once = interleave(&input);
        assert_eq!(interleave(&once), once);
    }

    #[test]
    fn test_size_hint_tracks_remaining() {
        let mut it = interleave_by([1, 2, 3, 4, 5], |n| n % 2);
        assert_eq!(it.len(), 5);
        it.next();
        it.next();
        assert_eq!(it.len(), 3);
        assert_eq!(it.collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_interleave_family_candidates() {
        let addrs: Vec<SocketAddr> = ["[2001:db8::1]:80", "[2001:db8::2]:80", "192.0.2.1:80"]
            .iter()
            .map(|a| a.parse().unwrap())
            .collect();

        let ordered: Vec<_> = interleave_family(addrs.iter().copied().map(Candidate::stream))
            .map(|c| c.address())
            .collect();

        assert_eq!(ordered, vec![addrs[0], addrs[2], addrs[1]]);
    }
}
