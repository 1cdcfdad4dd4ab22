//! Packed bit matrices and Warshall's transitive-closure algorithm.
//!
//! Rows are stored as [`BitVec`]s rather than hand-rolled machine words —
//! `bit-vec` already packs them the same way (LSB-first within a block) and
//! gives us safe get/set without reimplementing word arithmetic.

use bit_vec::BitVec;

/// A square bit matrix used throughout the core for relations over a fixed
/// index space (rules, nonterminals, or nonterminal-gotos).
#[derive(Debug, Clone)]
pub struct BitMatrix {
    n: usize,
    rows: Vec<BitVec>,
}

impl BitMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            rows: vec![BitVec::from_elem(n, false); n],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.rows[i].get(j).unwrap_or(false)
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize) {
        self.rows[i].set(j, true);
    }

    pub fn row(&self, i: usize) -> &BitVec {
        &self.rows[i]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut BitVec {
        &mut self.rows[i]
    }

    /// ORs `src` row into `dst` row. Returns whether `dst` changed.
    pub fn or_row_into(&mut self, src: usize, dst: usize) -> bool {
        if src == dst {
            return false;
        }
        let src_row = self.rows[src].clone();
        self.rows[dst].or(&src_row)
    }

    /// Indices of set bits in row `i`, ascending.
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows[i].iter().enumerate().filter_map(|(j, b)| b.then_some(j))
    }
}

/// Warshall's algorithm, in place, in `O(n^3 / W)`.
///
/// Loop order is (outer) pivot `k`, (inner) rows `i` where `R[i,k]` is set —
/// the column test is the hot path, exactly as the classical formulation
/// puts it, rather than the more commonly taught pivot/row/column triple
/// loop that tests every column explicitly.
pub fn transitive_closure(r: &mut BitMatrix) {
    let n = r.len();
    for k in 0..n {
        for i in 0..n {
            if r.get(i, k) {
                r.or_row_into(k, i);
            }
        }
    }
}

/// `transitive_closure` followed by setting every diagonal bit.
pub fn reflexive_transitive_closure(r: &mut BitMatrix) {
    transitive_closure(r);
    let n = r.len();
    for i in 0..n {
        r.set(i, i);
    }
}
