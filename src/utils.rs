#[cfg(feature = "parallel")]
pub(crate) use rayon::prelude::*;

use crate::{Complex, Precision};
use std::ops::{Add, Range};

/// Set the `bit_index` bit in `num` to `value`.
///
/// # Example
/// ```
/// use shor_sim::utils::set_bit;
/// assert_eq!(set_bit(0, 1, true), 2);
/// assert_eq!(set_bit(1, 1, true), 3);
/// assert_eq!(set_bit(1, 0, false), 0);
/// ```
#[inline]
pub fn set_bit(num: usize, bit_index: usize, value: bool) -> usize {
    let v = 1 << bit_index;
    if value {
        num | v
    } else {
        num & !v
    }
}

/// Get the `bit_index` bit value from `num`.
///
/// # Example
/// ```
/// use shor_sim::utils::get_bit;
/// assert!(get_bit(2, 1));
/// assert!(!get_bit(2, 0));
/// ```
#[inline]
pub fn get_bit(num: usize, bit_index: usize) -> bool {
    ((num >> bit_index) & 1) != 0
}

/// Extracts bits from a number in a particular order.
///
/// # Example
///
/// ```
/// use shor_sim::utils::extract_bits;
///
/// assert_eq!(extract_bits(0b1010, &[3, 0]), 0b01);
/// ```
#[inline]
pub fn extract_bits(num: usize, indices: &[usize]) -> usize {
    indices.iter().enumerate().fold(0, |acc, (i, index)| {
        let bit = (num >> index) & 1;
        acc | (bit << i)
    })
}

/// Inverse of `extract_bits`: writes the `i`th bit of `bits` into position `indices[i]` of
/// `template`, leaving every other bit of `template` as is.
///
/// # Example
///
/// ```
/// use shor_sim::utils::deposit_bits;
///
/// assert_eq!(deposit_bits(0b0000, &[3, 0], 0b01), 0b1000);
/// assert_eq!(deposit_bits(0b1111, &[1], 0b0), 0b1101);
/// ```
#[inline]
pub fn deposit_bits(template: usize, indices: &[usize], bits: usize) -> usize {
    indices
        .iter()
        .enumerate()
        .fold(template, |acc, (i, index)| {
            set_bit(acc, *index, get_bit(bits, i))
        })
}

/// Flips the bits in `num` from `i`th position to `(n-i)`th position.
///
/// # Example
///
/// ```
/// use shor_sim::utils::flip_bits;
///
/// assert_eq!(flip_bits(3, 0b100), 0b001);
/// assert_eq!(flip_bits(3, 0b010), 0b010);
/// assert_eq!(flip_bits(4, 0b1010), 0b0101);
/// ```
#[inline]
pub fn flip_bits(n: usize, num: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let leading_zeros = 8 * std::mem::size_of::<usize>() - n;
    num.reverse_bits() >> leading_zeros
}

/// Mask with ones at every bit position in `range`.
///
/// # Example
/// ```
/// use shor_sim::utils::mask_for;
/// assert_eq!(mask_for(1..3), 0b110);
/// assert_eq!(mask_for(0..0), 0);
/// ```
#[inline]
pub fn mask_for(range: Range<usize>) -> usize {
    range.fold(0, |acc, i| acc | (1 << i))
}

/// Number of qubits needed to hold every value in `0..num`, i.e. `ceil(log2(num))`.
///
/// # Example
/// ```
/// use shor_sim::utils::qubits_required;
/// assert_eq!(qubits_required(15), 4);
/// assert_eq!(qubits_required(16), 4);
/// assert_eq!(qubits_required(17), 5);
/// assert_eq!(qubits_required(225), 8);
/// ```
pub fn qubits_required(num: u64) -> usize {
    if num <= 1 {
        0
    } else {
        (64 - (num - 1).leading_zeros()) as usize
    }
}

/// Number of bits in the binary representation of `value`.
#[inline]
pub(crate) fn bit_length(value: u64) -> usize {
    (64 - value.leading_zeros()) as usize
}

/// Make a vector of complex numbers whose reals are given by `data`
pub fn from_reals<P: Precision>(data: &[P]) -> Vec<Complex<P>> {
    data.iter()
        .map(|x| Complex::<P> {
            re: *x,
            im: P::zero(),
        })
        .collect()
}

/// Sort `v` by key and sum the values of entries sharing a key.
pub(crate) fn consolidate_vec<K, V>(mut v: Vec<(K, V)>) -> Vec<(K, V)>
where
    K: PartialEq + Ord + Send + Sync,
    V: Add<Output = V> + Send + Sync,
{
    sort_unstable_by!(v, |(a, _), (b, _)| a.cmp(b));
    v.into_iter().fold(vec![], |mut acc, (indx, val)| {
        match acc.pop() {
            Some((last_indx, last_val)) if last_indx == indx => {
                acc.push((last_indx, last_val + val));
            }
            Some(last) => {
                acc.push(last);
                acc.push((indx, val));
            }
            None => acc.push((indx, val)),
        }
        acc
    })
}
