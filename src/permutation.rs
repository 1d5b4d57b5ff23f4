//! Axis permutations (spec §4.1).
//!
//! A `Permutation` of dimension `D` is a bijection on `0..D`. `value_at(i)`
//! answers "which original axis does slot `i` pull from" — the same
//! direction `Point::permuted_coords` consumes.

use rand::prelude::SliceRandom;
use rand::Rng;

use crate::error::SearchError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    axes: Vec<usize>,
}

impl Permutation {
    /// The identity permutation of the given dimension.
    pub fn identity(dimension: usize) -> Result<Self, SearchError> {
        if dimension == 0 {
            return Err(SearchError::NonPositiveDimension);
        }
        Ok(Permutation {
            axes: (0..dimension).collect(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn value_at(&self, slot: usize) -> usize {
        self.axes[slot]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.axes
    }

    /// Produce a new permutation by picking `k` distinct slots at random and
    /// shuffling the axes that currently occupy them among themselves.
    /// `k` must satisfy `1 <= k <= dimension`.
    pub fn scramble<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Self, SearchError> {
        let dimension = self.axes.len();
        if k == 0 || k > dimension {
            return Err(SearchError::InvalidScrambleCount { k, dimension });
        }
        let mut axes = self.axes.clone();
        let slots = rand::seq::index::sample(rng, dimension, k).into_vec();
        let mut values: Vec<usize> = slots.iter().map(|&slot| axes[slot]).collect();
        values.shuffle(rng);
        for (slot, value) in slots.into_iter().zip(values.into_iter()) {
            axes[slot] = value;
        }
        Ok(Permutation { axes })
    }
}
