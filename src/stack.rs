// Operand stack: the interpreter's single LIFO store of machine words.
//
// `pop_n` preserves stack-top-first order so that callers (binary
// operators, call argument marshalling) see the same ordering whether
// they pop one value at a time or in bulk.

use crate::error::RuntimeError;

#[derive(Debug, Default, Clone)]
pub struct OperandStack {
    values: Vec<i64>,
}

impl OperandStack {
    pub fn new() -> Self {
        OperandStack { values: Vec::new() }
    }

    pub fn push(&mut self, v: i64) {
        self.values.push(v);
    }

    pub fn pop(&mut self) -> Result<i64, RuntimeError> {
        self.values.pop().ok_or(RuntimeError::Underflow)
    }

    /// Pop `k` values, returning them with index 0 as the most recently
    /// pushed (top-of-stack) value. Leaves the stack exactly as `k`
    /// sequential `pop` calls would.
    pub fn pop_n(&mut self, k: usize) -> Result<Vec<i64>, RuntimeError> {
        if self.values.len() < k {
            return Err(RuntimeError::Underflow);
        }
        let mut out = Vec::with_capacity(k);
        for _ in 0..k {
            out.push(self.values.pop().ok_or(RuntimeError::Underflow)?);
        }
        Ok(out)
    }

    pub fn depth(&self) -> usize {
        self.values.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_round_trip() {
        let mut s = OperandStack::new();
        s.push(1);
        s.push(2);
        assert_eq!(s.pop().unwrap(), 2);
        assert_eq!(s.pop().unwrap(), 1);
    }

    #[test]
    fn pop_on_empty_underflows() {
        let mut s = OperandStack::new();
        assert_eq!(s.pop().unwrap_err(), RuntimeError::Underflow);
    }

    #[test]
    fn pop_n_preserves_top_first_order() {
        let mut s = OperandStack::new();
        s.push(10);
        s.push(20);
        s.push(30);
        assert_eq!(s.pop_n(2).unwrap(), vec![30, 20]);
        assert_eq!(s.pop().unwrap(), 10);
    }

    #[test]
    fn pop_n_matches_sequential_pops() {
        let mut a = OperandStack::new();
        let mut b = OperandStack::new();
        for v in [1, 2, 3, 4, 5] {
            a.push(v);
            b.push(v);
        }
        let bulk = a.pop_n(3).unwrap();
        let mut sequential = Vec::new();
        for _ in 0..3 {
            sequential.push(b.pop().unwrap());
        }
        assert_eq!(bulk, sequential);
        assert_eq!(a.depth(), b.depth());
    }

    #[test]
    fn pop_n_underflows_without_mutating() {
        let mut s = OperandStack::new();
        s.push(1);
        assert_eq!(s.pop_n(3).unwrap_err(), RuntimeError::Underflow);
        assert_eq!(s.depth(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pop_n_is_equivalent_to_n_pops(values in proptest::collection::vec(any::<i64>(), 0..32)) {
            let k = values.len();
            let mut a = OperandStack::new();
            let mut b = OperandStack::new();
            for &v in &values {
                a.push(v);
                b.push(v);
            }
            let bulk = a.pop_n(k).unwrap();
            let mut sequential = Vec::with_capacity(k);
            for _ in 0..k {
                sequential.push(b.pop().unwrap());
            }
            prop_assert_eq!(bulk, sequential);
            prop_assert_eq!(a.depth(), 0);
            prop_assert_eq!(b.depth(), 0);
        }
    }
}
