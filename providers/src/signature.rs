// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_domains::DomainKind;
use adastat_ir::Operator;

/// The structural description of an operation: an operator tag, the
/// domains of its inputs, the domain of its output (absent for operators
/// with no return value), and which parameter indices are "out" parameters.
/// A plain value type with structural `Hash`/`Eq` — two
/// signatures are equal iff every field matches — so it can key a
/// `Provider`'s memo table without any runtime reflection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: Operator,
    pub inputs: Vec<DomainKind>,
    pub output: Option<DomainKind>,
    pub out_params: Vec<usize>,
}

impl Signature {
    pub fn new(name: Operator, inputs: Vec<DomainKind>, output: Option<DomainKind>) -> Self {
        Self { name, inputs, output, out_params: Vec::new() }
    }

    pub fn with_out_params(mut self, out_params: Vec<usize>) -> Self {
        self.out_params = out_params;
        self
    }

    /// Whether `domain` occurs anywhere in this signature, as an input or
    /// as the output.
    pub fn contains(&self, domain: &DomainKind) -> bool {
        self.inputs.iter().any(|d| d == domain) || self.output.as_ref() == Some(domain)
    }

    /// A copy of this signature with every occurrence of `from` replaced by
    /// `to` — used by the universal-type rewrite to propagate a resolved
    /// concrete type through a call's signature once one operand has been
    /// pinned down.
    pub fn substitute(&self, from: &DomainKind, to: &DomainKind) -> Signature {
        Signature {
            name: self.name.clone(),
            inputs: self.inputs.iter().map(|d| if d == from { to.clone() } else { d.substitute(from, to) }).collect(),
            output: self.output.as_ref().map(|d| if d == from { to.clone() } else { d.substitute(from, to) }),
            out_params: self.out_params.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn contains_finds_an_input_domain() {
        let sig = Signature::new(Operator::Add, vec![DomainKind::Interval, DomainKind::Interval], Some(DomainKind::Interval));
        assert!(sig.contains(&DomainKind::Interval));
        assert!(!sig.contains(&DomainKind::Bool));
    }

    #[test]
    fn substitute_rewrites_every_occurrence() {
        let sig = Signature::new(Operator::Add, vec![DomainKind::Universe, DomainKind::Universe], Some(DomainKind::Universe));
        let rewritten = sig.substitute(&DomainKind::Universe, &DomainKind::Interval);
        assert_eq!(rewritten.inputs, vec![DomainKind::Interval, DomainKind::Interval]);
        assert_eq!(rewritten.output, Some(DomainKind::Interval));
    }
}
