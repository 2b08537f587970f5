// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_domains::{AbsValue, DomainKind};
use adastat_ir::ConstValue;
use adastat_providers::Provider;
use std::rc::Rc;

/// `(domain, provider_builder, literal_builder)` for one source type.
/// `provider` resolves every operation this type's values
/// participate in; `literal` builds the abstract value denoting a given
/// constant. `default_top` is the value `ReadStmt` havocs a variable of this
/// type to: for most kinds it is simply `domain.top()`, but a bounded
/// integer range's havoc value is the declared `[lo, hi]` interval rather
/// than the full machine-width range `DomainKind::Interval`'s own `top()`
/// answers with (the domain descriptor is shared across every interval-typed
/// variable; the per-type bound lives here instead of being threaded through
/// `DomainKind`).
#[derive(Clone)]
pub struct TypeInterpretation {
    pub domain: DomainKind,
    pub provider: Rc<dyn Provider>,
    pub literal: Rc<dyn Fn(&ConstValue) -> AbsValue>,
    pub default_top: AbsValue,
}

impl TypeInterpretation {
    pub fn new(domain: DomainKind, provider: Rc<dyn Provider>) -> Self {
        use adastat_domains::Lattice;
        let default_top = Lattice::top(&domain);
        let literal_domain = domain.clone();
        Self { domain, provider, literal: Rc::new(move |v| literal_domain.literal(v)), default_top }
    }

    pub fn with_default_top(mut self, default_top: AbsValue) -> Self {
        self.default_top = default_top;
        self
    }
}
