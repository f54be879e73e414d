//! Change detection between prior and merged configurations
//!
//! Exact structural comparison over the parameter map. No hashing: the
//! check must be attribute-precise to avoid spurious version bumps and to
//! never suppress a real discovery.

use agentconf_domain::PackageConfiguration;

/// Whether persisting `merged` would change anything
///
/// An absent prior configuration is always a change. Otherwise the key sets
/// and every per-key attribute must match exactly for the answer to be no.
pub fn has_changed(prior: Option<&PackageConfiguration>, merged: &PackageConfiguration) -> bool {
    let Some(prior) = prior else {
        return true;
    };

    if prior.parameters.len() != merged.parameters.len() {
        return true;
    }

    for (name, spec) in &merged.parameters {
        match prior.parameters.get(name) {
            None => return true,
            Some(existing) => {
                if existing.var_type != spec.var_type
                    || existing.description != spec.description
                    || existing.required != spec.required
                    || existing.default != spec.default
                {
                    return true;
                }
            }
        }
    }

    false
}
