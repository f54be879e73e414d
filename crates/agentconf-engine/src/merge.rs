//! Declaration deduplication and additive merging
//!
//! Discovered declarations are deduplicated first-wins by name, then merged
//! into the package's existing configuration. The merge is strictly
//! additive: an existing entry is never overwritten, so hand-curated
//! declarations survive a noisy extraction run untouched.

use std::collections::HashSet;

use tracing::trace;

use agentconf_domain::{PackageConfiguration, ParameterSpec, VariableDeclaration};

/// Stable, order-preserving dedup by name, keeping the first occurrence
pub fn dedup_declarations(declarations: Vec<VariableDeclaration>) -> Vec<VariableDeclaration> {
    let mut seen = HashSet::new();
    declarations
        .into_iter()
        .filter(|decl| seen.insert(decl.name.clone()))
        .collect()
}

/// Merge discovered declarations into a base configuration
///
/// The base is the package's existing configuration, or an empty one with
/// the default plugin type when the package has none. Only names absent
/// from the base are inserted; nameless declarations are dropped.
pub fn merge_declarations(
    base: Option<&PackageConfiguration>,
    discovered: &[VariableDeclaration],
) -> PackageConfiguration {
    let mut merged = base.cloned().unwrap_or_default();

    for decl in discovered {
        if !decl.is_valid() {
            continue;
        }
        if merged.contains(&decl.name) {
            trace!(name = %decl.name, "Already declared, keeping existing entry");
            continue;
        }
        merged
            .parameters
            .insert(decl.name.clone(), ParameterSpec::from(decl));
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentconf_domain::VariableType;

    fn decl(name: &str, description: &str) -> VariableDeclaration {
        VariableDeclaration {
            name: name.to_string(),
            var_type: VariableType::String,
            description: description.to_string(),
            required: None,
            default_value: None,
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let deduped = dedup_declarations(vec![
            decl("API_KEY", "first"),
            decl("PORT", "port"),
            decl("API_KEY", "second"),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].description, "first");
    }

    #[test]
    fn merge_into_empty_base_uses_default_plugin_type() {
        let merged = merge_declarations(None, &[decl("API_KEY", "key")]);
        assert_eq!(merged.plugin_type, agentconf_domain::DEFAULT_PLUGIN_TYPE);
        assert!(merged.contains("API_KEY"));
    }

    #[test]
    fn merge_never_overwrites_existing_entries() {
        let base = merge_declarations(None, &[decl("API_KEY", "curated description")]);
        let merged = merge_declarations(Some(&base), &[decl("API_KEY", "noisy rediscovery")]);
        assert_eq!(
            merged.parameters["API_KEY"].description,
            "curated description"
        );
    }

    #[test]
    fn merge_is_a_superset_of_the_base() {
        let base = merge_declarations(None, &[decl("A", "a"), decl("B", "b")]);
        let merged = merge_declarations(Some(&base), &[decl("C", "c")]);
        for (name, spec) in &base.parameters {
            assert_eq!(merged.parameters.get(name), Some(spec));
        }
        assert!(merged.contains("C"));
    }

    #[test]
    fn merge_is_idempotent() {
        let discovered = vec![decl("A", "a"), decl("B", "b")];
        let base = merge_declarations(None, &[decl("EXISTING", "kept")]);
        let once = merge_declarations(Some(&base), &discovered);
        let twice = merge_declarations(Some(&once), &discovered);
        assert_eq!(once, twice);
    }

    #[test]
    fn optional_attributes_attach_only_when_present() {
        let mut with_attrs = decl("PORT", "port");
        with_attrs.required = Some(true);
        with_attrs.default_value = Some("8080".to_string());

        let merged = merge_declarations(None, &[with_attrs, decl("HOST", "host")]);
        assert_eq!(merged.parameters["PORT"].required, Some(true));
        assert_eq!(merged.parameters["PORT"].default.as_deref(), Some("8080"));
        assert_eq!(merged.parameters["HOST"].required, None);
        assert_eq!(merged.parameters["HOST"].default, None);
    }

    #[test]
    fn nameless_declarations_are_dropped() {
        let merged = merge_declarations(None, &[decl("", "blank"), decl("OK", "ok")]);
        assert_eq!(merged.parameters.len(), 1);
    }
}
