//! Extraction prompt construction

use agentconf_domain::{Artifact, PackageConfiguration};

/// System instruction sent with every extraction request
pub const SYSTEM_INSTRUCTION: &str = "You analyze source code and documentation to find \
environment variables a package reads. Respond with ONLY a JSON array, no prose. Each \
element must be an object with the fields: name (string), type (one of \"string\", \
\"number\", \"boolean\"), description (string), and optionally required (boolean) and \
defaultValue (string). If no environment variables are found, respond with [].";

/// Build the user prompt for one artifact
///
/// Names already declared in `known` are listed so the service is asked for
/// variables not yet catalogued. The merge stays additive either way; the
/// hint only reduces noise.
pub fn build_extraction_prompt(artifact: &Artifact, known: Option<&PackageConfiguration>) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Find every environment variable referenced or documented in the file `{}`.\n",
        artifact.path.display()
    ));

    if let Some(config) = known {
        let names = config.names();
        if !names.is_empty() {
            prompt.push_str(&format!(
                "These variables are already catalogued, do not report them again: {}.\n",
                names.join(", ")
            ));
        }
    }

    prompt.push_str("\nFile content:\n");
    prompt.push_str(&artifact.content);
    prompt
}
