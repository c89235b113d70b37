//! Module-resolution and CommonJS-interop configuration.

use serde::{Deserialize, Serialize};

/// Options forwarded to the generic module-resolution stage.
///
/// The defaults mirror a package-manager-style lookup: collection-aware
/// main fields first, then standard ESM/CJS fields, with typed sources
/// resolvable alongside plain JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Package manifest fields consulted in priority order.
    pub main_fields: Vec<String>,

    /// Export conditions consulted during package-exports resolution.
    pub conditions: Vec<String>,

    /// File extensions tried when a specifier has none.
    pub extensions: Vec<String>,

    /// Re-route generic resolution through the staged file store before
    /// falling back to the resolver's own answer.
    #[serde(default)]
    pub experimental_dev_modules: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            main_fields: [
                "collection:main",
                "jsnext:main",
                "es2017",
                "es2015",
                "module",
                "main",
            ]
            .map(str::to_string)
            .to_vec(),
            conditions: ["default", "module", "import", "require"]
                .map(str::to_string)
                .to_vec(),
            extensions: [".tsx", ".ts", ".mts", ".cts", ".js", ".mjs", ".cjs", ".json"]
                .map(str::to_string)
                .to_vec(),
            experimental_dev_modules: false,
        }
    }
}

/// Options for the CommonJS-to-ESM interoperability stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CjsInteropConfig {
    /// Path substrings whose modules receive interop normalization.
    pub include: Vec<String>,

    /// Also rewrite modules that mix ESM and CJS constructs.
    #[serde(default)]
    pub transform_mixed_modules: bool,
}

impl Default for CjsInteropConfig {
    fn default() -> Self {
        Self {
            include: vec!["node_modules".to_string()],
            transform_mixed_modules: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_main_fields_prefer_collection_builds() {
        let resolve = ResolveConfig::default();
        assert_eq!(resolve.main_fields.first().unwrap(), "collection:main");
        assert_eq!(resolve.main_fields.last().unwrap(), "main");
    }

    #[test]
    fn cjs_interop_defaults_to_node_modules_only() {
        let cjs = CjsInteropConfig::default();
        assert_eq!(cjs.include, vec!["node_modules"]);
        assert!(!cjs.transform_mixed_modules);
    }
}
