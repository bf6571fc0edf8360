//! Generator configuration

use serde::{Deserialize, Serialize};

/// Configuration for Go binder generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoBindConfig {
    /// First segment of every type descriptor (`go` in `go.counter.Counter`)
    pub namespace: String,
    /// Import path of the transport package
    pub seq_import: String,
    /// Prefix of the generated package name (`go_` in `go_counter`)
    pub package_prefix: String,
}

impl Default for GoBindConfig {
    fn default() -> Self {
        Self {
            namespace: "go".to_string(),
            seq_import: "golang.org/x/mobile/bind/seq".to_string(),
            package_prefix: "go_".to_string(),
        }
    }
}

impl GoBindConfig {
    /// Identifier the transport package is referred to by in generated code
    pub fn seq_name(&self) -> &str {
        let path = self.seq_import.trim_end_matches('/');
        path.rsplit('/').next().unwrap_or(path)
    }
}
