//! Inbound operator accessor for CLI handlers.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;

static OPERATOR: OnceLock<Box<dyn OperatorPort>> = OnceLock::new();

/// Installs the operator implementation used by CLI handlers.
pub fn install(operator: Box<dyn OperatorPort>) -> std::result::Result<(), Box<dyn OperatorPort>> {
    OPERATOR.set(operator)
}

/// Returns the configured operator capability surface for CLI handlers.
#[must_use]
pub fn operator() -> &'static dyn OperatorPort {
    OPERATOR
        .get()
        .expect("CLI operator not installed; call cli::operator::install from main")
        .as_ref()
}

/// Load config TOML from disk. A missing file reads as an empty document.
pub fn read_config_toml(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_config_toml(&dir.path().join("none.toml")).unwrap(), "");

        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\npath = \"x.db\"\n").unwrap();
        assert!(read_config_toml(&path).unwrap().contains("x.db"));
    }
}
