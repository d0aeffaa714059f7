use isa95_kernel::{ExtensionConfig, Isa95Extension, bootstrap};
use isa95_space::AddressSpace;
use serde_json::Value;
use std::fmt::Display;

/// Namespace URI of the scratch space every command builds.
pub const DEMO_NAMESPACE_URI: &str = "urn:isa95-cli:demo";

pub fn exit_with(message: impl Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

pub fn parse_or_exit<T>(raw: &str) -> T
where
    T: std::str::FromStr,
    T::Err: Display,
{
    raw.parse().unwrap_or_else(|e| exit_with(e))
}

pub fn load_config_or_exit(path: Option<&str>) -> ExtensionConfig {
    match path {
        Some(path) => ExtensionConfig::load(path).unwrap_or_else(|e| exit_with(e)),
        None => ExtensionConfig::default(),
    }
}

/// A fresh space with the standard types and the ISA-95 extension.
pub fn bootstrap_or_exit(config: ExtensionConfig) -> (AddressSpace, Isa95Extension) {
    bootstrap(DEMO_NAMESPACE_URI, config).unwrap_or_else(|e| exit_with(e))
}

pub fn print_json(payload: &Value) {
    match serde_json::to_string_pretty(payload) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => exit_with(e),
    }
}
