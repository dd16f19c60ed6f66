//! Step and matrix helpers shared by the job builders.

use crate::workflow::schema::{Matrix, Step, Strategy};
use ciwright_pipeline::TargetPlatform;
use indexmap::IndexMap;
use std::collections::BTreeSet;

pub const CHECKOUT_ACTION: &str = "actions/checkout@v4";
pub const TOOLCHAIN_ACTION: &str = "dtolnay/rust-toolchain@master";
pub const CACHE_ACTION: &str = "Swatinem/rust-cache@v2";
pub const INSTALL_ACTION: &str = "taiki-e/install-action";
pub const UPLOAD_ACTION: &str = "actions/upload-artifact@v4";
pub const DOWNLOAD_ACTION: &str = "actions/download-artifact@v4";

/// Runner expression for matrix jobs.
pub const MATRIX_RUNNER: &str = "${{ matrix.runner }}";

pub fn checkout() -> Step {
    Step::uses(CHECKOUT_ACTION).with_name("Checkout")
}

pub fn toolchain(toolchain: &str, components: &[&str]) -> Step {
    let step = Step::uses(TOOLCHAIN_ACTION)
        .with_name("Install Rust toolchain")
        .with_input("toolchain", toolchain);
    if components.is_empty() {
        step
    } else {
        step.with_input("components", components.join(", "))
    }
}

pub fn rust_cache() -> Step {
    Step::uses(CACHE_ACTION).with_name("Cache cargo")
}

/// Install a cargo subcommand through `taiki-e/install-action`.
pub fn install_tool(tool: &str) -> Step {
    Step::uses(format!("{INSTALL_ACTION}@{tool}")).with_name(format!("Install {tool}"))
}

pub fn upload(name: impl Into<String>, path: impl Into<String>) -> Step {
    let name = name.into();
    Step::uses(UPLOAD_ACTION)
        .with_name(format!("Upload {name}"))
        .with_input("name", name)
        .with_input("path", path.into())
        .with_input("if-no-files-found", "error")
}

pub fn download(name: impl Into<String>, path: impl Into<String>) -> Step {
    let name = name.into();
    Step::uses(DOWNLOAD_ACTION)
        .with_name(format!("Download {name}"))
        .with_input("name", name)
        .with_input("path", path.into())
}

/// Cargo flags selecting the matrix feature sets.
///
/// `all` wins over everything else; `default` adds no flag.
pub fn feature_args(features: &BTreeSet<String>) -> String {
    if features.contains("all") {
        return " --all-features".to_string();
    }
    let named: Vec<&str> = features
        .iter()
        .map(String::as_str)
        .filter(|f| *f != "default")
        .collect();
    if named.is_empty() {
        String::new()
    } else {
        format!(" --features {}", named.join(","))
    }
}

/// Strategy over `platforms` (and `toolchains`, when given), with an
/// `include` entry attaching the runner for each platform.
pub fn platform_strategy(
    platforms: &[TargetPlatform],
    toolchains: Option<&BTreeSet<String>>,
) -> Strategy {
    let mut matrix = Matrix::default();
    matrix.dimensions.insert(
        "platform".to_string(),
        platforms.iter().map(|p| p.id().to_string()).collect(),
    );
    if let Some(toolchains) = toolchains {
        matrix
            .dimensions
            .insert("toolchain".to_string(), toolchains.iter().cloned().collect());
    }
    matrix.include = platforms
        .iter()
        .map(|p| {
            IndexMap::from([
                ("platform".to_string(), p.id().to_string()),
                ("runner".to_string(), p.runner().to_string()),
            ])
        })
        .collect();

    Strategy {
        matrix,
        fail_fast: Some(false),
    }
}

/// Strategy with one `include` entry per platform and no dimensions.
pub fn release_strategy(platforms: &[TargetPlatform]) -> Strategy {
    let include = platforms
        .iter()
        .map(|p| {
            IndexMap::from([
                ("platform".to_string(), p.id().to_string()),
                ("runner".to_string(), p.runner().to_string()),
                ("target".to_string(), p.rust_triple().to_string()),
            ])
        })
        .collect();

    Strategy {
        matrix: Matrix {
            dimensions: IndexMap::new(),
            include,
        },
        fail_fast: Some(false),
    }
}
