//! Verification jobs: style, coverage, auxiliary passes and extra scripts.

use crate::workflow::schema::{Job, Step};
use crate::workflow::steps::{
    MATRIX_RUNNER, checkout, feature_args, install_tool, platform_strategy, rust_cache, toolchain,
    upload,
};
use ciwright_pipeline::description::{COVERAGE, STYLE_CHECK};
use ciwright_pipeline::{ExtraJob, JobMatrix, PipelineDescription};
use indexmap::IndexMap;

/// Build every verification job the description asks for, in a stable order.
pub fn build_jobs(description: &PipelineDescription, runner: &str) -> IndexMap<String, Job> {
    let mut jobs = IndexMap::new();
    let checks = description.checks;

    if description.style_check.is_active() {
        jobs.insert(
            STYLE_CHECK.to_string(),
            style_check_job(&description.style_check, checks.format, checks.lint),
        );
    }
    if description.coverage.is_active() {
        jobs.insert(COVERAGE.to_string(), coverage_job(&description.coverage));
    }
    if checks.dependencies {
        jobs.insert("dependencies".to_string(), dependencies_job(runner));
    }

    let toggles = description.toggles;
    if toggles.documentation {
        jobs.insert(
            "docs".to_string(),
            docs_job(runner, &description.style_check),
        );
    }
    if toggles.semver {
        jobs.insert("semver".to_string(), semver_job(runner));
    }
    if toggles.sanitizers {
        jobs.insert("sanitizers".to_string(), sanitizers_job(runner));
    }

    if description.auxiliary_test.is_active() {
        for extra in &description.extra_jobs {
            let id = extra.job_id();
            if jobs.contains_key(&id) {
                tracing::warn!(job = %id, name = %extra.name, "Skipping extra job whose id is taken");
                continue;
            }
            jobs.insert(id, extra_job(extra, &description.auxiliary_test));
        }
    }

    jobs
}

fn style_check_job(matrix: &JobMatrix, format: bool, lint: bool) -> Job {
    let features = feature_args(&matrix.features);
    let mut steps = vec![
        checkout(),
        toolchain("${{ matrix.toolchain }}", &["rustfmt", "clippy"]),
        rust_cache(),
        Step::run(format!("cargo check --workspace --all-targets{features}"))
            .with_name("cargo check"),
    ];
    if format {
        steps.push(Step::run("cargo fmt --all -- --check").with_name("cargo fmt"));
    }
    if lint {
        steps.push(
            Step::run(format!(
                "cargo clippy --workspace --all-targets{features} -- -D warnings"
            ))
            .with_name("cargo clippy"),
        );
    }

    Job::new(
        "Style (${{ matrix.platform }}, ${{ matrix.toolchain }})",
        MATRIX_RUNNER,
        steps,
    )
    .with_strategy(platform_strategy(&matrix.platforms, Some(&matrix.toolchains)))
    .with_timeout(30)
}

fn coverage_job(matrix: &JobMatrix) -> Job {
    let features = feature_args(&matrix.features);
    let steps = vec![
        checkout(),
        toolchain("${{ matrix.toolchain }}", &["llvm-tools-preview"]),
        rust_cache(),
        install_tool("cargo-llvm-cov"),
        Step::run(format!(
            "cargo llvm-cov --workspace{features} --lcov --output-path lcov.info"
        ))
        .with_name("cargo llvm-cov"),
        upload(
            "coverage-${{ matrix.platform }}-${{ matrix.toolchain }}",
            "lcov.info",
        ),
    ];

    Job::new("Coverage (${{ matrix.platform }})", MATRIX_RUNNER, steps)
        .with_strategy(platform_strategy(&matrix.platforms, Some(&matrix.toolchains)))
        .with_timeout(45)
}

fn dependencies_job(runner: &str) -> Job {
    Job::new(
        "Dependencies",
        runner,
        vec![
            checkout(),
            install_tool("cargo-deny"),
            Step::run("cargo deny check").with_name("cargo deny"),
        ],
    )
    .with_timeout(15)
}

fn docs_job(runner: &str, matrix: &JobMatrix) -> Job {
    let features = feature_args(&matrix.features);
    Job::new(
        "Documentation",
        runner,
        vec![
            checkout(),
            toolchain("stable", &[]),
            rust_cache(),
            Step::run(format!("cargo doc --workspace --no-deps{features}"))
                .with_name("cargo doc")
                .with_env("RUSTDOCFLAGS", "-D warnings"),
        ],
    )
    .with_timeout(30)
}

fn semver_job(runner: &str) -> Job {
    Job::new(
        "Semver",
        runner,
        vec![
            checkout(),
            Step::uses("obi1kenobi/cargo-semver-checks-action@v2").with_name("cargo semver-checks"),
        ],
    )
    .with_if("github.event_name == 'pull_request'")
    .with_timeout(30)
}

fn sanitizers_job(runner: &str) -> Job {
    Job::new(
        "Sanitizers",
        runner,
        vec![
            checkout(),
            toolchain("nightly", &["rust-src"]),
            rust_cache(),
            Step::run("cargo test --workspace --target x86_64-unknown-linux-gnu")
                .with_name("cargo test (address sanitizer)")
                .with_env("RUSTFLAGS", "-Zsanitizer=address")
                .with_env("RUSTDOCFLAGS", "-Zsanitizer=address"),
        ],
    )
    .with_timeout(45)
}

fn extra_job(extra: &ExtraJob, matrix: &JobMatrix) -> Job {
    let toolchain_name = matrix
        .toolchains
        .iter()
        .next()
        .map_or("stable", String::as_str);
    Job::new(
        format!("{} (${{{{ matrix.platform }}}})", extra.name),
        MATRIX_RUNNER,
        vec![
            checkout(),
            toolchain(toolchain_name, &[]),
            rust_cache(),
            Step::run(extra.command.clone()).with_name(extra.name.clone()),
        ],
    )
    .with_strategy(platform_strategy(&matrix.platforms, None))
    .with_timeout(30)
}
