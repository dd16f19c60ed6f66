//! Release jobs: per-platform build matrix, packaging/publishing, Homebrew.
//!
//! Release jobs only run for tag refs. They are never gated on the
//! verification jobs, and the disable marker does not affect them.

use crate::workflow::schema::{Job, Step};
use crate::workflow::steps::{
    MATRIX_RUNNER, checkout, download, install_tool, release_strategy, rust_cache, toolchain,
    upload,
};
use ciwright_pipeline::{AssetBundle, PackageFormat, ReleaseSpec};
use indexmap::IndexMap;

/// Condition limiting release jobs to tag pushes.
pub const TAG_CONDITION: &str = "startsWith(github.ref, 'refs/tags/')";

const BUILD_JOB: &str = "release-build";
const RELEASE_JOB: &str = "release";
const HOMEBREW_JOB: &str = "homebrew";
const DIST_DIR: &str = "dist";

/// Build the release jobs for `spec`.
pub fn build_jobs(spec: &ReleaseSpec, runner: &str) -> IndexMap<String, Job> {
    let mut jobs = IndexMap::new();
    jobs.insert(BUILD_JOB.to_string(), build_job(spec));
    jobs.insert(RELEASE_JOB.to_string(), release_job(spec, runner));

    if spec.publish
        && let (Some(tap), Some(formula)) = (&spec.homebrew, spec.formula_name())
    {
        let job = Job::new(
            "Homebrew",
            runner,
            vec![
                Step::uses("mislav/bump-homebrew-formula-action@v3")
                    .with_name("Bump Homebrew formula")
                    .with_input("formula-name", formula)
                    .with_input("homebrew-tap", tap.tap.clone())
                    .with_env(
                        "COMMITTER_TOKEN",
                        format!("${{{{ secrets.{} }}}}", tap.token_secret),
                    ),
            ],
        )
        .with_needs(RELEASE_JOB)
        .with_if(TAG_CONDITION)
        .with_timeout(15);
        jobs.insert(HOMEBREW_JOB.to_string(), job);
    }

    jobs
}

fn build_job(spec: &ReleaseSpec) -> Job {
    let bin = &spec.binary_name;
    let profile_dir = spec.profile_dir();

    let mut steps = vec![
        checkout(),
        toolchain("stable", &[]).with_input("targets", "${{ matrix.target }}"),
        rust_cache(),
        Step::run(format!(
            "cargo build --locked --profile {} --target ${{{{ matrix.target }}}} --bin {bin}",
            spec.profile
        ))
        .with_name("Build ${{ matrix.platform }}"),
    ];

    if spec.produces(PackageFormat::Debian) {
        steps.push(install_tool("cargo-deb").with_if("runner.os == 'Linux'"));
        steps.push(
            Step::run(format!(
                "cargo deb --no-build --profile {} --target ${{{{ matrix.target }}}}",
                spec.profile
            ))
            .with_name("Package .deb")
            .with_if("runner.os == 'Linux'"),
        );
        steps.push(
            upload(
                format!("{bin}-deb-${{{{ matrix.platform }}}}"),
                "target/${{ matrix.target }}/debian/*.deb",
            )
            .with_if("runner.os == 'Linux'"),
        );
    }

    steps.push(upload(
        format!("{bin}-${{{{ matrix.platform }}}}"),
        format!("target/${{{{ matrix.target }}}}/{profile_dir}/{bin}"),
    ));

    Job::new("Release build (${{ matrix.platform }})", MATRIX_RUNNER, steps)
        .with_strategy(release_strategy(&spec.included_platforms()))
        .with_if(TAG_CONDITION)
        .with_timeout(60)
}

fn release_job(spec: &ReleaseSpec, runner: &str) -> Job {
    let bin = &spec.binary_name;
    let profile_dir = spec.profile_dir();
    let platforms = spec.included_platforms();

    let mut steps = vec![checkout()];
    for platform in &platforms {
        steps.push(download(
            format!("{bin}-{}", platform.id()),
            format!("target/{}/{profile_dir}", platform.rust_triple()),
        ));
    }

    if spec.produces(PackageFormat::Debian) && platforms.iter().any(|p| p.is_linux()) {
        steps.push(
            Step::uses(crate::workflow::steps::DOWNLOAD_ACTION)
                .with_name("Download Debian packages")
                .with_input("pattern", format!("{bin}-deb-*"))
                .with_input("path", DIST_DIR)
                .with_input("merge-multiple", true),
        );
    }

    if spec.produces(PackageFormat::Binary) {
        let mut script = format!("mkdir -p {DIST_DIR}");
        for platform in &platforms {
            script.push_str(&format!(
                "\ncp target/{}/{profile_dir}/{bin} {DIST_DIR}/{bin}-{}",
                platform.rust_triple(),
                platform.id()
            ));
        }
        steps.push(Step::run(script).with_name("Collect binaries"));
    }

    for bundle in &spec.asset_bundles {
        steps.push(Step::run(pack_command(bundle)).with_name(format!("Pack {}", bundle.archive_name)));
    }

    if spec.publish {
        steps.push(
            Step::uses("softprops/action-gh-release@v2")
                .with_name("Publish GitHub release")
                .with_input("files", format!("{DIST_DIR}/*"))
                .with_env("GITHUB_TOKEN", "${{ secrets.GITHUB_TOKEN }}"),
        );
    } else {
        steps.push(upload("release-assets", DIST_DIR));
    }

    Job::new("Release", runner, steps)
        .with_needs(BUILD_JOB)
        .with_if(TAG_CONDITION)
        .with_timeout(30)
}

/// Shell command packing one asset bundle into `dist/`.
///
/// The glob is left unquoted so the runner's shell expands it.
pub fn pack_command(bundle: &AssetBundle) -> String {
    let archive = format!("{DIST_DIR}/{}", bundle.archive_name);
    if bundle.archive_name.ends_with(".zip") {
        format!("mkdir -p {DIST_DIR} && zip -j {archive} {}", bundle.source_glob)
    } else {
        format!("mkdir -p {DIST_DIR} && tar -czf {archive} {}", bundle.source_glob)
    }
}
