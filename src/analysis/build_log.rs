//! Image build log analysis
//!
//! A build log is cut into consecutive stages by well-known Dockerfile
//! markers. Each stage is judged independently so the report can show where
//! a build stopped.

use crate::analysis::Status;
use crate::core::marker::{MarkerPattern, Section, Span};
use crate::core::BuildVariant;
use serde::Serialize;

const GIT_SETUP_START: &str = "git config --global http";
const GIT_SETUP_END: &str = "WORKDIR /openair-hss/scripts";
const INSTALL_START: &str = "build_hss_rel14 --check-installed-software --force";
const BUILD_START: &str = "build_hss_rel14 --clean --build-type Release";
const TARGET_START: &str = "FROM ubuntu:bionic as oai-hss$";
const TARGET_WORKDIR: &str = "WORKDIR /openair-hss/etc";
const IMAGE_SIZE_END: &str = "OAI-HSS DOCKER IMAGE BUILD";

/// Warnings below this count (and no error) only raise a warning
const COMPILE_WARNING_LIMIT: usize = 20;

/// Package and sub-build installation results of the builder image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallSteps {
    /// `HSS software installation successful` seen
    pub succeeded: bool,
    pub packages: bool,
    pub free_diameter: bool,
    pub c_ares: bool,
    pub cassandra_driver: bool,
    pub pistache: bool,
}

/// Compiler diagnostics counted in the build stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompileCounts {
    pub errors: usize,
    pub warnings: usize,
}

impl CompileCounts {
    pub fn status(&self) -> Status {
        if self.errors == 0 && self.warnings == 0 {
            Status::Ok
        } else if self.errors == 0 && self.warnings < COMPILE_WARNING_LIMIT {
            Status::Warning
        } else {
            Status::Failed
        }
    }
}

/// Stage by stage outcome of one image build log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageBuildAnalysis {
    pub git_setup: bool,
    pub install: InstallSteps,
    pub build: bool,
    pub compile: CompileCounts,
    pub copy_from_builder: bool,
    pub copy_templates: bool,
    /// Size column of the image listing, when the image was found
    pub image_size: Option<String>,
}

fn section(start: &str, end: &str) -> Section {
    Section::new(MarkerPattern::regex(start), MarkerPattern::regex(end))
}

/// Marker closing the final image build for a variant
fn tagged_marker(variant: BuildVariant) -> &'static str {
    match variant {
        BuildVariant::Docker => "Successfully tagged oai-hss",
        BuildVariant::Podman => "COMMIT oai-hss:",
    }
}

fn install_spans(variant: BuildVariant) -> [Span; 4] {
    let (driver_pc, pistache_lib) = match variant {
        BuildVariant::Docker => (
            "Installing: /usr/local/lib/x86_64-linux-gnu/pkgconfig/cassandra.pc",
            "Installing: /usr/local/lib/libpistache",
        ),
        BuildVariant::Podman => (
            "Installing: /usr/local/lib64/pkgconfig/cassandra.pc",
            "Installing: /usr/local/lib64/libpistache",
        ),
    };
    [
        Span::new(
            "freeDiameter",
            "Build files have been written to: /openair-hss/build/git_submodules/freeDiameter/build",
            "Installing: /usr/local/lib/freeDiameter/dict_S9",
        ),
        Span::new(
            "c-ares",
            "/openair-hss/build/git_submodules/c-ares /openair-hss",
            "/usr/bin/install -c -m 644 libcares.pc",
        ),
        Span::new("cpp-driver", "/openair-hss/build/git_submodules/cpp-driver /openair-hss", driver_pc),
        Span::new("pistache", "/openair-hss/build/git_submodules/pistache /openair-hss", pistache_lib),
    ]
}

/// Analyse an image build log.
///
/// `pull_request` selects which image tag the size listing is searched for.
pub fn analyze_image_build(log: &str, variant: BuildVariant, pull_request: bool) -> ImageBuildAnalysis {
    let mut git = section(GIT_SETUP_START, GIT_SETUP_END);
    let mut install = section(INSTALL_START, BUILD_START);
    let mut build = section(BUILD_START, TARGET_START);
    let mut copy = section(TARGET_START, TARGET_WORKDIR);
    let mut templates = section(TARGET_WORKDIR, tagged_marker(variant));
    let mut size_listing = section(tagged_marker(variant), IMAGE_SIZE_END);

    let image_line = MarkerPattern::regex(if pull_request { "oai-hss *ci-temp" } else { "oai-hss *develop" });
    let size_column = MarkerPattern::regex("ago *([0-9 A-Z]+)");
    let succeeded = MarkerPattern::simple("HSS software installation successful");
    let packages = MarkerPattern::simple("git submodule init");
    let mut spans = install_spans(variant);

    let mut result = ImageBuildAnalysis::default();

    for line in log.lines() {
        git.advance(line);

        if install.advance(line) {
            result.install.succeeded |= succeeded.matches(line);
            result.install.packages |= packages.matches(line);
            for span in spans.iter_mut() {
                span.advance(line);
            }
        }

        if build.advance(line) {
            result.build |= line.contains("oai_hss installed");
            if line.contains("error:") {
                result.compile.errors += 1;
            }
            if line.contains("warning:") {
                result.compile.warnings += 1;
            }
        }

        copy.advance(line);
        templates.advance(line);

        if size_listing.advance(line) && image_line.matches(line) {
            if let Some(size) = size_column.capture(line) {
                result.image_size = Some(size.to_string());
            }
        }
    }

    result.git_setup = git.end_seen();
    result.copy_from_builder = copy.end_seen();
    result.copy_templates = templates.end_seen();
    let [free_diameter, c_ares, driver, pistache] = &spans;
    result.install.free_diameter = free_diameter.completed();
    result.install.c_ares = c_ares.completed();
    result.install.cassandra_driver = driver.completed();
    result.install.pistache = pistache.completed();
    result
}
