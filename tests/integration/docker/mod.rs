//! Docker integration tests
//!
//! Run against a live Docker daemon with `--features docker`. They pull
//! `hello-world:latest` and `alpine:latest` and write into temporary directories.

#[cfg(all(test, feature = "docker"))]
mod tests {
    use image_manifest::{
        CliRuntime, ContainerRuntime, Engine, ImageReference, ManifestProcessor, Notifier,
        Outcome,
    };
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    const NONEXISTENT_REPOSITORY: &str = "this-image-definitely-does-not-exist";

    fn pull(image: &str) {
        let status = Command::new("docker")
            .args(["pull", image])
            .status()
            .expect("Should run docker pull");
        assert!(status.success(), "Should pull {}", image);
    }

    #[test]
    fn test_docker_runtime_creation() {
        let runtime = CliRuntime::new(Engine::Docker).expect("Should create docker runtime");
        assert_eq!(runtime.name(), "docker");
    }

    #[test]
    fn test_find_image_hello_world() {
        pull("hello-world:latest");
        let runtime = CliRuntime::new(Engine::Docker).expect("Should create docker runtime");
        let reference = ImageReference::new("hello-world", "latest").unwrap();

        let image_id = runtime.find_image(&reference).expect("Should list images");
        assert!(image_id.is_some(), "hello-world should be listed");
    }

    #[test]
    fn test_find_image_nonexistent() {
        let runtime = CliRuntime::new(Engine::Docker).expect("Should create docker runtime");
        let reference = ImageReference::new(NONEXISTENT_REPOSITORY, "never").unwrap();

        assert_eq!(runtime.find_image(&reference).unwrap(), None);
    }

    #[test]
    fn test_alpine_manifest() {
        pull("alpine:latest");
        let output_dir = TempDir::new().expect("Should create temp output dir");
        let runtime = CliRuntime::new(Engine::Docker).expect("Should create docker runtime");
        let processor = ManifestProcessor::new(runtime, Notifier::new(1));
        let reference = ImageReference::new("alpine", "latest").unwrap();

        let outcome = processor
            .generate(&reference, output_dir.path())
            .expect("Should generate alpine manifest");

        let report = match outcome {
            Outcome::Generated(report) => report,
            Outcome::NotFound => panic!("alpine:latest should be present after pull"),
        };
        assert!(report.archive_path.exists(), "Archive should exist");

        let manifest = fs::read_to_string(&report.manifest_path).expect("Should read manifest");
        assert_eq!(manifest.lines().count(), report.entry_count);
        assert!(
            manifest.lines().any(|line| line.ends_with(" etc/")),
            "Alpine manifest should list /etc"
        );

        // The container is gone again
        let ps = Command::new("docker")
            .args(["ps", "-a", "-q", "--no-trunc"])
            .output()
            .expect("Should run docker ps");
        let listed = String::from_utf8_lossy(&ps.stdout);
        assert!(!listed.contains(&report.container_id));
    }
}
