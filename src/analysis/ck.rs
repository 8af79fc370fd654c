use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{CollectError, CollectResult};

/// Invocation settings for the CK metrics jar.
///
/// CK takes positional arguments:
/// `<project> <use_jars> <max_files_per_partition> <variables_and_fields> <output_prefix>`
/// and writes `<output_prefix>class.csv` among other reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CkRunner {
    pub java: String,
    pub jar: PathBuf,
    pub use_jars: bool,
    pub max_files_per_partition: u32,
    pub variables_and_fields: bool,
}

/// Captured output of a successful CK run
#[derive(Debug, Clone, Default)]
pub struct CkOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CkRunner {
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self {
            java: "java".to_string(),
            jar: jar.into(),
            use_jars: true,
            max_files_per_partition: 0,
            variables_and_fields: false,
        }
    }

    pub fn jar_exists(&self) -> bool {
        self.jar.is_file()
    }

    /// Full argument list passed to the Java binary
    pub fn arguments(&self, project: &Path, output_prefix: &Path) -> Vec<String> {
        vec![
            "-jar".to_string(),
            self.jar.display().to_string(),
            project.display().to_string(),
            self.use_jars.to_string(),
            self.max_files_per_partition.to_string(),
            self.variables_and_fields.to_string(),
            output_prefix.display().to_string(),
        ]
    }

    /// Run CK over `project`. A nonzero exit becomes [`CollectError::Ck`]
    /// carrying stderr.
    pub async fn run(&self, project: &Path, output_prefix: &Path) -> CollectResult<CkOutput> {
        let output = Command::new(&self.java)
            .args(self.arguments(project, output_prefix))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CollectError::io(&self.java, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(CollectError::Ck {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(CkOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arguments_order() {
        let runner = CkRunner::new("/tools/ck.jar");
        let args = runner.arguments(Path::new("clones/demo"), Path::new("metrics/demo/demo"));
        assert_eq!(
            args,
            vec![
                "-jar",
                "/tools/ck.jar",
                "clones/demo",
                "true",
                "0",
                "false",
                "metrics/demo/demo"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let mut runner = CkRunner::new("/tools/ck.jar");
        runner.java = "definitely-not-a-java-binary".to_string();

        let result = runner.run(Path::new("."), Path::new("out")).await;
        assert!(matches!(result, Err(CollectError::Io { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_ck_error() {
        let mut runner = CkRunner::new("/tools/ck.jar");
        runner.java = "false".to_string();

        let result = runner.run(Path::new("."), Path::new("out")).await;
        assert!(matches!(result, Err(CollectError::Ck { .. })));
    }
}
