//! External retrieval tool supervision.
//!
//! The tool is spawned directly with an argument list (never a shell); the
//! argument order is part of the tool contract: output directory first,
//! optional recursive and interval flags, and the sanitized url last.

use std::path::Path;
use std::process::ExitStatus;

use tokio::process::{Child, Command};
use tracing::debug;
use urlstash_core::DownloadRequest;

use crate::error::{JobError, JobResult};
use crate::workspace::Workspace;

const OUTPUT_DIR_FLAG: &str = "-P";
const RECURSIVE_FLAG: &str = "-r";
const INTERVAL_FLAG: &str = "-w";

/// Spawns and supervises the external retrieval process.
#[derive(Debug, Clone)]
pub struct RetrievalSupervisor {
    tool: String,
}

impl RetrievalSupervisor {
    /// Construct a supervisor for the given tool executable.
    #[must_use]
    pub fn new(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
        }
    }

    /// Spawn the retrieval tool for `request`, downloading into
    /// `workspace`. Returns immediately with a live handle.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalSpawn` if the process cannot be started.
    pub fn start(
        &self,
        workspace: &Workspace,
        request: &DownloadRequest,
    ) -> JobResult<RetrievalHandle> {
        let args = arguments(&workspace.path, request);
        debug!(tool = %self.tool, args = ?args, "spawning retrieval tool");
        let child = Command::new(&self.tool)
            .args(&args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| JobError::RetrievalSpawn {
                tool: self.tool.clone(),
                source,
            })?;
        Ok(RetrievalHandle { child })
    }
}

/// Live handle to the spawned retrieval process, owned by the pipeline for
/// the duration of the retrieval phase.
#[derive(Debug)]
pub struct RetrievalHandle {
    child: Child,
}

impl RetrievalHandle {
    /// Suspend until the process exits and return its status.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalWait` if the wait syscall itself fails.
    pub async fn wait(&mut self) -> JobResult<ExitStatus> {
        self.child
            .wait()
            .await
            .map_err(|source| JobError::RetrievalWait { source })
    }

    /// Terminate the process if it is still running; a no-op once it has
    /// exited. Used only from the cleanup path.
    pub async fn kill(&mut self) {
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                let _ = self.child.kill().await;
            }
        }
    }
}

/// Build the fixed-order argument list for the retrieval tool.
fn arguments(output_dir: &Path, request: &DownloadRequest) -> Vec<String> {
    let mut args = vec![
        OUTPUT_DIR_FLAG.to_string(),
        output_dir.to_string_lossy().into_owned(),
    ];
    if request.recursive {
        args.push(RECURSIVE_FLAG.to_string());
    }
    if request.use_interval {
        args.push(INTERVAL_FLAG.to_string());
        args.push(request.interval_seconds.clone());
    }
    args.push(request.url.clone());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::path::PathBuf;

    fn request(recursive: bool, use_interval: bool) -> DownloadRequest {
        DownloadRequest {
            url: "https://example.org/data".to_string(),
            recursive,
            use_interval,
            interval_seconds: "5".to_string(),
            destination_project_id: "ab12c".to_string(),
            destination_folder_id: None,
        }
    }

    fn workspace(path: &Path) -> Workspace {
        Workspace {
            path: path.to_path_buf(),
            owner_id: "user1".to_string(),
        }
    }

    #[test]
    fn minimal_invocation_is_output_dir_then_url() {
        let args = arguments(&PathBuf::from("tmp/urlstash/u1"), &request(false, false));
        assert_eq!(
            args,
            vec!["-P", "tmp/urlstash/u1", "https://example.org/data"]
        );
    }

    #[test]
    fn full_invocation_keeps_fixed_flag_order() {
        let args = arguments(&PathBuf::from("tmp/urlstash/u1"), &request(true, true));
        assert_eq!(
            args,
            vec![
                "-P",
                "tmp/urlstash/u1",
                "-r",
                "-w",
                "5",
                "https://example.org/data"
            ]
        );
    }

    #[tokio::test]
    async fn successful_tool_reports_zero_exit() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let supervisor = RetrievalSupervisor::new("true");
        let mut handle = supervisor.start(&workspace(dir.path()), &request(false, false))?;
        let status = handle.wait().await?;
        assert!(status.success());
        Ok(())
    }

    #[tokio::test]
    async fn failing_tool_reports_nonzero_exit() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let supervisor = RetrievalSupervisor::new("false");
        let mut handle = supervisor.start(&workspace(dir.path()), &request(false, false))?;
        let status = handle.wait().await?;
        assert!(!status.success());
        Ok(())
    }

    #[tokio::test]
    async fn missing_tool_fails_to_spawn() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let supervisor = RetrievalSupervisor::new("urlstash-no-such-tool");
        let err = supervisor
            .start(&workspace(dir.path()), &request(false, false))
            .expect_err("missing tool must fail to spawn");
        assert!(matches!(err, JobError::RetrievalSpawn { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn kill_after_exit_is_a_noop() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let supervisor = RetrievalSupervisor::new("true");
        let mut handle = supervisor.start(&workspace(dir.path()), &request(false, false))?;
        let _ = handle.wait().await?;
        handle.kill().await;
        Ok(())
    }
}
