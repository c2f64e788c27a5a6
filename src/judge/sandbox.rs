//! Sandbox runtime
//!
//! Every test-case run executes in a freshly created, isolated environment:
//! no filesystem, network or process state is shared with any other run,
//! past or concurrent. The Docker implementation enforces the memory
//! ceiling through the container cgroup and the wall-clock deadline by
//! force-killing the container.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine as _;
use bollard::{
    Docker,
    container::LogOutput,
    models::{ContainerCreateBody, HostConfig},
    query_parameters::{
        CreateContainerOptionsBuilder, LogsOptionsBuilder, RemoveContainerOptionsBuilder,
        StartContainerOptions, WaitContainerOptionsBuilder,
    },
};
use futures::StreamExt;
use uuid::Uuid;

use crate::{constants::SANDBOX_PIDS_LIMIT, judge::languages::LanguageProfile};

/// Resource ceilings for one sandboxed run
#[derive(Debug, Clone, Copy)]
pub struct ResourceLimits {
    pub time_limit: Duration,
    pub memory_limit_mb: u64,
}

/// Captured result of a completed sandboxed run.
///
/// A non-zero exit code is a normal, logical outcome (the submitted program
/// crashed or returned an error status); it is not a sandbox failure.
#[derive(Debug, Clone)]
pub struct SandboxRun {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i64,
    pub wall_time_ms: u64,
    pub peak_memory_mb: u64,
}

/// Failure modes of the sandbox itself
#[derive(Debug, Clone, thiserror::Error)]
pub enum SandboxFailure {
    /// Wall-clock deadline exceeded; the run was forcibly terminated
    #[error("time limit exceeded")]
    Timeout { wall_time_ms: u64 },

    /// Memory ceiling exceeded; the run was forcibly terminated
    #[error("memory limit exceeded")]
    OutOfMemory,

    /// Fatal, non-recoverable sandbox fault mid-run
    #[error("sandbox crashed: {0}")]
    Crash(String),

    /// Transient infrastructure failure before the run started (e.g. host
    /// resource exhaustion); eligible for a bounded retry
    #[error("sandbox unavailable: {0}")]
    Unavailable(String),
}

impl SandboxFailure {
    /// Whether this failure may be retried by the scheduler
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// An isolated execution environment for untrusted code
#[async_trait]
pub trait SandboxRuntime: Send + Sync {
    /// Execute `code` once with `input` on stdin, under the given limits.
    async fn run(
        &self,
        profile: &LanguageProfile,
        code: &str,
        input: &str,
        limits: ResourceLimits,
    ) -> Result<SandboxRun, SandboxFailure>;
}

/// Docker-backed sandbox. One container per run, removed afterwards.
pub struct DockerSandbox {
    docker: Docker,
}

/// Force-removes the container on drop. Removal also happens when the run
/// future is abandoned mid-flight (cancellation), so no container outlives
/// its run. `force` kills a still-running container before removal.
struct ContainerGuard {
    docker: Docker,
    id: String,
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        let docker = self.docker.clone();
        let id = std::mem::take(&mut self.id);
        tokio::spawn(async move {
            let options = RemoveContainerOptionsBuilder::default().force(true).build();
            if let Err(e) = docker.remove_container(&id, Some(options)).await {
                tracing::warn!("Failed to remove sandbox container {}: {}", id, e);
            }
        });
    }
}

impl DockerSandbox {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Shell script executed as the container entry point. Source and input
    /// are transported base64-encoded to avoid quoting issues; the program
    /// reads input from stdin and `/usr/bin/time -v` reports peak memory on
    /// stderr after the program exits.
    fn entry_script(profile: &LanguageProfile, code: &str, input: &str) -> String {
        let b64 = base64::engine::general_purpose::STANDARD;
        format!(
            "echo '{}' | base64 -d > /workspace/{src} && \
             echo '{}' | base64 -d > /workspace/input.txt && \
             cd /workspace && /usr/bin/time -v {} < input.txt",
            b64.encode(code),
            b64.encode(input),
            profile.run_command(),
            src = profile.source_file(),
        )
    }

    /// Split the program's own stderr from the trailing `/usr/bin/time -v`
    /// report.
    fn split_time_output(combined: &str) -> (String, String) {
        if let Some(idx) = combined.find("\tCommand being timed:") {
            let (stderr, time_part) = combined.split_at(idx);
            (stderr.to_string(), time_part.to_string())
        } else if let Some(idx) = combined.find("Command exited with non-zero status") {
            let (stderr, time_part) = combined.split_at(idx);
            (stderr.to_string(), time_part.to_string())
        } else if let Some(idx) = combined.find("Command terminated by signal") {
            let (stderr, time_part) = combined.split_at(idx);
            (stderr.to_string(), time_part.to_string())
        } else {
            (combined.to_string(), String::new())
        }
    }

    /// Parse peak memory (kilobytes) from `/usr/bin/time -v` output
    fn parse_memory_kb(time_output: &str) -> u64 {
        for line in time_output.lines() {
            if line.contains("Maximum resident set size") {
                if let Some(kb_str) = line.split(':').nth(1) {
                    if let Ok(kb) = kb_str.trim().parse::<u64>() {
                        return kb;
                    }
                }
            }
        }
        0
    }
}

#[async_trait]
impl SandboxRuntime for DockerSandbox {
    async fn run(
        &self,
        profile: &LanguageProfile,
        code: &str,
        input: &str,
        limits: ResourceLimits,
    ) -> Result<SandboxRun, SandboxFailure> {
        let container_name = format!("judge-{}", Uuid::new_v4());
        let memory_bytes = (limits.memory_limit_mb * 1024 * 1024) as i64;

        let host_config = HostConfig {
            memory: Some(memory_bytes),
            // No swap headroom: the ceiling is the ceiling
            memory_swap: Some(memory_bytes),
            cpu_period: Some(100_000),
            cpu_quota: Some(100_000),
            network_mode: Some("none".to_string()),
            pids_limit: Some(SANDBOX_PIDS_LIMIT),
            ..Default::default()
        };

        let body = ContainerCreateBody {
            image: Some(profile.image().to_string()),
            cmd: Some(vec![
                "/bin/sh".to_string(),
                "-c".to_string(),
                Self::entry_script(profile, code, input),
            ]),
            working_dir: Some("/workspace".to_string()),
            env: Some(vec!["LANG=C.UTF-8".to_string()]),
            host_config: Some(host_config),
            ..Default::default()
        };

        // Failures before the program starts are host-side and transient;
        // report them as retryable.
        let options = CreateContainerOptionsBuilder::default()
            .name(&container_name)
            .build();
        let container = self
            .docker
            .create_container(Some(options), body)
            .await
            .map_err(|e| SandboxFailure::Unavailable(e.to_string()))?;
        let guard = ContainerGuard {
            docker: self.docker.clone(),
            id: container.id,
        };
        let container_id = guard.id.clone();

        let started = Instant::now();
        if let Err(e) = self
            .docker
            .start_container(&container_id, None::<StartContainerOptions>)
            .await
        {
            return Err(SandboxFailure::Unavailable(e.to_string()));
        }

        // Collect output and wait for exit, bounded by the hard deadline.
        let collect = async {
            let mut stdout = String::new();
            let mut stderr = String::new();

            let logs_options = LogsOptionsBuilder::default()
                .stdout(true)
                .stderr(true)
                .follow(true)
                .build();
            let mut logs = self.docker.logs(&container_id, Some(logs_options));
            while let Some(chunk) = logs.next().await {
                match chunk {
                    Ok(LogOutput::StdOut { message }) => {
                        stdout.push_str(&String::from_utf8_lossy(&message));
                    }
                    Ok(LogOutput::StdErr { message }) => {
                        stderr.push_str(&String::from_utf8_lossy(&message));
                    }
                    Ok(_) => {}
                    Err(e) => return Err(SandboxFailure::Crash(e.to_string())),
                }
            }

            let wait_options = WaitContainerOptionsBuilder::default()
                .condition("not-running")
                .build();
            let mut wait = self.docker.wait_container(&container_id, Some(wait_options));
            let exit_code = match wait.next().await {
                Some(Ok(response)) => response.status_code,
                Some(Err(e)) => return Err(SandboxFailure::Crash(e.to_string())),
                None => return Err(SandboxFailure::Crash("container vanished".to_string())),
            };

            Ok((stdout, stderr, exit_code))
        };

        let outcome = tokio::time::timeout(limits.time_limit, collect).await;
        let wall_time_ms = started.elapsed().as_millis() as u64;

        let (stdout, combined_stderr, exit_code) = match outcome {
            Ok(Ok(parts)) => parts,
            Ok(Err(failure)) => return Err(failure),
            // Deadline exceeded: the guard force-kills on removal
            Err(_) => return Err(SandboxFailure::Timeout { wall_time_ms }),
        };

        drop(guard);

        let (stderr, time_output) = Self::split_time_output(&combined_stderr);
        let peak_memory_mb = Self::parse_memory_kb(&time_output).div_ceil(1024);

        // The kernel OOM-kills with SIGKILL (137) when the cgroup ceiling is
        // hit; also catch a measured peak at or above the ceiling.
        if exit_code == 137 || peak_memory_mb >= limits.memory_limit_mb {
            return Err(SandboxFailure::OutOfMemory);
        }

        Ok(SandboxRun {
            stdout,
            stderr,
            exit_code,
            wall_time_ms,
            peak_memory_mb,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::languages;

    #[test]
    fn test_entry_script_embeds_run_command() {
        let script = DockerSandbox::entry_script(languages::python::profile(), "print(1)", "x");
        assert!(script.contains("python3 main.py"));
        assert!(script.contains("/usr/bin/time -v"));
        assert!(script.contains("base64 -d > /workspace/main.py"));
    }

    #[test]
    fn test_split_time_output() {
        let combined = "oops\n\tCommand being timed: \"python3 main.py\"\n\
                        \tMaximum resident set size (kbytes): 20480\n";
        let (stderr, time_part) = DockerSandbox::split_time_output(combined);
        assert_eq!(stderr, "oops\n");
        assert!(time_part.contains("Maximum resident set size"));
    }

    #[test]
    fn test_parse_memory_kb() {
        let output = "\tUser time (seconds): 0.02\n\
                      \tMaximum resident set size (kbytes): 20480\n";
        assert_eq!(DockerSandbox::parse_memory_kb(output), 20480);
        assert_eq!(DockerSandbox::parse_memory_kb("no memory line"), 0);
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SandboxFailure::Unavailable("oom on host".into()).is_retryable());
        assert!(!SandboxFailure::Crash("bad".into()).is_retryable());
        assert!(!SandboxFailure::Timeout { wall_time_ms: 1 }.is_retryable());
        assert!(!SandboxFailure::OutOfMemory.is_retryable());
    }
}
