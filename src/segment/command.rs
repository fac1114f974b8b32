use std::ffi::OsString;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;

use crate::foundation::error::SegmentationError;
use crate::segment::{SegmentationRequest, Segmenter};

/// Exit status a segmentation program uses to report that it is being rate-limited
/// (`EX_TEMPFAIL` from `sysexits.h`).
pub const EXIT_RATE_LIMITED: i32 = 75;

/// Runs an external program per request: source bytes on stdin, cutout bytes on stdout.
///
/// The child is killed if the call is dropped, e.g. on timeout.
#[derive(Clone, Debug)]
pub struct CommandSegmenter {
    program: OsString,
    args: Vec<OsString>,
    name: String,
}

impl CommandSegmenter {
    pub fn new(program: impl Into<OsString>) -> Self {
        let program = program.into();
        let name = format!("command:{}", program.to_string_lossy());
        Self {
            program,
            args: Vec::new(),
            name,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[async_trait::async_trait]
impl Segmenter for CommandSegmenter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn segment(&self, request: &SegmentationRequest) -> Result<Vec<u8>, SegmentationError> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            SegmentationError::service(format!(
                "failed to spawn '{}': {e}",
                self.program.to_string_lossy()
            ))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SegmentationError::service("segmenter stdin unavailable"))?;
        let input = request.image.clone();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SegmentationError::service(format!("segmenter did not finish: {e}")))?;
        match writer.await {
            Ok(Ok(())) => {}
            // A program may legitimately stop reading early; its exit status decides.
            Ok(Err(e)) => tracing::debug!(error = %e, "segmenter closed stdin early"),
            Err(e) => tracing::debug!(error = %e, "stdin writer task aborted"),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            let msg = format!("{} exited with {}: {detail}", self.name, output.status);
            return Err(match output.status.code() {
                Some(EXIT_RATE_LIMITED) => SegmentationError::rate_limited(msg),
                _ => SegmentationError::service(msg),
            });
        }
        if output.stdout.is_empty() {
            return Err(SegmentationError::invalid_response(format!(
                "{} produced no output",
                self.name
            )));
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/command.rs"]
mod tests;
