// ============================================================================
// yield-oracle
// Prints one hex word to stdout; `0x0` and exit status 1 on any failure
// ============================================================================

use std::io::{self, Write};
use std::process::ExitCode;

use yield_oracle::cli;
use yield_oracle::encoding::EncodedHex;

#[cfg(feature = "logging")]
fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // stdout carries the result only
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(not(feature = "logging"))]
fn init_logging() {}

/// Write the result without a trailing newline.
fn emit<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

fn main() -> ExitCode {
    init_logging();

    let (text, status) = match cli::run(std::env::args_os()) {
        Ok(hex) => (hex.into_string(), ExitCode::SUCCESS),
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "computation failed");
            (EncodedHex::SENTINEL.to_string(), ExitCode::FAILURE)
        }
    };

    match emit(&mut io::stdout().lock(), &text) {
        Ok(()) => status,
        Err(err) => {
            tracing::warn!(error = %err, "failed to write result");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_emit_writes_text_only() {
        let mut out = Vec::new();
        emit(&mut out, EncodedHex::SENTINEL).unwrap();
        assert_eq!(out, b"0x0");
    }

    #[test]
    fn test_emit_reports_write_failure() {
        let err = emit(&mut ClosedPipe, "0x1").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
