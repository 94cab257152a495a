//! # eva driver
//!
//! Reads one statement per line, terminates it with `;` and evaluates it.
//! Results go to the output writer followed by a blank line; diagnostics go to
//! the error writer and the loop moves on to the next line.

use eva_compiler::config::RuntimeConfig;
use eva_compiler::logging::{self, codes};
use eva_compiler::pipeline::{self, SessionStats};
use eva_compiler::{log_error, log_info, log_success};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Source name used in diagnostics when reading standard input
pub const STDIN_SOURCE: &str = "<stdin>";

/// Everything the line loop needs besides its streams
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: RuntimeConfig,
    pub source_name: String,
}

impl RunOptions {
    pub fn new(config: RuntimeConfig, source_name: impl Into<String>) -> Self {
        Self {
            config,
            source_name: source_name.into(),
        }
    }

    pub fn show_tree(&self) -> bool {
        self.config.session.show_tree
    }

    pub fn print_summary(&self) -> bool {
        self.config.session.print_summary
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new(RuntimeConfig::default(), STDIN_SOURCE)
    }
}

/// Open `path` as a line source, or standard input when no path is given
pub fn open_input(path: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                log_error!(codes::input::SOURCE_NOT_FOUND, "Cannot open input",
                    "path" => path.display(),
                    "error" => &e
                );
                e
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Evaluate every line of `input` until it is exhausted
///
/// Per-line failures are written to `err` and counted; only I/O failures on
/// the streams themselves end the loop early.
pub fn run<R: BufRead, W: Write, E: Write>(
    mut input: R,
    out: &mut W,
    err: &mut E,
    options: &RunOptions,
) -> io::Result<SessionStats> {
    let mut stats = SessionStats::new();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    log_info!("Session started", "source" => &options.source_name);

    loop {
        buffer.clear();
        let read = input.read_until(b'\n', &mut buffer).map_err(|e| {
            log_error!(codes::input::READ_FAILURE, "Read failed",
                "source" => &options.source_name,
                "error" => &e
            );
            e
        })?;
        if read == 0 {
            break;
        }

        line_number += 1;
        let line = String::from_utf8_lossy(strip_line_ending(&buffer));

        logging::with_statement_context(&options.source_name, line_number, || {
            evaluate_line(&line, out, err, options, &mut stats)
        })?;
    }

    log_success!(codes::success::SESSION_COMPLETE, "Session complete",
        "source" => &options.source_name,
        "lines" => stats.lines_read,
        "evaluated" => stats.evaluated,
        "failures" => stats.failures()
    );

    Ok(stats)
}

fn evaluate_line<W: Write, E: Write>(
    line: &str,
    out: &mut W,
    err: &mut E,
    options: &RunOptions,
    stats: &mut SessionStats,
) -> io::Result<()> {
    match pipeline::process_line_with(line, &options.config) {
        Ok(outcome) => {
            if options.show_tree() {
                write!(err, "{}", outcome.tree.render())?;
            }
            out.write_all(outcome.render_result().as_bytes())?;
            out.flush()?;
            stats.record_success(&outcome);
        }
        Err(error) => {
            writeln!(err, "{}", error.diagnostic())?;
            stats.record_failure(&error);
        }
    }
    Ok(())
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Write the end-of-session summary, as JSON when `json` is set
pub fn write_summary<E: Write>(err: &mut E, stats: &SessionStats, json: bool) -> io::Result<()> {
    if json {
        let rendered = stats
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(err, "{}", rendered)
    } else {
        writeln!(err, "{}", stats.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::{Cursor, Read};

    fn run_text(text: &str, options: &RunOptions) -> (String, String, SessionStats) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let stats = run(Cursor::new(text.as_bytes()), &mut out, &mut err, options).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            stats,
        )
    }

    fn options() -> RunOptions {
        let mut config = RuntimeConfig::default();
        config.session.show_tree = false;
        RunOptions::new(config, "test")
    }

    #[test]
    fn test_results_are_followed_by_blank_line() {
        let (out, err, stats) = run_text("1+2\n2*3+4\n(1+2)*3\n42\n", &options());

        assert_eq!(out, "3\n\n14\n\n9\n\n42\n\n");
        assert!(err.is_empty());
        assert_eq!(stats.evaluated, 4);
    }

    #[test]
    fn test_failures_do_not_stop_the_loop() {
        let (out, err, stats) = run_text("2+*3\n1+\n5\n", &options());

        assert_eq!(out, "5\n\n");
        let diagnostics: Vec<&str> = err.lines().collect();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].starts_with("parse error: syntax error: unexpected '*'"));
        assert_eq!(diagnostics[1], "parse error: unexpected EOF");
        assert_eq!(stats.parse_failures, 2);
        assert_eq!(stats.lines_read, 3);
    }

    #[test]
    fn test_bad_token_and_overflow() {
        let (out, err, stats) = run_text("1+a\n18446744073709551615+1\n7*6", &options());

        assert_eq!(out, "42\n\n");
        let diagnostics: Vec<&str> = err.lines().collect();
        assert!(diagnostics[0].starts_with("parse error: bad token 'a'"));
        assert!(diagnostics[1].starts_with("evaluation error: "));
        assert_eq!(stats.evaluation_failures, 1);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let (out, err, stats) = run_text("1+1\r\n\n", &options());

        assert_eq!(out, "2\n\n");
        assert_eq!(err, "parse error: unexpected EOF\n");
        assert_eq!(stats.lines_read, 2);
    }

    #[test]
    fn test_empty_input() {
        let (out, err, stats) = run_text("", &options());

        assert!(out.is_empty());
        assert!(err.is_empty());
        assert_eq!(stats.lines_read, 0);
    }

    #[test]
    fn test_show_tree_goes_to_error_stream() {
        let mut opts = options();
        opts.config.session.show_tree = true;
        let (out, err, _) = run_text("1+2\n", &opts);

        assert_eq!(out, "3\n\n");
        assert_eq!(err, "+\n\t1\n\t2\n");
    }

    #[test]
    fn test_file_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(2+3)*4").unwrap();
        writeln!(file, "1+(").unwrap();

        let input = open_input(Some(file.path())).unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let stats = run(input, &mut out, &mut err, &options()).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "20\n\n");
        assert_eq!(stats.evaluated, 1);
        assert_eq!(stats.parse_failures, 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = open_input(Some(&dir.path().join("absent.txt")))
            .err()
            .expect("opening a missing file must fail");

        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn test_read_error_ends_session() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = run(BufReader::new(FailingReader), &mut out, &mut err, &options());

        assert_matches!(result, Err(e) if e.to_string() == "device gone");
    }

    #[test]
    fn test_write_summary() {
        let (_, _, stats) = run_text("1\n+\n", &options());

        let mut text = Vec::new();
        write_summary(&mut text, &stats, false).unwrap();
        assert!(String::from_utf8(text).unwrap().starts_with("2 lines read: 1 evaluated"));

        let mut json = Vec::new();
        write_summary(&mut json, &stats, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["evaluated"], 1);
    }
}
