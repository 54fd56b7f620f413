#![cfg(feature = "cdp")]

//! End-to-end tests against a real headless Chrome

use std::io::Write;
use std::process::{Command, Stdio};

const HELLO: &str = "<html><body>Hello</body></html>";

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn test_render_file_to_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hello.html");
    std::fs::write(&input, HELLO).unwrap();

    let pdf = htmltopdf::render(htmltopdf::RenderRequest::from_path(&input))
        .await
        .expect("Failed to render");

    assert!(pdf.as_bytes().len() > 100, "PDF data seems too small");
    assert!(pdf.as_bytes().starts_with(b"%PDF-"));
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let request = htmltopdf::RenderRequest::from_path(dir.path().join("absent.html"));
    assert!(htmltopdf::render(request).await.is_err());
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_cli_stdin_to_stdout() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_htmltopdf"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn htmltopdf");

    child.stdin.take().unwrap().write_all(HELLO.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.starts_with(b"%PDF-"));
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_cli_writes_output_file_with_footer() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.html");
    let footer = dir.path().join("footer.html");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, HELLO).unwrap();
    std::fs::write(&footer, "<div style=\"font-size:8px\">page footer</div>").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_htmltopdf"))
        .args(["--pagesize", "A4", "--landscape", "-i"])
        .arg(&input)
        .arg("-f")
        .arg(&footer)
        .arg("-o")
        .arg(&output)
        .status()
        .expect("Failed to run htmltopdf");

    assert!(status.success());
    assert!(std::fs::read(&output).unwrap().starts_with(b"%PDF-"));
}

#[test]
fn test_cli_rejects_unknown_page_size() {
    let output = Command::new(env!("CARGO_BIN_EXE_htmltopdf"))
        .args(["--pagesize", "B5"])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run htmltopdf");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_missing_footer_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");

    let result = Command::new(env!("CARGO_BIN_EXE_htmltopdf"))
        .arg("-f")
        .arg(dir.path().join("no-footer.html"))
        .arg("-o")
        .arg(&output)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run htmltopdf");

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("footer"));
    assert!(!output.exists());
}
