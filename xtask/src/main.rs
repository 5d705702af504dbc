// xtask - Build automation for lox
// Copyright (c) 2025 The lox contributors. MIT licensed.

use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio, exit};

const EXIT_COMPILE_ERROR: i32 = 65;
const EXIT_RUNTIME_ERROR: i32 = 70;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("install") => install(&args[1..]),
        Some("uninstall") => uninstall(&args[1..]),
        Some("test") => test(&args[1..]),
        Some("help") | Some("-h") | Some("--help") | None => help(),
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            help();
            exit(1);
        }
    }
}

fn help() {
    println!(
        r#"lox xtask - Build automation

USAGE:
    cargo xtask <COMMAND>

COMMANDS:
    install [--prefix <PATH>]   Build release and install to ~/.cargo/bin (or PREFIX/bin)
    uninstall [--prefix <PATH>] Remove installed files
    test [OPTIONS] [PATTERN]    Run the test/lox script suite
    help                        Show this message

TEST OPTIONS:
    --release       Run scripts with release build
    --verbose, -v   Show every expectation checked
    --failing       Show only failing scripts
    PATTERN         Filter scripts by filename pattern (e.g., "scope")

SCRIPT EXPECTATIONS:
    // expect: TEXT                   next stdout line is TEXT
    // expect runtime error: MESSAGE  exit 70, stderr starts with MESSAGE
    // expect compile error           exit 65

EXAMPLES:
    cargo xtask test              Run all scripts
    cargo xtask test scope        Run scripts matching "scope"
    cargo xtask test --verbose    Run all scripts with detailed output
"#
    );
}

fn get_bin_dir(args: &[String]) -> PathBuf {
    let prefix = if let Some(pos) = args.iter().position(|a| a == "--prefix") {
        args.get(pos + 1).map(PathBuf::from).unwrap_or_else(|| {
            eprintln!("--prefix requires a path argument");
            exit(1);
        })
    } else {
        dirs_home().join(".cargo")
    };
    prefix.join("bin")
}

fn dirs_home() -> PathBuf {
    env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| {
        eprintln!("Could not determine home directory");
        exit(1);
    })
}

fn project_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir).parent().unwrap().to_path_buf()
}

fn cargo_build(root: &Path, release: bool) {
    let mut build_args = vec!["build", "--quiet", "--bin", "lox"];
    if release {
        build_args.push("--release");
    }

    let status = Command::new("cargo")
        .args(&build_args)
        .current_dir(root)
        .status()
        .expect("Failed to run cargo build");

    if !status.success() {
        eprintln!("Build failed");
        exit(1);
    }
}

fn install(args: &[String]) {
    let bin_dir = get_bin_dir(args);
    let root = project_root();

    println!("Building release...");
    cargo_build(&root, true);

    fs::create_dir_all(&bin_dir).expect("Failed to create bin directory");

    let src_binary = root.join("target/release/lox");
    let dst_binary = bin_dir.join("lox");
    println!(
        "Installing {} -> {}",
        src_binary.display(),
        dst_binary.display()
    );
    fs::copy(&src_binary, &dst_binary).expect("Failed to copy lox binary");
    fs::set_permissions(&dst_binary, fs::Permissions::from_mode(0o755))
        .expect("Failed to set permissions");

    println!("\nInstalled lox to {}", bin_dir.display());
    println!("Ensure {} is in your PATH", bin_dir.display());
}

fn uninstall(args: &[String]) {
    let bin_dir = get_bin_dir(args);

    let lox = bin_dir.join("lox");
    if lox.exists() {
        println!("Removing {}", lox.display());
        fs::remove_file(&lox).expect("Failed to remove file");
    }

    println!("Uninstalled lox from {}", bin_dir.display());
}

// =============================================================================
// Test Command
// =============================================================================

/// What a script says it should do, read from its comments.
#[derive(Debug, Default)]
struct Expectations {
    output: Vec<String>,
    runtime_error: Option<String>,
    compile_error: bool,
}

impl Expectations {
    fn parse(source: &str) -> Self {
        let mut expected = Self::default();
        for line in source.lines() {
            if let Some(text) = after_marker(line, "// expect: ") {
                expected.output.push(text.to_string());
            } else if let Some(message) = after_marker(line, "// expect runtime error: ") {
                expected.runtime_error = Some(message.to_string());
            } else if line.contains("// expect compile error") {
                expected.compile_error = true;
            }
        }
        expected
    }

    fn exit_code(&self) -> i32 {
        if self.compile_error {
            EXIT_COMPILE_ERROR
        } else if self.runtime_error.is_some() {
            EXIT_RUNTIME_ERROR
        } else {
            0
        }
    }

    /// Number of checks this script makes, the exit code included.
    fn count(&self) -> u32 {
        self.output.len() as u32 + 1 + u32::from(self.runtime_error.is_some())
    }
}

fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|pos| &line[pos + marker.len()..])
}

#[derive(Debug)]
struct TestResult {
    name: String,
    checks: u32,
    failures: Vec<String>,
}

impl TestResult {
    fn is_perfect(&self) -> bool {
        self.failures.is_empty()
    }

    fn passed(&self) -> u32 {
        self.checks.saturating_sub(self.failures.len() as u32)
    }
}

fn test(args: &[String]) {
    let root = project_root();
    let test_dir = root.join("test/lox");

    // Parse arguments
    let release = args.iter().any(|a| a == "--release");
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let failing_only = args.iter().any(|a| a == "--failing");
    let pattern: Option<&str> = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .map(String::as_str);

    // Build first
    println!("Building lox{}...", if release { " (release)" } else { "" });
    cargo_build(&root, release);

    let binary = if release {
        root.join("target/release/lox")
    } else {
        root.join("target/debug/lox")
    };

    let mut test_files: Vec<PathBuf> = fs::read_dir(&test_dir)
        .expect("Failed to read test directory")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "lox"))
        .filter(|p| {
            if let Some(pat) = pattern {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.contains(pat))
            } else {
                true
            }
        })
        .collect();

    test_files.sort();

    if test_files.is_empty() {
        if let Some(pat) = pattern {
            eprintln!("No test files matching pattern: {}", pat);
        } else {
            eprintln!("No test files found in {}", test_dir.display());
        }
        exit(1);
    }

    println!(
        "\nRunning {} test file{}...\n",
        test_files.len(),
        if test_files.len() == 1 { "" } else { "s" }
    );

    let mut results: Vec<TestResult> = Vec::new();

    for test_file in &test_files {
        let result = run_script(&binary, test_file);

        if verbose {
            println!("=== {} ===", result.name);
            for failure in &result.failures {
                println!("  {}", failure);
            }
            println!("  {}/{} checks passed\n", result.passed(), result.checks);
        } else if !failing_only {
            print!("{}", if result.is_perfect() { "." } else { "F" });
        }

        results.push(result);
    }

    if !verbose {
        println!();
    }

    print_test_summary(&results, failing_only);
}

fn run_script(binary: &Path, path: &Path) -> TestResult {
    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let source = fs::read_to_string(path).expect("Failed to read test file");
    let expected = Expectations::parse(&source);

    let output = Command::new(binary)
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to run test");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut failures = Vec::new();

    let code = output.status.code().unwrap_or(-1);
    if code != expected.exit_code() {
        failures.push(format!(
            "exit code {} (expected {})",
            code,
            expected.exit_code()
        ));
    }

    let actual: Vec<&str> = stdout.lines().collect();
    for (i, want) in expected.output.iter().enumerate() {
        match actual.get(i) {
            Some(got) if got == want => {}
            Some(got) => failures.push(format!("line {}: got {:?}, expected {:?}", i + 1, got, want)),
            None => failures.push(format!("line {}: missing, expected {:?}", i + 1, want)),
        }
    }
    if actual.len() > expected.output.len() {
        failures.push(format!(
            "{} unexpected output line(s)",
            actual.len() - expected.output.len()
        ));
    }

    if let Some(message) = &expected.runtime_error
        && !stderr.lines().next().is_some_and(|first| first == message)
    {
        failures.push(format!("stderr {:?}, expected {:?}", stderr.trim(), message));
    }

    TestResult {
        name,
        checks: expected.count(),
        failures,
    }
}

fn print_test_summary(results: &[TestResult], failing_only: bool) {
    let total_checks: u32 = results.iter().map(|r| r.checks).sum();
    let total_passed: u32 = results.iter().map(TestResult::passed).sum();

    let perfect_count = results.iter().filter(|r| r.is_perfect()).count();
    let imperfect: Vec<&TestResult> = results.iter().filter(|r| !r.is_perfect()).collect();

    println!("\n{}", "=".repeat(70));
    println!("TEST SUMMARY");
    println!("{}", "=".repeat(70));

    if !failing_only && perfect_count > 0 {
        println!("\nPassing ({} scripts):", perfect_count);
        for result in results.iter().filter(|r| r.is_perfect()) {
            println!("  ✓ {} - {} checks", result.name, result.checks);
        }
    }

    if !imperfect.is_empty() {
        println!("\nFailing ({} scripts):", imperfect.len());
        for result in &imperfect {
            println!(
                "  ✗ {} - {}/{} checks",
                result.name,
                result.passed(),
                result.checks
            );
            for failure in &result.failures {
                println!("      {}", failure);
            }
        }
    }

    println!("\n{}", "-".repeat(70));
    println!(
        "TOTAL: {}/{} checks across {} scripts",
        total_passed,
        total_checks,
        results.len()
    );
    println!("{}", "=".repeat(70));

    if !imperfect.is_empty() {
        exit(1);
    }
}
