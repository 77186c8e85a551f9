//! End-to-end tests for the command shell.

#![cfg(feature = "std")]

use buddy_unit_allocator::{Shell, ShellConfig};
use std::io::Cursor;

fn run_script(total_units: usize, script: &str) -> (Shell, String) {
    let mut shell = Shell::new(ShellConfig::new(total_units)).unwrap();
    let mut out = Vec::new();
    shell.run(Cursor::new(script), &mut out).unwrap();
    (shell, String::from_utf8(out).unwrap())
}

#[test]
fn test_cli_basic_flow() {
    let (shell, out) = run_script(
        8,
        "SHOW\nRESERVE 1 foo\nRESERVE 2 bar\nFREE foo\nSHOW\nEXIT\n",
    );

    assert!(out.starts_with("Buddy allocator started with 8 units\n"));
    assert!(out.contains("Reserved 'foo' at start 0, size 1 (order 0)"));
    assert!(out.contains("Reserved 'bar' at start 2, size 2 (order 1)"));
    assert!(out.contains("Freed 'foo'"));
    assert!(out.contains("Total units: 8 (orders 0..3)"));
    assert!(out.ends_with("ACTION> Bye\n"));
    assert_eq!(shell.allocator().allocation_count(), 1);
}

#[test]
fn test_usage_and_numeric_errors_do_not_stop_loop() {
    let (shell, out) = run_script(
        4,
        "RESERVE 1\nFREE\nRESERVE abc x\nJUMP\n\nreserve 4 whole\n",
    );

    assert!(out.contains("Usage: RESERVE <count> <name>\n"));
    assert!(out.contains("Usage: FREE <name>\n"));
    assert!(out.contains("ERROR: expected a numeric value\n"));
    assert!(out.contains("Unknown action. Valid: RESERVE, FREE, SHOW, EXIT\n"));
    assert!(out.contains("Reserved 'whole' at start 0, size 4 (order 2)"));
    assert!(!out.contains("Bye"));
    assert_eq!(shell.allocator().free_units(), 0);
}

#[test]
fn test_core_errors_are_reported() {
    let (_, out) = run_script(
        4,
        "RESERVE 1 A\nRESERVE 1 A\nRESERVE -1 neg\nFREE NOPE\nRESERVE 8 big\nSALIR\n",
    );

    assert!(out.contains("ERROR: name 'A' is already reserved\n"));
    assert!(out.contains("ERROR: requested unit count must be positive\n"));
    assert!(out.contains("ERROR: name 'NOPE' was not found\n"));
    assert!(out.contains("ERROR: no free block large enough for 8 units (order 3)\n"));
    assert!(out.ends_with("Bye\n"));
}

#[test]
fn test_show_output() {
    let (_, out) = run_script(8, "RESERVAR 1 uno\nMOSTRAR\nexit\n");
    let expected = "Total units: 8 (orders 0..3)\n\
                    Free lists:\n  \
                    order 3 (size=8): []\n  \
                    order 2 (size=4): [4]\n  \
                    order 1 (size=2): [2]\n  \
                    order 0 (size=1): [1]\n\
                    Allocations:\n  \
                    uno: start=0, size=1 (order 0)\n";
    assert!(out.contains(expected), "unexpected output:\n{out}");
}

#[test]
fn test_invalid_pool_size() {
    assert!(Shell::new(ShellConfig::new(12)).is_err());
    assert!(Shell::new(ShellConfig::new(0)).is_err());
}

#[test]
fn test_no_banner() {
    let mut config = ShellConfig::new(2);
    config.banner = false;
    config.prompt = String::new();
    let mut shell = Shell::new(config).unwrap();
    let mut out = Vec::new();
    shell.run(Cursor::new("RESERVE 2 a\n"), &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Reserved 'a' at start 0, size 2 (order 1)\n"
    );
}

#[test]
fn test_non_utf8_line_does_not_stop_loop() {
    let mut shell = Shell::new(ShellConfig::new(8)).unwrap();
    let mut out = Vec::new();
    let script: &[u8] = b"RESERVE 1 a\nRESERVE 1 \xff\xfe\nRESERVE 2 b\nEXIT\n";
    shell.run(Cursor::new(script), &mut out).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("ERROR: input is not valid UTF-8\n"));
    assert!(out.contains("Reserved 'b' at start 2, size 2 (order 1)"));
    assert!(out.ends_with("ACTION> Bye\n"));
    assert_eq!(shell.allocator().allocation_count(), 2);
}

#[test]
fn test_count_wider_than_any_integer_is_out_of_space() {
    let (shell, out) = run_script(
        8,
        "RESERVE 123456789012345678901234567890123456789012345678901234567890 big\nEXIT\n",
    );
    assert!(out.contains("ERROR: no free block large enough for"));
    assert!(!out.contains("expected a numeric value"));
    assert_eq!(shell.allocator().allocation_count(), 0);
}
