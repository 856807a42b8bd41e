#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use cqload::cli::{actions::Action, commands, dispatch};

fn api_url(args: &[&str]) -> anyhow::Result<String> {
    let matches = commands::new().try_get_matches_from(args)?;
    match dispatch::dispatch(&matches)? {
        Action::Load { api_url, .. } => Ok(api_url),
    }
}

// One test per file, the environment is shared by the whole process
#[test]
fn test_admin_port_from_environment() {
    // SAFETY: no other test runs in this binary
    unsafe {
        std::env::set_var("ADMIN_PORT", "9000");
    }

    assert_eq!(api_url(&["cqload"]).unwrap(), "http://localhost:9000/admin");

    // --server replaces the port taken from the environment
    assert_eq!(
        api_url(&["cqload", "--server", "https://conquery.example/"]).unwrap(),
        "https://conquery.example/admin"
    );

    // an explicit --port still clashes with --server
    assert!(api_url(&["cqload", "--server", "https://conquery.example", "--port", "9001"]).is_err());
}
