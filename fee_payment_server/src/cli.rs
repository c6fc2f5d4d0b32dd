use std::env;

/// Non-secret environment variables, printed with the help text. Secrets (the JWT, gateway and HMAC keys) are left
/// out on purpose.
const PUBLIC_ENVS: [&str; 13] = [
    "RUST_LOG",
    "FPG_HOST",
    "FPG_PORT",
    "FPG_DATABASE_URL",
    "FPG_DB_MAX_CONNECTIONS",
    "FPG_SCHOOL_ID",
    "FPG_GATEWAY_NAME",
    "FPG_DEFAULT_CALLBACK_URL",
    "FPG_GATEWAY_URL",
    "FPG_WEBHOOK_HMAC_CHECKS",
    "FPG_USE_X_FORWARDED_FOR",
    "FPG_USE_FORWARDED",
    "FPG_CORS_ORIGINS",
];

/// The server takes no arguments. If any are given, print the help and the current configuration and return true, so
/// that the caller can exit.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{}\n", include_str!("./cli-help.txt"));
    println!("Current environment values (EXCLUDING variables that contain secrets):");
    for name in PUBLIC_ENVS {
        println!("  {name:<35} {}", describe_env(name));
    }
    true
}

fn describe_env(name: &str) -> String {
    match env::var_os(name) {
        None => "Not set".to_string(),
        Some(val) => match val.into_string() {
            Ok(s) => s,
            Err(raw) => format!("Invalid value: {}", raw.to_string_lossy()),
        },
    }
}
