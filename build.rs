use std::env;
use std::fs::{read_to_string, write, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;

fn git_describe_value() -> String {
    // GIT_DESCRIBE wins, then `git describe`, then the crate version
    env::var("GIT_DESCRIBE").unwrap_or_else(|_| {
        Command::new("git")
            .args(["describe", "--tags", "--always"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| String::from_utf8(output.stdout).ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| env::var("CARGO_PKG_VERSION").unwrap_or_default())
    })
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let git_describe = Path::new(&out_dir).join("GIT_DESCRIBE");
    let git_describe_rs = Path::new(&out_dir).join("git_describe.rs");

    let old_value = read_to_string(&git_describe).unwrap_or_default();
    let new_value = git_describe_value();

    if new_value != old_value || !git_describe_rs.exists() {
        println!("BUILD_RS: old_value='{old_value}' != new_value='{new_value}'");

        write(&git_describe, &new_value).unwrap();

        let mut f = File::create(&git_describe_rs).unwrap();
        write!(f, "pub const GIT_DESCRIBE: &str = {:?};", new_value).unwrap();
    }

    println!("cargo:rerun-if-env-changed=GIT_DESCRIBE");
    println!("cargo:rerun-if-changed=build.rs");
}
