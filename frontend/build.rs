use std::env;
use std::fs;
use std::path::Path;

/// 构建期配置能识别的变量，其余行忽略
const KNOWN_KEYS: [&str; 4] = [
    "STORY_API_URL",
    "STORY_SESSION_KEY",
    "STORY_PAGE_SIZE",
    "STORY_VAPID_KEY",
];

fn main() {
    // 把 .env 中的变量注入为编译期环境变量，供 option_env! 读取
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    // 命令行已设置的变量优先
                    if KNOWN_KEYS.contains(&key) && env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    }

    for key in KNOWN_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
