use std::env;

fn main() {
    // Build identification printed by the '?' command and at startup.
    // YUNIBEER_BUILD_TAG overrides the default "<version>-<profile>" string,
    // e.g. for a tagged release or a hardware-variant build.
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".into());

    if let Ok(tag) = env::var("YUNIBEER_BUILD_TAG") {
        println!("cargo:rustc-env=YUNIBEER_BUILD_INFO={}", tag);
        println!("cargo:warning=Using YUNIBEER_BUILD_TAG from environment: {}", tag);
    } else {
        println!("cargo:rustc-env=YUNIBEER_BUILD_INFO={}-{}", version, profile);
    }

    // Rerun if environment variables change
    println!("cargo:rerun-if-env-changed=YUNIBEER_BUILD_TAG");
}
