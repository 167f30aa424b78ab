use l3d_kernel::MemoryCatalog;
use serde::Serialize;
use std::fs;

pub fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

pub fn read_json_file_or_exit<T>(path: &str, label: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {}: {e}", path);
        std::process::exit(1);
    });
    serde_json::from_slice::<T>(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {label} JSON at {}: {e}", path);
        std::process::exit(1);
    })
}

/// Load a catalog file, or an empty catalog when no path is given.
pub fn load_catalog_or_exit(path: Option<&str>) -> MemoryCatalog {
    let Some(path) = path else {
        return MemoryCatalog::new();
    };
    let raw: serde_json::Value = read_json_file_or_exit(path, "catalog");
    MemoryCatalog::from_value(&raw).unwrap_or_else(|e| {
        eprintln!("error: invalid catalog at {path}: {e}");
        std::process::exit(1);
    })
}

pub fn print_json_or_exit<T: Serialize + ?Sized>(value: &T, label: &str) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        eprintln!("error: failed to render {label}: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}

pub fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("error: {context}: {err}");
    std::process::exit(1);
}
