use std::sync::OnceLock;

use gist_common::observability::LogConfig;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "pagegist-tests",
            emit_stderr: true,
            default_filter: "debug",
            ..LogConfig::default()
        };

        gist_common::observability::init_logging(config).unwrap_or_default()
    });
}
