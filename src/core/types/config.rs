use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "mutor.toml";

pub const DEFAULT_TEST_CMD: &str = "cargo test";
pub const DEFAULT_TEST_TIMEOUT: u32 = 300;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TestConfig {
    pub cmd: Option<String>,
    pub timeout: Option<u32>,
    pub pass_marker: Option<String>,
    pub fail_marker: Option<String>,
}

impl TestConfig {
    pub fn cmd(&self) -> &str {
        self.cmd.as_deref().unwrap_or(DEFAULT_TEST_CMD)
    }

    pub fn timeout(&self) -> u32 {
        self.timeout.unwrap_or(DEFAULT_TEST_TIMEOUT)
    }

    pub fn pass_marker(&self) -> &str {
        self.pass_marker.as_deref().unwrap_or("passed")
    }

    pub fn fail_marker(&self) -> &str {
        self.fail_marker.as_deref().unwrap_or("failed")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RunConfig {
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub log: Option<LogConfig>,
    pub test: Option<TestConfig>,
    pub run: Option<RunConfig>,
}

impl Config {
    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn test(&self) -> TestConfig {
        self.test.clone().unwrap_or_default()
    }

    pub fn run(&self) -> RunConfig {
        self.run.clone().unwrap_or_default()
    }

    pub fn resolve_test_cmd(&self, cli_cmd: Option<&str>) -> String {
        match cli_cmd {
            Some(cmd) if !cmd.trim().is_empty() => cmd.to_string(),
            _ => self.test().cmd().to_string(),
        }
    }

    pub fn resolve_test_timeout(&self, cli_timeout: Option<u32>) -> u32 {
        cli_timeout.unwrap_or_else(|| self.test().timeout())
    }

    pub fn resolve_seed(&self, cli_seed: Option<u64>) -> Option<u64> {
        cli_seed.or(self.run().seed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
}

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let mut cfg = Config::default();
        if let Some(path) = find_nearest_config_file()
            && let Some(file_cfg) = read_config_file(&path)
        {
            apply_file_config(&mut cfg, &file_cfg);
        }
        cfg
    })
}

pub fn init_with_overrides(overrides: &CliOverrides) {
    let mut cfg = Config::default();

    // 1) Config file: walk up from cwd and use the first config file found
    if let Some(path) = find_nearest_config_file()
        && let Some(file_cfg) = read_config_file(&path)
    {
        apply_file_config(&mut cfg, &file_cfg);
    }

    // 2) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides);

    let _ = CONFIG.set(cfg);
}

fn read_config_file(path: &Path) -> Option<Config> {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str::<Config>(&contents).ok(),
        Err(_) => None,
    }
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    if let Some(file_test) = &file.test {
        let mut test = cfg.test.clone().unwrap_or_default();
        if file_test.cmd.is_some() {
            test.cmd = file_test.cmd.clone();
        }
        if file_test.timeout.is_some() {
            test.timeout = file_test.timeout;
        }
        if file_test.pass_marker.is_some() {
            test.pass_marker = file_test.pass_marker.clone();
        }
        if file_test.fail_marker.is_some() {
            test.fail_marker = file_test.fail_marker.clone();
        }
        cfg.test = Some(test);
    }

    if let Some(file_run) = &file.run {
        let mut run = cfg.run.clone().unwrap_or_default();
        if file_run.seed.is_some() {
            run.seed = file_run.seed;
        }
        cfg.run = Some(run);
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled(),
    }
}
