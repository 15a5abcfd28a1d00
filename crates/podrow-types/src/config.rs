//! Pod row configuration.
//!
//! Every value has a default matching the stock login screen, so an empty
//! TOML document is a valid config. Pixel constants live in [`LayoutConfig`],
//! timer delays in [`TimingConfig`].

use std::path::Path;

use serde::Deserialize;

use crate::error::{PodRowError, Result};

/// Which screen hosts the pod row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayType {
    /// Regular sign-in screen.
    #[default]
    Login,
    /// Screen lock.
    Lock,
    /// Adding a user to an existing multi-profile session.
    UserAdding,
    /// Desktop (non-OS) profile picker.
    DesktopUserManager,
}

impl DisplayType {
    pub fn is_desktop(self) -> bool {
        self == DisplayType::DesktopUserManager
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PodRowConfig {
    pub display: DisplayType,
    pub layout: LayoutConfig,
    pub timing: TimingConfig,
}

/// Grid geometry constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub pod_width: u32,
    pub pod_height: u32,
    pub desktop_pod_height: u32,
    pub row_padding: u32,
    pub desktop_row_padding: u32,
    /// Preferred column count indexed by pod count; the last entry covers
    /// every larger count.
    pub columns_by_pod_count: Vec<u32>,
    /// Horizontal margin between pods, indexed by `columns - 1`.
    pub margin_by_columns: Vec<u32>,
    pub desktop_margin_by_columns: Vec<u32>,
    pub max_columns: u32,
    pub max_rows_under_banner: u32,
    pub public_expanded_basic_width: u32,
    pub public_expanded_advanced_width: u32,
    /// Minimal gap kept between a focused pod and the visible area edges.
    pub keyboard_min_padding: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pod_width: 180,
            pod_height: 213,
            desktop_pod_height: 226,
            row_padding: 10,
            desktop_row_padding: 15,
            columns_by_pod_count: vec![0, 1, 2, 3, 4, 5, 4, 4, 4, 5, 5, 6, 6, 5, 5, 6, 6, 6, 6],
            margin_by_columns: vec![40, 40, 40, 40, 40, 12],
            desktop_margin_by_columns: vec![15, 15, 15, 15, 15, 15],
            max_columns: 6,
            max_rows_under_banner: 2,
            public_expanded_basic_width: 500,
            public_expanded_advanced_width: 610,
            keyboard_min_padding: 20,
        }
    }
}

/// Timer delays, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub hover_delay_ms: u64,
    pub autoshow_enable_ms: u64,
    pub autoshow_disable_ms: u64,
    pub images_load_timeout_ms: u64,
    pub expand_transition_ms: u64,
    pub advanced_transition_ms: u64,
    pub show_transition_ms: u64,
    pub kiosk_error_check_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            hover_delay_ms: 1000,
            autoshow_enable_ms: 1000,
            autoshow_disable_ms: 5000,
            images_load_timeout_ms: 3000,
            expand_transition_ms: 200,
            advanced_transition_ms: 380,
            show_transition_ms: 1000,
            kiosk_error_check_ms: 500,
        }
    }
}

impl PodRowConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: PodRowConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::info!("Loaded pod row config from {}", path.display());
        Ok(config)
    }

    /// Reject configs the layout engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        if l.max_columns == 0 {
            return Err(PodRowError::Config("max_columns must be positive".into()));
        }
        if l.columns_by_pod_count.is_empty() {
            return Err(PodRowError::Config(
                "columns_by_pod_count must not be empty".into(),
            ));
        }
        let needed = l.max_columns as usize;
        if l.margin_by_columns.len() < needed || l.desktop_margin_by_columns.len() < needed {
            return Err(PodRowError::Config(format!(
                "margin tables need {needed} entries (one per column count)"
            )));
        }
        if l.pod_width == 0 || l.pod_height == 0 || l.desktop_pod_height == 0 {
            return Err(PodRowError::Config("pod size must be positive".into()));
        }
        Ok(())
    }
}
