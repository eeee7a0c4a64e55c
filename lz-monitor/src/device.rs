//! Device and environment facts, read once from the user agent

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "Unknown";

/// Static fact sheet attached to every report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub browser: String,
    pub browser_version: String,
    pub os: String,
    pub os_version: String,
    pub ua: String,
    pub device: String,
    pub device_type: String,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            browser: UNKNOWN.to_string(),
            browser_version: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
            os_version: UNKNOWN.to_string(),
            ua: String::new(),
            device: UNKNOWN.to_string(),
            device_type: "Pc".to_string(),
        }
    }
}

struct Rule {
    name: &'static str,
    pattern: Regex,
}

fn compile(rules: &[(&'static str, &str)]) -> Vec<Rule> {
    rules
        .iter()
        .filter_map(|&(name, pattern)| {
            Regex::new(pattern).ok().map(|pattern| Rule { name, pattern })
        })
        .collect()
}

// Order matters: Edge and Chrome both claim Safari, Edge also claims Chrome.
fn browser_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            ("Edge", r"Edg(?:e|A|iOS)?/([\d.]+)"),
            ("Firefox", r"Firefox/([\d.]+)"),
            ("Chrome", r"(?:Chrome|CriOS)/([\d.]+)"),
            ("Safari", r"Version/([\d.]+).*Safari/"),
        ])
    })
}

fn os_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            ("Windows", r"Windows NT ([\d.]+)"),
            ("iOS", r"(?:iPhone|iPad|iPod).*? OS ([\d_]+)"),
            ("Mac OS", r"Mac OS X ([\d_.]+)"),
            ("Android", r"Android ([\d.]+)"),
            ("Linux", r"Linux()"),
        ])
    })
}

fn first_match(rules: &[Rule], ua: &str) -> Option<(&'static str, String)> {
    rules.iter().find_map(|rule| {
        rule.pattern.captures(ua).map(|caps| {
            let version = caps
                .get(1)
                .map(|m| m.as_str().replace('_', "."))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string());
            (rule.name, version)
        })
    })
}

impl DeviceInfo {
    /// Detect browser, OS and device class from a user-agent string
    pub fn from_user_agent(ua: &str) -> Self {
        let mut info = DeviceInfo {
            ua: ua.to_string(),
            ..DeviceInfo::default()
        };

        if let Some((browser, version)) = first_match(browser_rules(), ua) {
            info.browser = browser.to_string();
            info.browser_version = version;
        }

        if let Some((os, version)) = first_match(os_rules(), ua) {
            info.os = os.to_string();
            info.os_version = version;
        }

        if ua.contains("iPhone") {
            info.device = "iPhone".to_string();
            info.device_type = "Mobile".to_string();
        } else if ua.contains("iPad") {
            info.device = "iPad".to_string();
            info.device_type = "Tablet".to_string();
        } else if ua.contains("Android") {
            info.device_type = if ua.contains("Mobile") { "Mobile" } else { "Tablet" }.to_string();
        }

        info
    }
}
