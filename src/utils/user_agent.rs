use woothee::parser::Parser;

pub const DEFAULT_DEVICE: &str = "Desktop";
pub const UNKNOWN_BROWSER: &str = "Unknown";

/// woothee reports undetected values as "UNKNOWN"
const WOOTHEE_UNKNOWN: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUserAgent {
    /// "<name> <version>", or just the name when the version is unknown
    pub browser: String,
    pub device: String,
}

fn known(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != WOOTHEE_UNKNOWN).then_some(value)
}

fn browser_label(name: &str, version: &str) -> String {
    match (known(name), known(version)) {
        (Some(name), Some(version)) => format!("{name} {version}"),
        (Some(name), None) => name.to_string(),
        (None, _) => UNKNOWN_BROWSER.to_string(),
    }
}

/// Map woothee's category onto the device vocabulary stored with visits.
fn device_category(category: &str, name: &str, os: &str, user_agent: &str) -> String {
    let device = match category {
        "smartphone" | "mobilephone" => {
            let android_tablet = os == "Android" && !user_agent.contains("Mobile");
            if os == "iPad" || android_tablet {
                "tablet"
            } else {
                "mobile"
            }
        }
        "appliance" => {
            let console = ["PlayStation", "Nintendo", "Xbox"]
                .iter()
                .any(|brand| name.contains(brand) || os.contains(brand));
            if console { "console" } else { "smarttv" }
        }
        _ => DEFAULT_DEVICE,
    };
    device.to_string()
}

/// Product tokens checked when woothee cannot name the browser, most
/// specific first since Chromium forks also carry `Chrome/` and `Safari/`.
const PRODUCT_TOKENS: [(&str, &str); 6] = [
    ("Edg/", "Edge"),
    ("OPR/", "Opera"),
    ("Firefox/", "Firefox"),
    ("CriOS/", "Chrome"),
    ("Chrome/", "Chrome"),
    ("Safari/", "Safari"),
];

/// Digits and dots directly after `token`, if any
fn token_version<'a>(user_agent: &'a str, token: &str) -> Option<&'a str> {
    let start = user_agent.find(token)? + token.len();
    let rest = &user_agent[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    known(&rest[..end])
}

/// Label from the first recognizable `Name/version` product token.
fn product_token_label(user_agent: &str) -> Option<String> {
    let (token, name) = PRODUCT_TOKENS
        .iter()
        .find(|(token, _)| user_agent.contains(token))?;

    // Safari advertises its release in `Version/`, not in `Safari/`
    let version = if *name == "Safari" {
        token_version(user_agent, "Version/")
    } else {
        token_version(user_agent, token)
    };

    Some(match version {
        Some(version) => format!("{name} {version}"),
        None => name.to_string(),
    })
}

/// Derive the browser label and device category from a raw `User-Agent`.
///
/// Never fails: anything neither woothee nor the product tokens identify
/// falls back to [`UNKNOWN_BROWSER`] and [`DEFAULT_DEVICE`].
pub fn parse_user_agent(user_agent: &str) -> ParsedUserAgent {
    let parsed = Parser::new().parse(user_agent);

    let browser = match parsed.as_ref().filter(|r| known(r.name).is_some()) {
        Some(result) => browser_label(result.name, result.version),
        None => product_token_label(user_agent).unwrap_or_else(|| UNKNOWN_BROWSER.to_string()),
    };
    let device = match parsed {
        Some(result) => device_category(result.category, result.name, result.os, user_agent),
        None => DEFAULT_DEVICE.to_string(),
    };

    ParsedUserAgent { browser, device }
}
