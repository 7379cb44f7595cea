//! Platform version values

/// Version components as captured from the user agent
///
/// Produced by a platform's version parser; still text at this point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawVersion {
    /// Major component (e.g. `"10"`)
    pub major: String,
    /// Minor component, if the pattern captured one
    pub minor: Option<String>,
}

impl RawVersion {
    /// Create a raw version from both components
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> Self {
        Self {
            major: major.into(),
            minor: Some(minor.into()),
        }
    }

    /// Create a raw version with only a major component
    pub fn major_only(major: impl Into<String>) -> Self {
        Self {
            major: major.into(),
            minor: None,
        }
    }
}

/// A parsed platform version
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformVersion {
    /// `"major.minor"`
    pub str: String,
    /// The version as a decimal number (`10.3`)
    pub num: f64,
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
}

impl PlatformVersion {
    /// Convert captured components into a version
    ///
    /// A missing or empty minor reads as `0`. `str` and `num` keep the
    /// captured digits. Returns `None` when the major component is not a
    /// number.
    pub fn from_raw(raw: &RawVersion) -> Option<Self> {
        let major_str = raw.major.trim();
        let major: u32 = major_str.parse().ok()?;
        let minor_str = match raw.minor.as_deref().map(str::trim) {
            None | Some("") => "0",
            Some(minor) => minor,
        };
        let minor: u32 = minor_str.parse().ok()?;

        // Captured text is kept as-is, so "4" + "04" reads as 4.04
        let str = format!("{}.{}", major_str, minor_str);
        let num = str.parse().unwrap_or(major as f64);

        Some(Self {
            str,
            num,
            major,
            minor,
        })
    }
}
