//! Platform detection and compiler installation instructions

use std::fmt;

/// Release page for the standalone Tailwind CSS binaries
pub const RELEASES_URL: &str = "https://github.com/tailwindlabs/tailwindcss/releases";

/// Platforms with a published standalone binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS on Apple silicon
    MacosArm64,
    /// macOS on Intel
    MacosX64,
    /// Linux on `x86_64`
    LinuxX64,
    /// Linux on `aarch64`
    LinuxArm64,
    /// Anything else
    Other,
}

impl Platform {
    /// Platform of the running process
    #[must_use]
    pub fn detect() -> Self {
        Self::from_os_arch(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map an OS/architecture pair as reported by `std::env::consts`
    #[must_use]
    pub fn from_os_arch(os: &str, arch: &str) -> Self {
        match (os, arch) {
            ("macos", "aarch64") => Self::MacosArm64,
            ("macos", "x86_64") => Self::MacosX64,
            ("linux", "x86_64") => Self::LinuxX64,
            ("linux", "aarch64") => Self::LinuxArm64,
            _ => Self::Other,
        }
    }

    /// Parse a release identifier such as `linux-x64`
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "macos-arm64" => Self::MacosArm64,
            "macos-x64" => Self::MacosX64,
            "linux-x64" => Self::LinuxX64,
            "linux-arm64" => Self::LinuxArm64,
            _ => Self::Other,
        }
    }

    /// Release identifier used in binary names
    #[must_use]
    pub const fn identifier(self) -> Option<&'static str> {
        match self {
            Self::MacosArm64 => Some("macos-arm64"),
            Self::MacosX64 => Some("macos-x64"),
            Self::LinuxX64 => Some("linux-x64"),
            Self::LinuxArm64 => Some("linux-arm64"),
            Self::Other => None,
        }
    }

    /// Direct download URL of the latest standalone binary
    #[must_use]
    pub fn download_url(self) -> Option<String> {
        self.identifier()
            .map(|id| format!("{RELEASES_URL}/latest/download/tailwindcss-{id}"))
    }

    /// Installation steps for this platform
    #[must_use]
    pub fn install_instructions(self) -> InstallInstructions {
        InstallInstructions::for_platform(self)
    }
}

/// Remediation printed when no compiler is found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallInstructions {
    /// Platform the instructions were written for
    pub platform: Platform,
    /// Download URL, absent for unrecognized platforms
    pub download_url: Option<String>,
    /// Shell steps, one per line
    pub steps: Vec<String>,
}

impl InstallInstructions {
    /// Build the instructions for `platform`
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        let download_url = platform.download_url();

        let steps = match (platform.identifier(), &download_url) {
            (Some(id), Some(url)) => vec![
                "mkdir -p bin".to_string(),
                format!("curl -sL {url} -o bin/tailwindcss"),
                "chmod +x bin/tailwindcss".to_string(),
                format!("# or place tailwindcss-{id} anywhere on the search list as `tailwindcss`"),
            ],
            _ => vec![
                format!("# download the standalone binary for your platform from {RELEASES_URL}"),
                "# save it as bin/tailwindcss and make it executable".to_string(),
                "npm install -D tailwindcss".to_string(),
            ],
        };

        Self {
            platform,
            download_url,
            steps,
        }
    }
}

impl fmt::Display for InstallInstructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.platform.identifier() {
            Some(id) => writeln!(f, "Install the Tailwind CSS standalone compiler ({id}):")?,
            None => writeln!(f, "Install the Tailwind CSS compiler:")?,
        }
        for step in &self.steps {
            writeln!(f, "  {step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KNOWN: [&str; 4] = ["macos-arm64", "macos-x64", "linux-x64", "linux-arm64"];

    #[test]
    fn test_known_platforms_have_substituted_urls() {
        for id in KNOWN {
            let instructions = Platform::from_identifier(id).install_instructions();
            let url = instructions.download_url.clone().unwrap();

            assert!(!url.is_empty());
            assert!(url.ends_with(&format!("tailwindcss-{id}")), "url was {url}");
            assert!(instructions.to_string().contains(&url));
        }
    }

    #[test]
    fn test_os_arch_mapping() {
        assert_eq!(Platform::from_os_arch("macos", "aarch64"), Platform::MacosArm64);
        assert_eq!(Platform::from_os_arch("linux", "x86_64"), Platform::LinuxX64);
        assert_eq!(Platform::from_os_arch("windows", "x86_64"), Platform::Other);
        assert_eq!(Platform::from_os_arch("freebsd", "aarch64"), Platform::Other);
    }

    #[test]
    fn test_fallback_instructions() {
        let text = Platform::Other.install_instructions().to_string();
        assert!(text.contains(RELEASES_URL));
        assert!(text.contains("npm install -D tailwindcss"));
        assert!(!text.contains("latest/download"));
    }

    proptest! {
        #[test]
        fn unrecognized_identifiers_fall_back(id in "[a-z0-9-]{0,16}") {
            prop_assume!(!KNOWN.contains(&id.as_str()));
            let instructions = Platform::from_identifier(&id).install_instructions();
            prop_assert_eq!(instructions.platform, Platform::Other);
            prop_assert!(instructions.download_url.is_none());
        }
    }
}
