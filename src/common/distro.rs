use std::fs;
use std::path::Path;

/// Represents a detected operating system with family checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatingSystem {
    /// Fedora
    Fedora,
    /// RHEL and its rebuilds (CentOS, Rocky, Alma)
    RedHat,
    /// Debian
    Debian,
    /// Ubuntu
    Ubuntu,
    /// Pop!_OS (Ubuntu-based)
    PopOS,
    /// Linux Mint (Ubuntu-based)
    LinuxMint,
    /// Vanilla Arch Linux
    Arch,
    /// Manjaro Linux
    Manjaro,
    /// EndeavourOS
    EndeavourOS,
    /// Unknown distribution with ID
    Unknown(String),
}

/// What we learned from the release files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub os: OperatingSystem,
    /// Human-readable name, e.g. "Fedora Linux 40 (Workstation Edition)".
    pub pretty_name: String,
}

const UNKNOWN_DISTRIBUTION: &str = "Unknown Linux Distribution";

impl SystemInfo {
    /// Detect from `/etc/os-release`, then lsb-release, fedora-release and
    /// arch-release in that order.
    pub fn detect() -> Self {
        Self::detect_in(Path::new("/"))
    }

    fn detect_in(root: &Path) -> Self {
        let read = |name: &str| fs::read_to_string(root.join("etc").join(name)).ok();

        if let Some(content) = read("os-release") {
            return Self::from_os_release(&content);
        }
        if let Some(content) = read("lsb-release") {
            return Self::from_lsb_release(&content);
        }
        if let Some(content) = read("fedora-release") {
            return SystemInfo {
                os: OperatingSystem::Fedora,
                pretty_name: content.trim().to_string(),
            };
        }
        if root.join("etc/arch-release").exists() {
            return SystemInfo {
                os: OperatingSystem::Arch,
                pretty_name: "Arch Linux".to_string(),
            };
        }

        SystemInfo {
            os: OperatingSystem::Unknown(String::new()),
            pretty_name: UNKNOWN_DISTRIBUTION.to_string(),
        }
    }

    fn from_os_release(content: &str) -> Self {
        let mut id = String::new();
        let mut id_like = String::new();
        let mut pretty_name = None;

        for line in content.lines() {
            if let Some(val) = line.strip_prefix("ID=") {
                id = val.trim_matches('"').to_string();
            } else if let Some(val) = line.strip_prefix("ID_LIKE=") {
                id_like = val.trim_matches('"').to_string();
            } else if let Some(val) = line.strip_prefix("PRETTY_NAME=") {
                pretty_name = Some(val.trim_matches('"').to_string());
            }
        }

        SystemInfo {
            os: OperatingSystem::from_ids(&id, &id_like),
            pretty_name: pretty_name.unwrap_or_else(|| "Unknown Distribution".to_string()),
        }
    }

    fn from_lsb_release(content: &str) -> Self {
        let mut distro = String::new();
        let mut release = String::new();

        for line in content.lines() {
            if let Some(val) = line.strip_prefix("DISTRIB_ID=") {
                distro = val.trim_matches('"').to_string();
            } else if let Some(val) = line.strip_prefix("DISTRIB_RELEASE=") {
                release = val.trim_matches('"').to_string();
            }
        }

        let pretty_name = if !distro.is_empty() && !release.is_empty() {
            format!("{} {}", distro, release)
        } else {
            distro.clone()
        };

        SystemInfo {
            os: OperatingSystem::from_ids(&distro.to_lowercase(), ""),
            pretty_name,
        }
    }
}

impl OperatingSystem {
    fn from_ids(id: &str, id_like: &str) -> Self {
        match id {
            "fedora" => Self::Fedora,
            "rhel" | "centos" | "rocky" | "almalinux" => Self::RedHat,
            "debian" => Self::Debian,
            "ubuntu" => Self::Ubuntu,
            "pop" => Self::PopOS,
            "linuxmint" => Self::LinuxMint,
            "arch" => Self::Arch,
            "manjaro" => Self::Manjaro,
            "endeavouros" => Self::EndeavourOS,
            _ => {
                // Unknown IDs fall back to their ID_LIKE family
                if id_like.contains("arch") {
                    Self::Arch
                } else if id_like.contains("ubuntu") {
                    Self::Ubuntu
                } else if id_like.contains("debian") {
                    Self::Debian
                } else if id_like.contains("rhel") || id_like.contains("centos") {
                    Self::RedHat
                } else if id_like.contains("fedora") {
                    Self::Fedora
                } else {
                    Self::Unknown(id.to_string())
                }
            }
        }
    }

    /// Returns the parent OS this distribution is based on, `None` for roots.
    pub fn based_on(&self) -> Option<Self> {
        match self {
            Self::Manjaro | Self::EndeavourOS => Some(Self::Arch),
            Self::PopOS | Self::LinuxMint => Some(Self::Ubuntu),
            Self::Ubuntu => Some(Self::Debian),
            Self::RedHat => Some(Self::Fedora),
            Self::Arch | Self::Debian | Self::Fedora | Self::Unknown(_) => None,
        }
    }

    pub fn is_arch_based(&self) -> bool {
        *self == Self::Arch || self.based_on().is_some_and(|p| p.is_arch_based())
    }

    pub fn is_debian_based(&self) -> bool {
        *self == Self::Debian || self.based_on().is_some_and(|p| p.is_debian_based())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fedora() {
        let content = r#"NAME="Fedora Linux"
VERSION="40 (Workstation Edition)"
ID=fedora
VERSION_ID=40
PRETTY_NAME="Fedora Linux 40 (Workstation Edition)""#;
        let info = SystemInfo::from_os_release(content);
        assert_eq!(info.os, OperatingSystem::Fedora);
        assert_eq!(info.pretty_name, "Fedora Linux 40 (Workstation Edition)");
    }

    #[test]
    fn test_parse_ubuntu() {
        let content = r#"PRETTY_NAME="Ubuntu 22.04.3 LTS"
NAME="Ubuntu"
VERSION_ID="22.04"
ID=ubuntu
ID_LIKE=debian
UBUNTU_CODENAME=jammy"#;
        let info = SystemInfo::from_os_release(content);
        assert_eq!(info.os, OperatingSystem::Ubuntu);
        assert!(info.os.is_debian_based());
    }

    #[test]
    fn test_parse_unknown_arch_based() {
        let content = r#"NAME="Custom Arch"
PRETTY_NAME="Custom Arch Distro"
ID="customarch"
ID_LIKE="arch""#;
        let info = SystemInfo::from_os_release(content);
        assert_eq!(info.os, OperatingSystem::Arch);
        assert!(info.os.is_arch_based());
    }

    #[test]
    fn test_rocky_is_redhat_family() {
        let info = SystemInfo::from_os_release("ID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n");
        assert_eq!(info.os, OperatingSystem::RedHat);
        assert_eq!(info.os.based_on(), Some(OperatingSystem::Fedora));
        assert_eq!(info.pretty_name, "Unknown Distribution");
    }

    #[test]
    fn test_parse_lsb_release() {
        let info = SystemInfo::from_lsb_release("DISTRIB_ID=Ubuntu\nDISTRIB_RELEASE=20.04\n");
        assert_eq!(info.pretty_name, "Ubuntu 20.04");
        assert_eq!(info.os, OperatingSystem::Ubuntu);

        let info = SystemInfo::from_lsb_release("DISTRIB_ID=LinuxMint\n");
        assert_eq!(info.pretty_name, "LinuxMint");
        assert_eq!(info.os, OperatingSystem::LinuxMint);
    }

    #[test]
    fn test_detect_fallback_chain() {
        let tmp = tempfile::tempdir().unwrap();
        let etc = tmp.path().join("etc");
        fs::create_dir_all(&etc).unwrap();

        let info = SystemInfo::detect_in(tmp.path());
        assert_eq!(info.pretty_name, UNKNOWN_DISTRIBUTION);

        fs::write(etc.join("arch-release"), "").unwrap();
        assert_eq!(SystemInfo::detect_in(tmp.path()).os, OperatingSystem::Arch);

        fs::write(etc.join("fedora-release"), "Fedora release 39 (Thirty Nine)\n").unwrap();
        let info = SystemInfo::detect_in(tmp.path());
        assert_eq!(info.os, OperatingSystem::Fedora);
        assert_eq!(info.pretty_name, "Fedora release 39 (Thirty Nine)");
    }

    #[test]
    fn test_family_checks() {
        assert!(OperatingSystem::Manjaro.is_arch_based());
        assert!(OperatingSystem::PopOS.is_debian_based());
        assert!(!OperatingSystem::Arch.is_debian_based());
        assert!(!OperatingSystem::Fedora.is_arch_based());
        assert_eq!(OperatingSystem::Unknown("gentoo".into()).based_on(), None);
    }
}
