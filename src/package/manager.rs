//! Package sources and their command tables.
//!
//! Each source is described by a static [`CommandTable`] of argument
//! templates. Nothing here runs commands; see [`super::ops`] for that.

use std::fmt;
use std::str::FromStr;

use super::ResolveError;

/// The distribution's own package manager. Exactly one is active per system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeManager {
    /// DNF - Fedora/RHEL family
    Dnf,
    /// APT - Debian/Ubuntu family
    Apt,
    /// Pacman - Arch Linux family
    Pacman,
}

impl NativeManager {
    /// Detection order when probing `PATH`.
    pub const ALL: [NativeManager; 3] = [Self::Dnf, Self::Apt, Self::Pacman];

    /// Identifier stored in the config file.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Dnf => "dnf",
            Self::Apt => "apt",
            Self::Pacman => "pacman",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dnf => "DNF",
            Self::Apt => "APT",
            Self::Pacman => "Pacman",
        }
    }

    /// The binary whose presence on `PATH` means this manager is in use.
    pub fn binary(&self) -> &'static str {
        self.id()
    }

    /// First native manager found on `PATH`, in [`Self::ALL`] order.
    pub fn detect() -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| which::which(m.binary()).is_ok())
    }
}

impl FromStr for NativeManager {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dnf" => Ok(Self::Dnf),
            "apt" => Ok(Self::Apt),
            "pacman" => Ok(Self::Pacman),
            _ => Err(ResolveError::UnknownManager(s.to_string())),
        }
    }
}

impl fmt::Display for NativeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Where a package can come from: the native manager or the Flatpak store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Native(NativeManager),
    Flatpak,
}

impl SourceKind {
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Native(m) => m.id(),
            Self::Flatpak => "flatpak",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Native(m) => m.display_name(),
            Self::Flatpak => "Flatpak",
        }
    }

    pub fn commands(&self) -> &'static CommandTable {
        match self {
            Self::Native(NativeManager::Dnf) => &DNF_COMMANDS,
            Self::Native(NativeManager::Apt) => &APT_COMMANDS,
            Self::Native(NativeManager::Pacman) => &PACMAN_COMMANDS,
            Self::Flatpak => &FLATPAK_COMMANDS,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Placeholder replaced by the exact package name.
pub const NAME_PLACEHOLDER: &str = "{name}";
/// Placeholder replaced by `^name$` with regex metacharacters escaped.
pub const PATTERN_PLACEHOLDER: &str = "{pattern}";

/// A program plus an argument template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl Invocation {
    const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }

    /// Arguments with `{name}` / `{pattern}` substituted for `name`.
    pub fn args_for(&self, name: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| match *arg {
                NAME_PLACEHOLDER => name.to_string(),
                PATTERN_PLACEHOLDER => anchored_pattern(name),
                other => other.to_string(),
            })
            .collect()
    }

    /// Template arguments followed by `extra` (package lists, orphan names).
    pub fn args_with(&self, extra: &[&str]) -> Vec<String> {
        self.args
            .iter()
            .chain(extra.iter())
            .map(|s| s.to_string())
            .collect()
    }
}

/// Exact-match regex for searches that would otherwise match substrings.
pub fn anchored_pattern(name: &str) -> String {
    format!("^{}$", regex::escape(name))
}

/// One step of a multi-command operation, with a progress line.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub summary: &'static str,
    pub invocation: Invocation,
}

/// Query listing orphaned packages, then removal of whatever it printed.
#[derive(Debug, Clone, Copy)]
pub struct OrphanSweep {
    pub query: Invocation,
    pub remove: Invocation,
}

/// How to turn a listing command's stdout into package names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// One name per line.
    Names,
    /// `name.arch  version  repo` under an "Installed Packages" header.
    DnfList,
    /// `name/suite,now version arch [installed]` after "Listing...".
    AptList,
    /// `name version`.
    PacmanQuery,
}

#[derive(Debug, Clone, Copy)]
pub struct Listing {
    pub invocation: Invocation,
    pub format: ListFormat,
}

/// Everything needed to drive one package source from the command line.
#[derive(Debug)]
pub struct CommandTable {
    /// Package names are appended.
    pub install: Invocation,
    /// Package names are appended.
    pub remove: Invocation,
    pub update: &'static [Step],
    pub clean: &'static [Step],
    pub orphans: Option<OrphanSweep>,
    /// Tried in order until one succeeds with output.
    pub list: &'static [Listing],
    /// Exact availability in the repositories (native) or remote search (Flatpak).
    pub query: Invocation,
    /// Exact installed check (native) or installed application listing (Flatpak).
    pub installed: Invocation,
}

static DNF_COMMANDS: CommandTable = CommandTable {
    install: Invocation::new("sudo", &["dnf", "install", "-y"]),
    remove: Invocation::new("sudo", &["dnf", "remove", "-y"]),
    update: &[Step {
        summary: "Upgrading packages",
        invocation: Invocation::new("sudo", &["dnf", "update", "-y"]),
    }],
    clean: &[Step {
        summary: "Removing orphaned packages",
        invocation: Invocation::new("sudo", &["dnf", "autoremove", "-y"]),
    }],
    orphans: None,
    list: &[
        Listing {
            invocation: Invocation::new("rpm", &["-qa", "--queryformat", "%{NAME}\n"]),
            format: ListFormat::Names,
        },
        Listing {
            invocation: Invocation::new("dnf", &["list", "--installed"]),
            format: ListFormat::DnfList,
        },
    ],
    query: Invocation::new("dnf", &["repoquery", "--quiet", NAME_PLACEHOLDER]),
    installed: Invocation::new("rpm", &["-q", NAME_PLACEHOLDER]),
};

static APT_COMMANDS: CommandTable = CommandTable {
    install: Invocation::new("sudo", &["apt", "install", "-y"]),
    remove: Invocation::new("sudo", &["apt", "remove", "-y"]),
    update: &[
        Step {
            summary: "Refreshing package lists",
            invocation: Invocation::new("sudo", &["apt", "update"]),
        },
        Step {
            summary: "Upgrading packages",
            invocation: Invocation::new("sudo", &["apt", "upgrade", "-y"]),
        },
    ],
    clean: &[
        Step {
            summary: "Cleaning package cache",
            invocation: Invocation::new("sudo", &["apt", "clean"]),
        },
        Step {
            summary: "Removing orphaned packages",
            invocation: Invocation::new("sudo", &["apt", "autoremove", "-y"]),
        },
    ],
    orphans: None,
    list: &[Listing {
        invocation: Invocation::new("apt", &["list", "--installed"]),
        format: ListFormat::AptList,
    }],
    query: Invocation::new(
        "apt-cache",
        &["search", "--names-only", PATTERN_PLACEHOLDER],
    ),
    installed: Invocation::new("dpkg-query", &["-W", "-f=${Status}", NAME_PLACEHOLDER]),
};

static PACMAN_COMMANDS: CommandTable = CommandTable {
    install: Invocation::new("sudo", &["pacman", "-S", "--noconfirm"]),
    remove: Invocation::new("sudo", &["pacman", "-R", "--noconfirm"]),
    update: &[Step {
        summary: "Synchronizing and upgrading packages",
        invocation: Invocation::new("sudo", &["pacman", "-Syu", "--noconfirm"]),
    }],
    clean: &[Step {
        summary: "Cleaning package cache",
        invocation: Invocation::new("sudo", &["pacman", "-Sc", "--noconfirm"]),
    }],
    orphans: Some(OrphanSweep {
        query: Invocation::new("pacman", &["-Qtdq"]),
        remove: Invocation::new("sudo", &["pacman", "-Rns", "--noconfirm"]),
    }),
    list: &[Listing {
        invocation: Invocation::new("pacman", &["-Q"]),
        format: ListFormat::PacmanQuery,
    }],
    query: Invocation::new("pacman", &["-Ss", PATTERN_PLACEHOLDER]),
    installed: Invocation::new("pacman", &["-Q", NAME_PLACEHOLDER]),
};

static FLATPAK_COMMANDS: CommandTable = CommandTable {
    install: Invocation::new("flatpak", &["install", "-y", "flathub"]),
    remove: Invocation::new("flatpak", &["uninstall", "-y"]),
    update: &[Step {
        summary: "Updating applications and runtimes",
        invocation: Invocation::new("flatpak", &["update", "-y"]),
    }],
    clean: &[
        Step {
            summary: "Removing unused runtimes",
            invocation: Invocation::new("flatpak", &["uninstall", "--unused", "-y"]),
        },
        Step {
            summary: "Repairing user installation",
            invocation: Invocation::new("flatpak", &["repair", "--user"]),
        },
    ],
    orphans: None,
    list: &[Listing {
        invocation: Invocation::new("flatpak", &["list", "--app", "--columns=application"]),
        format: ListFormat::Names,
    }],
    query: Invocation::new(
        "flatpak",
        &["search", "--columns=application,name", NAME_PLACEHOLDER],
    ),
    installed: Invocation::new("flatpak", &["list", "--app", "--columns=application,name"]),
};
