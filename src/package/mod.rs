//! Package source resolution and the package manager plumbing around it.
//!
//! # Flow
//!
//! 1. [`Resolver`] asks a [`SourceProbe`](probe::SourceProbe) about the native manager and, when
//!    enabled, Flatpak, producing an ordered list of [`PackageSource`]s.
//! 2. Flatpak candidates are ranked with [`score::score`].
//! 3. [`Selector`] reduces the list to one source, prompting only when more
//!    than one is available.
//! 4. [`ops`] runs the chosen source's commands from its [`CommandTable`](manager::CommandTable).

pub mod commands;
mod error;
mod manager;
pub mod ops;
mod probe;
mod resolve;
pub mod score;
mod select;

pub use error::ResolveError;
pub use manager::{NativeManager, SourceKind};
pub use probe::SystemProbe;
pub use resolve::{PackageSource, Resolver, SourcePreferences};
pub use select::Selector;
