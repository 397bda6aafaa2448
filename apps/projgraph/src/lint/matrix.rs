//! Link compatibility matrix.
//!
//! Maps a source `(platform, product)` to every `(platform, product)` it may
//! depend on. Sources missing from the table are unsupported outright.

use crate::models::project::{Platform, Product};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LintableTarget {
    pub platform: Platform,
    pub product: Product,
}

impl LintableTarget {
    pub const fn new(platform: Platform, product: Product) -> Self {
        Self { platform, product }
    }
}

use Platform::{Ios, MacOs, TvOs, WatchOs};
use Product::*;

const fn lt(platform: Platform, product: Product) -> LintableTarget {
    LintableTarget::new(platform, product)
}

type Row = (LintableTarget, &'static [LintableTarget]);

#[rustfmt::skip]
const VALID_LINKS: &[Row] = &[
    // iOS
    (lt(Ios, App), &[
        lt(Ios, StaticLibrary), lt(Ios, DynamicLibrary), lt(Ios, Framework),
        lt(Ios, StaticFramework), lt(Ios, Bundle), lt(Ios, AppExtension),
        lt(Ios, StickerPackExtension), lt(WatchOs, Watch2App),
    ]),
    (lt(Ios, StaticLibrary), &[
        lt(Ios, StaticLibrary), lt(Ios, StaticFramework), lt(Ios, Bundle),
    ]),
    (lt(Ios, StaticFramework), &[
        lt(Ios, StaticLibrary), lt(Ios, StaticFramework), lt(Ios, Bundle),
    ]),
    (lt(Ios, DynamicLibrary), &[
        lt(Ios, DynamicLibrary),
    ]),
    (lt(Ios, Framework), &[
        lt(Ios, Framework), lt(Ios, StaticLibrary), lt(Ios, StaticFramework),
        lt(Ios, Bundle),
    ]),
    (lt(Ios, Bundle), &[]),
    (lt(Ios, UnitTests), &[
        lt(Ios, App), lt(Ios, StaticLibrary), lt(Ios, DynamicLibrary),
        lt(Ios, Framework), lt(Ios, StaticFramework), lt(Ios, Bundle),
    ]),
    (lt(Ios, UiTests), &[
        lt(Ios, App), lt(Ios, StaticLibrary), lt(Ios, DynamicLibrary),
        lt(Ios, Framework), lt(Ios, StaticFramework), lt(Ios, Bundle),
    ]),
    (lt(Ios, AppExtension), &[
        lt(Ios, StaticLibrary), lt(Ios, DynamicLibrary), lt(Ios, Framework),
        lt(Ios, StaticFramework), lt(Ios, Bundle),
    ]),
    (lt(Ios, StickerPackExtension), &[]),
    // macOS
    (lt(MacOs, App), &[
        lt(MacOs, StaticLibrary), lt(MacOs, DynamicLibrary), lt(MacOs, Framework),
        lt(MacOs, StaticFramework), lt(MacOs, Bundle), lt(MacOs, AppExtension),
    ]),
    (lt(MacOs, StaticLibrary), &[
        lt(MacOs, StaticLibrary), lt(MacOs, StaticFramework), lt(MacOs, Bundle),
    ]),
    (lt(MacOs, StaticFramework), &[
        lt(MacOs, StaticLibrary), lt(MacOs, StaticFramework), lt(MacOs, Bundle),
    ]),
    (lt(MacOs, DynamicLibrary), &[
        lt(MacOs, DynamicLibrary),
    ]),
    (lt(MacOs, Framework), &[
        lt(MacOs, Framework), lt(MacOs, StaticLibrary), lt(MacOs, StaticFramework),
        lt(MacOs, Bundle),
    ]),
    (lt(MacOs, Bundle), &[]),
    (lt(MacOs, UnitTests), &[
        lt(MacOs, App), lt(MacOs, StaticLibrary), lt(MacOs, DynamicLibrary),
        lt(MacOs, Framework), lt(MacOs, StaticFramework), lt(MacOs, Bundle),
    ]),
    (lt(MacOs, UiTests), &[
        lt(MacOs, App), lt(MacOs, StaticLibrary), lt(MacOs, DynamicLibrary),
        lt(MacOs, Framework), lt(MacOs, StaticFramework), lt(MacOs, Bundle),
    ]),
    (lt(MacOs, AppExtension), &[
        lt(MacOs, StaticLibrary), lt(MacOs, DynamicLibrary), lt(MacOs, Framework),
        lt(MacOs, StaticFramework), lt(MacOs, Bundle),
    ]),
    // tvOS
    (lt(TvOs, App), &[
        lt(TvOs, StaticLibrary), lt(TvOs, DynamicLibrary), lt(TvOs, Framework),
        lt(TvOs, StaticFramework), lt(TvOs, Bundle), lt(TvOs, AppExtension),
    ]),
    (lt(TvOs, StaticLibrary), &[
        lt(TvOs, StaticLibrary), lt(TvOs, StaticFramework), lt(TvOs, Bundle),
    ]),
    (lt(TvOs, StaticFramework), &[
        lt(TvOs, StaticLibrary), lt(TvOs, StaticFramework), lt(TvOs, Bundle),
    ]),
    (lt(TvOs, DynamicLibrary), &[
        lt(TvOs, DynamicLibrary),
    ]),
    (lt(TvOs, Framework), &[
        lt(TvOs, Framework), lt(TvOs, StaticLibrary), lt(TvOs, StaticFramework),
        lt(TvOs, Bundle),
    ]),
    (lt(TvOs, Bundle), &[]),
    (lt(TvOs, UnitTests), &[
        lt(TvOs, App), lt(TvOs, StaticLibrary), lt(TvOs, DynamicLibrary),
        lt(TvOs, Framework), lt(TvOs, StaticFramework), lt(TvOs, Bundle),
    ]),
    (lt(TvOs, UiTests), &[
        lt(TvOs, App), lt(TvOs, StaticLibrary), lt(TvOs, DynamicLibrary),
        lt(TvOs, Framework), lt(TvOs, StaticFramework), lt(TvOs, Bundle),
    ]),
    (lt(TvOs, AppExtension), &[
        lt(TvOs, StaticLibrary), lt(TvOs, DynamicLibrary), lt(TvOs, Framework),
        lt(TvOs, StaticFramework), lt(TvOs, Bundle),
    ]),
    // watchOS
    (lt(WatchOs, Watch2App), &[
        lt(WatchOs, Watch2Extension),
    ]),
    (lt(WatchOs, Watch2Extension), &[
        lt(WatchOs, StaticLibrary), lt(WatchOs, DynamicLibrary), lt(WatchOs, Framework),
        lt(WatchOs, StaticFramework),
    ]),
    (lt(WatchOs, StaticLibrary), &[
        lt(WatchOs, StaticLibrary), lt(WatchOs, StaticFramework),
    ]),
    (lt(WatchOs, StaticFramework), &[
        lt(WatchOs, StaticLibrary), lt(WatchOs, StaticFramework),
    ]),
    (lt(WatchOs, DynamicLibrary), &[
        lt(WatchOs, DynamicLibrary),
    ]),
    (lt(WatchOs, Framework), &[
        lt(WatchOs, Framework), lt(WatchOs, StaticLibrary), lt(WatchOs, StaticFramework),
    ]),
];

fn table() -> &'static HashMap<LintableTarget, HashSet<LintableTarget>> {
    static TABLE: OnceLock<HashMap<LintableTarget, HashSet<LintableTarget>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        VALID_LINKS
            .iter()
            .map(|(from, to)| (*from, to.iter().copied().collect()))
            .collect()
    })
}

/// Targets `from` may depend on, or `None` when `from` itself is unsupported.
pub fn valid_links(from: LintableTarget) -> Option<&'static HashSet<LintableTarget>> {
    table().get(&from)
}

/// Outcome of checking one edge against the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCheck {
    Allowed,
    UnsupportedSource,
    InvalidDependency,
}

pub fn check_link(from: LintableTarget, to: LintableTarget) -> LinkCheck {
    match valid_links(from) {
        None => LinkCheck::UnsupportedSource,
        Some(allowed) if allowed.contains(&to) => LinkCheck::Allowed,
        Some(_) => LinkCheck::InvalidDependency,
    }
}
